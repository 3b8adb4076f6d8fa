#![no_main]
use infback::{decompress, BoundedSource, InflateBack, InputCursor, NullSink, OutputSink};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through the engine.
    // Err results are expected and fine; what we verify is no panics or UB,
    // and that a bounded sink is never written past its capacity.

    // Zero-length and small output buffers.
    for cap in [0usize, 1, 4096] {
        let mut dst = vec![0u8; cap];
        if let Ok(n) = decompress(data, &mut dst, 15) {
            assert!(n <= cap);
        }
    }

    // Smallest window, output discarded.  Cap the input so a stream of empty
    // stored blocks cannot run for long.
    {
        let mut window = vec![0u8; 256];
        let mut engine = InflateBack::with_window(&mut window, 8).unwrap();
        let mut source = BoundedSource::new(InputCursor::new(data), 1 << 16);
        let _ = engine.run(&mut source, &mut NullSink::default());
        engine.end();
        engine.end();
    }

    // A copy taken before the run must agree with the original.
    {
        let mut window = vec![0u8; 1 << 15];
        let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
        let mut copy = engine.copy().unwrap();

        let mut a = vec![0u8; 1 << 16];
        let mut b = vec![0u8; 1 << 16];
        let mut sink_a = OutputSink::new(&mut a);
        let mut sink_b = OutputSink::new(&mut b);
        let ra = engine.run(&mut InputCursor::new(data), &mut sink_a);
        let rb = copy.run(&mut InputCursor::new(data), &mut sink_b);
        assert_eq!(ra, rb);
        assert_eq!(sink_a.filled(), sink_b.filled());
    }
});
