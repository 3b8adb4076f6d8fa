// Output side: the bounded buffer sink and its capacity check.

use std::io::Write;

use infback::{ByteSink, NullSink, OutputSink, SinkError, WriterSink};

#[test]
fn bounded_sink_fills_to_exact_capacity() {
    let mut buf = [0u8; 8];
    let mut sink = OutputSink::new(&mut buf);
    sink.push(b"1234").unwrap();
    sink.push(b"5678").unwrap();
    assert_eq!(sink.available(), 0);
    assert_eq!(
        sink.push(b"9"),
        Err(SinkError::CapacityExceeded { requested: 1, available: 0 })
    );
    assert_eq!(sink.filled(), b"12345678");
}

#[test]
fn rejected_push_leaves_buffer_untouched() {
    let mut buf = [b'.'; 6];
    {
        let mut sink = OutputSink::new(&mut buf[..4]);
        sink.push(b"ab").unwrap();
        assert!(sink.push(b"cde").is_err());
        assert_eq!(sink.written(), 2);
        assert_eq!(sink.capacity(), 4);
    }
    assert_eq!(&buf, b"ab....");
}

#[test]
fn zero_capacity_sink_accepts_only_empty_pushes() {
    let mut buf = [0u8; 0];
    let mut sink = OutputSink::new(&mut buf);
    sink.push(&[]).unwrap();
    assert!(matches!(sink.push(b"x"), Err(SinkError::CapacityExceeded { .. })));
}

#[test]
fn sink_error_messages() {
    let e = SinkError::CapacityExceeded { requested: 5, available: 2 };
    assert!(e.to_string().contains('5'));
    assert!(e.to_string().contains('2'));
    assert!(SinkError::Rejected(-7).to_string().contains("-7"));
}

#[test]
fn writer_sink_counts_and_flushes() {
    let mut sink = WriterSink::new(std::io::BufWriter::new(Vec::new()));
    sink.push(b"hello ").unwrap();
    sink.push(b"world").unwrap();
    sink.get_mut().flush().unwrap();
    assert_eq!(sink.written(), 11);
    assert_eq!(sink.into_inner().into_inner().unwrap(), b"hello world");
}

#[test]
fn dyn_sink_through_mut_reference() {
    let mut null = NullSink::default();
    {
        let sink: &mut dyn ByteSink = &mut null;
        sink.push(&[0; 100]).unwrap();
    }
    assert_eq!(null.count, 100);
}
