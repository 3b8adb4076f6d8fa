#![no_main]
use infback::{ByteSource, InflateBack, InputCursor};
use libfuzzer_sys::fuzz_target;

/// Hands out the input in chunks whose sizes come from the fuzzer.
struct Chunked<'a> {
    data: &'a [u8],
    sizes: &'a [u8],
}

impl ByteSource for Chunked<'_> {
    fn pull(&mut self) -> &[u8] {
        let n = match self.sizes.split_first() {
            Some((&s, rest)) => {
                self.sizes = rest;
                (s as usize).max(1)
            }
            None => self.data.len(),
        };
        let (head, tail) = self.data.split_at(n.min(self.data.len()));
        self.data = tail;
        head
    }
}

fuzz_target!(|input: &[u8]| {
    // First byte: how many of the following bytes are chunk sizes.
    let Some((&k, rest)) = input.split_first() else {
        return;
    };
    let (sizes, data) = rest.split_at((k as usize).min(rest.len()));

    // Decoding must not depend on how the input is split up.
    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
    let mut whole = Vec::new();
    let r1 = engine.run(&mut InputCursor::new(data), &mut whole);
    engine.end();

    let mut window = vec![0u8; 1 << 15];
    let mut engine = InflateBack::with_window(&mut window, 15).unwrap();
    let mut pieces = Vec::new();
    let r2 = engine.run(&mut Chunked { data, sizes }, &mut pieces);
    engine.end();

    assert_eq!(r1, r2);
    assert_eq!(whole, pieces);
});
