// Bit-level stream builder for hand-crafted DEFLATE inputs.

/// Packs fields LSB-first, the way DEFLATE lays them out.
#[derive(Default)]
pub struct BitWriter {
    out: Vec<u8>,
    acc: u64,
    n: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the low `count` bits of `value`, least significant first.
    pub fn bits(&mut self, value: u32, count: u32) -> &mut Self {
        self.acc |= ((value as u64) & ((1u64 << count) - 1)) << self.n;
        self.n += count;
        while self.n >= 8 {
            self.out.push(self.acc as u8);
            self.acc >>= 8;
            self.n -= 8;
        }
        self
    }

    /// Append a Huffman code of `len` bits, most significant first.
    pub fn code(&mut self, code: u32, len: u32) -> &mut Self {
        for i in (0..len).rev() {
            self.bits((code >> i) & 1, 1);
        }
        self
    }

    /// Block header: BFINAL then BTYPE.
    pub fn header(&mut self, last: bool, btype: u32) -> &mut Self {
        self.bits(last as u32, 1).bits(btype, 2)
    }

    /// Pad to a byte boundary and return the bytes.
    pub fn finish(&mut self) -> Vec<u8> {
        if self.n > 0 {
            self.out.push(self.acc as u8);
            self.acc = 0;
            self.n = 0;
        }
        std::mem::take(&mut self.out)
    }
}
