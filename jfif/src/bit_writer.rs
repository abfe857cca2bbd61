// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/// Accumulates bits MSB-first into a growable byte buffer.
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    bytes: Vec<u8>,
    // Pending bits live in the low `bits_in_acc` bits of `acc`.
    acc: u64,
    bits_in_acc: usize,
}

pub const MAX_BITS_PER_WRITE: usize = 32;

impl BitWriter {
    pub fn new() -> BitWriter {
        BitWriter::default()
    }

    pub fn append_bit(&mut self, bit: bool) {
        self.append_bits(bit as u32, 1);
    }

    /// Appends the low `num` bits of `value`, most significant first.
    /// ```
    /// # use jfif::bit_writer::BitWriter;
    /// let mut bw = BitWriter::new();
    /// bw.append_bits(0b101, 3);
    /// bw.append_bits(0b11110, 5);
    /// assert_eq!(bw.bits_written(), 8);
    /// assert_eq!(bw.pack(), vec![0b1011_1110]);
    /// ```
    pub fn append_bits(&mut self, value: u32, num: usize) {
        debug_assert!(num <= MAX_BITS_PER_WRITE);
        if num == 0 {
            return;
        }
        let masked = value as u64 & ((1u64 << num) - 1);
        self.acc = (self.acc << num) | masked;
        self.bits_in_acc += num;
        while self.bits_in_acc >= 8 {
            self.bits_in_acc -= 8;
            self.bytes.push((self.acc >> self.bits_in_acc) as u8);
        }
        self.acc &= (1u64 << self.bits_in_acc) - 1;
    }

    /// Pads with `pad` bits up to the next byte boundary.
    pub fn align(&mut self, pad: bool) {
        let missing = (8 - self.bits_in_acc % 8) % 8;
        let fill = if pad { u32::MAX } else { 0 };
        self.append_bits(fill, missing);
    }

    pub fn is_aligned(&self) -> bool {
        self.bits_in_acc == 0
    }

    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + self.bits_in_acc
    }

    /// Emits everything written so far and resets the writer. A trailing partial byte is
    /// completed with zero bits; callers that need another padding call [`Self::align`] first.
    pub fn pack(&mut self) -> Vec<u8> {
        self.align(false);
        std::mem::take(&mut self.bytes)
    }
}
