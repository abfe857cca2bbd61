// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::error::Error;
use byteorder::{BigEndian, ByteOrder};

/// Reads bits MSB-first from a sequence of bytes.
///
/// Running out of data is reported as [`Error::OutOfBounds`]; callers decide whether that
/// means the end of a scan or a truncated stream.
#[derive(Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    // The next bit to be read is bit `bits_in_buf - 1`; bits above `bits_in_buf` are zero.
    bit_buf: u64,
    bits_in_buf: usize,
    total_bits_read: usize,
}

impl Debug for BitReader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BitReader{{ data: [{} bytes], bit_buf: {:0width$b}, total_bits_read: {} }}",
            self.data.len(),
            self.bit_buf,
            self.total_bits_read,
            width = self.bits_in_buf
        )
    }
}

pub const MAX_BITS_PER_CALL: usize = 56;

impl<'a> BitReader<'a> {
    /// Constructs a BitReader for a given range of data.
    pub fn new(data: &'a [u8]) -> BitReader<'a> {
        BitReader {
            data,
            bit_buf: 0,
            bits_in_buf: 0,
            total_bits_read: 0,
        }
    }

    /// Reads `num` bits from the buffer without consuming them.
    pub fn peek(&mut self, num: usize) -> Result<u64, Error> {
        if num > MAX_BITS_PER_CALL {
            return Err(Error::ReadTooLarge(num));
        }
        self.refill();
        if self.bits_in_buf < num {
            return Err(Error::OutOfBounds);
        }
        Ok((self.bit_buf >> (self.bits_in_buf - num)) & ((1u64 << num) - 1))
    }

    /// Advances by `num` bits. The bits must already be in the buffer.
    pub fn consume(&mut self, num: usize) -> Result<(), Error> {
        if self.bits_in_buf < num {
            return Err(Error::OutOfBounds);
        }
        self.bits_in_buf -= num;
        self.bit_buf &= (1u64 << self.bits_in_buf) - 1;
        self.total_bits_read += num;
        Ok(())
    }

    /// Reads `num` bits from the buffer, most significant bit first.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0x0f, 0x80]);
    /// assert_eq!(br.read(4)?, 0);
    /// assert_eq!(br.read(5)?, 0b11111);
    /// assert_eq!(br.read(7)?, 0);
    /// assert_eq!(br.total_bits_read(), 16);
    /// assert!(br.read(1).is_err());
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn read(&mut self, num: usize) -> Result<u64, Error> {
        let ret = self.peek(num)?;
        self.consume(num)?;
        Ok(ret)
    }

    /// Reads a single bit.
    pub fn read_bit(&mut self) -> Result<u8, Error> {
        Ok(self.read(1)? as u8)
    }

    /// Returns the total number of bits that have been read or skipped.
    pub fn total_bits_read(&self) -> usize {
        self.total_bits_read
    }

    /// Returns the total number of bits that can still be read or skipped.
    pub fn total_bits_available(&self) -> usize {
        self.data.len() * 8 + self.bits_in_buf
    }

    /// Skips `num` bits.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0, 1]);
    /// assert_eq!(br.read(8)?, 0);
    /// br.skip_bits(4)?;
    /// assert_eq!(br.total_bits_read(), 12);
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn skip_bits(&mut self, mut n: usize) -> Result<(), Error> {
        if n > self.total_bits_available() {
            return Err(Error::OutOfBounds);
        }
        while n > 0 {
            let step = n.min(MAX_BITS_PER_CALL);
            self.read(step)?;
            n -= step;
        }
        Ok(())
    }

    /// Jumps to the next byte boundary, discarding the padding bits whatever their value.
    /// ```
    /// # use jfif::bit_reader::BitReader;
    /// let mut br = BitReader::new(&[0xff, 1]);
    /// br.skip_bits(3)?;
    /// br.jump_to_byte_boundary()?;
    /// assert_eq!(br.total_bits_read(), 8);
    /// assert_eq!(br.read(8)?, 1);
    /// # Ok::<(), jfif::error::Error>(())
    /// ```
    pub fn jump_to_byte_boundary(&mut self) -> Result<(), Error> {
        let byte_boundary = self.total_bits_read.div_ceil(8) * 8;
        self.skip_bits(byte_boundary - self.total_bits_read)
    }

    fn refill(&mut self) {
        if self.data.len() >= 8 {
            let read_bytes = (63 - self.bits_in_buf) >> 3;
            if read_bytes == 0 {
                return;
            }
            let bits = BigEndian::read_u64(self.data) >> (64 - read_bytes * 8);
            self.bit_buf = (self.bit_buf << (read_bytes * 8)) | bits;
            self.bits_in_buf += read_bytes * 8;
            self.data = &self.data[read_bytes..];
            debug_assert!(56 <= self.bits_in_buf && self.bits_in_buf < 64);
        } else {
            self.refill_slow()
        }
    }

    #[inline(never)]
    fn refill_slow(&mut self) {
        while self.bits_in_buf < 56 {
            let Some((&byte, rest)) = self.data.split_first() else {
                return;
            };
            self.bit_buf = (self.bit_buf << 8) | byte as u64;
            self.bits_in_buf += 8;
            self.data = rest;
        }
    }
}
