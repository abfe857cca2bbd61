// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    bit_reader::BitReader,
    bit_writer::BitWriter,
    error::{Error, Result},
};

pub const HUFFMAN_MAX_BITS: usize = 16;
/// Largest symbol list accepted in a DHT segment.
pub const HUFFMAN_MAX_SYMBOLS: usize = 176;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanClass {
    Dc,
    Ac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanCode {
    pub code: u16,
    pub len: u8,
}

/// A canonical Huffman table as stored in a DHT segment: the number of codes of each length
/// `1..=16` and the symbols in code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    counts: [u8; HUFFMAN_MAX_BITS],
    symbols: Vec<u8>,
    // Index by code length; -1 marks lengths without codes.
    max_code: [i32; HUFFMAN_MAX_BITS + 1],
    val_offset: [i32; HUFFMAN_MAX_BITS + 1],
}

impl HuffmanTable {
    pub fn new(counts: [u8; HUFFMAN_MAX_BITS], symbols: Vec<u8>) -> Result<HuffmanTable> {
        let total: usize = counts.iter().map(|&c| c as usize).sum();
        if total != symbols.len() {
            return Err(Error::SegmentLengthMismatch("DHT"));
        }
        let mut max_code = [-1; HUFFMAN_MAX_BITS + 1];
        let mut val_offset = [0; HUFFMAN_MAX_BITS + 1];
        let mut code = 0i32;
        let mut index = 0i32;
        for len in 1..=HUFFMAN_MAX_BITS {
            let count = counts[len - 1] as i32;
            if count > 0 {
                val_offset[len] = index - code;
                code += count;
                index += count;
                max_code[len] = code - 1;
            }
            if code > (1 << len) {
                return Err(Error::OversubscribedHuffmanTable);
            }
            code <<= 1;
        }
        Ok(HuffmanTable {
            counts,
            symbols,
            max_code,
            val_offset,
        })
    }

    /// Number of codes of each length; entry `i` is for length `i + 1`.
    pub fn counts(&self) -> &[u8; HUFFMAN_MAX_BITS] {
        &self.counts
    }

    /// Symbols in canonical code order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Assigns canonical codes: shortest first, consecutive within a length, shifting left
    /// whenever the length grows.
    pub fn codes(&self) -> impl Iterator<Item = (u8, HuffmanCode)> + '_ {
        let lengths = (1..=HUFFMAN_MAX_BITS)
            .flat_map(|len| std::iter::repeat_n(len as u8, self.counts[len - 1] as usize));
        let mut code = 0u32;
        let mut prev_len = 0u8;
        self.symbols.iter().zip(lengths).map(move |(&symbol, len)| {
            if prev_len != 0 {
                code = (code + 1) << (len - prev_len);
            }
            prev_len = len;
            (
                symbol,
                HuffmanCode {
                    code: code as u16,
                    len,
                },
            )
        })
    }

    /// Decodes one symbol, reading at most 16 bits.
    pub fn decode(&self, br: &mut BitReader) -> Result<u8> {
        let mut code = 0i32;
        for len in 1..=HUFFMAN_MAX_BITS {
            let bit = br.read_bit().map_err(|_| Error::UnexpectedEndOfScan)?;
            code = (code << 1) | bit as i32;
            if code <= self.max_code[len] {
                return Ok(self.symbols[(self.val_offset[len] + code) as usize]);
            }
        }
        Err(Error::InvalidHuffmanCode)
    }

    pub fn encoder(&self) -> HuffmanEncoder {
        let mut codes = [None; 256];
        for (symbol, code) in self.codes() {
            codes[symbol as usize] = Some(code);
        }
        HuffmanEncoder { codes }
    }
}

/// Symbol to code lookup used when writing entropy-coded data.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    codes: [Option<HuffmanCode>; 256],
}

impl HuffmanEncoder {
    pub fn code(&self, symbol: u8) -> Result<HuffmanCode> {
        self.codes[symbol as usize].ok_or(Error::MissingHuffmanCode(symbol))
    }

    pub fn write(&self, bw: &mut BitWriter, symbol: u8) -> Result<()> {
        let code = self.code(symbol)?;
        bw.append_bits(code.code as u32, code.len as usize);
        Ok(())
    }
}
