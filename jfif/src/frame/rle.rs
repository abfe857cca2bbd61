// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Coefficient magnitudes and zero runs, as carried next to Huffman symbols.

/// AC symbol ending a block whose remaining coefficients are all zero.
pub const EOB: u8 = 0x00;
/// AC symbol for a run of 16 zeros.
pub const ZRL: u8 = 0xf0;
pub const ZRL_RUN: usize = 16;

/// Number of bits needed to represent `|value|`; 0 for 0.
pub fn magnitude_category(value: i32) -> u8 {
    (32 - value.unsigned_abs().leading_zeros()) as u8
}

/// Bits that follow a symbol for `value`: the value itself when positive, the complement
/// of its magnitude within the category when negative.
/// ```
/// # use jfif::frame::rle::encode_magnitude;
/// assert_eq!(encode_magnitude(5), (0b101, 3));
/// assert_eq!(encode_magnitude(-5), (0b010, 3));
/// assert_eq!(encode_magnitude(0), (0, 0));
/// ```
pub fn encode_magnitude(value: i32) -> (u16, u8) {
    let len = magnitude_category(value);
    if len == 0 {
        return (0, 0);
    }
    let mask = (1u32 << len) - 1;
    let bits = if value < 0 {
        !value.unsigned_abs() & mask
    } else {
        value as u32
    };
    (bits as u16, len)
}

/// Inverse of [`encode_magnitude`]: values below half the category range are negative.
pub fn decode_magnitude(bits: u32, len: u8) -> i32 {
    if len == 0 {
        return 0;
    }
    if bits < (1 << (len - 1)) {
        bits as i32 - ((1i32 << len) - 1)
    } else {
        bits as i32
    }
}

/// A non-zero coefficient and the zeros preceding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLength {
    pub zero_run: usize,
    pub size: u8,
    pub value: i32,
}

/// Scans coefficients in order and yields one triplet per non-zero value. Zeros after the last
/// non-zero value produce nothing.
pub fn run_lengths(coeffs: &[i32]) -> impl Iterator<Item = RunLength> + '_ {
    let mut run = 0;
    coeffs.iter().filter_map(move |&value| {
        if value == 0 {
            run += 1;
            return None;
        }
        let triplet = RunLength {
            zero_run: run,
            size: magnitude_category(value),
            value,
        };
        run = 0;
        Some(triplet)
    })
}
