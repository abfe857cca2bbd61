// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use jfif_transforms::quant::{DC_MAX, DC_MIN};

use crate::{
    BLOCK_SIZE,
    bit_reader::BitReader,
    entropy_coding::huffman::{HuffmanClass, HuffmanTable},
    error::{Error, Result},
    frame::{
        coeff_order::{unzigzag, zigzag},
        rle::{EOB, ZRL, ZRL_RUN, decode_magnitude, encode_magnitude, run_lengths},
    },
};

/// Largest DC difference category for 8-bit samples.
pub const MAX_DC_CATEGORY: u8 = 11;
/// Largest AC category; 11 is needed for the clamped value -1024.
pub const MAX_AC_CATEGORY: u8 = 11;

/// One Huffman symbol together with the raw magnitude bits that follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub class: HuffmanClass,
    pub symbol: u8,
    pub bits: u16,
    pub len: u8,
}

impl Token {
    fn ac(symbol: u8, bits: u16, len: u8) -> Token {
        Token {
            class: HuffmanClass::Ac,
            symbol,
            bits,
            len,
        }
    }
}

fn read_magnitude(br: &mut BitReader, len: u8) -> Result<i32> {
    if len == 0 {
        return Ok(0);
    }
    let bits = br
        .read(len as usize)
        .map_err(|_| Error::UnexpectedEndOfScan)?;
    Ok(decode_magnitude(bits as u32, len))
}

/// Decodes one 8x8 block and returns its quantized coefficients in natural order.
/// `predictor` holds the DC value of the previous block of the same component and stays
/// within `DC_MIN..=DC_MAX`.
///
/// An AC symbol `(run, 0)` other than EOB stands for `run` zeros followed by a zero
/// coefficient, so ZRL (`0xf0`) is its `run = 15` case.
pub fn decode_block(
    br: &mut BitReader,
    dc: &HuffmanTable,
    ac: &HuffmanTable,
    predictor: &mut i32,
) -> Result<[i32; BLOCK_SIZE]> {
    let mut coeffs = [0i32; BLOCK_SIZE];

    let category = dc.decode(br)?;
    if category > MAX_DC_CATEGORY {
        return Err(Error::InvalidDcLength(category));
    }
    *predictor = predictor
        .saturating_add(read_magnitude(br, category)?)
        .clamp(DC_MIN, DC_MAX);
    coeffs[0] = *predictor;

    let mut i = 1;
    while i < BLOCK_SIZE {
        let symbol = ac.decode(br)?;
        if symbol == EOB {
            break;
        }
        let run = (symbol >> 4) as usize;
        let size = symbol & 0xf;
        if size > MAX_AC_CATEGORY {
            return Err(Error::InvalidAcLength(size));
        }
        if i + run >= BLOCK_SIZE {
            return Err(Error::TooManyCoefficients);
        }
        i += run;
        coeffs[i] = read_magnitude(br, size)?;
        i += 1;
    }
    Ok(unzigzag(&coeffs))
}

/// Appends the symbols of one block of quantized coefficients (natural order). The DC value
/// is coded relative to `predictor`, which is then updated.
pub fn tokenize_block(block: &[i32; BLOCK_SIZE], predictor: &mut i32, tokens: &mut Vec<Token>) {
    let coeffs = zigzag(block);

    let (bits, len) = encode_magnitude(coeffs[0] - *predictor);
    *predictor = coeffs[0];
    tokens.push(Token {
        class: HuffmanClass::Dc,
        symbol: len,
        bits,
        len,
    });

    let ac = &coeffs[1..];
    for mut run in run_lengths(ac) {
        while run.zero_run >= ZRL_RUN {
            tokens.push(Token::ac(ZRL, 0, 0));
            run.zero_run -= ZRL_RUN;
        }
        let (bits, len) = encode_magnitude(run.value);
        tokens.push(Token::ac(((run.zero_run as u8) << 4) | run.size, bits, len));
    }
    if ac.last() == Some(&0) {
        tokens.push(Token::ac(EOB, 0, 0));
    }
}
