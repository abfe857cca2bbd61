// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod dct;
pub mod dct_slow;
pub mod quant;

pub use dct::{dct2d_8x8, idct2d_8x8};
pub use quant::{dequantize_block, quantize_block};

pub const BLOCK_DIM: usize = 8;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

#[cfg(test)]
mod tests;
