// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

pub const DC_MIN: i32 = -2048;
pub const DC_MAX: i32 = 2047;
pub const AC_MIN: i32 = -1024;
pub const AC_MAX: i32 = 1023;

/// Divides by the step size, rounds half away from zero and clamps to the baseline
/// coefficient range. All arrays are in natural (row-major) order.
pub fn quantize_block(coeffs: &[f64; BLOCK_SIZE], table: &[u16; BLOCK_SIZE]) -> [i32; BLOCK_SIZE] {
    std::array::from_fn(|i| {
        let q = (coeffs[i] / table[i] as f64).round() as i32;
        if i == 0 {
            q.clamp(DC_MIN, DC_MAX)
        } else {
            q.clamp(AC_MIN, AC_MAX)
        }
    })
}

pub fn dequantize_block(
    coeffs: &[i32; BLOCK_SIZE],
    table: &[u16; BLOCK_SIZE],
) -> [f64; BLOCK_SIZE] {
    std::array::from_fn(|i| coeffs[i] as f64 * table[i] as f64)
}
