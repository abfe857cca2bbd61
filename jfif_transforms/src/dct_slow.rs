// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct O(N^4) evaluation of the 8x8 DCT pair, used as the numerical reference.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 {
        FRAC_1_SQRT_2
    } else {
        1.0
    }
}

#[inline(always)]
fn basis(spatial: usize, freq: usize) -> f64 {
    ((2 * spatial + 1) as f64 * freq as f64 * PI / (2 * BLOCK_DIM) as f64).cos()
}

/// `F(u, v) = 2/N * C(u) * C(v) * sum_x sum_y f(x, y) cos(..) cos(..)`.
pub fn dct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let scale = 2.0 / BLOCK_DIM as f64;
    let mut out = [0.0; BLOCK_SIZE];
    for v in 0..BLOCK_DIM {
        for u in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for y in 0..BLOCK_DIM {
                for x in 0..BLOCK_DIM {
                    sum += input[y * BLOCK_DIM + x] * basis(x, u) * basis(y, v);
                }
            }
            out[v * BLOCK_DIM + u] = scale * alpha(u) * alpha(v) * sum;
        }
    }
    out
}

/// `f(x, y) = 2/N * sum_u sum_v C(u) * C(v) * F(u, v) cos(..) cos(..)`.
pub fn idct2d(input: &[f64; BLOCK_SIZE]) -> [f64; BLOCK_SIZE] {
    let scale = 2.0 / BLOCK_DIM as f64;
    let mut out = [0.0; BLOCK_SIZE];
    for y in 0..BLOCK_DIM {
        for x in 0..BLOCK_DIM {
            let mut sum = 0.0;
            for v in 0..BLOCK_DIM {
                for u in 0..BLOCK_DIM {
                    sum += alpha(u)
                        * alpha(v)
                        * input[v * BLOCK_DIM + u]
                        * basis(x, u)
                        * basis(y, v);
                }
            }
            out[y * BLOCK_DIM + x] = scale * sum;
        }
    }
    out
}
