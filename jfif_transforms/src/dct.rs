// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fast 8-point DCT-II / DCT-III (Arai, Agui and Nakajima factorization).
//!
//! Both directions are orthonormal, so `idct8(dct8(x)) == x` up to rounding and the 2D
//! transforms match [`crate::dct_slow`] directly.

use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Output scale factors: `S[0] = 1 / (2 * sqrt(2))`, `S[k] = 1 / (4 * cos(k * pi / 16))`.
const S: [f64; BLOCK_DIM] = [
    0.353553390593273762200422,
    0.254897789552079584470970,
    0.270598050073098492199862,
    0.300672443467522640271861,
    0.353553390593273762200422,
    0.449988111568207852319255,
    0.653281482438188263928322,
    1.281457723870753089398043,
];

/// Rotation constants. `A[0]` is unused.
const A: [f64; 6] = [
    0.0,
    0.707106781186547524400844,
    0.541196100146196984399723,
    0.707106781186547524400844,
    1.306562964876376527856643,
    0.382683432365089771728460,
];

#[inline(always)]
pub fn dct1d_8(v: &mut [f64; BLOCK_DIM]) {
    let v0 = v[0] + v[7];
    let v1 = v[1] + v[6];
    let v2 = v[2] + v[5];
    let v3 = v[3] + v[4];
    let v4 = v[3] - v[4];
    let v5 = v[2] - v[5];
    let v6 = v[1] - v[6];
    let v7 = v[0] - v[7];

    let v8 = v0 + v3;
    let v9 = v1 + v2;
    let v10 = v1 - v2;
    let v11 = v0 - v3;
    let v12 = -v4 - v5;
    let v13 = (v5 + v6) * A[3];
    let v14 = v6 + v7;

    let v15 = v8 + v9;
    let v16 = v8 - v9;
    let v17 = (v10 + v11) * A[1];
    let v18 = (v12 + v14) * A[5];

    let v19 = -v12 * A[2] - v18;
    let v20 = v14 * A[4] - v18;

    let v21 = v17 + v11;
    let v22 = v11 - v17;
    let v23 = v13 + v7;
    let v24 = v7 - v13;

    let v25 = v19 + v24;
    let v26 = v23 + v20;
    let v27 = v23 - v20;
    let v28 = v24 - v19;

    v[0] = S[0] * v15;
    v[1] = S[1] * v26;
    v[2] = S[2] * v21;
    v[3] = S[3] * v28;
    v[4] = S[4] * v16;
    v[5] = S[5] * v25;
    v[6] = S[6] * v22;
    v[7] = S[7] * v27;
}

#[inline(always)]
pub fn idct1d_8(v: &mut [f64; BLOCK_DIM]) {
    let v15 = v[0] / S[0];
    let v26 = v[1] / S[1];
    let v21 = v[2] / S[2];
    let v28 = v[3] / S[3];
    let v16 = v[4] / S[4];
    let v25 = v[5] / S[5];
    let v22 = v[6] / S[6];
    let v27 = v[7] / S[7];

    let v19 = (v25 - v28) / 2.0;
    let v20 = (v26 - v27) / 2.0;
    let v23 = (v26 + v27) / 2.0;
    let v24 = (v25 + v28) / 2.0;

    let v7 = (v23 + v24) / 2.0;
    let v11 = (v21 + v22) / 2.0;
    let v13 = (v23 - v24) / 2.0;
    let v17 = (v21 - v22) / 2.0;

    let v8 = (v15 + v16) / 2.0;
    let v9 = (v15 - v16) / 2.0;

    let denom = A[2] * A[5] - A[2] * A[4] - A[4] * A[5];
    let v18 = (v19 - v20) * A[5];
    let v12 = (v19 * A[4] - v18) / denom;
    let v14 = (v18 - v20 * A[2]) / denom;

    let v6 = v14 - v7;
    let v5 = v13 / A[3] - v6;
    let v4 = -v5 - v12;
    let v10 = v17 / A[1] - v11;

    let v0 = (v8 + v11) / 2.0;
    let v1 = (v9 + v10) / 2.0;
    let v2 = (v9 - v10) / 2.0;
    let v3 = (v8 - v11) / 2.0;

    v[0] = (v0 + v7) / 2.0;
    v[1] = (v1 + v6) / 2.0;
    v[2] = (v2 + v5) / 2.0;
    v[3] = (v3 + v4) / 2.0;
    v[4] = (v3 - v4) / 2.0;
    v[5] = (v2 - v5) / 2.0;
    v[6] = (v1 - v6) / 2.0;
    v[7] = (v0 - v7) / 2.0;
}

#[inline(always)]
fn columns_then_rows(block: &mut [f64; BLOCK_SIZE], f: impl Fn(&mut [f64; BLOCK_DIM])) {
    let mut line = [0.0; BLOCK_DIM];
    for x in 0..BLOCK_DIM {
        for y in 0..BLOCK_DIM {
            line[y] = block[y * BLOCK_DIM + x];
        }
        f(&mut line);
        for y in 0..BLOCK_DIM {
            block[y * BLOCK_DIM + x] = line[y];
        }
    }
    for row in block.chunks_exact_mut(BLOCK_DIM) {
        line.copy_from_slice(row);
        f(&mut line);
        row.copy_from_slice(&line);
    }
}

/// In-place forward 2D DCT of a row-major 8x8 block.
pub fn dct2d_8x8(block: &mut [f64; BLOCK_SIZE]) {
    columns_then_rows(block, dct1d_8);
}

/// In-place inverse 2D DCT of a row-major 8x8 block.
pub fn idct2d_8x8(block: &mut [f64; BLOCK_SIZE]) {
    columns_then_rows(block, idct1d_8);
}
