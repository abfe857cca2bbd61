// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
use super::*;
use crate::dct::{dct1d_8, idct1d_8};
use crate::dct_slow;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use test_log::test;

const TOLERANCE: f64 = 1e-3;

fn assert_blocks_close(fast: &[f64; BLOCK_SIZE], reference: &[f64; BLOCK_SIZE]) {
    for i in 0..BLOCK_SIZE {
        assert!(
            (fast[i] - reference[i]).abs() < TOLERANCE,
            "mismatch at {i}: fast {} reference {}",
            fast[i],
            reference[i]
        );
    }
}

fn random_block(rng: &mut ChaCha12Rng, lo: f64, hi: f64) -> [f64; BLOCK_SIZE] {
    std::array::from_fn(|_| rng.random_range(lo..hi))
}

macro_rules! fast_vs_reference {
    ($name: ident, $input: expr) => {
        paste::paste! {
            #[test]
            fn [<dct2d_matches_reference_ $name>]() {
                let input: [f64; BLOCK_SIZE] = $input;
                let mut fast = input;
                dct2d_8x8(&mut fast);
                assert_blocks_close(&fast, &dct_slow::dct2d(&input));
            }

            #[test]
            fn [<idct2d_matches_reference_ $name>]() {
                let input: [f64; BLOCK_SIZE] = $input;
                let mut fast = input;
                idct2d_8x8(&mut fast);
                assert_blocks_close(&fast, &dct_slow::idct2d(&input));
            }
        }
    };
}

fast_vs_reference!(zero, [0.0; BLOCK_SIZE]);
fast_vs_reference!(max_sample, [127.0; BLOCK_SIZE]);
fast_vs_reference!(min_sample, [-128.0; BLOCK_SIZE]);
fast_vs_reference!(
    checkerboard,
    std::array::from_fn(|i| if (i / BLOCK_DIM + i % BLOCK_DIM) % 2 == 0 { 127.0 } else { -128.0 })
);

#[test]
fn dct2d_matches_reference_random() {
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    for _ in 0..100 {
        let input = random_block(&mut rng, -128.0, 128.0);
        let mut fast = input;
        dct2d_8x8(&mut fast);
        assert_blocks_close(&fast, &dct_slow::dct2d(&input));
    }
}

#[test]
fn idct2d_matches_reference_random() {
    let mut rng = ChaCha12Rng::seed_from_u64(1);
    for _ in 0..100 {
        let input = random_block(&mut rng, -1024.0, 1024.0);
        let mut fast = input;
        idct2d_8x8(&mut fast);
        assert_blocks_close(&fast, &dct_slow::idct2d(&input));
    }
}

#[test]
fn fast_pair_is_inverse() {
    let mut rng = ChaCha12Rng::seed_from_u64(2);
    for _ in 0..100 {
        let input = random_block(&mut rng, -128.0, 128.0);
        let mut block = input;
        dct2d_8x8(&mut block);
        idct2d_8x8(&mut block);
        assert_blocks_close(&block, &input);
    }
}

#[test]
fn one_dimensional_dc_is_orthonormal() {
    let mut v = [1.0; BLOCK_DIM];
    dct1d_8(&mut v);
    assert!((v[0] - (BLOCK_DIM as f64).sqrt()).abs() < 1e-12);
    for c in &v[1..] {
        assert!(c.abs() < 1e-12);
    }
    idct1d_8(&mut v);
    for c in &v {
        assert!((c - 1.0).abs() < 1e-12);
    }
}

#[test]
fn quantization_round_trip_within_half_step() {
    let mut rng = ChaCha12Rng::seed_from_u64(3);
    let table: [u16; BLOCK_SIZE] = std::array::from_fn(|_| rng.random_range(1..=32));
    let input = random_block(&mut rng, -128.0, 128.0);
    let mut coeffs = input;
    dct2d_8x8(&mut coeffs);
    let restored = dequantize_block(&quantize_block(&coeffs, &table), &table);
    for i in 0..BLOCK_SIZE {
        assert!((restored[i] - coeffs[i]).abs() <= table[i] as f64 / 2.0 + 1e-9);
    }
}
