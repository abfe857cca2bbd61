// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::BLOCK_SIZE;

/// Zig-zag position of each coefficient of a row-major 8x8 block.
#[rustfmt::skip]
pub const NATURAL_TO_ZIGZAG: [usize; BLOCK_SIZE] = [
     0,  1,  5,  6, 14, 15, 27, 28,
     2,  4,  7, 13, 16, 26, 29, 42,
     3,  8, 12, 17, 25, 30, 41, 43,
     9, 11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// Row-major position of each zig-zag index.
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_SIZE] = {
    let mut out = [0; BLOCK_SIZE];
    let mut i = 0;
    while i < BLOCK_SIZE {
        out[NATURAL_TO_ZIGZAG[i]] = i;
        i += 1;
    }
    out
};

/// Reorders a row-major block into zig-zag order.
pub fn zigzag<T: Copy>(block: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    array_init::array_init(|z| block[ZIGZAG_TO_NATURAL[z]])
}

/// Reorders a zig-zag sequence into a row-major block.
pub fn unzigzag<T: Copy>(coeffs: &[T; BLOCK_SIZE]) -> [T; BLOCK_SIZE] {
    array_init::array_init(|n| coeffs[NATURAL_TO_ZIGZAG[n]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn starts_along_the_first_diagonals() {
        assert_eq!(&ZIGZAG_TO_NATURAL[..10], &[0, 1, 8, 16, 9, 2, 3, 10, 17, 24]);
        assert_eq!(ZIGZAG_TO_NATURAL[63], 63);
    }

    #[test]
    fn tables_are_permutations() {
        let mut seen = [false; BLOCK_SIZE];
        for &z in &NATURAL_TO_ZIGZAG {
            assert!(!seen[z]);
            seen[z] = true;
        }
        for n in 0..BLOCK_SIZE {
            assert_eq!(ZIGZAG_TO_NATURAL[NATURAL_TO_ZIGZAG[n]], n);
        }
    }

    #[test]
    fn unzigzag_inverts_zigzag() {
        arbtest::arbtest(|u| {
            let block: [i32; BLOCK_SIZE] = u.arbitrary()?;
            assert_eq!(unzigzag(&zigzag(&block)), block);
            assert_eq!(zigzag(&unzigzag(&block)), block);
            Ok(())
        });
    }
}
