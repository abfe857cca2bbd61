// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! JFIF RGB <-> YCbCr conversion. All three YCbCr values are centered on 0, i.e. Y is
//! level-shifted by -128, which is what the DCT expects.

pub const LEVEL_SHIFT: f64 = 128.0;

pub fn rgb_to_ycbcr([r, g, b]: [u8; 3]) -> [f64; 3] {
    let (r, g, b) = (
        r as f64 - LEVEL_SHIFT,
        g as f64 - LEVEL_SHIFT,
        b as f64 - LEVEL_SHIFT,
    );
    [
        0.299 * r + 0.587 * g + 0.114 * b,
        -0.1687 * r - 0.3313 * g + 0.5 * b,
        0.5 * r - 0.4187 * g - 0.0813 * b,
    ]
}

/// Inverse of [`rgb_to_ycbcr`]. The result is not rounded nor clamped.
pub fn ycbcr_to_rgb([y, cb, cr]: [f64; 3]) -> [f64; 3] {
    [
        y + 1.402 * cr + LEVEL_SHIFT,
        y - 0.344 * cb - 0.714 * cr + LEVEL_SHIFT,
        y + 1.772 * cb + LEVEL_SHIFT,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test::{assert_all_almost_eq, assert_almost_eq};
    use test_log::test;

    #[test]
    fn grays_have_no_chroma() {
        for v in [0u8, 1, 100, 128, 254, 255] {
            let [y, cb, cr] = rgb_to_ycbcr([v, v, v]);
            assert_almost_eq!(y, v as f64 - 128.0, 1e-9);
            assert_almost_eq!(cb, 0.0, 1e-9);
            assert_almost_eq!(cr, 0.0, 1e-9);
        }
    }

    #[test]
    fn black_padding() {
        assert_all_almost_eq!(rgb_to_ycbcr([0, 0, 0]), [-128.0, 0.0, 0.0], 1e-9);
    }

    #[test]
    fn round_trip_is_close() {
        for rgb in [[255u8, 0, 0], [0, 255, 0], [0, 0, 255], [12, 200, 99], [255, 255, 255]] {
            let back = ycbcr_to_rgb(rgb_to_ycbcr(rgb));
            // The two coefficient sets are rounded independently.
            assert_all_almost_eq!(back, rgb.map(|v| v as f64), 0.05);
        }
    }
}
