// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Write as _;

use jfif::RawImage;

/// Plain-text `P3` dump: a header with the size and maximum value, then one line of decimal
/// `R G B` triplets per row.
pub fn to_ppm_ascii(image: &RawImage) -> Vec<u8> {
    let (width, height) = image.size();
    let mut ret = String::new();
    // Writing to a String cannot fail.
    let _ = write!(ret, "P3\n{width} {height}\n255\n");
    for y in 0..height {
        for x in 0..width {
            let [r, g, b] = image.pixel(x, y);
            if x > 0 {
                ret.push(' ');
            }
            let _ = write!(ret, "{r} {g} {b}");
        }
        ret.push('\n');
    }
    ret.into_bytes()
}

pub fn to_ppm(image: &RawImage) -> Vec<u8> {
    let (width, height) = image.size();
    let mut ret = format!("P6\n{width} {height}\n255\n").into_bytes();
    ret.reserve(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            ret.extend_from_slice(&image.pixel(x, y));
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_dump() {
        let image = RawImage::from_interleaved((2, 2), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 255])
            .unwrap();
        assert_eq!(
            String::from_utf8(to_ppm_ascii(&image)).unwrap(),
            "P3\n2 2\n255\n1 2 3 4 5 6\n7 8 9 10 11 255\n"
        );
    }

    #[test]
    fn binary_dump() {
        let image = RawImage::from_interleaved((1, 2), &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(to_ppm(&image), b"P6\n1 2\n255\n\x01\x02\x03\x04\x05\x06");
    }
}
