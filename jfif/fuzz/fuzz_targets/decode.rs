// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jfif::{DecodeOptions, read_with_options};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = DecodeOptions {
        pixel_limit: Some(1 << 24),
    };
    if let Ok(decoded) = read_with_options(data, &options) {
        let (width, height) = decoded.image.size();
        assert_eq!(
            (width, height),
            (
                decoded.file.frame.width as usize,
                decoded.file.frame.height as usize
            )
        );
    }
});
