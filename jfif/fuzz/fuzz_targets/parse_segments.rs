// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
#![no_main]

use jfif::parser::SegmentParser;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Err(err) = SegmentParser::parse(data) {
        assert!(err.diagnostic().chars().count() <= jfif::error::MAX_DIAGNOSTIC_LEN);
    }
});
