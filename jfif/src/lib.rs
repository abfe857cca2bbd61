// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod api;
pub mod bit_reader;
pub mod bit_writer;
pub mod color;
pub mod enc;
pub mod entropy_coding;
pub mod error;
pub mod frame;
pub mod headers;
pub mod image;
pub mod parser;
pub mod util;

pub use api::{
    decoder::{DecodedImage, read, read_from, read_with_options},
    encoder::{encode, write},
    options::{DecodeOptions, QualityPreset, SaveOptions},
};
pub use frame::ChromaSubsampling;
pub use image::RawImage;

pub(crate) use jfif_transforms::{BLOCK_DIM, BLOCK_SIZE};
