// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Read;

use crate::{
    api::options::DecodeOptions,
    color::mcu::{inverse_blocks, planes_to_rgb},
    error::{Error, Result},
    frame::{FrameLayout, scan::decode_scan},
    headers::DecodedFile,
    image::RawImage,
    parser::SegmentParser,
    util::tracing_wrappers::*,
};

pub const SUCCESS_MESSAGE: &str = "JPEG file successfully read.";

#[derive(Debug)]
pub struct DecodedImage {
    pub image: RawImage,
    /// Tables, frame header and entropy-coded data of the stream.
    pub file: DecodedFile,
    pub message: &'static str,
}

/// Decodes a complete JPEG stream held in memory.
pub fn read(data: &[u8]) -> Result<DecodedImage> {
    read_with_options(data, &DecodeOptions::default())
}

/// Drains `source` and decodes its content.
pub fn read_from(mut source: impl Read) -> Result<DecodedImage> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    read(&data)
}

#[cfg_attr(feature = "tracing", instrument(skip(data), fields(len = data.len()), err))]
pub fn read_with_options(data: &[u8], options: &DecodeOptions) -> Result<DecodedImage> {
    let file = SegmentParser::parse(data)?;
    let (width, height) = file.frame.size();
    if options.pixel_limit.is_some_and(|limit| width * height > limit) {
        return Err(Error::ImageSizeTooLarge(width, height));
    }
    let layout = FrameLayout::from_frame(&file.frame)?;
    debug!(?layout, restart_interval = file.restart_interval, "decoding");

    let planes = {
        let quant_tables = file
            .frame
            .components
            .iter()
            .map(|c| {
                file.quant_tables[c.quant_table as usize]
                    .as_ref()
                    .ok_or(Error::UndefinedQuantTable(c.quant_table))
            })
            .collect::<Result<Vec<_>>>()?;
        let blocks = decode_scan(&file, &layout)?;
        inverse_blocks(&blocks, &layout, &quant_tables)?
    };
    let image = planes_to_rgb(&planes, &layout)?;
    Ok(DecodedImage {
        image,
        file,
        message: SUCCESS_MESSAGE,
    })
}
