// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::{Result, eyre};
use jfif::RawImage;

pub fn to_png<Writer: Write>(image: &RawImage, buf: &mut Writer) -> Result<()> {
    let (width, height) = image.size();
    let width = u32::try_from(width).map_err(|_| eyre!("image too wide for PNG: {width}"))?;
    let height = u32::try_from(height).map_err(|_| eyre!("image too tall for PNG: {height}"))?;
    let mut encoder = png::Encoder::new(buf, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.to_interleaved()?)?;
    writer.finish()?;
    Ok(())
}
