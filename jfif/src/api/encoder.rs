// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use crate::{
    api::options::SaveOptions,
    color::mcu::{forward_blocks, ycbcr_planes},
    enc::segments::{
        write_dht, write_dqt, write_dri, write_eoi, write_sof0, write_soi, write_sos,
    },
    entropy_coding::huffman::HuffmanClass,
    error::Result,
    frame::{
        FrameLayout,
        scan::{tokenize_scan, write_scan},
    },
    image::RawImage,
    util::tracing_wrappers::*,
};

/// Compresses `image` into a baseline JPEG stream.
#[cfg_attr(feature = "tracing", instrument(skip_all, err))]
pub fn encode(image: &RawImage, options: &SaveOptions) -> Result<Vec<u8>> {
    options.validate()?;
    let (luma, chroma) = options.preset.tables()?;
    let layout = FrameLayout::new(image.size(), Some(options.subsampling));
    debug!(?layout, preset = ?options.preset.code(), "encoding");

    let planes = ycbcr_planes(image, &layout)?;
    let blocks = forward_blocks(&planes, &layout, &[&luma, &chroma, &chroma])?;
    drop(planes);
    let scan = tokenize_scan(&blocks, &layout, options.restart_interval)?;
    drop(blocks);
    let (dc, ac) = scan.build_tables()?;
    let entropy_data = write_scan(&scan, &dc.encoder(), &ac.encoder())?;
    debug!(
        tokens = scan.tokens.len(),
        intervals = scan.interval_ends.len(),
        bytes = entropy_data.len(),
        "entropy coding done"
    );

    let mut out = Vec::new();
    out.try_reserve(entropy_data.len() + 1024)?;
    write_soi(&mut out)?;
    write_dqt(&mut out, &[(0, &luma), (1, &chroma)])?;
    if options.restart_interval != 0 {
        write_dri(&mut out, options.restart_interval as u16)?;
    }
    write_sof0(&mut out, &layout)?;
    write_dht(
        &mut out,
        &[(HuffmanClass::Dc, 0, &dc), (HuffmanClass::Ac, 0, &ac)],
    )?;
    write_sos(&mut out, layout.num_components())?;
    out.extend_from_slice(&entropy_data);
    write_eoi(&mut out)?;
    Ok(out)
}

/// Compresses `image` and writes the stream to `sink`.
pub fn write(image: &RawImage, options: &SaveOptions, mut sink: impl Write) -> Result<()> {
    let bytes = encode(image, options)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}
