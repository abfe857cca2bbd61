// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use color_eyre::eyre::{Result, bail, eyre};
use jfif::{QualityPreset, headers::QuantTable};

/// Parses custom quantization tables from text: 128 whitespace-separated integers, the luma
/// table followed by the chroma table, each in row-major order. Lines starting with `#` are
/// comments.
pub fn parse_quant_tables(text: &str) -> Result<QualityPreset> {
    let values = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
        .map(|token| {
            token
                .parse::<u16>()
                .map_err(|_| eyre!("invalid quantization step {token:?}"))
        })
        .collect::<Result<Vec<u16>>>()?;
    if values.len() != 128 {
        bail!(
            "expected 128 quantization steps (luma then chroma), found {}",
            values.len()
        );
    }
    let mut luma: QuantTable = [0; 64];
    let mut chroma: QuantTable = [0; 64];
    luma.copy_from_slice(&values[..64]);
    chroma.copy_from_slice(&values[64..]);
    let preset = QualityPreset::Custom { luma, chroma };
    preset.tables().map_err(|err| eyre!("{}", err.diagnostic()))?;
    Ok(preset)
}
