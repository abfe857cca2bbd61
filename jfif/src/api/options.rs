// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::{
    error::{Error, Result},
    frame::ChromaSubsampling,
    headers::QuantTable,
};

/// Restart interval written by default, in MCUs.
pub const DEFAULT_RESTART_INTERVAL: usize = 16;

/// Largest step size that fits an 8-bit DQT entry.
pub const MAX_QUANT_STEP: u16 = 255;

#[rustfmt::skip]
const HIGH_LUMA: QuantTable = [
    1, 1, 1, 1, 1, 1, 1, 2,
    1, 1, 1, 1, 1, 1, 1, 2,
    1, 1, 1, 1, 1, 1, 2, 2,
    1, 1, 1, 1, 1, 2, 2, 3,
    1, 1, 1, 1, 2, 2, 3, 3,
    1, 1, 1, 2, 2, 3, 3, 3,
    1, 1, 2, 2, 3, 3, 3, 3,
    2, 2, 2, 3, 3, 3, 3, 3,
];

#[rustfmt::skip]
const HIGH_CHROMA: QuantTable = [
    1, 1, 1, 2, 3, 3, 3, 3,
    1, 1, 1, 2, 3, 3, 3, 3,
    1, 1, 2, 3, 3, 3, 3, 3,
    2, 2, 3, 3, 3, 3, 3, 3,
    3, 3, 3, 3, 3, 3, 3, 3,
    3, 3, 3, 3, 3, 3, 3, 3,
    3, 3, 3, 3, 3, 3, 3, 3,
    3, 3, 3, 3, 3, 3, 3, 3,
];

#[rustfmt::skip]
const MEDIUM_LUMA: QuantTable = [
     8,  6,  9, 14, 17, 21, 28, 17,
     6,  6,  8, 13, 18, 23, 12, 12,
     9,  8, 11, 17, 23, 12, 12, 12,
    14, 13, 17, 23, 12, 12, 12, 12,
    17, 18, 23, 12, 12, 12, 12, 12,
    21, 23, 12, 12, 12, 12, 12, 12,
    28, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
];

#[rustfmt::skip]
const MEDIUM_CHROMA: QuantTable = [
     9,  9, 11, 18, 20, 20, 17, 17,
     9, 10, 11, 14, 14, 12, 12, 12,
    11, 11, 14, 14, 12, 12, 12, 12,
    18, 14, 14, 12, 12, 12, 12, 12,
    20, 14, 12, 12, 12, 12, 12, 12,
    20, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
];

#[rustfmt::skip]
const LOW_LUMA: QuantTable = [
    32, 33, 51, 81, 66, 39, 34, 17,
    33, 36, 48, 47, 28, 23, 12, 12,
    51, 48, 47, 28, 23, 12, 12, 12,
    81, 47, 28, 23, 12, 12, 12, 12,
    66, 28, 23, 12, 12, 12, 12, 12,
    39, 23, 12, 12, 12, 12, 12, 12,
    34, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
];

#[rustfmt::skip]
const LOW_CHROMA: QuantTable = [
    34, 51, 52, 34, 20, 20, 17, 17,
    51, 38, 24, 14, 14, 12, 12, 12,
    52, 24, 14, 14, 12, 12, 12, 12,
    34, 14, 14, 12, 12, 12, 12, 12,
    20, 14, 12, 12, 12, 12, 12, 12,
    20, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
    17, 12, 12, 12, 12, 12, 12, 12,
];

/// Numeric preset codes, as used on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum PresetCode {
    Custom = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

/// Quantization tables used by the encoder. Tables are in natural (row-major) order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QualityPreset {
    High,
    #[default]
    Medium,
    Low,
    Custom {
        luma: QuantTable,
        chroma: QuantTable,
    },
}

impl QualityPreset {
    /// Resolves a numeric preset code. Code 0 selects custom tables, which must be provided
    /// through [`QualityPreset::Custom`] directly.
    pub fn from_code(code: u8) -> Result<QualityPreset> {
        match PresetCode::from_u8(code) {
            Some(PresetCode::High) => Ok(QualityPreset::High),
            Some(PresetCode::Medium) => Ok(QualityPreset::Medium),
            Some(PresetCode::Low) => Ok(QualityPreset::Low),
            Some(PresetCode::Custom) | None => Err(Error::InvalidPreset(code)),
        }
    }

    pub fn code(&self) -> PresetCode {
        match self {
            QualityPreset::High => PresetCode::High,
            QualityPreset::Medium => PresetCode::Medium,
            QualityPreset::Low => PresetCode::Low,
            QualityPreset::Custom { .. } => PresetCode::Custom,
        }
    }

    /// Returns the `(luma, chroma)` tables, checking that custom entries fit 8 bits and are
    /// not zero.
    pub fn tables(&self) -> Result<(QuantTable, QuantTable)> {
        match self {
            QualityPreset::High => Ok((HIGH_LUMA, HIGH_CHROMA)),
            QualityPreset::Medium => Ok((MEDIUM_LUMA, MEDIUM_CHROMA)),
            QualityPreset::Low => Ok((LOW_LUMA, LOW_CHROMA)),
            QualityPreset::Custom { luma, chroma } => {
                for table in [luma, chroma] {
                    if let Some((i, &v)) = table
                        .iter()
                        .enumerate()
                        .find(|&(_, &v)| v == 0 || v > MAX_QUANT_STEP)
                    {
                        return Err(Error::InvalidQuantTableEntry(i, v));
                    }
                }
                Ok((*luma, *chroma))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOptions {
    pub preset: QualityPreset,
    pub subsampling: ChromaSubsampling,
    /// MCUs per restart interval; 0 writes no DRI segment and no restart markers.
    pub restart_interval: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            preset: QualityPreset::default(),
            subsampling: ChromaSubsampling::default(),
            restart_interval: DEFAULT_RESTART_INTERVAL,
        }
    }
}

impl SaveOptions {
    pub fn with_preset(preset: QualityPreset) -> Self {
        SaveOptions {
            preset,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.restart_interval > u16::MAX as usize {
            return Err(Error::InvalidRestartInterval(self.restart_interval));
        }
        self.preset.tables()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// Largest accepted `width * height`; `None` accepts any frame.
    pub pixel_limit: Option<usize>,
}
