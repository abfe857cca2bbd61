// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::ops::Range;

use crate::{
    BLOCK_DIM,
    error::{Error, Result},
    headers::FrameHeader,
};

/// Chroma subsampling layout: how many luma blocks share one Cb and one Cr block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// 4:4:4, one luma block per MCU.
    None,
    /// 4:2:2, two luma blocks side by side.
    Horizontal,
    /// 4:4:0, two luma blocks stacked.
    Vertical,
    /// 4:2:0, 2x2 luma blocks.
    #[default]
    Both,
}

impl ChromaSubsampling {
    /// Luma sampling factors `(h, v)`; chroma is always 1x1.
    pub fn luma_factors(self) -> (usize, usize) {
        match self {
            ChromaSubsampling::None => (1, 1),
            ChromaSubsampling::Horizontal => (2, 1),
            ChromaSubsampling::Vertical => (1, 2),
            ChromaSubsampling::Both => (2, 2),
        }
    }

    pub fn from_luma_factors(h: u8, v: u8) -> Option<ChromaSubsampling> {
        match (h, v) {
            (1, 1) => Some(ChromaSubsampling::None),
            (2, 1) => Some(ChromaSubsampling::Horizontal),
            (1, 2) => Some(ChromaSubsampling::Vertical),
            (2, 2) => Some(ChromaSubsampling::Both),
            _ => None,
        }
    }
}

/// Geometry of the MCU grid of a frame.
///
/// Every MCU holds the blocks of all components back to back, in frame component order;
/// the blocks of one component are in raster order within the MCU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLayout {
    size: (usize, usize),
    /// `None` for single-component frames.
    subsampling: Option<ChromaSubsampling>,
    sampling: Vec<(usize, usize)>,
    block_offsets: Vec<usize>,
    blocks_per_mcu: usize,
    mcus: (usize, usize),
}

impl FrameLayout {
    pub fn new(size: (usize, usize), subsampling: Option<ChromaSubsampling>) -> FrameLayout {
        let sampling = match subsampling {
            None => vec![(1, 1)],
            Some(s) => vec![s.luma_factors(), (1, 1), (1, 1)],
        };
        let mut block_offsets = Vec::with_capacity(sampling.len());
        let mut blocks_per_mcu = 0;
        for &(h, v) in &sampling {
            block_offsets.push(blocks_per_mcu);
            blocks_per_mcu += h * v;
        }
        let (h, v) = sampling[0];
        let mcus = (
            size.0.div_ceil(BLOCK_DIM * h),
            size.1.div_ceil(BLOCK_DIM * v),
        );
        FrameLayout {
            size,
            subsampling,
            sampling,
            block_offsets,
            blocks_per_mcu,
            mcus,
        }
    }

    /// Derives the layout of a parsed frame. Single-component frames use one block per MCU
    /// whatever their sampling factors; colour frames need 1x1 chroma and luma factors of 1
    /// or 2.
    pub fn from_frame(frame: &FrameHeader) -> Result<FrameLayout> {
        let subsampling = match frame.components.as_slice() {
            [_] => None,
            [y, cb, cr] => {
                let chroma_ok = [cb, cr]
                    .iter()
                    .all(|c| (c.h_sampling, c.v_sampling) == (1, 1));
                let layout = ChromaSubsampling::from_luma_factors(y.h_sampling, y.v_sampling);
                match layout {
                    Some(layout) if chroma_ok => Some(layout),
                    _ => {
                        return Err(Error::UnsupportedSubsampling(
                            y.h_sampling,
                            y.v_sampling,
                            cb.h_sampling.max(cr.h_sampling),
                            cb.v_sampling.max(cr.v_sampling),
                        ));
                    }
                }
            }
            _ => return Err(Error::InvalidChannelCount(frame.components.len() as u8)),
        };
        Ok(FrameLayout::new(frame.size(), subsampling))
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn subsampling(&self) -> Option<ChromaSubsampling> {
        self.subsampling
    }

    pub fn num_components(&self) -> usize {
        self.sampling.len()
    }

    /// Sampling factors `(h, v)` of a component.
    pub fn sampling(&self, component: usize) -> (usize, usize) {
        self.sampling[component]
    }

    /// Indices, within an MCU, of the blocks of `component`.
    pub fn component_blocks(&self, component: usize) -> Range<usize> {
        let (h, v) = self.sampling[component];
        let start = self.block_offsets[component];
        start..start + h * v
    }

    pub fn blocks_per_mcu(&self) -> usize {
        self.blocks_per_mcu
    }

    /// MCU grid dimensions.
    pub fn mcus(&self) -> (usize, usize) {
        self.mcus
    }

    pub fn num_mcus(&self) -> usize {
        self.mcus.0 * self.mcus.1
    }

    /// Size in pixels of one MCU.
    pub fn mcu_size(&self) -> (usize, usize) {
        let (h, v) = self.sampling[0];
        (BLOCK_DIM * h, BLOCK_DIM * v)
    }

    /// Image size rounded up to whole MCUs.
    pub fn padded_size(&self) -> (usize, usize) {
        let (w, h) = self.mcu_size();
        (self.mcus.0 * w, self.mcus.1 * h)
    }
}
