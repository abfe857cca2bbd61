// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! In-memory model of a parsed JPEG stream.

pub mod markers;

use crate::{BLOCK_SIZE, entropy_coding::huffman::HuffmanTable};

/// Quantization step sizes in natural (row-major) order.
pub type QuantTable = [u16; BLOCK_SIZE];

pub const MAX_TABLES: usize = 4;
pub const MAX_COMPONENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Channel id after remapping to the 1-based convention.
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    pub quant_table: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    pub precision: u8,
    pub width: u16,
    pub height: u16,
    /// Indexed by `id - 1`.
    pub components: Vec<Component>,
    /// The stream numbers its channels from 0 instead of 1.
    pub zero_based_ids: bool,
}

impl FrameHeader {
    pub fn size(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanComponent {
    /// Index into [`FrameHeader::components`].
    pub component: usize,
    pub dc_table: u8,
    pub ac_table: u8,
}

/// Everything needed to reconstruct the image: tables, channel descriptors, the restart
/// interval and the entropy-coded bytes with stuffing and restart markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFile {
    pub frame: FrameHeader,
    pub quant_tables: [Option<QuantTable>; MAX_TABLES],
    pub dc_tables: [Option<HuffmanTable>; MAX_TABLES],
    pub ac_tables: [Option<HuffmanTable>; MAX_TABLES],
    pub restart_interval: u16,
    pub scan: Vec<ScanComponent>,
    pub entropy_data: Vec<u8>,
}
