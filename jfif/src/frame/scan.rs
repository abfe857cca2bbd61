// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Sequential scans: MCU iteration, restart intervals and byte stuffing.

use crate::{
    BLOCK_SIZE,
    bit_reader::BitReader,
    bit_writer::BitWriter,
    entropy_coding::{
        huffman::{HuffmanClass, HuffmanEncoder, HuffmanTable},
        huffman_builder::HuffmanBuilder,
    },
    error::{Error, Result},
    frame::{
        FrameLayout,
        block::{Token, decode_block, tokenize_block},
    },
    headers::{DecodedFile, markers},
    util::tracing_wrappers::*,
};

pub type Block = [i32; BLOCK_SIZE];

fn table(tables: &[Option<HuffmanTable>], class: HuffmanClass, id: u8) -> Result<&HuffmanTable> {
    tables
        .get(id as usize)
        .and_then(Option::as_ref)
        .ok_or(Error::UndefinedHuffmanTable(class, id))
}

/// Allocates zeroed storage for every block of the frame, MCU after MCU.
pub fn allocate_blocks(layout: &FrameLayout) -> Result<Vec<Block>> {
    let total = layout
        .num_mcus()
        .checked_mul(layout.blocks_per_mcu())
        .ok_or(Error::ArithmeticOverflow)?;
    let mut blocks = Vec::new();
    blocks.try_reserve_exact(total)?;
    blocks.resize(total, [0; BLOCK_SIZE]);
    Ok(blocks)
}

/// Decodes the entropy-coded data of `file` into quantized coefficient blocks (natural
/// order), stored MCU by MCU as described by `layout`.
pub fn decode_scan(file: &DecodedFile, layout: &FrameLayout) -> Result<Vec<Block>> {
    let tables = file
        .scan
        .iter()
        .map(|s| {
            Ok((
                s.component,
                table(&file.dc_tables, HuffmanClass::Dc, s.dc_table)?,
                table(&file.ac_tables, HuffmanClass::Ac, s.ac_table)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut blocks = allocate_blocks(layout)?;
    let mut predictors = vec![0i32; layout.num_components()];
    let mut br = BitReader::new(&file.entropy_data);
    let restart_interval = file.restart_interval as usize;

    for (i, mcu) in blocks.chunks_exact_mut(layout.blocks_per_mcu()).enumerate() {
        if restart_interval != 0 && i != 0 && i % restart_interval == 0 {
            trace!(mcu = i, "restart");
            br.jump_to_byte_boundary()
                .map_err(|_| Error::UnexpectedEndOfScan)?;
            predictors.fill(0);
        }
        for &(component, dc, ac) in &tables {
            for b in layout.component_blocks(component) {
                mcu[b] = decode_block(&mut br, dc, ac, &mut predictors[component])?;
            }
        }
    }
    debug!(
        bits_read = br.total_bits_read(),
        bits_available = br.total_bits_available(),
        "scan decoded"
    );
    Ok(blocks)
}

/// Symbols of a whole scan, split into restart intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanTokens {
    pub tokens: Vec<Token>,
    /// End (exclusive) of each restart interval in `tokens`; the last entry is
    /// `tokens.len()`.
    pub interval_ends: Vec<usize>,
}

impl ScanTokens {
    /// Builds one DC and one AC table from the symbol frequencies of the scan.
    pub fn build_tables(&self) -> Result<(HuffmanTable, HuffmanTable)> {
        let mut dc = HuffmanBuilder::new();
        let mut ac = HuffmanBuilder::new();
        for token in &self.tokens {
            match token.class {
                HuffmanClass::Dc => dc.record(token.symbol),
                HuffmanClass::Ac => ac.record(token.symbol),
            }
        }
        Ok((dc.build()?.to_table()?, ac.build()?.to_table()?))
    }
}

/// Turns coefficient blocks into symbols, interleaving components per MCU and resetting the
/// DC predictors every `restart_interval` MCUs (0 disables restarts).
pub fn tokenize_scan(
    blocks: &[Block],
    layout: &FrameLayout,
    restart_interval: usize,
) -> Result<ScanTokens> {
    let mut scan = ScanTokens::default();
    scan.tokens.try_reserve(blocks.len() * 4)?;
    let mut predictors = vec![0i32; layout.num_components()];
    let num_mcus = layout.num_mcus();

    for (i, mcu) in blocks.chunks_exact(layout.blocks_per_mcu()).enumerate() {
        for (component, predictor) in predictors.iter_mut().enumerate() {
            for b in layout.component_blocks(component) {
                tokenize_block(&mcu[b], predictor, &mut scan.tokens);
            }
        }
        let is_last = i + 1 == num_mcus;
        if restart_interval != 0 && (i + 1) % restart_interval == 0 && !is_last {
            scan.interval_ends.push(scan.tokens.len());
            predictors.fill(0);
        }
    }
    scan.interval_ends.push(scan.tokens.len());
    Ok(scan)
}

/// Appends `bytes` to `out`, following every 0xff with a 0x00.
pub fn stuff_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    for &byte in bytes {
        out.push(byte);
        if byte == markers::MARKER_PREFIX {
            out.push(0);
        }
    }
}

/// Serializes the symbols of a scan. Each restart interval is padded with 1 bits to a byte
/// boundary, byte-stuffed and, except for the last one, followed by an RSTn marker.
pub fn write_scan(scan: &ScanTokens, dc: &HuffmanEncoder, ac: &HuffmanEncoder) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut bw = BitWriter::new();
    let mut start = 0;
    for (n, &end) in scan.interval_ends.iter().enumerate() {
        for token in &scan.tokens[start..end] {
            let encoder = match token.class {
                HuffmanClass::Dc => dc,
                HuffmanClass::Ac => ac,
            };
            encoder.write(&mut bw, token.symbol)?;
            bw.append_bits(token.bits as u32, token.len as usize);
        }
        bw.align(true);
        stuff_bytes(&bw.pack(), &mut out);
        if n + 1 != scan.interval_ends.len() {
            out.extend_from_slice(&[markers::MARKER_PREFIX, markers::RST0 + (n % 8) as u8]);
        }
        start = end;
    }
    Ok(out)
}
