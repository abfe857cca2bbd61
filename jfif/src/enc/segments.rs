// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Writers for the marker segments of a baseline JPEG stream.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{
    entropy_coding::huffman::{HUFFMAN_MAX_BITS, HuffmanClass, HuffmanTable},
    error::{Error, Result},
    frame::{FrameLayout, coeff_order::zigzag},
    headers::{QuantTable, markers},
};

fn write_marker<W: Write>(w: &mut W, marker: u8) -> Result<()> {
    w.write_all(&[markers::MARKER_PREFIX, marker])?;
    Ok(())
}

/// Writes a marker followed by the length field of a `payload_len`-byte payload.
fn write_segment_header<W: Write>(w: &mut W, marker: u8, payload_len: usize) -> Result<()> {
    let len = u16::try_from(payload_len + 2).map_err(|_| Error::ArithmeticOverflow)?;
    write_marker(w, marker)?;
    w.write_u16::<BigEndian>(len)?;
    Ok(())
}

pub fn write_soi<W: Write>(w: &mut W) -> Result<()> {
    write_marker(w, markers::SOI)
}

pub fn write_eoi<W: Write>(w: &mut W) -> Result<()> {
    write_marker(w, markers::EOI)
}

/// Writes one DQT segment holding `tables` as 8-bit entries in zig-zag order.
pub fn write_dqt<W: Write>(w: &mut W, tables: &[(u8, &QuantTable)]) -> Result<()> {
    write_segment_header(w, markers::DQT, tables.len() * 65)?;
    for &(id, table) in tables {
        // Precision 0 in the high nibble.
        w.write_u8(id & 0xf)?;
        for (i, &step) in zigzag(table).iter().enumerate() {
            let step = u8::try_from(step).map_err(|_| Error::InvalidQuantTableEntry(i, step))?;
            w.write_u8(step)?;
        }
    }
    Ok(())
}

pub fn write_dri<W: Write>(w: &mut W, restart_interval: u16) -> Result<()> {
    write_segment_header(w, markers::DRI, 2)?;
    w.write_u16::<BigEndian>(restart_interval)?;
    Ok(())
}

/// Writes SOF0 for an 8-bit frame with channel ids starting at 1. Luma uses quantization
/// table 0 and chroma table 1.
pub fn write_sof0<W: Write>(w: &mut W, layout: &FrameLayout) -> Result<()> {
    let (width, height) = layout.size();
    let too_large = || Error::ImageSizeTooLarge(width, height);
    let width = u16::try_from(width).map_err(|_| too_large())?;
    let height = u16::try_from(height).map_err(|_| too_large())?;
    let num_components = layout.num_components();
    write_segment_header(w, markers::SOF0, 6 + 3 * num_components)?;
    w.write_u8(8)?;
    w.write_u16::<BigEndian>(height)?;
    w.write_u16::<BigEndian>(width)?;
    w.write_u8(num_components as u8)?;
    for c in 0..num_components {
        let (h, v) = layout.sampling(c);
        w.write_u8(c as u8 + 1)?;
        w.write_u8(((h as u8) << 4) | v as u8)?;
        w.write_u8((c != 0) as u8)?;
    }
    Ok(())
}

/// Writes one DHT segment holding all of `tables`.
pub fn write_dht<W: Write>(w: &mut W, tables: &[(HuffmanClass, u8, &HuffmanTable)]) -> Result<()> {
    let payload_len = tables
        .iter()
        .map(|(_, _, t)| 1 + HUFFMAN_MAX_BITS + t.symbols().len())
        .sum();
    write_segment_header(w, markers::DHT, payload_len)?;
    for &(class, id, table) in tables {
        let class = match class {
            HuffmanClass::Dc => 0,
            HuffmanClass::Ac => 1,
        };
        w.write_u8((class << 4) | (id & 0xf))?;
        w.write_all(table.counts())?;
        w.write_all(table.symbols())?;
    }
    Ok(())
}

/// Writes a full-spectrum SOS naming every frame component, each using DC and AC table 0.
pub fn write_sos<W: Write>(w: &mut W, num_components: usize) -> Result<()> {
    write_segment_header(w, markers::SOS, 4 + 2 * num_components)?;
    w.write_u8(num_components as u8)?;
    for c in 0..num_components {
        w.write_u8(c as u8 + 1)?;
        w.write_u8(0x00)?;
    }
    // Ss, Se, Ah/Al.
    w.write_all(&[0, 63, 0])?;
    Ok(())
}
