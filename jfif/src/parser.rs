// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Marker-driven walk over a JPEG byte stream.

use byteorder::{BigEndian, ByteOrder};

use crate::{
    BLOCK_SIZE,
    entropy_coding::huffman::{HUFFMAN_MAX_BITS, HUFFMAN_MAX_SYMBOLS, HuffmanTable},
    error::{Error, Result},
    frame::coeff_order::ZIGZAG_TO_NATURAL,
    headers::{
        Component, DecodedFile, FrameHeader, MAX_COMPONENTS, MAX_TABLES, QuantTable,
        ScanComponent,
        markers::{self, Marker},
    },
    util::tracing_wrappers::*,
};

/// Walks the segments of a JPEG stream and accumulates a [`DecodedFile`].
#[derive(Debug, Default)]
pub struct SegmentParser<'a> {
    data: &'a [u8],
    pos: usize,
    state: ParseState,
    quant_tables: [Option<QuantTable>; MAX_TABLES],
    dc_tables: [Option<HuffmanTable>; MAX_TABLES],
    ac_tables: [Option<HuffmanTable>; MAX_TABLES],
    restart_interval: u16,
    frame: Option<FrameHeader>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    #[default]
    WaitingSoi,
    WaitingMarker,
}

/// Cursor over the payload of one length-prefixed segment.
struct Segment<'a> {
    name: &'static str,
    data: &'a [u8],
    pos: usize,
}

impl<'a> Segment<'a> {
    fn u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or(Error::SegmentLengthMismatch(self.name))?;
        self.pos += 1;
        Ok(byte)
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.bytes(2)?))
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let data = self.data;
        let bytes = data
            .get(self.pos..self.pos + n)
            .ok_or(Error::SegmentLengthMismatch(self.name))?;
        self.pos += n;
        Ok(bytes)
    }

    fn is_empty(&self) -> bool {
        self.pos == self.data.len()
    }

    fn finish(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::SegmentLengthMismatch(self.name))
        }
    }
}

impl<'a> SegmentParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            ..Default::default()
        }
    }

    /// Parses a complete stream up to the end of its first scan.
    pub fn parse(data: &'a [u8]) -> Result<DecodedFile> {
        Self::new(data).run()
    }

    fn run(mut self) -> Result<DecodedFile> {
        loop {
            match self.state {
                ParseState::WaitingSoi => {
                    let (a, b) = (self.next_byte()?, self.next_byte()?);
                    if (a, b) != (markers::MARKER_PREFIX, markers::SOI) {
                        return Err(Error::InvalidSignature(a, b));
                    }
                    self.state = ParseState::WaitingMarker;
                }
                ParseState::WaitingMarker => {
                    let marker = self.read_marker()?;
                    if let Some(file) = self.process_marker(marker)? {
                        return Ok(file);
                    }
                }
            }
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(Error::UnexpectedEndOfFile)?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_marker(&mut self) -> Result<Marker> {
        let prefix = self.next_byte()?;
        if prefix != markers::MARKER_PREFIX {
            return Err(Error::InvalidMarkerPrefix(prefix));
        }
        let mut byte = self.next_byte()?;
        while byte == markers::MARKER_PREFIX {
            byte = self.next_byte()?;
        }
        if byte == 0 {
            return Err(Error::InvalidMarker(byte));
        }
        Ok(Marker::from(byte))
    }

    fn segment(&mut self, name: &'static str) -> Result<Segment<'a>> {
        let len_bytes = self
            .data
            .get(self.pos..self.pos + 2)
            .ok_or(Error::UnexpectedEndOfFile)?;
        let len = BigEndian::read_u16(len_bytes) as usize;
        if len < 2 {
            return Err(Error::SegmentLengthMismatch(name));
        }
        let start = self.pos + 2;
        let end = self.pos + len;
        let data = self.data.get(start..end).ok_or(Error::UnexpectedEndOfFile)?;
        self.pos = end;
        Ok(Segment { name, data, pos: 0 })
    }

    fn process_marker(&mut self, marker: Marker) -> Result<Option<DecodedFile>> {
        trace!(?marker, pos = self.pos, "marker");
        match marker {
            Marker::Soi => Err(Error::EmbeddedJpeg),
            Marker::Eoi => Err(Error::UnexpectedEoi),
            Marker::Dac => Err(Error::ArithmeticCoding),
            Marker::Sof(0) => self.read_frame_header().map(|_| None),
            Marker::Sof(2) => Err(Error::Progressive),
            Marker::Sof(n) => Err(Error::UnsupportedFrameType(n, markers::frame_type_name(n))),
            Marker::Dqt => self.read_quant_tables().map(|_| None),
            Marker::Dht => self.read_huffman_tables().map(|_| None),
            Marker::Dri => self.read_restart_interval().map(|_| None),
            Marker::Sos => self.read_scan().map(Some),
            standalone if standalone.is_standalone() => {
                debug!(?marker, "skipping standalone marker");
                Ok(None)
            }
            Marker::Reserved(_) => {
                let _segment = self.segment("reserved")?;
                warn!(?marker, len = _segment.data.len(), "skipping unknown segment");
                Ok(None)
            }
            // APPn, JPGn, COM, DNL, DHP and EXP.
            _ => {
                let _segment = self.segment("skipped")?;
                debug!(?marker, len = _segment.data.len(), "skipping segment");
                Ok(None)
            }
        }
    }

    fn read_quant_tables(&mut self) -> Result<()> {
        let mut segment = self.segment("DQT")?;
        while !segment.is_empty() {
            let pq_tq = segment.u8()?;
            let (precision, id) = (pq_tq >> 4, pq_tq & 0xf);
            if id as usize >= MAX_TABLES {
                return Err(Error::InvalidQuantTableId(id));
            }
            let mut table = [0u16; BLOCK_SIZE];
            for &natural in ZIGZAG_TO_NATURAL.iter() {
                let value = match precision {
                    0 => segment.u8()? as u16,
                    1 => segment.u16()?,
                    _ => return Err(Error::InvalidQuantPrecision(precision)),
                };
                if value == 0 {
                    return Err(Error::InvalidQuantTableEntry(natural, value));
                }
                table[natural] = value;
            }
            debug!(id, precision, "quantization table");
            self.quant_tables[id as usize] = Some(table);
        }
        Ok(())
    }

    fn read_huffman_tables(&mut self) -> Result<()> {
        let mut segment = self.segment("DHT")?;
        while !segment.is_empty() {
            let tc_th = segment.u8()?;
            let (class, id) = (tc_th >> 4, tc_th & 0xf);
            if class > 1 {
                return Err(Error::InvalidHuffmanClass(class));
            }
            if id as usize >= MAX_TABLES {
                return Err(Error::InvalidHuffmanTableId(id));
            }
            let mut counts = [0u8; HUFFMAN_MAX_BITS];
            counts.copy_from_slice(segment.bytes(HUFFMAN_MAX_BITS)?);
            let total: usize = counts.iter().map(|&c| c as usize).sum();
            if total > HUFFMAN_MAX_SYMBOLS {
                return Err(Error::TooManyHuffmanSymbols(total));
            }
            let symbols = segment.bytes(total)?.to_vec();
            let table = HuffmanTable::new(counts, symbols)?;
            debug!(class, id, total, "Huffman table");
            let slot = if class == 0 {
                &mut self.dc_tables
            } else {
                &mut self.ac_tables
            };
            slot[id as usize] = Some(table);
        }
        Ok(())
    }

    fn read_frame_header(&mut self) -> Result<()> {
        if self.frame.is_some() {
            return Err(Error::DuplicateFrame);
        }
        let mut segment = self.segment("SOF0")?;
        let precision = segment.u8()?;
        if precision != 8 {
            return Err(Error::UnsupportedPrecision(precision));
        }
        let height = segment.u16()?;
        let width = segment.u16()?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width as usize, height as usize));
        }
        let num_channels = segment.u8()?;
        match num_channels as usize {
            1 | MAX_COMPONENTS => {}
            4 => return Err(Error::UnsupportedCmyk),
            _ => return Err(Error::InvalidChannelCount(num_channels)),
        }

        let mut components: Vec<Option<Component>> = vec![None; num_channels as usize];
        let mut zero_based_ids = false;
        for i in 0..num_channels {
            let raw_id = segment.u8()?;
            if i == 0 && raw_id == 0 {
                debug!("channel ids start at 0");
                zero_based_ids = true;
            }
            let id = raw_id
                .checked_add(zero_based_ids as u8)
                .ok_or(Error::InvalidChannelId(raw_id))?;
            if id == 4 {
                return Err(Error::UnsupportedFourthChannel);
            }
            if id == 0 || id > num_channels {
                return Err(Error::InvalidChannelId(raw_id));
            }
            let sampling = segment.u8()?;
            let quant_table = segment.u8()?;
            if quant_table as usize >= MAX_TABLES {
                return Err(Error::InvalidQuantTableId(quant_table));
            }
            let slot = &mut components[id as usize - 1];
            if slot.is_some() {
                return Err(Error::DuplicateChannel(id));
            }
            *slot = Some(Component {
                id,
                h_sampling: sampling >> 4,
                v_sampling: sampling & 0xf,
                quant_table,
            });
        }
        segment.finish()?;

        let components = components.into_iter().flatten().collect();
        let frame = FrameHeader {
            precision,
            width,
            height,
            components,
            zero_based_ids,
        };
        debug!(?frame, "frame header");
        self.frame = Some(frame);
        Ok(())
    }

    fn read_restart_interval(&mut self) -> Result<()> {
        let mut segment = self.segment("DRI")?;
        if segment.data.len() != 2 {
            return Err(Error::SegmentLengthMismatch("DRI"));
        }
        self.restart_interval = segment.u16()?;
        debug!(restart_interval = self.restart_interval);
        Ok(())
    }

    fn read_scan(&mut self) -> Result<DecodedFile> {
        let frame = self.frame.take().ok_or(Error::ScanBeforeFrame)?;
        let mut segment = self.segment("SOS")?;
        let num_channels = segment.u8()? as usize;
        if num_channels != frame.components.len() {
            return Err(Error::ScanChannelMismatch(
                num_channels,
                frame.components.len(),
            ));
        }
        let mut scan: Vec<ScanComponent> = Vec::with_capacity(num_channels);
        for _ in 0..num_channels {
            let raw_id = segment.u8()?;
            let id = raw_id as usize + frame.zero_based_ids as usize;
            if id == 0 || id > frame.components.len() {
                return Err(Error::InvalidChannelId(raw_id));
            }
            let component = id - 1;
            if scan.iter().any(|s| s.component == component) {
                return Err(Error::DuplicateChannel(id as u8));
            }
            let td_ta = segment.u8()?;
            let (dc_table, ac_table) = (td_ta >> 4, td_ta & 0xf);
            for table in [dc_table, ac_table] {
                if table as usize >= MAX_TABLES {
                    return Err(Error::InvalidHuffmanTableId(table));
                }
            }
            scan.push(ScanComponent {
                component,
                dc_table,
                ac_table,
            });
        }
        // Baseline scans always cover 0..=63 with no successive approximation; other values
        // are ignored, as the frame type already fixed the coding process.
        let spectral_start = segment.u8()?;
        let spectral_end = segment.u8()?;
        let approximation = segment.u8()?;
        segment.finish()?;
        if (spectral_start, spectral_end, approximation) != (0, 63, 0) {
            warn!(
                spectral_start,
                spectral_end, approximation, "ignoring non-baseline scan parameters"
            );
        } else {
            debug!(spectral_start, spectral_end, approximation, "scan parameters");
        }

        let entropy_data = self.read_entropy_data()?;
        debug!(len = entropy_data.len(), "entropy-coded data");
        Ok(DecodedFile {
            frame,
            quant_tables: self.quant_tables,
            dc_tables: std::mem::take(&mut self.dc_tables),
            ac_tables: std::mem::take(&mut self.ac_tables),
            restart_interval: self.restart_interval,
            scan,
            entropy_data,
        })
    }

    /// Collects entropy-coded bytes up to EOI, undoing byte stuffing and dropping restart
    /// markers.
    fn read_entropy_data(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve(self.data.len().saturating_sub(self.pos))?;
        loop {
            let byte = self.next_byte()?;
            if byte != markers::MARKER_PREFIX {
                out.push(byte);
                continue;
            }
            let mut next = self.next_byte()?;
            while next == markers::MARKER_PREFIX {
                next = self.next_byte()?;
            }
            match next {
                0 => out.push(markers::MARKER_PREFIX),
                markers::RST0..=markers::RST7 => {
                    trace!(marker = next, at = out.len(), "restart marker");
                }
                markers::EOI => return Ok(out),
                _ => return Err(Error::InvalidMarkerInScan(next)),
            }
        }
    }
}
