// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::entropy_coding::huffman::{HUFFMAN_MAX_SYMBOLS, HuffmanClass};

/// Longest diagnostic surfaced to callers by [`Error::diagnostic`].
pub const MAX_DIAGNOSTIC_LEN: usize = 256;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Read out of bounds")]
    OutOfBounds,
    #[error("Cannot read {0} bits at once")]
    ReadTooLarge(usize),
    // Container structure.
    #[error("invalid JPEG image marker: expected ffd8, found {0:02x}{1:02x}.")]
    InvalidSignature(u8, u8),
    #[error("unexpected end of file.")]
    UnexpectedEndOfFile,
    #[error("invalid marker prefix {0:#04x}, expected 0xff.")]
    InvalidMarkerPrefix(u8),
    #[error("header size incorrect in {0} segment.")]
    SegmentLengthMismatch(&'static str),
    #[error("invalid marker ff{0:02x} inside entropy-coded data.")]
    InvalidMarkerInScan(u8),
    #[error("invalid marker ff{0:02x}.")]
    InvalidMarker(u8),
    #[error("multiple frame headers are not supported.")]
    DuplicateFrame,
    #[error("unexpected end of image (EOI) marker.")]
    UnexpectedEoi,
    #[error("embedded JPEG file format is not supported.")]
    EmbeddedJpeg,
    // Unsupported coding modes.
    #[error("arithmetic encoding is not supported.")]
    ArithmeticCoding,
    #[error("progressive JPEGs are not supported.")]
    Progressive,
    #[error("unsupported JPEG frame type SOF{0} ({1}).")]
    UnsupportedFrameType(u8, &'static str),
    #[error("unsupported sample precision {0}, only 8-bit samples are supported.")]
    UnsupportedPrecision(u8),
    #[error("unsupported CMYK channel format.")]
    UnsupportedCmyk,
    #[error("unsupported chroma subsampling: luma {0}x{1}, chroma {2}x{3}.")]
    UnsupportedSubsampling(u8, u8, u8, u8),
    // Table and channel bookkeeping.
    #[error("invalid number of channels: {0}.")]
    InvalidChannelCount(u8),
    #[error("invalid channel id {0}.")]
    InvalidChannelId(u8),
    #[error("unsupported 4th channel id.")]
    UnsupportedFourthChannel,
    #[error("channel {0} is already used.")]
    DuplicateChannel(u8),
    #[error("scan covers {0} channels but the frame declares {1}.")]
    ScanChannelMismatch(usize, usize),
    #[error("start of scan before frame header.")]
    ScanBeforeFrame,
    #[error("invalid quantization table id {0}.")]
    InvalidQuantTableId(u8),
    #[error("invalid quantization table precision {0}.")]
    InvalidQuantPrecision(u8),
    #[error("quantization table {0} is not defined.")]
    UndefinedQuantTable(u8),
    #[error("invalid quantization table entry {1} at position {0}.")]
    InvalidQuantTableEntry(usize, u16),
    #[error("invalid Huffman table class {0}.")]
    InvalidHuffmanClass(u8),
    #[error("invalid Huffman table id {0}.")]
    InvalidHuffmanTableId(u8),
    #[error("{0:?} Huffman table {1} is not defined.")]
    UndefinedHuffmanTable(HuffmanClass, u8),
    #[error("too many symbols used in Huffman table ({0} > {HUFFMAN_MAX_SYMBOLS}).")]
    TooManyHuffmanSymbols(usize),
    #[error("Huffman code lengths oversubscribe the code space.")]
    OversubscribedHuffmanTable,
    #[error("Huffman length histogram cannot be limited to 16 bits.")]
    InvalidHuffmanHistogram,
    #[error("symbol {0:#04x} has no Huffman code.")]
    MissingHuffmanCode(u8),
    // Entropy-coded data.
    #[error("invalid Huffman code in entropy-coded data.")]
    InvalidHuffmanCode,
    #[error("invalid Huffman table symbol: DC magnitude length {0}.")]
    InvalidDcLength(u8),
    #[error("invalid Huffman table symbol: AC magnitude length {0}.")]
    InvalidAcLength(u8),
    #[error("DCT coefficients is more than 64.")]
    TooManyCoefficients,
    #[error("unexpected end of entropy-coded data.")]
    UnexpectedEndOfScan,
    // Encoder options.
    #[error("invalid quality preset {0}.")]
    InvalidPreset(u8),
    #[error("invalid restart interval {0}.")]
    InvalidRestartInterval(usize),
    // Resources.
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Plane size mismatch: {0}x{1} vs {2}x{3}")]
    PlaneSizeMismatch(usize, usize, usize, usize),
    #[error("Interleaved buffer holds {0} bytes, expected {1}")]
    InvalidBufferSize(usize, usize),
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Human-readable message, capped at [`MAX_DIAGNOSTIC_LEN`] characters.
    pub fn diagnostic(&self) -> String {
        self.to_string().chars().take(MAX_DIAGNOSTIC_LEN).collect()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
