// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Netpbm `P3`/`P6` reader, used as encoder input.

use color_eyre::eyre::{Result, bail, eyre};
use jfif::RawImage;

struct Header {
    binary: bool,
    width: usize,
    height: usize,
    maxval: u32,
}

struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.data.get(self.pos) {
            if c == b'#' {
                while self.data.get(self.pos).is_some_and(|&c| c != b'\n') {
                    self.pos += 1;
                }
            } else if c.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<&'a [u8]> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .data
            .get(self.pos)
            .is_some_and(|c| !c.is_ascii_whitespace() && *c != b'#')
        {
            self.pos += 1;
        }
        if start == self.pos {
            bail!("unexpected end of PPM data");
        }
        Ok(&self.data[start..self.pos])
    }

    fn next_number(&mut self) -> Result<u32> {
        let token = self.next_token()?;
        std::str::from_utf8(token)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| eyre!("invalid PPM number {:?}", String::from_utf8_lossy(token)))
    }
}

fn read_header(tokens: &mut Tokens) -> Result<Header> {
    let binary = match tokens.next_token()? {
        b"P3" => false,
        b"P6" => true,
        magic => bail!(
            "unsupported PNM magic {:?}, expected P3 or P6",
            String::from_utf8_lossy(magic)
        ),
    };
    let width = tokens.next_number()? as usize;
    let height = tokens.next_number()? as usize;
    let maxval = tokens.next_number()?;
    if maxval == 0 || maxval > 255 {
        bail!("unsupported PPM maximum value {maxval}");
    }
    Ok(Header {
        binary,
        width,
        height,
        maxval,
    })
}

fn scale(sample: u32, maxval: u32) -> Result<u8> {
    if sample > maxval {
        bail!("PPM sample {sample} exceeds maximum value {maxval}");
    }
    Ok(((sample * 255 + maxval / 2) / maxval) as u8)
}

pub fn from_ppm(data: &[u8]) -> Result<RawImage> {
    let mut tokens = Tokens { data, pos: 0 };
    let header = read_header(&mut tokens)?;
    let count = header
        .width
        .checked_mul(header.height)
        .and_then(|n| n.checked_mul(3))
        .ok_or_else(|| eyre!("PPM size {}x{} overflows", header.width, header.height))?;
    let samples = if header.binary {
        // Exactly one whitespace byte separates the header from the raster.
        let start = tokens.pos + 1;
        let raster = data
            .get(start..)
            .and_then(|rest| rest.get(..count))
            .ok_or_else(|| eyre!("truncated P6 raster, expected {count} bytes"))?;
        raster
            .iter()
            .map(|&s| scale(s as u32, header.maxval))
            .collect::<Result<Vec<u8>>>()?
    } else {
        (0..count)
            .map(|_| scale(tokens.next_number()?, header.maxval))
            .collect::<Result<Vec<u8>>>()?
    };
    Ok(RawImage::from_interleaved(
        (header.width, header.height),
        &samples,
    )?)
}
