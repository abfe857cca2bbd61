// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub const MARKER_PREFIX: u8 = 0xff;

pub const SOF0: u8 = 0xc0;
pub const DHT: u8 = 0xc4;
pub const DAC: u8 = 0xcc;
pub const RST0: u8 = 0xd0;
pub const RST7: u8 = 0xd7;
pub const SOI: u8 = 0xd8;
pub const EOI: u8 = 0xd9;
pub const SOS: u8 = 0xda;
pub const DQT: u8 = 0xdb;
pub const DNL: u8 = 0xdc;
pub const DRI: u8 = 0xdd;
pub const DHP: u8 = 0xde;
pub const EXP: u8 = 0xdf;
pub const APP0: u8 = 0xe0;
pub const APP15: u8 = 0xef;
pub const JPG0: u8 = 0xf0;
pub const JPG13: u8 = 0xfd;
pub const COM: u8 = 0xfe;
pub const TEM: u8 = 0x01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Soi,
    Eoi,
    /// Start of frame; the payload is the frame type `n` of `SOFn`.
    Sof(u8),
    Dht,
    Dac,
    Dqt,
    Dri,
    Sos,
    Rst(u8),
    App(u8),
    Jpg(u8),
    Com,
    Dnl,
    Dhp,
    Exp,
    Tem,
    Reserved(u8),
}

impl From<u8> for Marker {
    fn from(byte: u8) -> Self {
        match byte {
            SOI => Marker::Soi,
            EOI => Marker::Eoi,
            DHT => Marker::Dht,
            DAC => Marker::Dac,
            0xc0..=0xcf => Marker::Sof(byte - SOF0),
            DQT => Marker::Dqt,
            DRI => Marker::Dri,
            SOS => Marker::Sos,
            DNL => Marker::Dnl,
            DHP => Marker::Dhp,
            EXP => Marker::Exp,
            RST0..=RST7 => Marker::Rst(byte - RST0),
            APP0..=APP15 => Marker::App(byte - APP0),
            JPG0..=JPG13 => Marker::Jpg(byte - JPG0),
            COM => Marker::Com,
            TEM => Marker::Tem,
            _ => Marker::Reserved(byte),
        }
    }
}

impl Marker {
    /// Markers that stand alone, without a length field.
    pub fn is_standalone(self) -> bool {
        matches!(
            self,
            Marker::Soi | Marker::Eoi | Marker::Rst(_) | Marker::Tem
        )
    }
}

/// Coding process named by a frame type other than baseline.
pub fn frame_type_name(n: u8) -> &'static str {
    match n {
        1 => "extended sequential",
        2 => "progressive",
        3 => "lossless",
        5 => "differential sequential",
        6 => "differential progressive",
        7 => "differential lossless",
        8 => "reserved extension",
        9 => "extended sequential, arithmetic coding",
        10 => "progressive, arithmetic coding",
        11 => "lossless, arithmetic coding",
        13 => "differential sequential, arithmetic coding",
        14 => "differential progressive, arithmetic coding",
        15 => "differential lossless, arithmetic coding",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn classifies_marker_bytes() {
        assert_eq!(Marker::from(0xc0), Marker::Sof(0));
        assert_eq!(Marker::from(0xc2), Marker::Sof(2));
        assert_eq!(Marker::from(0xc4), Marker::Dht);
        assert_eq!(Marker::from(0xcc), Marker::Dac);
        assert_eq!(Marker::from(0xcf), Marker::Sof(15));
        assert_eq!(Marker::from(0xd3), Marker::Rst(3));
        assert_eq!(Marker::from(0xe1), Marker::App(1));
        assert_eq!(Marker::from(0xfd), Marker::Jpg(13));
        assert_eq!(Marker::from(0x01), Marker::Tem);
        assert_eq!(Marker::from(0x02), Marker::Reserved(0x02));
        assert!(Marker::Tem.is_standalone());
        assert!(!Marker::Com.is_standalone());
    }
}
