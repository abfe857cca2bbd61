// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::ops::Range;

use jfif::{
    ChromaSubsampling, DecodeOptions, QualityPreset, RawImage, SaveOptions,
    error::Error,
    headers::markers,
};
use rand::{Rng, SeedableRng};

const WIDTH: usize = 48;
const HEIGHT: usize = 40;

/// Horizontal red ramp, vertical green ramp and a diagonal triangle wave in blue.
fn test_image(width: usize, height: usize) -> RawImage {
    let mut image = RawImage::new((width, height)).unwrap();
    for y in 0..height {
        for x in 0..width {
            let t = (x * 3 + y * 2) % 64;
            let blue = 64 + if t < 32 { t * 4 } else { (63 - t) * 4 };
            image.set_pixel(
                x,
                y,
                [
                    (x * 255 / (width - 1)) as u8,
                    (y * 255 / (height - 1)) as u8,
                    blue as u8,
                ],
            );
        }
    }
    image
}

fn mean_abs_error(a: &RawImage, b: &RawImage) -> f64 {
    assert_eq!(a.size(), b.size());
    let a = a.to_interleaved().unwrap();
    let b = b.to_interleaved().unwrap();
    let total: u64 = a.iter().zip(&b).map(|(x, y)| x.abs_diff(*y) as u64).sum();
    total as f64 / a.len() as f64
}

fn round_trip(image: &RawImage, options: &SaveOptions) -> (Vec<u8>, RawImage) {
    let bytes = jfif::encode(image, options).unwrap();
    let decoded = jfif::read(&bytes).unwrap();
    assert_eq!(decoded.message, "JPEG file successfully read.");
    (bytes, decoded.image)
}

/// Header segments up to and including SOS, as (marker, payload range), plus the offset of the
/// entropy-coded data.
fn header_segments(data: &[u8]) -> (Vec<(u8, Range<usize>)>, usize) {
    assert_eq!(&data[..2], &[0xff, markers::SOI]);
    let mut pos = 2;
    let mut segments = vec![];
    loop {
        assert_eq!(data[pos], 0xff);
        let marker = data[pos + 1];
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        let payload = pos + 4..pos + 2 + len;
        pos = payload.end;
        segments.push((marker, payload));
        if marker == markers::SOS {
            return (segments, pos);
        }
    }
}

fn payload(data: &[u8], marker: u8) -> Option<&[u8]> {
    let (segments, _) = header_segments(data);
    segments
        .into_iter()
        .find(|(m, _)| *m == marker)
        .map(|(_, range)| &data[range])
}

fn restart_markers(data: &[u8]) -> Vec<u8> {
    let (_, start) = header_segments(data);
    data[start..]
        .windows(2)
        .filter(|w| w[0] == 0xff && (markers::RST0..=markers::RST7).contains(&w[1]))
        .map(|w| w[1])
        .collect()
}

macro_rules! preset_test {
    ($name:ident, $preset:expr, $max_error:expr) => {
        paste::paste! {
            #[test]
            fn [<round_trip_ $name>]() {
                let image = test_image(WIDTH, HEIGHT);
                let (bytes, decoded) = round_trip(&image, &SaveOptions::with_preset($preset));
                assert_eq!(decoded.size(), (WIDTH, HEIGHT));
                let error = mean_abs_error(&image, &decoded);
                assert!(error < $max_error, "mean error {error}");
                assert_eq!(&bytes[bytes.len() - 2..], &[0xff, markers::EOI]);
            }
        }
    };
}

preset_test!(high, QualityPreset::High, 5.5);
preset_test!(medium, QualityPreset::Medium, 6.5);
preset_test!(low, QualityPreset::Low, 8.5);

#[test]
fn error_grows_as_quality_drops() {
    let image = test_image(WIDTH, HEIGHT);
    let errors: Vec<f64> = [QualityPreset::High, QualityPreset::Medium, QualityPreset::Low]
        .into_iter()
        .map(|preset| {
            let (_, decoded) = round_trip(&image, &SaveOptions::with_preset(preset));
            mean_abs_error(&image, &decoded)
        })
        .collect();
    assert!(errors[0] <= errors[1] && errors[1] <= errors[2], "{errors:?}");
}

#[test]
fn custom_tables() {
    let image = test_image(WIDTH, HEIGHT);
    let options = SaveOptions {
        preset: QualityPreset::Custom {
            luma: [1; 64],
            chroma: [1; 64],
        },
        subsampling: ChromaSubsampling::None,
        ..Default::default()
    };
    let (bytes, decoded) = round_trip(&image, &options);
    assert!(mean_abs_error(&image, &decoded) < 1.0);
    let dqt = payload(&bytes, markers::DQT).unwrap();
    assert_eq!(dqt.len(), 130);
    assert!(dqt.iter().enumerate().all(|(i, &v)| v == if i % 65 == 0 { (i / 65) as u8 } else { 1 }));

    let invalid = SaveOptions::with_preset(QualityPreset::Custom {
        luma: [0; 64],
        chroma: [1; 64],
    });
    assert!(matches!(
        jfif::encode(&image, &invalid),
        Err(Error::InvalidQuantTableEntry(0, 0))
    ));
}

#[test]
fn every_subsampling_layout() {
    let image = test_image(WIDTH, HEIGHT);
    for (subsampling, factors) in [
        (ChromaSubsampling::None, 0x11),
        (ChromaSubsampling::Horizontal, 0x21),
        (ChromaSubsampling::Vertical, 0x12),
        (ChromaSubsampling::Both, 0x22),
    ] {
        for preset in [QualityPreset::High, QualityPreset::Medium, QualityPreset::Low] {
            let options = SaveOptions {
                preset,
                subsampling,
                ..Default::default()
            };
            let (bytes, decoded) = round_trip(&image, &options);
            let sof = payload(&bytes, markers::SOF0).unwrap();
            assert_eq!(sof.len(), 15);
            assert_eq!(&sof[5..], &[3, 1, factors, 0, 2, 0x11, 1, 3, 0x11, 1]);
            let error = mean_abs_error(&image, &decoded);
            assert!(error < 8.0, "{subsampling:?}: mean error {error}");
        }
    }
}

#[test]
fn solid_gray_is_exact() {
    let image = RawImage::from_interleaved((16, 16), &[100; 16 * 16 * 3]).unwrap();
    let (bytes, decoded) = round_trip(&image, &SaveOptions::default());
    assert_eq!(decoded, image);
    assert!(restart_markers(&bytes).is_empty());
}

#[test]
fn stream_layout() {
    let image = test_image(WIDTH, HEIGHT);
    let bytes = jfif::encode(&image, &SaveOptions::default()).unwrap();
    let (segments, _) = header_segments(&bytes);
    let order: Vec<u8> = segments.iter().map(|(m, _)| *m).collect();
    assert_eq!(
        order,
        vec![
            markers::DQT,
            markers::DRI,
            markers::SOF0,
            markers::DHT,
            markers::SOS
        ]
    );
    assert_eq!(payload(&bytes, markers::DRI).unwrap(), &[0, 16]);
    assert_eq!(
        payload(&bytes, markers::SOS).unwrap(),
        &[3, 1, 0x00, 2, 0x00, 3, 0x00, 0, 63, 0]
    );
    let dqt = payload(&bytes, markers::DQT).unwrap();
    // MEDIUM luma and chroma tables start with 8 and 9.
    assert_eq!((dqt[0], dqt[1], dqt[65], dqt[66]), (0, 8, 1, 9));

    let options = SaveOptions {
        restart_interval: 0,
        ..Default::default()
    };
    let bytes = jfif::encode(&image, &options).unwrap();
    assert!(payload(&bytes, markers::DRI).is_none());
}

#[test]
fn restart_markers_for_large_images() {
    // 8x5 MCUs of 16x16 pixels.
    let image = test_image(128, 80);
    let (bytes, decoded) = round_trip(&image, &SaveOptions::default());
    assert_eq!(restart_markers(&bytes), vec![0xd0, 0xd1]);
    assert!(mean_abs_error(&image, &decoded) < 8.0);

    let options = SaveOptions {
        restart_interval: 1,
        ..Default::default()
    };
    let (bytes, decoded_every_mcu) = round_trip(&image, &options);
    let expected: Vec<u8> = (0..39).map(|n| markers::RST0 + n % 8).collect();
    assert_eq!(restart_markers(&bytes), expected);
    assert_eq!(decoded_every_mcu, decoded);
}

#[test]
fn entropy_bytes_are_stuffed() {
    let mut rng = rand_xorshift::XorShiftRng::seed_from_u64(7);
    let size = (67, 45);
    let noise: Vec<u8> = (0..size.0 * size.1 * 3).map(|_| rng.random()).collect();
    let image = RawImage::from_interleaved(size, &noise).unwrap();
    let options = SaveOptions::with_preset(QualityPreset::High);
    let (bytes, decoded) = round_trip(&image, &options);
    assert_eq!(decoded.size(), size);

    let (_, start) = header_segments(&bytes);
    let entropy = &bytes[start..bytes.len() - 2];
    let mut stuffed = 0;
    for (i, &byte) in entropy.iter().enumerate() {
        if byte == 0xff {
            let next = entropy[i + 1];
            assert!(
                next == 0 || (markers::RST0..=markers::RST7).contains(&next),
                "ff{next:02x} at {i}"
            );
            stuffed += (next == 0) as usize;
        }
    }
    assert!(stuffed > 0);
}

#[test]
fn encoding_is_deterministic() {
    let image = test_image(WIDTH, HEIGHT);
    let options = SaveOptions::default();
    let mut sink = vec![];
    jfif::write(&image, &options, &mut sink).unwrap();
    assert_eq!(sink, jfif::encode(&image, &options).unwrap());
    let decoded = jfif::read_from(sink.as_slice()).unwrap();
    assert_eq!(decoded.image.size(), (WIDTH, HEIGHT));
}

#[test]
fn zero_based_channel_ids() {
    let image = test_image(WIDTH, HEIGHT);
    let (bytes, decoded) = round_trip(&image, &SaveOptions::default());
    let mut patched = bytes.clone();
    let (segments, _) = header_segments(&bytes);
    for (marker, range) in segments {
        match marker {
            markers::SOF0 => {
                for c in 0..3 {
                    patched[range.start + 6 + 3 * c] -= 1;
                }
            }
            markers::SOS => {
                for c in 0..3 {
                    patched[range.start + 1 + 2 * c] -= 1;
                }
            }
            _ => {}
        }
    }
    let patched = jfif::read(&patched).unwrap();
    assert!(patched.file.frame.zero_based_ids);
    assert_eq!(patched.image, decoded);
}

#[test]
fn pixel_limit() {
    let image = test_image(WIDTH, HEIGHT);
    let bytes = jfif::encode(&image, &SaveOptions::default()).unwrap();
    let options = DecodeOptions {
        pixel_limit: Some(WIDTH * HEIGHT - 1),
    };
    assert!(matches!(
        jfif::read_with_options(&bytes, &options),
        Err(Error::ImageSizeTooLarge(WIDTH, HEIGHT))
    ));
    let options = DecodeOptions {
        pixel_limit: Some(WIDTH * HEIGHT),
    };
    assert!(jfif::read_with_options(&bytes, &options).is_ok());
}

#[test]
fn cmyk_is_rejected() {
    let mut data = vec![0xff, markers::SOI, 0xff, markers::SOF0, 0, 20, 8, 0, 8, 0, 8, 4];
    for id in 1..=4 {
        data.extend_from_slice(&[id, 0x11, 0]);
    }
    let err = jfif::read(&data).unwrap_err();
    assert!(matches!(err, Error::UnsupportedCmyk));
    assert_eq!(err.diagnostic(), "unsupported CMYK channel format.");
}

#[test]
fn oversized_huffman_table_is_rejected() {
    let mut counts = [0u8; 16];
    counts[7] = 200;
    let mut data = vec![0xff, markers::SOI, 0xff, markers::DHT, 0, 19 + 200, 0x10];
    data.extend_from_slice(&counts);
    data.extend(0..200u8);
    let err = jfif::read(&data).unwrap_err();
    assert!(matches!(err, Error::TooManyHuffmanSymbols(200)));
    assert!(err.diagnostic().starts_with("too many symbols"));
}

#[test]
fn truncated_streams_fail_cleanly() {
    let image = test_image(WIDTH, HEIGHT);
    let bytes = jfif::encode(&image, &SaveOptions::default()).unwrap();
    for len in (0..bytes.len()).step_by(7) {
        let err = jfif::read(&bytes[..len]).unwrap_err();
        assert!(err.diagnostic().len() <= jfif::error::MAX_DIAGNOSTIC_LEN);
    }
}

#[test]
fn grayscale_stream() {
    use jfif::{
        color::mcu::{forward_blocks, ycbcr_planes},
        enc::segments::*,
        entropy_coding::huffman::HuffmanClass,
        frame::{
            FrameLayout,
            scan::{tokenize_scan, write_scan},
        },
    };

    let image = test_image(20, 12);
    let layout = FrameLayout::new((20, 12), None);
    let table = [4u16; 64];
    let planes = ycbcr_planes(&image, &layout).unwrap();
    let blocks = forward_blocks(&planes, &layout, &[&table]).unwrap();
    assert_eq!(blocks.len(), 3 * 2);
    let scan = tokenize_scan(&blocks, &layout, 0).unwrap();
    let (dc, ac) = scan.build_tables().unwrap();

    let mut data = vec![];
    write_soi(&mut data).unwrap();
    write_dqt(&mut data, &[(0, &table)]).unwrap();
    write_sof0(&mut data, &layout).unwrap();
    write_dht(
        &mut data,
        &[(HuffmanClass::Dc, 0, &dc), (HuffmanClass::Ac, 0, &ac)],
    )
    .unwrap();
    write_sos(&mut data, 1).unwrap();
    data.extend(write_scan(&scan, &dc.encoder(), &ac.encoder()).unwrap());
    write_eoi(&mut data).unwrap();

    let decoded = jfif::read(&data).unwrap();
    assert_eq!(decoded.image.size(), (20, 12));
    for y in 0..12 {
        for x in 0..20 {
            let [r, g, b] = decoded.image.pixel(x, y);
            assert!(r == g && g == b);
            let [er, eg, eb] = image.pixel(x, y).map(|v| v as f64);
            let luma = 0.299 * er + 0.587 * eg + 0.114 * eb;
            assert!((r as f64 - luma).abs() < 6.0, "{x} {y}: {r} vs {luma}");
        }
    }
}
