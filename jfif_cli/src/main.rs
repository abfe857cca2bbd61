// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, bail, eyre};
use jfif::{ChromaSubsampling, DecodeOptions, QualityPreset, SaveOptions};
use jfif_cli::{dec, enc};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Subsampling {
    /// 4:4:4
    None,
    /// 4:2:2
    Horizontal,
    /// 4:4:0
    Vertical,
    /// 4:2:0
    Both,
}

impl From<Subsampling> for ChromaSubsampling {
    fn from(s: Subsampling) -> Self {
        match s {
            Subsampling::None => ChromaSubsampling::None,
            Subsampling::Horizontal => ChromaSubsampling::Horizontal,
            Subsampling::Vertical => ChromaSubsampling::Vertical,
            Subsampling::Both => ChromaSubsampling::Both,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Decode a baseline JPEG file
    Decode {
        /// Input JPEG file
        input: PathBuf,

        /// Output image file, should end in .ppm or .png
        output: PathBuf,

        /// Write plain-text P3 instead of binary P6 for .ppm output
        #[clap(long)]
        ascii: bool,

        /// Refuse frames with more pixels than this
        #[clap(long)]
        pixel_limit: Option<usize>,
    },
    /// Encode a PPM file as baseline JPEG
    Encode {
        /// Input P3 or P6 file
        input: PathBuf,

        /// Output JPEG file
        output: PathBuf,

        /// Quality preset: 1 high, 2 medium, 3 low
        #[clap(long, default_value_t = 2)]
        preset: u8,

        /// Text file with 128 custom quantization steps, luma then chroma, row-major
        #[clap(long, conflicts_with = "preset")]
        tables: Option<PathBuf>,

        #[clap(long, value_enum, default_value_t = Subsampling::Both)]
        subsampling: Subsampling,

        /// MCUs per restart interval, 0 disables restart markers
        #[clap(long, default_value_t = 16)]
        restart_interval: usize,
    },
}

#[derive(Parser)]
struct Opt {
    #[command(subcommand)]
    command: Command,
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn decode(input: &Path, output: &Path, ascii: bool, pixel_limit: Option<usize>) -> Result<()> {
    let data = fs::read(input).map_err(|err| eyre!("cannot read {}: {err}", input.display()))?;
    let options = DecodeOptions { pixel_limit };
    let decoded =
        jfif::read_with_options(&data, &options).map_err(|err| eyre!("{}", err.diagnostic()))?;
    println!("{}", decoded.message);
    let (width, height) = decoded.image.size();
    println!("Image size: {width} x {height}");

    let output_bytes = if has_extension(output, "ppm") {
        if ascii {
            enc::pnm::to_ppm_ascii(&decoded.image)
        } else {
            enc::pnm::to_ppm(&decoded.image)
        }
    } else if has_extension(output, "png") {
        let mut buf = vec![];
        enc::png::to_png(&decoded.image, &mut buf)?;
        buf
    } else {
        bail!("output format not supported: {}", output.display());
    };
    fs::write(output, output_bytes)
        .map_err(|err| eyre!("cannot write {}: {err}", output.display()))
}

fn encode(input: &Path, output: &Path, options: &SaveOptions) -> Result<()> {
    let data = fs::read(input).map_err(|err| eyre!("cannot read {}: {err}", input.display()))?;
    let image = dec::pnm::from_ppm(&data)?;
    let jpeg = jfif::encode(&image, options).map_err(|err| eyre!("{}", err.diagnostic()))?;
    println!("Wrote {} bytes", jpeg.len());
    fs::write(output, jpeg).map_err(|err| eyre!("cannot write {}: {err}", output.display()))
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    match opt.command {
        Command::Decode {
            input,
            output,
            ascii,
            pixel_limit,
        } => decode(&input, &output, ascii, pixel_limit),
        Command::Encode {
            input,
            output,
            preset,
            tables,
            subsampling,
            restart_interval,
        } => {
            let preset = match tables {
                Some(path) => {
                    let text = fs::read_to_string(&path)
                        .map_err(|err| eyre!("cannot read {}: {err}", path.display()))?;
                    dec::tables::parse_quant_tables(&text)?
                }
                None => QualityPreset::from_code(preset)
                    .map_err(|err| eyre!("{}", err.diagnostic()))?,
            };
            let options = SaveOptions {
                preset,
                subsampling: subsampling.into(),
                restart_interval,
            };
            encode(&input, &output, &options)
        }
    }
}
