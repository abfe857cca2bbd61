// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Conversion between RGB rasters and MCU-ordered blocks of quantized coefficients.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use jfif_transforms::{dct2d_8x8, dequantize_block, idct2d_8x8, quantize_block};

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    color::ycbcr::{LEVEL_SHIFT, rgb_to_ycbcr, ycbcr_to_rgb},
    error::Result,
    frame::{FrameLayout, scan::{Block, allocate_blocks}},
    headers::QuantTable,
    image::{Image, ImageDataType, RawImage},
    util::tracing_wrappers::*,
};

const BLACK: [u8; 3] = [0, 0, 0];

/// Runs `f(mcu_index, mcu_blocks)` for every MCU, on the rayon pool when the `parallel`
/// feature is enabled.
fn for_each_mcu<T, F>(blocks: &mut [T], blocks_per_mcu: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    #[cfg(feature = "parallel")]
    blocks
        .par_chunks_mut(blocks_per_mcu)
        .enumerate()
        .for_each(|(i, mcu)| f(i, mcu));
    #[cfg(not(feature = "parallel"))]
    blocks
        .chunks_mut(blocks_per_mcu)
        .enumerate()
        .for_each(|(i, mcu)| f(i, mcu));
}

/// Top-left sample of block `block` (counted in raster order within the MCU) of a component
/// with sampling factors `sampling`, in that component's plane.
fn block_origin(
    layout: &FrameLayout,
    mcu: usize,
    block: usize,
    sampling: (usize, usize),
) -> (usize, usize) {
    let mcus_x = layout.mcus().0;
    let (mx, my) = (mcu % mcus_x, mcu / mcus_x);
    let (bx, by) = (block % sampling.0, block / sampling.0);
    (
        (mx * sampling.0 + bx) * BLOCK_DIM,
        (my * sampling.1 + by) * BLOCK_DIM,
    )
}

/// Size of the plane of component `c`, covering all of its blocks.
fn plane_size(layout: &FrameLayout, c: usize) -> (usize, usize) {
    let (mcus_x, mcus_y) = layout.mcus();
    let (h, v) = layout.sampling(c);
    (mcus_x * h * BLOCK_DIM, mcus_y * v * BLOCK_DIM)
}

/// Ratio between the luma resolution and the resolution of component `c`.
fn subsampling_ratio(layout: &FrameLayout, c: usize) -> (usize, usize) {
    let (lh, lv) = layout.sampling(0);
    let (h, v) = layout.sampling(c);
    (lh / h, lv / v)
}

/// Converts `image` to level-shifted YCbCr planes padded to whole MCUs. Padding is black and
/// chroma takes the top-left pixel of its footprint.
pub fn ycbcr_planes(image: &RawImage, layout: &FrameLayout) -> Result<Vec<Image<f64>>> {
    let (width, height) = image.size();
    let pixel = |x: usize, y: usize| {
        if x < width && y < height {
            image.pixel(x, y)
        } else {
            BLACK
        }
    };
    (0..layout.num_components())
        .map(|c| {
            let (rx, ry) = subsampling_ratio(layout, c);
            let mut plane = Image::new(plane_size(layout, c))?;
            for y in 0..plane.size().1 {
                for (x, sample) in plane.row_mut(y).iter_mut().enumerate() {
                    *sample = rgb_to_ycbcr(pixel(x * rx, y * ry))[c];
                }
            }
            Ok(plane)
        })
        .collect()
}

/// Splits YCbCr planes into blocks, transforms and quantizes them. `quant_tables[c]` is the
/// table of component `c`.
pub fn forward_blocks(
    planes: &[Image<f64>],
    layout: &FrameLayout,
    quant_tables: &[&QuantTable],
) -> Result<Vec<Block>> {
    let mut blocks = allocate_blocks(layout)?;
    for_each_mcu(&mut blocks, layout.blocks_per_mcu(), |m, mcu| {
        for (c, plane) in planes.iter().enumerate() {
            let sampling = layout.sampling(c);
            for (k, b) in layout.component_blocks(c).enumerate() {
                let (x0, y0) = block_origin(layout, m, k, sampling);
                let mut samples = [0.0; BLOCK_SIZE];
                for (dy, row) in samples.chunks_exact_mut(BLOCK_DIM).enumerate() {
                    row.copy_from_slice(&plane.row(y0 + dy)[x0..x0 + BLOCK_DIM]);
                }
                dct2d_8x8(&mut samples);
                mcu[b] = quantize_block(&samples, quant_tables[c]);
            }
        }
    });
    debug!(blocks = blocks.len(), "forward transform done");
    Ok(blocks)
}

/// Dequantizes and inverse-transforms every block back into level-shifted component planes.
pub fn inverse_blocks(
    blocks: &[Block],
    layout: &FrameLayout,
    quant_tables: &[&QuantTable],
) -> Result<Vec<Image<f64>>> {
    let mut spatial = Vec::new();
    spatial.try_reserve_exact(blocks.len())?;
    spatial.resize(blocks.len(), [0.0; BLOCK_SIZE]);
    let blocks_per_mcu = layout.blocks_per_mcu();
    for_each_mcu(&mut spatial, blocks_per_mcu, |m, mcu| {
        let coeffs = &blocks[m * blocks_per_mcu..(m + 1) * blocks_per_mcu];
        for c in 0..layout.num_components() {
            for b in layout.component_blocks(c) {
                mcu[b] = dequantize_block(&coeffs[b], quant_tables[c]);
                idct2d_8x8(&mut mcu[b]);
            }
        }
    });

    let mut planes = (0..layout.num_components())
        .map(|c| Image::<f64>::new(plane_size(layout, c)))
        .collect::<Result<Vec<_>>>()?;
    for (m, mcu) in spatial.chunks_exact(blocks_per_mcu).enumerate() {
        for (c, plane) in planes.iter_mut().enumerate() {
            let sampling = layout.sampling(c);
            for (k, b) in layout.component_blocks(c).enumerate() {
                let (x0, y0) = block_origin(layout, m, k, sampling);
                for (dy, row) in mcu[b].chunks_exact(BLOCK_DIM).enumerate() {
                    plane.row_mut(y0 + dy)[x0..x0 + BLOCK_DIM].copy_from_slice(row);
                }
            }
        }
    }
    Ok(planes)
}

/// Composes the visible part of the component planes into an RGB raster, upsampling chroma
/// by pixel replication. A single plane is treated as grayscale.
pub fn planes_to_rgb(planes: &[Image<f64>], layout: &FrameLayout) -> Result<RawImage> {
    let (width, height) = layout.size();
    let mut image = RawImage::new((width, height))?;
    let ratios: Vec<_> = (0..planes.len())
        .map(|c| subsampling_ratio(layout, c))
        .collect();
    for y in 0..height {
        for x in 0..width {
            let rgb = if let [luma] = planes {
                [u8::from_f64(luma.row(y)[x] + LEVEL_SHIFT); 3]
            } else {
                let ycbcr: [f64; 3] = std::array::from_fn(|c| {
                    let (rx, ry) = ratios[c];
                    planes[c].row(y / ry)[x / rx]
                });
                ycbcr_to_rgb(ycbcr).map(u8::from_f64)
            };
            image.set_pixel(x, y, rgb);
        }
    }
    Ok(image)
}
