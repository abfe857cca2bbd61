// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    util::tracing_wrappers::*,
};

mod private {
    pub trait Sealed {}
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DataTypeTag {
    U8,
    F64,
}

pub trait ImageDataType: private::Sealed + Copy + Default + 'static + Debug + PartialEq {
    /// ID of this data type. Different types *must* have different values.
    const DATA_TYPE_ID: DataTypeTag;

    fn from_f64(f: f64) -> Self;
    fn to_f64(self) -> f64;
    #[cfg(test)]
    fn random<R: rand::Rng>(rng: &mut R) -> Self;
}

impl private::Sealed for u8 {}
impl ImageDataType for u8 {
    const DATA_TYPE_ID: DataTypeTag = DataTypeTag::U8;
    /// Rounds to nearest and saturates to `0..=255`.
    fn from_f64(f: f64) -> u8 {
        f.round().clamp(0.0, 255.0) as u8
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[cfg(test)]
    fn random<R: rand::Rng>(rng: &mut R) -> Self {
        rng.random()
    }
}

// Working planes of the color pipeline.
impl private::Sealed for f64 {}
impl ImageDataType for f64 {
    const DATA_TYPE_ID: DataTypeTag = DataTypeTag::F64;
    fn from_f64(f: f64) -> f64 {
        f
    }
    fn to_f64(self) -> f64 {
        self
    }
    #[cfg(test)]
    fn random<R: rand::Rng>(rng: &mut R) -> Self {
        rng.random_range(0.0..255.0)
    }
}

#[derive(Clone, PartialEq)]
pub struct Image<T: ImageDataType> {
    size: (usize, usize),
    data: Vec<T>,
}

impl<T: ImageDataType> Debug for Image<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}x{}", T::DATA_TYPE_ID, self.size.0, self.size.1)
    }
}

impl<T: ImageDataType> Image<T> {
    #[cfg_attr(feature = "tracing", instrument(err))]
    pub fn new(size: (usize, usize)) -> Result<Image<T>> {
        Self::new_with_value(size, T::default())
    }

    pub fn new_with_value(size: (usize, usize), value: T) -> Result<Image<T>> {
        let (xsize, ysize) = size;
        // These limits let us not worry about overflows.
        if xsize as u64 >= i64::MAX as u64 / 4 || ysize as u64 >= i64::MAX as u64 / 4 {
            return Err(Error::ImageSizeTooLarge(xsize, ysize));
        }
        let total_size = xsize
            .checked_mul(ysize)
            .ok_or(Error::ImageSizeTooLarge(xsize, ysize))?;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidImageSize(xsize, ysize));
        }
        trace!(xsize, ysize, "allocating image");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, value);
        Ok(Image {
            size: (xsize, ysize),
            data,
        })
    }

    #[cfg(test)]
    pub fn new_random<R: rand::Rng>(size: (usize, usize), rng: &mut R) -> Result<Image<T>> {
        let mut img = Self::new(size)?;
        img.data.iter_mut().for_each(|x| *x = T::random(rng));
        Ok(img)
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &[T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &self.data[start..start + self.size.0]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &mut self.data[start..start + self.size.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }
}

/// An 8-bit RGB raster stored as three planes of equal size.
#[derive(Clone, PartialEq)]
pub struct RawImage {
    planes: [Image<u8>; 3],
}

impl Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RGB {}x{}", self.size().0, self.size().1)
    }
}

impl RawImage {
    /// Creates a black image.
    pub fn new(size: (usize, usize)) -> Result<RawImage> {
        Ok(RawImage {
            planes: [Image::new(size)?, Image::new(size)?, Image::new(size)?],
        })
    }

    pub fn from_planes(r: Image<u8>, g: Image<u8>, b: Image<u8>) -> Result<RawImage> {
        for plane in [&g, &b] {
            if plane.size() != r.size() {
                return Err(Error::PlaneSizeMismatch(
                    plane.size().0,
                    plane.size().1,
                    r.size().0,
                    r.size().1,
                ));
            }
        }
        Ok(RawImage { planes: [r, g, b] })
    }

    /// Builds an image from `RGBRGB...` bytes in row-major order.
    pub fn from_interleaved(size: (usize, usize), rgb: &[u8]) -> Result<RawImage> {
        let mut image = RawImage::new(size)?;
        let expected = size.0 * size.1 * 3;
        if rgb.len() != expected {
            return Err(Error::InvalidBufferSize(rgb.len(), expected));
        }
        for (y, row) in rgb.chunks_exact(size.0 * 3).enumerate() {
            for (x, pixel) in row.chunks_exact(3).enumerate() {
                image.set_pixel(x, y, [pixel[0], pixel[1], pixel[2]]);
            }
        }
        Ok(image)
    }

    pub fn to_interleaved(&self) -> Result<Vec<u8>> {
        let (xsize, ysize) = self.size();
        let mut out = Vec::new();
        out.try_reserve_exact(xsize * ysize * 3)?;
        for y in 0..ysize {
            let [r, g, b] = self.planes.each_ref().map(|p| p.row(y));
            for x in 0..xsize {
                out.extend_from_slice(&[r[x], g[x], b[x]]);
            }
        }
        Ok(out)
    }

    pub fn size(&self) -> (usize, usize) {
        self.planes[0].size()
    }

    pub fn planes(&self) -> &[Image<u8>; 3] {
        &self.planes
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.planes.each_ref().map(|p| p.row(y)[x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        for (plane, value) in self.planes.iter_mut().zip(rgb) {
            plane.row_mut(y)[x] = value;
        }
    }
}
