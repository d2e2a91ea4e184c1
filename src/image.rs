// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;
use image::GrayImage;
use std::{borrow::Cow, error, io};
use tracing::debug;
use turbojpeg::OwnedBuf;

/// Image dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of bytes in the full resolution luma plane.
    pub const fn luma_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Number of bytes in a complete YUV420 frame (luma plus both quarter
    /// resolution chroma planes).
    pub const fn frame_len(&self) -> usize {
        self.luma_len() * 3 / 2
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Borrowed YUV420 planar camera frame.
///
/// The Y plane comes first and is followed by the U and V planes at quarter
/// resolution. Only the Y plane is required: a frame is accepted as soon as
/// it holds `width * height` bytes.
///
/// # Example
///
/// ```
/// use edgevision::image::Frame;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = vec![0u8; 24];
/// let frame = Frame::new(&data, 4, 4)?;
/// assert_eq!(frame.luma().len(), 16);
/// assert!(Frame::new(&data, 0, 4).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Frame<'a> {
    data: &'a [u8],
    extent: Extent,
}

impl<'a> Frame<'a> {
    /// Wraps `data` as a `width` by `height` frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is not
    /// positive, if the luma plane size overflows, or if `data` is shorter
    /// than the luma plane.
    pub fn new(data: &'a [u8], width: i32, height: i32) -> Result<Self> {
        let invalid = || Error::InvalidDimensions {
            width: width.into(),
            height: height.into(),
            len: data.len(),
        };

        if width <= 0 || height <= 0 {
            return Err(invalid());
        }

        let extent = Extent::new(width as u32, height as u32);
        let luma_len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(invalid)?;
        if data.len() < luma_len {
            return Err(invalid());
        }

        Ok(Self { data, extent })
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// The Y plane, usable directly as a grayscale image.
    pub fn luma(&self) -> &'a [u8] {
        &self.data[..self.extent.luma_len()]
    }

    /// The U and V planes, if the frame carries them.
    pub fn chroma(&self) -> Option<(&'a [u8], &'a [u8])> {
        if self.data.len() < self.extent.frame_len() {
            return None;
        }
        let luma_len = self.extent.luma_len();
        let plane_len = (self.extent.frame_len() - luma_len) / 2;
        let (u, v) = self.data[luma_len..luma_len + 2 * plane_len].split_at(plane_len);
        Some((u, v))
    }
}

impl fmt::Display for Frame<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} YUV420 {} bytes", self.extent, self.data.len())
    }
}

/// Single channel image buffer reused across frames.
///
/// The backing storage is replaced only when the requested extent differs
/// from the current one; otherwise callers overwrite it in place.
#[derive(Debug, Default)]
pub struct ScratchImage {
    image: GrayImage,
}

impl ScratchImage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the buffer exactly `extent` sized, returning `true` if the
    /// storage had to be reallocated.
    pub fn ensure(&mut self, extent: Extent) -> bool {
        if self.extent() == extent {
            return false;
        }
        self.image = GrayImage::new(extent.width, extent.height);
        debug!("scratch image alloc'd {}", extent);
        true
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.image.width(), self.image.height())
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Raw bytes of the buffer, sized to the current extent.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.image
    }
}

/// Borrowed single channel image with an explicit row stride.
///
/// Rows are `stride` bytes apart and only the first `width` bytes of each row
/// belong to the image, so a view may describe a crop of a larger buffer.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Wraps a tightly packed `width` by `height` buffer.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> Option<Self> {
        Self::with_stride(data, width, height, width)
    }

    /// Wraps a buffer whose rows are `stride` bytes apart.
    pub fn with_stride(data: &'a [u8], width: usize, height: usize, stride: usize) -> Option<Self> {
        if stride < width {
            return None;
        }
        let needed = match height {
            0 => 0,
            h => stride.checked_mul(h - 1)?.checked_add(width)?,
        };
        if data.len() < needed {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the `width` by `height` region whose top-left corner is at
    /// (`x`, `y`). The crop shares storage with `self`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Option<Self> {
        if x.checked_add(width)? > self.width || y.checked_add(height)? > self.height {
            return None;
        }
        let offset = y * self.stride + x;
        Self::with_stride(&self.data[offset.min(self.data.len())..], width, height, self.stride)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.width || self.height <= 1
    }

    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }

    /// The pixels as one slice when no padding separates the rows.
    pub fn as_slice(&self) -> Option<&'a [u8]> {
        self.is_contiguous()
            .then(|| &self.data[..self.width * self.height])
    }
}

impl<'a> From<&'a GrayImage> for ImageView<'a> {
    fn from(image: &'a GrayImage) -> Self {
        Self {
            data: image.as_raw(),
            width: image.width() as usize,
            height: image.height() as usize,
            stride: image.width() as usize,
        }
    }
}

/// Serializes an image into a row-major byte vector of `width * height`
/// bytes, dropping any row padding.
pub fn to_flat_bytes(image: &ImageView) -> Vec<u8> {
    if let Some(pixels) = image.as_slice() {
        return pixels.to_vec();
    }

    let mut bytes = Vec::with_capacity(image.width() * image.height());
    for row in image.rows() {
        bytes.extend_from_slice(row);
    }
    bytes
}

/// Encodes a grayscale image to JPEG using turbojpeg.
///
/// # Errors
///
/// Returns an error if the image is empty or compression fails.
///
/// # Example
///
/// ```no_run
/// use edgevision::image::{encode_jpeg, ImageView};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pixels = vec![128u8; 640 * 480];
/// let view = ImageView::from_slice(&pixels, 640, 480).unwrap();
/// let jpeg = encode_jpeg(&view)?;
/// println!("Compressed to {} bytes", jpeg.len());
/// # Ok(())
/// # }
/// ```
pub fn encode_jpeg(image: &ImageView) -> std::result::Result<OwnedBuf, Box<dyn error::Error>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Box::new(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty image",
        )));
    }

    let pixels = match image.as_slice() {
        Some(pixels) => Cow::Borrowed(pixels),
        None => Cow::Owned(to_flat_bytes(image)),
    };
    let img = turbojpeg::Image {
        width: image.width(),
        height: image.height(),
        format: turbojpeg::PixelFormat::GRAY,
        pixels: pixels.as_ref(),
        pitch: image.width(),
    };

    Ok(turbojpeg::compress(img, 100, turbojpeg::Subsamp::Gray)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_bad_dimensions() {
        let data = [0u8; 24];
        for (w, h) in [(0, 4), (4, 0), (-1, 4), (4, -1), (5, 5)] {
            assert!(matches!(
                Frame::new(&data, w, h),
                Err(Error::InvalidDimensions { .. })
            ));
        }
        assert!(Frame::new(&data, i32::MAX, i32::MAX).is_err());
    }

    #[test]
    fn test_frame_planes() {
        let data: Vec<u8> = (0..24).collect();
        let frame = Frame::new(&data, 4, 4).unwrap();
        assert_eq!(frame.luma(), &data[..16]);
        let (u, v) = frame.chroma().unwrap();
        assert_eq!(u, &data[16..20]);
        assert_eq!(v, &data[20..24]);

        let luma_only = Frame::new(&data[..16], 4, 4).unwrap();
        assert!(luma_only.chroma().is_none());
    }

    #[test]
    fn test_frame_display() {
        let data = [0u8; 24];
        let frame = Frame::new(&data, 4, 4).unwrap();
        assert_eq!(frame.to_string(), "4x4 YUV420 24 bytes");
        assert_eq!(frame.extent(), Extent::new(4, 4));
    }

    #[test]
    fn test_scratch_reuse() {
        let mut scratch = ScratchImage::new();
        assert!(scratch.ensure(Extent::new(8, 4)));
        let ptr = scratch.image().as_raw().as_ptr();
        assert!(!scratch.ensure(Extent::new(8, 4)));
        assert_eq!(scratch.image().as_raw().as_ptr(), ptr);
        assert!(scratch.ensure(Extent::new(4, 8)));
        assert_eq!(scratch.as_mut_slice().len(), 32);
    }

    #[test]
    fn test_flat_bytes_strided() {
        let data: Vec<u8> = (0..20).collect();
        let view = ImageView::with_stride(&data, 3, 4, 5).unwrap();
        assert!(!view.is_contiguous());
        assert_eq!(
            to_flat_bytes(&view),
            vec![0, 1, 2, 5, 6, 7, 10, 11, 12, 15, 16, 17]
        );

        let crop = ImageView::from_slice(&data, 5, 4)
            .unwrap()
            .crop(1, 2, 2, 2)
            .unwrap();
        assert_eq!(to_flat_bytes(&crop), vec![11, 12, 16, 17]);
        assert!(ImageView::from_slice(&data, 5, 4)
            .unwrap()
            .crop(4, 0, 2, 1)
            .is_none());
    }

    #[test]
    fn test_encode_jpeg() {
        let pixels: Vec<u8> = (0..32 * 32).map(|i| (i % 256) as u8).collect();
        let view = ImageView::from_slice(&pixels, 32, 32).unwrap();
        let jpeg = encode_jpeg(&view).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

        let crop = view.crop(4, 4, 16, 16).unwrap();
        assert!(encode_jpeg(&crop).is_ok());

        let empty = ImageView::from_slice(&[], 0, 0).unwrap();
        assert!(encode_jpeg(&empty).is_err());
    }

    #[test]
    fn test_flat_bytes_contiguous() {
        let image = GrayImage::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let view = ImageView::from(&image);
        assert!(view.is_contiguous());
        assert_eq!(to_flat_bytes(&view), image.as_raw().clone());
    }
}
