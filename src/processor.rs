// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::image::{Extent, Frame, ScratchImage};
use image::GrayImage;
use imageproc::{edges::canny, filter::separable_filter_equal};
use tracing::debug;

/// Side length of the square Gaussian kernel applied before edge detection.
pub const BLUR_KERNEL_SIZE: usize = 5;

/// Standard deviation of the pre-detection Gaussian blur.
pub const BLUR_SIGMA: f32 = 1.5;

/// Gradient kernel size used by the edge detector (3x3 Sobel).
pub const CANNY_APERTURE: u32 = 3;

/// Hysteresis thresholds for Canny edge detection.
///
/// Gradient magnitudes above `high` start an edge, and magnitudes above `low`
/// extend an edge already started.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CannyThresholds {
    pub low: f32,
    pub high: f32,
}

impl CannyThresholds {
    /// The thresholds as an ascending `(low, high)` pair.
    ///
    /// Reversed thresholds are swapped, and a NaN threshold is never
    /// exceeded, so it behaves as positive infinity.
    pub fn ordered(&self) -> (f32, f32) {
        let not_nan = |t: f32| if t.is_nan() { f32::INFINITY } else { t };
        let (a, b) = (not_nan(self.low), not_nan(self.high));
        if a > b {
            (b, a)
        } else {
            (a, b)
        }
    }
}

impl Default for CannyThresholds {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
        }
    }
}

/// Normalized 1-D Gaussian kernel of `size` taps.
fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let center = (size as f32 - 1.0) / 2.0;
    let scale = -0.5 / (sigma * sigma);
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - center;
            (scale * x * x).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);
    kernel
}

/// Converts YUV420 camera frames into grayscale images or Canny edge maps.
///
/// The processor owns three scratch buffers (gray, blurred and edges) which
/// are reused from frame to frame and only reallocated when the frame size
/// changes. Blurring and edge detection are delegated to `imageproc`.
///
/// # Thread Safety
///
/// Processing takes `&mut self`, so a single processor serves one pipeline
/// at a time. Create one per camera thread, or guard a shared instance with
/// a lock.
///
/// # Example
///
/// ```
/// use edgevision::{image::Frame, FrameProcessor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut processor = FrameProcessor::new();
/// let data = vec![0u8; 640 * 480 * 3 / 2];
/// let frame = Frame::new(&data, 640, 480)?;
///
/// let edges = processor.to_edges(&frame);
/// assert_eq!(edges.len(), 640 * 480);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FrameProcessor {
    thresholds: CannyThresholds,
    kernel: Vec<f32>,
    extent: Option<Extent>,
    gray: ScratchImage,
    blurred: ScratchImage,
    edges: ScratchImage,
}

impl Default for FrameProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameProcessor {
    pub fn new() -> Self {
        Self::with_thresholds(CannyThresholds::default())
    }

    pub fn with_thresholds(thresholds: CannyThresholds) -> Self {
        debug!(
            "FrameProcessor created with thresholds {}/{}",
            thresholds.low, thresholds.high
        );
        Self {
            thresholds,
            kernel: gaussian_kernel(BLUR_KERNEL_SIZE, BLUR_SIGMA),
            extent: None,
            gray: ScratchImage::new(),
            blurred: ScratchImage::new(),
            edges: ScratchImage::new(),
        }
    }

    /// Sets the Canny thresholds used by the next [`to_edges`] call. The
    /// values are not validated.
    ///
    /// [`to_edges`]: FrameProcessor::to_edges
    pub fn set_thresholds(&mut self, low: f32, high: f32) {
        self.thresholds = CannyThresholds { low, high };
    }

    pub fn thresholds(&self) -> CannyThresholds {
        self.thresholds
    }

    /// Extent of the most recently processed frame.
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Copies the luma plane of `frame` into the gray buffer and returns it.
    pub fn to_gray(&mut self, frame: &Frame) -> &GrayImage {
        let extent = frame.extent();
        self.gray.ensure(extent);
        self.extent = Some(extent);
        self.gray.as_mut_slice().copy_from_slice(frame.luma());
        self.gray.image()
    }

    /// Produces a binary (0 or 255) edge map of `frame`.
    ///
    /// The luma plane is smoothed with a 5x5 Gaussian (sigma 1.5) into the
    /// blur buffer and then run through Canny into the edge buffer.
    /// `imageproc`'s detector applies its own sigma 1.4 blur before taking
    /// gradients, so the total smoothing is about sigma 2.05 and edge maps
    /// are not pixel-identical to OpenCV's.
    ///
    /// Thresholds are used in ascending order (see
    /// [`CannyThresholds::ordered`]).
    pub fn to_edges(&mut self, frame: &Frame) -> &GrayImage {
        let extent = frame.extent();
        self.to_gray(frame);
        self.blurred.ensure(extent);
        self.edges.ensure(extent);

        let blurred = separable_filter_equal(self.gray.image(), &self.kernel);
        self.blurred.as_mut_slice().copy_from_slice(blurred.as_raw());

        let (low, high) = self.thresholds.ordered();
        let edges = canny(self.blurred.image(), low, high);
        self.edges.as_mut_slice().copy_from_slice(edges.as_raw());

        self.edges.image()
    }

    /// The gray buffer as left by the last call.
    pub fn gray(&self) -> &GrayImage {
        self.gray.image()
    }

    /// The blurred buffer as left by the last [`to_edges`] call.
    ///
    /// [`to_edges`]: FrameProcessor::to_edges
    pub fn blurred(&self) -> &GrayImage {
        self.blurred.image()
    }

    /// The edge buffer as left by the last [`to_edges`] call.
    ///
    /// [`to_edges`]: FrameProcessor::to_edges
    pub fn edges(&self) -> &GrayImage {
        self.edges.image()
    }
}

impl Drop for FrameProcessor {
    fn drop(&mut self) {
        debug!("FrameProcessor dropped");
    }
}
