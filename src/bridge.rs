// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! Boundary layer shared by the JNI exports and the command line tool.
//!
//! Functions here validate raw caller input, run a pipeline on a
//! [`FrameProcessor`], and collapse every failure into `None` after logging
//! it. A failed call leaves the processor usable for the next frame.

use crate::{
    error::{Error, Result},
    image::{to_flat_bytes, Frame, ImageView},
    processor::FrameProcessor,
};
use core::fmt;
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    time::Instant,
};
use tracing::{debug, error, info};

/// Identification string reported to the application.
pub const VERSION: &str = concat!("EdgeVision Native v", env!("CARGO_PKG_VERSION"));

/// Processing applied to each frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pipeline {
    /// Copy of the luma plane
    Grayscale,
    /// Gaussian blur followed by Canny edge detection
    Canny,
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Pipeline::Grayscale => write!(f, "Grayscale"),
            Pipeline::Canny => write!(f, "Canny"),
        }
    }
}

pub fn version_string() -> &'static str {
    VERSION
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs `pipeline` on the frame and returns the result as flat bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] for non-positive or oversized
/// dimensions and [`Error::ProcessingFailure`] if the image library panics.
pub fn process(
    processor: &mut FrameProcessor,
    pipeline: Pipeline,
    data: &[u8],
    width: i32,
    height: i32,
) -> Result<Vec<u8>> {
    let start = Instant::now();
    let frame = Frame::new(data, width, height)?;
    debug!("{} frame: {}", pipeline, frame);

    let bytes = panic::catch_unwind(AssertUnwindSafe(|| {
        let image = match pipeline {
            Pipeline::Grayscale => processor.to_gray(&frame),
            Pipeline::Canny => processor.to_edges(&frame),
        };
        to_flat_bytes(&ImageView::from(image))
    }))
    .map_err(|payload| Error::ProcessingFailure(panic_message(payload)))?;

    info!(
        "{} processing: {} in {} ms, output: {} bytes",
        pipeline,
        frame.extent(),
        start.elapsed().as_millis(),
        bytes.len()
    );
    Ok(bytes)
}

/// Runs `pipeline`, logging and discarding any error.
pub fn process_frame(
    processor: &mut FrameProcessor,
    pipeline: Pipeline,
    data: &[u8],
    width: i32,
    height: i32,
) -> Option<Vec<u8>> {
    match process(processor, pipeline, data, width, height) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!("{} processing failed: {}", pipeline, e);
            None
        }
    }
}

pub fn process_frame_canny(
    processor: &mut FrameProcessor,
    data: &[u8],
    width: i32,
    height: i32,
) -> Option<Vec<u8>> {
    process_frame(processor, Pipeline::Canny, data, width, height)
}

pub fn process_frame_grayscale(
    processor: &mut FrameProcessor,
    data: &[u8],
    width: i32,
    height: i32,
) -> Option<Vec<u8>> {
    process_frame(processor, Pipeline::Grayscale, data, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(version_string().starts_with("EdgeVision Native v"));
    }

    #[test]
    fn test_invalid_dimensions() {
        let mut processor = FrameProcessor::new();
        let data = [0u8; 24];
        assert!(matches!(
            process(&mut processor, Pipeline::Canny, &data, 0, 4),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(process_frame_grayscale(&mut processor, &data, 4, -1).is_none());
        assert!(process_frame_canny(&mut processor, &data, 8, 8).is_none());
        assert!(processor.extent().is_none());
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(3u8)), "unknown panic");
    }
}
