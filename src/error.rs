// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{error, fmt};

/// Result type alias using the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while turning a camera frame into an output image.
///
/// Every variant is recoverable: the [`FrameProcessor`](crate::FrameProcessor)
/// that reported it remains usable for the next frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Width or height is not positive, overflows, or the frame is shorter
    /// than its luma plane.
    InvalidDimensions {
        width: i64,
        height: i64,
        len: usize,
    },
    /// The image library failed while blurring or detecting edges.
    ProcessingFailure(String),
    /// The output buffer could not be produced.
    AllocationFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height, len } => write!(
                f,
                "invalid dimensions: {}x{} for a {} byte frame",
                width, height, len
            ),
            Error::ProcessingFailure(msg) => write!(f, "processing failed: {}", msg),
            Error::AllocationFailure(msg) => write!(f, "allocation failed: {}", msg),
        }
    }
}

impl error::Error for Error {}
