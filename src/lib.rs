// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # EdgeVision Native Library
//!
//! This library provides the native frame processing behind the EdgeVision
//! Android application. Camera frames arrive as YUV420 byte arrays and leave
//! as either a grayscale image or a binary Canny edge map.
//!
//! ## Features
//!
//! - **Buffer Reuse**: Gray, blurred and edge buffers are allocated once per
//!   frame size and overwritten in place for every following frame.
//! - **Edge Detection**: 5x5 Gaussian smoothing followed by Canny edge
//!   detection, delegated to `imageproc`.
//! - **JNI Bridge**: Exports for `com.example.edgevision.native.NativeProcessor`
//!   (enabled by the `jni` feature).
//! - **JPEG Encoding**: Grayscale JPEG dumps using turbojpeg.
//!
//! ## Example
//!
//! ```
//! use edgevision::{bridge, FrameProcessor};
//!
//! let mut processor = FrameProcessor::new();
//! let frame = vec![0u8; 4 * 4 * 3 / 2];
//!
//! let edges = bridge::process_frame_canny(&mut processor, &frame, 4, 4);
//! assert_eq!(edges, Some(vec![0u8; 16]));
//!
//! // Invalid dimensions produce no output rather than an error
//! assert!(bridge::process_frame_grayscale(&mut processor, &frame, 0, 4).is_none());
//! ```
//!
//! ## Safety
//!
//! `unsafe` code is confined to the JNI exports, which borrow Java byte
//! arrays and manage the processor handle.

pub mod bridge;
pub mod error;
pub mod image;
pub mod processor;

#[cfg(feature = "jni")]
mod android;

pub use error::{Error, Result};
pub use processor::{CannyThresholds, FrameProcessor};

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber and forwards `log` records to it.
///
/// `RUST_LOG` takes precedence; otherwise `info` is used, or `debug` when
/// `verbose` is set. Calling this more than once is harmless.
///
/// Output goes to stdout through the `fmt` layer. Android discards the stdout
/// of app processes, so from `JNI_OnLoad` these events do not reach logcat.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        _ = tracing_log::LogTracer::init();
    }
}
