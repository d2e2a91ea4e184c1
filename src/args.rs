// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use edgevision::{bridge::Pipeline, CannyThresholds};
use std::path::PathBuf;

/// Frame processing pipelines selectable from the command line.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum Mode {
    /// Copy the luma plane as a grayscale image
    Gray,
    /// Blur and run Canny edge detection
    Canny,
}

impl From<Mode> for Pipeline {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Gray => Pipeline::Grayscale,
            Mode::Canny => Pipeline::Canny,
        }
    }
}

/// Command-line arguments for the EdgeVision frame tool.
///
/// Runs a raw YUV420 frame through the same processing path the Android
/// application uses. Arguments can be specified via command line or
/// environment variables.
///
/// # Example
///
/// ```bash
/// # Edge map of a 640x480 capture, saved as JPEG
/// edgevision --input frame.yuv --frame-size "640 480" --output edges.jpg
///
/// # Via environment variables
/// export INPUT=frame.yuv
/// export MODE=gray
/// edgevision --output gray.raw
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Raw YUV420 frame to process
    #[arg(short, long, env = "INPUT")]
    pub input: PathBuf,

    /// Frame resolution in pixels (width height)
    #[arg(
        long,
        env = "FRAME_SIZE",
        default_value = "640 480",
        value_delimiter = ' ',
        num_args = 2
    )]
    pub frame_size: Vec<i32>,

    /// Processing pipeline
    #[arg(short, long, env = "MODE", default_value = "canny", value_enum)]
    pub mode: Mode,

    /// Canny low hysteresis threshold
    #[arg(long, env = "CANNY_LOW", default_value = "50")]
    pub low_threshold: f32,

    /// Canny high hysteresis threshold
    #[arg(long, env = "CANNY_HIGH", default_value = "150")]
    pub high_threshold: f32,

    /// Output path (.jpg/.jpeg writes a JPEG, anything else raw bytes)
    #[arg(short, long, env = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Number of times to process the frame (reuses buffers after the first)
    #[arg(long, env = "REPEAT", default_value = "1")]
    pub repeat: u32,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn width(&self) -> i32 {
        self.frame_size[0]
    }

    pub fn height(&self) -> i32 {
        self.frame_size[1]
    }

    pub fn thresholds(&self) -> CannyThresholds {
        CannyThresholds {
            low: self.low_threshold,
            high: self.high_threshold,
        }
    }
}
