// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use args::Args;
use clap::Parser;
use edgevision::{
    bridge,
    image::{encode_jpeg, ImageView},
    FrameProcessor,
};
use std::{error::Error, fs, io, path::Path};
use tracing::info;

mod args;

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    edgevision::init_tracing(args.verbose);
    info!("{}", bridge::version_string());

    let data = fs::read(&args.input)?;
    let mut processor = FrameProcessor::with_thresholds(args.thresholds());

    let mut output = None;
    for _ in 0..args.repeat.max(1) {
        output = bridge::process_frame(
            &mut processor,
            args.mode.into(),
            &data,
            args.width(),
            args.height(),
        );
        if output.is_none() {
            break;
        }
    }

    let output = output.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed to process {}", args.input.display()),
        )
    })?;

    if let Some(path) = &args.output {
        if is_jpeg(path) {
            let view = ImageView::from_slice(
                &output,
                args.width() as usize,
                args.height() as usize,
            )
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "output size mismatch"))?;
            let jpeg = encode_jpeg(&view)?;
            fs::write(path, &jpeg[..])?;
        } else {
            fs::write(path, &output)?;
        }
        info!("saved {} ({} bytes)", path.display(), output.len());
    }

    Ok(())
}
