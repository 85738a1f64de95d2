// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Render a saved network to a PNG.
//!
//! Reads a network in the engine's `NNstart ... NNend` text format, lays it
//! out (layered by default) and writes the drawing to an image file.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use image::RgbImage;
use neatkit::observability::{init_logging_default, parse_debug_flags};
use neatkit::visualization::{draw_phenotype, DrawOptions, LayoutMode, NetworkView, Rect};
use tracing::info;

const DEFAULT_SIZE: u32 = 500;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: render_network <network.txt> <out.png> [--substrate] [--size N]\n\n\
         Defaults:\n\
         - size: {DEFAULT_SIZE} (square image)\n\
         - layout: layered by depth\n"
    );
    process::exit(2);
}

struct Args {
    input: PathBuf,
    output: PathBuf,
    mode: LayoutMode,
    size: u32,
}

fn parse_args() -> Args {
    let mut positional = Vec::new();
    let mut mode = LayoutMode::Layered;
    let mut size = DEFAULT_SIZE;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--substrate" => mode = LayoutMode::Substrate,
            "--size" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                size = match v.parse::<u32>() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        eprintln!("Invalid --size: {v}");
                        usage_and_exit();
                    }
                };
            }
            "-h" | "--help" => usage_and_exit(),
            flag if flag.starts_with("--debug-") => {}
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
            other => positional.push(PathBuf::from(other)),
        }
    }

    if positional.len() != 2 {
        usage_and_exit();
    }
    let output = positional.pop().unwrap_or_else(|| usage_and_exit());
    let input = positional.pop().unwrap_or_else(|| usage_and_exit());

    Args {
        input,
        output,
        mode,
        size,
    }
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging_default(&parse_debug_flags())?;

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read network file {}", args.input.display()))?;
    let mut network = NetworkView::parse_saved(&text)
        .with_context(|| format!("Failed to parse network file {}", args.input.display()))?;

    let options = DrawOptions {
        mode: args.mode,
        ..DrawOptions::default()
    };
    let mut image = RgbImage::new(args.size, args.size);
    let report = draw_phenotype(
        &mut image,
        Rect::from_size(args.size, args.size),
        &mut network,
        &options,
    )
    .context("Failed to draw network")?;

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write image {}", args.output.display()))?;

    info!(
        target: "neatkit-visualization",
        "Rendered {} neurons, {} connections to {}",
        network.neurons.len(),
        report.connections_drawn,
        args.output.display()
    );

    Ok(())
}
