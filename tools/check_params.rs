// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Parameter file checker.
//!
//! Loads an experiment parameter file the same way an experiment driver does
//! (file, then `NEATKIT_PARAM_*` environment overrides, then `--set` flags),
//! runs the range checks and prints the resolved values.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use neatkit::config::{load_config, validate_parameters};
use neatkit::observability::{debug_flags_help, init_logging_default, parse_debug_flags};
use tracing::info;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: check_params [<params.txt>] [--set Name=value]... [--quiet]\n\n\
         Without a path the file is located via NEATKIT_PARAMS_PATH or ./params.txt.\n\n{}",
        debug_flags_help()
    );
    process::exit(2);
}

struct Args {
    path: Option<PathBuf>,
    overrides: HashMap<String, String>,
    quiet: bool,
}

fn parse_args() -> Args {
    let mut parsed = Args {
        path: None,
        overrides: HashMap::new(),
        quiet: false,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--set" => {
                let v = args.next().unwrap_or_else(|| usage_and_exit());
                let Some((name, value)) = v.split_once('=') else {
                    eprintln!("--set expects Name=value, got: {v}");
                    usage_and_exit();
                };
                parsed
                    .overrides
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
            "--quiet" => parsed.quiet = true,
            "-h" | "--help" => usage_and_exit(),
            flag if flag.starts_with("--debug-") => {}
            other if other.starts_with("--") => {
                eprintln!("Unknown argument: {other}");
                usage_and_exit();
            }
            other => {
                if parsed.path.is_some() {
                    eprintln!("More than one parameter file given: {other}");
                    usage_and_exit();
                }
                parsed.path = Some(PathBuf::from(other));
            }
        }
    }

    parsed
}

fn main() -> Result<()> {
    let args = parse_args();
    init_logging_default(&parse_debug_flags())?;

    let overrides = (!args.overrides.is_empty()).then_some(&args.overrides);
    let store = load_config(args.path.as_deref(), overrides)
        .context("Failed to load experiment parameters")?;
    validate_parameters(&store).context("Parameter values out of range")?;

    info!(target: "neatkit-config", "All {} parameters present and in range", store.len());

    if !args.quiet {
        for (name, value) in store.iter() {
            if let Some(value) = value {
                println!("{name} = {value}");
            }
        }
    }

    Ok(())
}
