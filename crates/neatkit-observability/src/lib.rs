// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! # neatkit-observability
//!
//! Logging setup shared by the neatkit crates and tools.
//!
//! Every crate logs through `tracing` with its own target (the crate name, see
//! [`KNOWN_CRATES`]), so per-crate debug flags translate directly into an
//! `EnvFilter`.
//!
//! ## Features
//! - `file-logging`: File-based log rotation with retention (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known neatkit crate names (also their tracing targets) for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neatkit-config",
    "neatkit-evaluation",
    "neatkit-visualization",
];
