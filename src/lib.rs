// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! # neatkit - runtime core for neuroevolution experiments
//!
//! neatkit sits next to an evolutionary engine (genomes, populations,
//! activatable networks) and provides the pieces an experiment driver needs
//! around it:
//!
//! - **Parameter loading** (`config`): flat `name=value` files with type
//!   inference, overrides and a completeness check
//! - **Fitness evaluation** (`evaluation`): serial or worker-pool evaluation of
//!   a candidate batch, results always in input order
//! - **Phenotype drawing** (`visualization`): layered or substrate layout and
//!   weight-encoded connection rendering
//! - **Logging** (`observability`): `tracing` subscribers with per-crate
//!   debug flags
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! neatkit = "0.1"  # Default: raster rendering enabled
//! ```
//!
//! ## Feature Flags
//!
//! - **`raster`** (default): software rasteriser for phenotype drawing
//! - **`file-logging`**: timestamped JSON log files for long runs
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use neatkit::prelude::*;
//! use std::path::Path;
//!
//! let params = load_config(Some(Path::new("params.txt")), None).expect("Failed to load params");
//! let population_size = params.get_int("PopulationSize").unwrap_or(150);
//!
//! let batch: Vec<f64> = (0..population_size).map(|i| i as f64).collect();
//! let fitness = evaluate(
//!     &batch,
//!     infallible(|x: &f64| x.sin()),
//!     &EvaluationConfig::parallel(4),
//!     &LogProgress::default(),
//! )
//! .expect("Evaluation failed");
//! assert_eq!(fitness.len(), batch.len());
//! ```

// Re-export foundation
pub use neatkit_config as config;

// Re-export infrastructure
pub use neatkit_observability as observability;

// Re-export algorithms
pub use neatkit_evaluation as evaluation;

pub use neatkit_visualization as visualization;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{
        load_config, validate_parameters, ConfigError, ConfigStore, ParameterValue,
        REQUIRED_PARAMETERS,
    };

    pub use crate::evaluation::{
        evaluate, evaluate_population, infallible, EvaluationConfig, EvaluationError,
        EvaluationMode, FitnessTarget, LogProgress, NoProgress, ProgressObserver, Species,
    };

    pub use crate::visualization::{
        draw_phenotype, ConnectionView, DrawOptions, LayoutMode, NetworkView, NeuronView, Rect,
        VisualizationError,
    };
}
