// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for neatkit tools and experiment drivers
//!
//! Console output is always available. With the `file-logging` feature,
//! [`init_file_logging`] additionally writes JSON logs to a timestamped run
//! folder and prunes old runs.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::{LogFormat, LoggingConfig};

/// Build the `EnvFilter` for the given flags and base level
pub fn build_env_filter(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<EnvFilter> {
    let filter = debug_flags.to_filter_string_with_base(&config.level);
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

fn console_layer(
    config: &LoggingConfig,
    env_filter: EnvFilter,
) -> Box<dyn Layer<Registry> + Send + Sync> {
    match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(config.show_target)
            .with_file(false)
            .with_line_number(false)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(env_filter)
            .boxed(),
    }
}

/// Initialize console logging
///
/// # Errors
///
/// Fails if the filter string is invalid or a global subscriber is already set.
pub fn init_console_logging(debug_flags: &CrateDebugFlags, config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(debug_flags, config)?;

    Registry::default()
        .with(console_layer(config, env_filter))
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(())
}

/// Initialize console logging with default settings
pub fn init_logging_default(debug_flags: &CrateDebugFlags) -> Result<()> {
    init_console_logging(debug_flags, &LoggingConfig::default())
}

#[cfg(feature = "file-logging")]
pub use file::{init_file_logging, LoggingGuard};

#[cfg(feature = "file-logging")]
mod file {
    use super::*;
    use chrono::{NaiveDateTime, Utc};
    use std::path::{Path, PathBuf};
    use tracing_appender::rolling;

    const RUN_PREFIX: &str = "run_";
    const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// Keeps the non-blocking file writers alive (they flush logs on drop)
    pub struct LoggingGuard {
        _file_guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
        log_dir: PathBuf,
    }

    impl LoggingGuard {
        /// Get the run's log directory path
        pub fn log_dir(&self) -> &Path {
            &self.log_dir
        }
    }

    /// Initialize logging with console output and a combined JSON log file
    ///
    /// Creates a timestamped folder structure:
    /// ```text
    /// ./logs/
    ///   └── run_20250101_120000/
    ///       └── neatkit.log
    /// ```
    ///
    /// # Arguments
    /// * `debug_flags` - Per-crate debug flags for filtering
    /// * `config` - Console format and base level
    /// * `log_dir` - Base directory for logs (default: `./logs`)
    /// * `retention_runs` - Keep N most recent runs (default: 10)
    pub fn init_file_logging(
        debug_flags: &CrateDebugFlags,
        config: &LoggingConfig,
        log_dir: Option<PathBuf>,
        retention_runs: Option<usize>,
    ) -> Result<LoggingGuard> {
        let base_log_dir = log_dir.unwrap_or_else(|| PathBuf::from("./logs"));

        let timestamp = Utc::now().format(RUN_TIMESTAMP_FORMAT);
        let run_folder = base_log_dir.join(format!("{}{}", RUN_PREFIX, timestamp));
        std::fs::create_dir_all(&run_folder)
            .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

        cleanup_old_runs(&base_log_dir, retention_runs.unwrap_or(10))?;

        let console_filter = build_env_filter(debug_flags, config)?;
        let file_filter = build_env_filter(debug_flags, config)?;

        let appender = rolling::never(&run_folder, "neatkit.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_filter(file_filter)
            .boxed();

        Registry::default()
            .with(vec![console_layer(config, console_filter), file_layer])
            .try_init()
            .context("Failed to install global tracing subscriber")?;

        Ok(LoggingGuard {
            _file_guards: vec![guard],
            log_dir: run_folder,
        })
    }

    /// Remove all but the `retention_runs` most recent run folders
    fn cleanup_old_runs(base_log_dir: &Path, retention_runs: usize) -> Result<()> {
        if !base_log_dir.exists() {
            return Ok(());
        }

        let mut runs: Vec<(PathBuf, NaiveDateTime)> = Vec::new();
        for entry in std::fs::read_dir(base_log_dir)? {
            let path = entry?.path();
            if !path.is_dir() {
                continue;
            }
            let stamp = path
                .file_name()
                .and_then(|n| n.to_str())
                .and_then(|n| n.strip_prefix(RUN_PREFIX))
                .and_then(|s| NaiveDateTime::parse_from_str(s, RUN_TIMESTAMP_FORMAT).ok());
            if let Some(dt) = stamp {
                runs.push((path, dt));
            }
        }

        // Oldest first
        runs.sort_by_key(|(_, dt)| *dt);

        if runs.len() > retention_runs {
            let to_remove = runs.len() - retention_runs;
            for (path, _) in runs.iter().take(to_remove) {
                if let Err(e) = std::fs::remove_dir_all(path) {
                    eprintln!("Warning: Failed to remove old log directory {}: {}", path.display(), e);
                }
            }
        }

        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cleanup_keeps_most_recent_runs() {
            let dir = tempfile::tempdir().unwrap();
            for stamp in ["20250101_000000", "20250102_000000", "20250103_000000"] {
                std::fs::create_dir_all(dir.path().join(format!("run_{}", stamp))).unwrap();
            }
            std::fs::create_dir_all(dir.path().join("unrelated")).unwrap();

            cleanup_old_runs(dir.path(), 2).unwrap();

            assert!(!dir.path().join("run_20250101_000000").exists());
            assert!(dir.path().join("run_20250102_000000").exists());
            assert!(dir.path().join("run_20250103_000000").exists());
            assert!(dir.path().join("unrelated").exists());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_uses_configured_base_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-neatkit-config".to_string()]);
        let config = LoggingConfig {
            level: "warn".to_string(),
            ..LoggingConfig::default()
        };
        assert!(build_env_filter(&flags, &config).is_ok());
        assert_eq!(
            flags.to_filter_string_with_base(&config.level),
            "neatkit-config=debug,warn"
        );
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let flags = CrateDebugFlags::default();
        let config = LoggingConfig {
            level: "neatkit-config=notalevel".to_string(),
            ..LoggingConfig::default()
        };
        assert!(build_env_filter(&flags, &config).is_err());
    }
}
