// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-neatkit-evaluation`, `--debug-neatkit-config`, etc.
//! to raise the log level per crate.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable holding comma-separated crate names (or `all`)
pub const DEBUG_ENV: &str = "NEATKIT_DEBUG";

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use neatkit_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(std::env::args());
/// if flags.is_enabled("neatkit-evaluation") {
///     // Enable debug logging for the evaluation orchestrator
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = HashMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    /// Merge the crates named by an environment-style value (`all` or `a,b,c`)
    pub fn merge_env_value(&mut self, value: &str) {
        if value == "all" {
            for crate_name in KNOWN_CRATES {
                self.enabled_crates.insert(crate_name.to_string(), true);
            }
            return;
        }
        for crate_name in value.split(',') {
            let crate_name = crate_name.trim();
            if !crate_name.is_empty() {
                self.enabled_crates.insert(crate_name.to_string(), true);
            }
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get log level for a crate
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter from debug flags
    ///
    /// Format: "neatkit-evaluation=debug,info" or "info" if none enabled.
    pub fn to_filter_string(&self) -> String {
        self.to_filter_string_with_base("info")
    }

    /// Same as [`Self::to_filter_string`] with a custom level for everything else
    pub fn to_filter_string_with_base(&self, base_level: &str) -> String {
        if self.enabled_crates.is_empty() {
            return base_level.to_string();
        }

        let mut crates: Vec<&String> = self.enabled_crates.keys().collect();
        crates.sort();
        let mut filters: Vec<String> = crates
            .into_iter()
            .map(|crate_name| format!("{}=debug", crate_name))
            .collect();
        filters.push(base_level.to_string());
        filters.join(",")
    }
}

/// Parse debug flags from the process arguments and `NEATKIT_DEBUG`
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var(DEBUG_ENV) {
        flags.merge_env_value(&env_var);
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  NEATKIT_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  NEATKIT_DEBUG=all                             Enable debug for all crates
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-neatkit-config".to_string()]);
        assert!(flags.is_enabled("neatkit-config"));
        assert!(!flags.is_enabled("neatkit-evaluation"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_non_flag_arguments_ignored() {
        let flags = CrateDebugFlags::from_args(vec![
            "render_network".to_string(),
            "net.txt".to_string(),
            "--substrate".to_string(),
        ]);
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string(), "info");
    }

    #[test]
    fn test_filter_string_is_sorted() {
        let flags = CrateDebugFlags::from_args(vec![
            "--debug-neatkit-visualization".to_string(),
            "--debug-neatkit-config".to_string(),
        ]);
        assert_eq!(
            flags.to_filter_string(),
            "neatkit-config=debug,neatkit-visualization=debug,info"
        );
    }

    #[test]
    fn test_merge_env_value() {
        let mut flags = CrateDebugFlags::default();
        flags.merge_env_value(" neatkit-evaluation , ,neatkit-config");
        assert!(flags.is_enabled("neatkit-evaluation"));
        assert!(flags.is_enabled("neatkit-config"));
        assert_eq!(flags.enabled_crates.len(), 2);
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-neatkit-evaluation".to_string()]);
        assert_eq!(flags.log_level("neatkit-evaluation"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("neatkit-config"), tracing::Level::INFO);
    }
}
