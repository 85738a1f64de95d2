// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Parameter file loading with override support
//!
//! This module implements the 3-tier loading system:
//! 1. Parameter file (`name=value` lines)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)
//!
//! The completeness check runs after all three tiers, so an override may fill
//! in a parameter the file left out.

use crate::types::ParameterValue;
use crate::{ConfigError, ConfigResult, ConfigStore};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default parameter file name searched by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "params.txt";

/// Environment variable naming an explicit parameter file
pub const CONFIG_PATH_ENV: &str = "NEATKIT_PARAMS_PATH";

/// Prefix for per-parameter environment overrides, e.g. `NEATKIT_PARAM_PopulationSize`
pub const PARAM_ENV_PREFIX: &str = "NEATKIT_PARAM_";

const SEPARATOR: char = '=';

/// Find the parameter file
///
/// Search order:
/// 1. `NEATKIT_PARAMS_PATH` environment variable
/// 2. Current working directory: `./params.txt`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no parameter file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Parameter file specified by {} not found: {}",
                CONFIG_PATH_ENV,
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Parameter file '{}' not found in any of these locations:\n{}\n\nSet {} environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load the engine's full required parameter set from a file
///
/// # Arguments
///
/// * `config_path` - Optional path to the parameter file. If `None`, will search for it.
/// * `cli_args` - Optional CLI argument overrides (`name -> raw value`)
///
/// # Errors
///
/// Returns an error if the file is missing or unreadable, names an unknown
/// parameter, holds an unparsable value, or leaves any required parameter unset.
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ConfigStore> {
    load_config_with(ConfigStore::new(), config_path, cli_args)
}

/// Load parameters into a caller-built store (custom required set)
pub fn load_config_with(
    mut store: ConfigStore,
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<ConfigStore> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let assigned = parse_config_str(&content, &mut store)?;
    debug!(target: "neatkit-config", "Read {} parameter line(s) from {}", assigned, config_file.display());

    apply_environment_overrides(&mut store)?;

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut store, cli)?;
    }

    store.check_complete()?;
    info!(target: "neatkit-config", "Loaded {} parameters from {}", store.len(), config_file.display());

    Ok(store)
}

/// Apply every significant line of `content` to `store`
///
/// A line is significant only if it contains `=`; everything else (blank
/// lines, section headers, comments without `=`) is ignored. The name is the
/// text before the first `=`, the raw value the text after it, both trimmed.
///
/// Returns the number of assignments made. Does not run the completeness check.
pub fn parse_config_str(content: &str, store: &mut ConfigStore) -> ConfigResult<usize> {
    let mut assigned = 0;
    for line in content.lines() {
        let Some((name, raw)) = line.split_once(SEPARATOR) else {
            continue;
        };
        let name = name.trim();
        let value = ParameterValue::infer(name, raw)?;
        store.assign(name, value)?;
        assigned += 1;
    }
    Ok(assigned)
}

/// Apply environment variable overrides
///
/// For every tracked parameter `Name`, `NEATKIT_PARAM_Name` (if present)
/// replaces the file value using the same type inference as the file grammar.
pub fn apply_environment_overrides(store: &mut ConfigStore) -> ConfigResult<()> {
    let names: Vec<String> = store.iter().map(|(name, _)| name.to_string()).collect();
    for name in names {
        if let Ok(raw) = env::var(format!("{}{}", PARAM_ENV_PREFIX, name)) {
            let value = ParameterValue::infer(&name, &raw)?;
            debug!(target: "neatkit-config", "Environment override: {} = {}", name, value);
            store.assign(&name, value)?;
        }
    }
    Ok(())
}

/// Apply CLI argument overrides
///
/// # Arguments
///
/// * `store` - Parameters to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"PopulationSize": "300"}`)
///
/// # Errors
///
/// Unknown names are rejected just like in the file.
pub fn apply_cli_overrides(
    store: &mut ConfigStore,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    for (name, raw) in cli_args {
        let value = ParameterValue::infer(name, raw)?;
        debug!(target: "neatkit-config", "CLI override: {} = {}", name, value);
        store.assign(name, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_params.txt");
        File::create(&config_path).unwrap();

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing_target() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("does_not_exist.txt");

        env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var(CONFIG_PATH_ENV);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_infers_types() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("params.txt");
        fs::write(&config_path, "a=1\nb=2.5\nc=true\n").unwrap();

        let store = ConfigStore::with_required(["a", "b", "c"]);
        let store = load_config_with(store, Some(config_path.as_path()), None).unwrap();

        assert_eq!(store.get("a"), Some(ParameterValue::Int(1)));
        assert_eq!(store.get("b"), Some(ParameterValue::Float(2.5)));
        assert_eq!(store.get("c"), Some(ParameterValue::Bool(true)));
        assert!(store.is_validated());
    }

    #[test]
    fn test_lines_without_separator_are_ignored() {
        let mut store = ConfigStore::with_required(["a", "b"]);
        let content = "[NEAT]\n\n# a comment\na = 3\n  b=  FALSE  \nNNend\n";
        let assigned = parse_config_str(content, &mut store).unwrap();

        assert_eq!(assigned, 2);
        assert_eq!(store.get_int("a"), Some(3));
        assert_eq!(store.get_bool("b"), Some(false));
    }

    #[test]
    fn test_unknown_parameter_aborts_load() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("params.txt");
        fs::write(&config_path, "a=1\nTypo=2\n").unwrap();

        let store = ConfigStore::with_required(["a"]);
        let result = load_config_with(store, Some(config_path.as_path()), None);
        assert!(matches!(result, Err(ConfigError::UnknownParameter(ref n)) if n == "Typo"));
    }

    #[test]
    fn test_incomplete_file_aborts_load() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("params.txt");
        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "a=1").unwrap();

        let store = ConfigStore::with_required(["a", "b", "c"]);
        match load_config_with(store, Some(config_path.as_path()), None) {
            Err(ConfigError::IncompleteConfiguration { missing }) => {
                assert_eq!(missing, vec!["b".to_string(), "c".to_string()]);
            }
            other => panic!("expected incomplete configuration, got {:?}", other),
        }
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut store = ConfigStore::with_required(["EnvOnlyParam", "Other"]);
        store.assign("EnvOnlyParam", 1_i64).unwrap();

        env::set_var("NEATKIT_PARAM_EnvOnlyParam", "0.75");
        let result = apply_environment_overrides(&mut store);
        env::remove_var("NEATKIT_PARAM_EnvOnlyParam");

        assert!(result.is_ok());
        assert_eq!(store.get_float("EnvOnlyParam"), Some(0.75));
        assert!(!store.is_set("Other"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut store = ConfigStore::with_required(["PopulationSize"]);
        let mut cli_args = HashMap::new();
        cli_args.insert("PopulationSize".to_string(), "300".to_string());

        apply_cli_overrides(&mut store, &cli_args).unwrap();
        assert_eq!(store.get_int("PopulationSize"), Some(300));
    }

    #[test]
    fn test_cli_override_unknown_name_rejected() {
        let mut store = ConfigStore::with_required(["PopulationSize"]);
        let mut cli_args = HashMap::new();
        cli_args.insert("PopSize".to_string(), "300".to_string());

        let result = apply_cli_overrides(&mut store, &cli_args);
        assert!(matches!(result, Err(ConfigError::UnknownParameter(_))));
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("params.txt");
        fs::write(&config_path, "PrecedenceA=1\nPrecedenceB=1\n").unwrap();

        env::set_var("NEATKIT_PARAM_PrecedenceA", "2");
        env::set_var("NEATKIT_PARAM_PrecedenceB", "2");

        let mut cli_args = HashMap::new();
        cli_args.insert("PrecedenceA".to_string(), "3".to_string());

        let store = ConfigStore::with_required(["PrecedenceA", "PrecedenceB"]);
        let result = load_config_with(store, Some(config_path.as_path()), Some(&cli_args));

        env::remove_var("NEATKIT_PARAM_PrecedenceA");
        env::remove_var("NEATKIT_PARAM_PrecedenceB");

        // CLI wins for A, env wins for B (no CLI override)
        let store = result.unwrap();
        assert_eq!(store.get_int("PrecedenceA"), Some(3));
        assert_eq!(store.get_int("PrecedenceB"), Some(2));
    }

    #[test]
    fn test_override_can_complete_configuration() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("params.txt");
        fs::write(&config_path, "a=1\n").unwrap();

        let mut cli_args = HashMap::new();
        cli_args.insert("b".to_string(), "true".to_string());

        let store = ConfigStore::with_required(["a", "b"]);
        let store = load_config_with(store, Some(config_path.as_path()), Some(&cli_args)).unwrap();
        assert_eq!(store.get_bool("b"), Some(true));
    }
}
