// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Parameter range validation
//!
//! This module checks that assigned parameters are within the ranges the
//! engine can use and don't contradict each other. It is separate from the
//! completeness check: a store can be complete but still invalid.

use crate::{ConfigError, ConfigResult, ConfigStore};

/// Validation errors that can occur during parameter validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    ProbabilityOutOfRange { name: String, value: f64 },
    InvertedRange { min_name: String, max_name: String, min: f64, max: f64 },
    WrongType { name: String, expected: &'static str, found: &'static str },
    InvalidValue { name: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProbabilityOutOfRange { name, value } => {
                write!(f, "{} = {} is outside valid range (0.0-1.0)", name, value)
            }
            Self::InvertedRange { min_name, max_name, min, max } => {
                write!(
                    f,
                    "{} = {} is greater than {} = {}",
                    min_name, min, max_name, max
                )
            }
            Self::WrongType { name, expected, found } => {
                write!(f, "{} must be {}, found {}", name, expected, found)
            }
            Self::InvalidValue { name, reason } => {
                write!(f, "Invalid value for {}: {}", name, reason)
            }
        }
    }
}

/// Parameters whose value must be a boolean
const BOOLEAN_PARAMETERS: &[&str] = &["DynamicCompatibility", "RouletteWheelSelection"];

/// `(lower, upper)` pairs that must satisfy `lower <= upper`
const ORDERED_PAIRS: &[(&str, &str)] = &[
    ("MinSpecies", "MaxSpecies"),
    ("MinActivationA", "MaxActivationA"),
    ("InitialDepth", "MaximumDepth"),
];

/// Validate the assigned parameters
///
/// Checks for:
/// - Probabilities (`*Prob`, `OverallMutationRate`) in 0.0-1.0
/// - Boolean switches holding booleans
/// - Ordered min/max pairs
/// - Positive population size
///
/// Unset parameters are skipped; run `check_complete` first if they matter.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_parameters(store: &ConfigStore) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_probabilities(store, &mut errors);
    validate_boolean_switches(store, &mut errors);
    validate_ordered_pairs(store, &mut errors);
    validate_value_ranges(store, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Parameter validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn is_probability(name: &str) -> bool {
    name.ends_with("Prob") || name == "OverallMutationRate"
}

fn validate_probabilities(store: &ConfigStore, errors: &mut Vec<ConfigValidationError>) {
    for (name, value) in store.iter() {
        let Some(value) = value else { continue };
        if !is_probability(name) {
            continue;
        }
        match value.as_float() {
            Some(p) if (0.0..=1.0).contains(&p) => {}
            Some(p) => errors.push(ConfigValidationError::ProbabilityOutOfRange {
                name: name.to_string(),
                value: p,
            }),
            None => errors.push(ConfigValidationError::WrongType {
                name: name.to_string(),
                expected: "a number",
                found: value.type_name(),
            }),
        }
    }
}

fn validate_boolean_switches(store: &ConfigStore, errors: &mut Vec<ConfigValidationError>) {
    for name in BOOLEAN_PARAMETERS {
        if let Some(value) = store.get(name) {
            if value.as_bool().is_none() {
                errors.push(ConfigValidationError::WrongType {
                    name: name.to_string(),
                    expected: "a bool",
                    found: value.type_name(),
                });
            }
        }
    }
}

fn validate_ordered_pairs(store: &ConfigStore, errors: &mut Vec<ConfigValidationError>) {
    for (min_name, max_name) in ORDERED_PAIRS {
        if let (Some(min), Some(max)) = (store.get_float(min_name), store.get_float(max_name)) {
            if min > max {
                errors.push(ConfigValidationError::InvertedRange {
                    min_name: min_name.to_string(),
                    max_name: max_name.to_string(),
                    min,
                    max,
                });
            }
        }
    }
}

fn validate_value_ranges(store: &ConfigStore, errors: &mut Vec<ConfigValidationError>) {
    // Population size must be a positive integer
    if let Some(value) = store.get("PopulationSize") {
        match value.as_int() {
            Some(n) if n > 0 => {}
            Some(_) => errors.push(ConfigValidationError::InvalidValue {
                name: "PopulationSize".to_string(),
                reason: "must be positive".to_string(),
            }),
            None => errors.push(ConfigValidationError::WrongType {
                name: "PopulationSize".to_string(),
                expected: "an int",
                found: value.type_name(),
            }),
        }
    }

    // Weight bound must be positive
    if let Some(max_weight) = store.get_float("MaxWeight") {
        if max_weight <= 0.0 {
            errors.push(ConfigValidationError::InvalidValue {
                name: "MaxWeight".to_string(),
                reason: "must be positive".to_string(),
            });
        }
    }
}
