// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Parameter value types and the engine's required parameter list.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{ConfigError, ConfigResult};

/// Every parameter the evolutionary engine reads from an experiment file.
///
/// A `ConfigStore` built with [`crate::ConfigStore::new`] tracks exactly these
/// names, in this order.
pub const REQUIRED_PARAMETERS: &[&str] = &[
    // ES-HyperNEAT substrate search
    "InitialDepth",
    "MaximumDepth",
    "DivisionThreshold",
    "VarianceThreshold",
    "BandingThreshold",
    "ESIterations",
    // Population
    "PopulationSize",
    // Speciation
    "DynamicCompatibility",
    "CompatTreshold",
    "YoungAgeTreshold",
    "SpeciesMaxStagnation",
    "OldAgeTreshold",
    "MinSpecies",
    "MaxSpecies",
    "RouletteWheelSelection",
    // Structural and weight mutation
    "MutateRemLinkProb",
    "RecurrentProb",
    "OverallMutationRate",
    "MutateAddLinkProb",
    "MutateAddNeuronProb",
    "MutateWeightsProb",
    "MaxWeight",
    "WeightMutationMaxPower",
    "WeightReplacementMaxPower",
    // Activation slope mutation
    "MutateActivationAProb",
    "ActivationAMutationMaxPower",
    "MinActivationA",
    "MaxActivationA",
    "MutateNeuronActivationTypeProb",
    // Activation function distribution
    "ActivationFunction_SignedSigmoid_Prob",
    "ActivationFunction_UnsignedSigmoid_Prob",
    "ActivationFunction_Tanh_Prob",
    "ActivationFunction_TanhCubic_Prob",
    "ActivationFunction_SignedStep_Prob",
    "ActivationFunction_UnsignedStep_Prob",
    "ActivationFunction_SignedGauss_Prob",
    "ActivationFunction_UnsignedGauss_Prob",
    "ActivationFunction_Abs_Prob",
    "ActivationFunction_SignedSine_Prob",
    "ActivationFunction_UnsignedSine_Prob",
    "ActivationFunction_Linear_Prob",
    "OldAgePenalty",
];

/// A typed scalar parameter value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl ParameterValue {
    /// Infer a value from raw text.
    ///
    /// Priority order:
    /// 1. `true` / `false` (case-insensitive) -> `Bool`
    /// 2. text containing `.` -> `Float`
    /// 3. anything else -> `Int`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the text is neither a boolean
    /// nor a parsable number. `name` is only used for the error message.
    pub fn infer(name: &str, raw: &str) -> ConfigResult<Self> {
        let text = raw.trim();

        if text.eq_ignore_ascii_case("true") {
            return Ok(ParameterValue::Bool(true));
        }
        if text.eq_ignore_ascii_case("false") {
            return Ok(ParameterValue::Bool(false));
        }

        if text.contains('.') {
            text.parse::<f64>()
                .map(ParameterValue::Float)
                .map_err(|e| ConfigError::InvalidValue {
                    name: name.to_string(),
                    raw: text.to_string(),
                    reason: e.to_string(),
                })
        } else {
            text.parse::<i64>()
                .map(ParameterValue::Int)
                .map_err(|e| ConfigError::InvalidValue {
                    name: name.to_string(),
                    raw: text.to_string(),
                    reason: e.to_string(),
                })
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParameterValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`; booleans are not numbers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParameterValue::Float(f) => Some(*f),
            ParameterValue::Int(i) => Some(*i as f64),
            ParameterValue::Bool(_) => None,
        }
    }

    /// Short type name used in error messages and tool output
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "bool",
            ParameterValue::Int(_) => "int",
            ParameterValue::Float(_) => "float",
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterValue::Bool(b) => write!(f, "{}", b),
            ParameterValue::Int(i) => write!(f, "{}", i),
            ParameterValue::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}
