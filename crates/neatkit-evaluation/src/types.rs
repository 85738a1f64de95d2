// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for evaluation operations.
*/

use serde::{Deserialize, Serialize};

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while evaluating a candidate batch
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("Invalid worker count: {0} (at least one worker is required)")]
    InvalidWorkerCount(usize),

    #[error("Failed to build evaluation worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Fitness evaluation failed for candidate {index}: {source}")]
    CandidateEvaluation {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Length mismatch: {candidates} candidates but {fitness_values} fitness values")]
    LengthMismatch {
        candidates: usize,
        fitness_values: usize,
    },
}

impl EvaluationError {
    /// Position of the failing candidate, for `CandidateEvaluation` errors
    pub fn candidate_index(&self) -> Option<usize> {
        match self {
            EvaluationError::CandidateEvaluation { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Where fitness functions run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// On the calling thread, in order
    #[default]
    Serial,
    /// On a fixed pool of `workers` threads created for the call
    Parallel { workers: usize },
}

impl EvaluationMode {
    /// Parallel mode sized to the machine's available parallelism
    pub fn parallel_auto() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        EvaluationMode::Parallel { workers }
    }
}

/// Evaluation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub mode: EvaluationMode,
}

impl EvaluationConfig {
    pub fn serial() -> Self {
        Self {
            mode: EvaluationMode::Serial,
        }
    }

    pub fn parallel(workers: usize) -> Self {
        Self {
            mode: EvaluationMode::Parallel { workers },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_index() {
        let err = EvaluationError::CandidateEvaluation {
            index: 4,
            source: "boom".into(),
        };
        assert_eq!(err.candidate_index(), Some(4));
        assert!(err.to_string().contains("candidate 4"));
        assert_eq!(EvaluationError::InvalidWorkerCount(0).candidate_index(), None);
    }

    #[test]
    fn test_parallel_auto_has_workers() {
        match EvaluationMode::parallel_auto() {
            EvaluationMode::Parallel { workers } => assert!(workers >= 1),
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"mode": {"parallel": {"workers": 3}}}"#).unwrap();
        assert_eq!(config.mode, EvaluationMode::Parallel { workers: 3 });

        let config: EvaluationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.mode, EvaluationMode::Serial);
    }

    #[test]
    fn test_default_mode_is_serial() {
        assert_eq!(EvaluationMode::default(), EvaluationMode::Serial);
        assert_eq!(EvaluationConfig::default().mode, EvaluationMode::Serial);
    }
}
