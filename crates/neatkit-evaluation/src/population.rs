// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Population helpers: flatten species into one batch, write fitness back.

Flattening visits species in order and members in order. Write-back walks the
same order, so `fitness[i]` always lands on the `i`-th flattened candidate.
*/

use tracing::debug;

use crate::orchestrator::evaluate;
use crate::progress::ProgressObserver;
use crate::types::{EvalResult, EvaluationConfig, EvaluationError};

/// A candidate that can receive a fitness score
pub trait FitnessTarget {
    fn set_fitness(&mut self, fitness: f64);
}

/// A group of candidates as kept by the evolution engine
pub trait Species {
    type Candidate;

    fn members(&self) -> &[Self::Candidate];

    fn members_mut(&mut self) -> &mut [Self::Candidate];
}

impl<T> Species for Vec<T> {
    type Candidate = T;

    fn members(&self) -> &[T] {
        self
    }

    fn members_mut(&mut self) -> &mut [T] {
        self
    }
}

/// Total number of candidates across all species
pub fn population_size<S: Species>(species: &[S]) -> usize {
    species.iter().map(|s| s.members().len()).sum()
}

/// Every candidate of every species, in evaluation order
pub fn flatten_population<S: Species>(species: &[S]) -> Vec<&S::Candidate> {
    let mut flattened = Vec::with_capacity(population_size(species));
    for group in species {
        flattened.extend(group.members().iter());
    }
    flattened
}

/// Write fitness values back in flattening order
///
/// # Errors
///
/// Returns `LengthMismatch` (and writes nothing) if the number of values
/// differs from the number of candidates.
pub fn assign_fitness<S>(species: &mut [S], fitness: &[f64]) -> EvalResult<()>
where
    S: Species,
    S::Candidate: FitnessTarget,
{
    let candidates = population_size(species);
    if candidates != fitness.len() {
        return Err(EvaluationError::LengthMismatch {
            candidates,
            fitness_values: fitness.len(),
        });
    }

    let mut values = fitness.iter();
    for group in species.iter_mut() {
        for (candidate, value) in group.members_mut().iter_mut().zip(values.by_ref()) {
            candidate.set_fitness(*value);
        }
    }

    Ok(())
}

/// Flatten, evaluate and write back fitness for a whole population
///
/// On error no candidate's fitness is touched.
pub fn evaluate_population<S, F, E>(
    species: &mut [S],
    fitness: F,
    config: &EvaluationConfig,
    observer: &dyn ProgressObserver,
) -> EvalResult<Vec<f64>>
where
    S: Species,
    S::Candidate: FitnessTarget + Sync,
    F: Fn(&S::Candidate) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    let values = {
        let batch = flatten_population(species);
        debug!(
            target: "neatkit-evaluation",
            "Flattened {} species into {} candidates",
            species.len(),
            batch.len()
        );
        evaluate(&batch, |candidate: &&S::Candidate| fitness(*candidate), config, observer)?
    };

    assign_fitness(species, &values)?;
    Ok(values)
}
