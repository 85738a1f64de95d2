// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Batch fitness evaluation.

Both entry points return one fitness value per candidate, in input order.
The parallel form builds a scoped rayon pool of exactly `workers` threads for
the call; every worker has exited by the time the call returns. Results are
gathered with an indexed `collect`, so each input position owns exactly one
output slot regardless of which worker finishes first.

A fitness function that fails aborts the whole batch. The error names the
lowest failing position and no partial results are returned.
*/

use rayon::prelude::*;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::progress::ProgressObserver;
use crate::types::{EvalResult, EvaluationConfig, EvaluationError, EvaluationMode};

/// Wrap an infallible fitness function for the orchestrator
pub fn infallible<C, F>(fitness: F) -> impl Fn(&C) -> Result<f64, Infallible> + Sync
where
    F: Fn(&C) -> f64 + Sync,
{
    move |candidate| Ok(fitness(candidate))
}

fn candidate_error<E>(index: usize, error: E) -> EvaluationError
where
    E: std::error::Error + Send + Sync + 'static,
{
    EvaluationError::CandidateEvaluation {
        index,
        source: Box::new(error),
    }
}

/// Evaluate every candidate on the calling thread, in order
///
/// # Errors
///
/// Returns `EvaluationError::CandidateEvaluation` for the first candidate whose
/// fitness function fails; later candidates are not evaluated.
pub fn evaluate_serial<C, F, E>(
    batch: &[C],
    fitness: F,
    observer: &dyn ProgressObserver,
) -> EvalResult<Vec<f64>>
where
    F: Fn(&C) -> Result<f64, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    let total = batch.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    observer.on_start(total);
    let started = Instant::now();

    let mut fitness_values = Vec::with_capacity(total);
    for (index, candidate) in batch.iter().enumerate() {
        let value = fitness(candidate).map_err(|e| {
            warn!(target: "neatkit-evaluation", "Candidate {} of {} failed: {}", index, total, e);
            candidate_error(index, e)
        })?;
        fitness_values.push(value);
        observer.on_progress(index + 1, total);
    }

    let elapsed = started.elapsed();
    debug!(target: "neatkit-evaluation", "Serial evaluation of {} candidates took {:?}", total, elapsed);
    observer.on_finish(total, elapsed);

    Ok(fitness_values)
}

/// Evaluate candidates on a fixed pool of `workers` threads
///
/// The pool is created for this call and torn down before it returns.
///
/// # Errors
///
/// - `InvalidWorkerCount` if `workers == 0` (checked before anything runs)
/// - `ThreadPool` if the worker threads cannot be spawned
/// - `CandidateEvaluation` with the lowest failing position if any fitness
///   function fails; all workers are joined first and no results are returned
pub fn evaluate_parallel<C, F, E>(
    batch: &[C],
    fitness: F,
    workers: usize,
    observer: &dyn ProgressObserver,
) -> EvalResult<Vec<f64>>
where
    C: Sync,
    F: Fn(&C) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    if workers == 0 {
        return Err(EvaluationError::InvalidWorkerCount(workers));
    }

    let total = batch.len();
    if total == 0 {
        return Ok(Vec::new());
    }

    observer.on_start(total);
    let started = Instant::now();
    let completed = AtomicUsize::new(0);

    let outcomes: Vec<Result<f64, E>> = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("neatkit-eval-{}", i))
        .build_scoped(
            |thread| thread.run(),
            |pool| {
                pool.install(|| {
                    batch
                        .par_iter()
                        .map(|candidate| {
                            let outcome = fitness(candidate);
                            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                            observer.on_progress(done, total);
                            outcome
                        })
                        .collect()
                })
            },
        )?;

    let elapsed = started.elapsed();

    let mut fitness_values = Vec::with_capacity(total);
    let mut first_failure = None;
    let mut failures = 0usize;
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => fitness_values.push(value),
            Err(e) => {
                failures += 1;
                if first_failure.is_none() {
                    first_failure = Some((index, e));
                }
            }
        }
    }

    if let Some((index, e)) = first_failure {
        warn!(
            target: "neatkit-evaluation",
            "{} of {} candidates failed; first failure at candidate {}: {}",
            failures, total, index, e
        );
        return Err(candidate_error(index, e));
    }

    info!(
        target: "neatkit-evaluation",
        "Evaluated {} candidates on {} workers in {:.3}s",
        total,
        workers,
        elapsed.as_secs_f64()
    );
    observer.on_finish(total, elapsed);

    Ok(fitness_values)
}

/// Evaluate a batch in the configured mode
pub fn evaluate<C, F, E>(
    batch: &[C],
    fitness: F,
    config: &EvaluationConfig,
    observer: &dyn ProgressObserver,
) -> EvalResult<Vec<f64>>
where
    C: Sync,
    F: Fn(&C) -> Result<f64, E> + Sync,
    E: std::error::Error + Send + Sync + 'static,
{
    match config.mode {
        EvaluationMode::Serial => evaluate_serial(batch, fitness, observer),
        EvaluationMode::Parallel { workers } => evaluate_parallel(batch, fitness, workers, observer),
    }
}
