// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
# neatkit Evaluation

Runs a caller-supplied fitness function over an ordered batch of candidates
and returns one fitness value per candidate, in input order.

- Serial mode evaluates on the calling thread
- Parallel mode spreads the batch over a fixed rayon pool built for the call
- Progress is reported through a [`ProgressObserver`]
- Population helpers flatten species and write fitness back

```rust
use neatkit_evaluation::{evaluate, infallible, EvaluationConfig, NoProgress};

let batch = vec![1.0_f64, 2.0, 3.0];
let fitness = evaluate(&batch, infallible(|x: &f64| x * 2.0), &EvaluationConfig::parallel(2), &NoProgress)
    .expect("evaluation failed");
assert_eq!(fitness, vec![2.0, 4.0, 6.0]);
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod orchestrator;
pub mod population;
pub mod progress;
pub mod types;

pub use orchestrator::{evaluate, evaluate_parallel, evaluate_serial, infallible};
pub use population::{
    assign_fitness, evaluate_population, flatten_population, population_size, FitnessTarget,
    Species,
};
pub use progress::{LogProgress, NoProgress, ProgressFn, ProgressObserver};
pub use types::{EvalResult, EvaluationConfig, EvaluationError, EvaluationMode};
