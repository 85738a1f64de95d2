// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Read-only views of a phenotype network for drawing.

A [`NetworkView`] holds the neurons and connections of one network. Screen
coordinates on each [`NeuronView`] are written only by the layout pass.

Networks saved by the evolution engine can be read with
[`NetworkView::parse_saved`]:

```text
NNstart
2 1
neuron <type> <a> <b> <time_const> <bias> <activation> <split_y> [id]
connection <source> <target> <weight> <recurrent> [hebb_rate] [hebb_pre_rate]
NNend
```
*/

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VisResult, VisualizationError};

/// One neuron as seen by the layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuronView {
    pub id: usize,
    /// Depth in [0, 1] used by layered placement (0 = inputs, 1 = outputs)
    pub split_y: f64,
    /// Fixed substrate position; only the first two entries are used
    #[serde(default)]
    pub substrate_coords: Vec<f64>,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

impl NeuronView {
    pub fn new(id: usize, split_y: f64) -> Self {
        Self {
            id,
            split_y,
            substrate_coords: Vec::new(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn with_substrate(mut self, coords: Vec<f64>) -> Self {
        self.substrate_coords = coords;
        self
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Screen position truncated to whole pixels
    pub fn pixel(&self) -> (i64, i64) {
        (self.x as i64, self.y as i64)
    }

    pub(crate) fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}

/// A directed, weighted connection between two neurons (by index)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionView {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
    #[serde(default)]
    pub recurrent: bool,
}

impl ConnectionView {
    pub fn new(source: usize, target: usize, weight: f64, recurrent: bool) -> Self {
        Self {
            source,
            target,
            weight,
            recurrent,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Neurons and connections of one phenotype
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkView {
    #[serde(default)]
    pub num_inputs: usize,
    #[serde(default)]
    pub num_outputs: usize,
    pub neurons: Vec<NeuronView>,
    #[serde(default)]
    pub connections: Vec<ConnectionView>,
}

impl NetworkView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a neuron and return its index
    pub fn add_neuron(&mut self, neuron: NeuronView) -> usize {
        self.neurons.push(neuron);
        self.neurons.len() - 1
    }

    pub fn add_connection(&mut self, connection: ConnectionView) {
        self.connections.push(connection);
    }

    /// Largest absolute connection weight, 1.0 for a network without connections
    pub fn max_abs_weight(&self) -> f64 {
        if self.connections.is_empty() {
            return 1.0;
        }
        self.connections
            .iter()
            .map(|c| c.weight.abs())
            .fold(0.0, f64::max)
    }

    /// Fail with `ConnectionOutOfRange` on the first connection whose endpoint
    /// is not a neuron index
    pub fn check_connections(&self) -> VisResult<()> {
        let neuron_count = self.neurons.len();
        for (connection, conn) in self.connections.iter().enumerate() {
            for neuron in [conn.source, conn.target] {
                if neuron >= neuron_count {
                    return Err(VisualizationError::ConnectionOutOfRange {
                        connection,
                        neuron,
                        neuron_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse the engine's saved-network text format
    ///
    /// Anything before the `NNstart` marker is skipped. Neuron ids default to
    /// their position when the optional id field is absent.
    pub fn parse_saved(text: &str) -> VisResult<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        if !lines.by_ref().any(|(_, line)| line == "NNstart") {
            return Err(parse_error(0, "missing NNstart marker"));
        }

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| parse_error(0, "missing input/output counts after NNstart"))?;
        let mut counts = header.split_whitespace();
        let num_inputs = parse_field(counts.next(), header_line, "input count")?;
        let num_outputs = parse_field(counts.next(), header_line, "output count")?;

        let mut network = NetworkView {
            num_inputs,
            num_outputs,
            ..NetworkView::default()
        };

        for (line_no, line) in lines {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("neuron") => {
                    let fields: Vec<&str> = fields.collect();
                    if fields.len() < 7 {
                        return Err(parse_error(
                            line_no,
                            format!("neuron record needs 7 fields, found {}", fields.len()),
                        ));
                    }
                    let split_y: f64 = parse_field(fields.get(6).copied(), line_no, "split_y")?;
                    let id = match fields.get(7) {
                        Some(raw) => parse_field(Some(*raw), line_no, "neuron id")?,
                        None => network.neurons.len(),
                    };
                    network.add_neuron(NeuronView::new(id, split_y));
                }
                Some("connection") => {
                    let source = parse_field(fields.next(), line_no, "source index")?;
                    let target = parse_field(fields.next(), line_no, "target index")?;
                    let weight = parse_field(fields.next(), line_no, "weight")?;
                    let recur: i64 = parse_field(fields.next(), line_no, "recurrent flag")?;
                    network.add_connection(ConnectionView::new(source, target, weight, recur != 0));
                }
                Some("NNend") => {
                    debug!(
                        target: "neatkit-visualization",
                        "Parsed saved network: {} neurons, {} connections",
                        network.neurons.len(),
                        network.connections.len()
                    );
                    return Ok(network);
                }
                Some(other) => {
                    return Err(parse_error(line_no, format!("unexpected record '{}'", other)));
                }
                None => {}
            }
        }

        Err(parse_error(0, "missing NNend marker"))
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> VisualizationError {
    VisualizationError::ParseError {
        line,
        message: message.into(),
    }
}

fn parse_field<T: std::str::FromStr>(raw: Option<&str>, line: usize, what: &str) -> VisResult<T> {
    let raw = raw.ok_or_else(|| parse_error(line, format!("missing {}", what)))?;
    raw.parse()
        .map_err(|_| parse_error(line, format!("invalid {} '{}'", what, raw)))
}
