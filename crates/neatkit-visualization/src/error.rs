// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Error types for layout and rendering.
*/

/// Result type for visualization operations
pub type VisResult<T> = Result<T, VisualizationError>;

/// Errors raised while laying out or drawing a network
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VisualizationError {
    #[error("Rendering unavailable: built without the `raster` feature")]
    RenderingUnavailable,

    #[error("Neuron {neuron} has no substrate coordinates (need at least 2, found {found})")]
    MissingSubstrateCoordinates { neuron: usize, found: usize },

    #[error("Connection {connection} references neuron {neuron} but the network has {neuron_count} neurons")]
    ConnectionOutOfRange {
        connection: usize,
        neuron: usize,
        neuron_count: usize,
    },

    #[error("Invalid drawing rectangle: {0}")]
    InvalidRect(String),

    #[error("Failed to parse saved network at line {line}: {message}")]
    ParseError { line: usize, message: String },
}
