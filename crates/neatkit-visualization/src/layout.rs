// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Neuron placement.

Two strategies place every neuron of a [`NetworkView`] inside a drawing
rectangle:

- **Layered** buckets neurons by depth into [`MAX_DEPTH`] evenly spaced bins
  and spreads each bin horizontally.
- **Substrate** rescales each neuron's fixed 2-D substrate position into the
  rectangle.

All positions are reset to the origin before placement, so a layout never
depends on a previous one.
*/

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{VisResult, VisualizationError};
use crate::network::NetworkView;
use crate::primitives::{almost_equal, rescale};

/// Number of depth bins for layered placement
pub const MAX_DEPTH: usize = 64;

/// Depth distance within which a neuron belongs to a bin
pub const DEPTH_TOLERANCE: f64 = 1.0 / (MAX_DEPTH as f64 + 1.0);

/// Inset of substrate placement, as a fraction of the rectangle width
const SUBSTRATE_INSET_DIVISOR: f64 = 15.0;

/// Placement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Layered,
    Substrate,
}

/// Screen axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Drawing rectangle in pixels: origin plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering a `width` x `height` buffer
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }

    pub fn validate(&self) -> VisResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(VisualizationError::InvalidRect(format!(
                "non-finite component in {:?}",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(VisualizationError::InvalidRect(format!(
                "size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Summary of one layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub mode: LayoutMode,
    pub neuron_count: usize,
    /// Number of non-empty depth bins (layered only)
    pub occupied_depths: usize,
    /// Axes whose substrate coordinates all coincide (substrate only)
    pub degenerate_axes: Vec<Axis>,
}

/// Compute screen coordinates for every neuron
///
/// # Errors
///
/// - `InvalidRect` for a non-positive or non-finite rectangle
/// - `MissingSubstrateCoordinates` in substrate mode for a neuron with fewer
///   than two coordinates (no neuron is moved in that case)
pub fn layout_network(
    network: &mut NetworkView,
    rect: Rect,
    mode: LayoutMode,
    neuron_radius: f64,
) -> VisResult<LayoutReport> {
    rect.validate()?;

    if mode == LayoutMode::Substrate {
        if let Some((neuron, n)) = network
            .neurons
            .iter()
            .enumerate()
            .find(|(_, n)| n.substrate_coords.len() < 2)
        {
            return Err(VisualizationError::MissingSubstrateCoordinates {
                neuron,
                found: n.substrate_coords.len(),
            });
        }
    }

    for neuron in network.neurons.iter_mut() {
        neuron.set_position(0.0, 0.0);
    }

    let report = match mode {
        LayoutMode::Layered => layout_layered(network, rect, neuron_radius),
        LayoutMode::Substrate => layout_substrate(network, rect),
    };

    debug!(
        target: "neatkit-visualization",
        "Laid out {} neurons ({:?})",
        report.neuron_count,
        report.mode
    );

    Ok(report)
}

/// Index of the depth bin a neuron belongs to, if any
///
/// Picks the nearest bin; halfway values round up to the deeper bin.
fn depth_bin(split_y: f64) -> Option<usize> {
    let last = (MAX_DEPTH - 1) as f64;
    let bin = (split_y * last).round();
    if !(0.0..=last).contains(&bin) {
        return None;
    }
    almost_equal(split_y, bin / last, DEPTH_TOLERANCE).then_some(bin as usize)
}

fn layout_layered(network: &mut NetworkView, rect: Rect, neuron_radius: f64) -> LayoutReport {
    let bins: Vec<Option<usize>> = network.neurons.iter().map(|n| depth_bin(n.split_y)).collect();

    let mut bin_sizes = [0usize; MAX_DEPTH];
    for bin in bins.iter().flatten() {
        bin_sizes[*bin] += 1;
    }

    let unplaced = bins.iter().filter(|b| b.is_none()).count();
    if unplaced > 0 {
        warn!(
            target: "neatkit-visualization",
            "{} neuron(s) have a depth outside [0, 1] and stay at the origin",
            unplaced
        );
    }

    let mut next_slot = [0usize; MAX_DEPTH];
    let size_y = rect.height - neuron_radius;
    for (neuron, bin) in network.neurons.iter_mut().zip(bins.iter()) {
        let Some(bin) = *bin else {
            continue;
        };

        let k = bin_sizes[bin] as f64;
        let j = next_slot[bin] as f64;
        next_slot[bin] += 1;

        let x = rect.x + rect.width / (k + 1.0) + j * rect.width / (k + 2.0);
        let mut y = rect.y + neuron.split_y * size_y;
        if neuron.split_y == 0.0 {
            y += neuron_radius;
        }
        neuron.set_position(x, y);
    }

    LayoutReport {
        mode: LayoutMode::Layered,
        neuron_count: network.neurons.len(),
        occupied_depths: bin_sizes.iter().filter(|&&size| size > 0).count(),
        degenerate_axes: Vec::new(),
    }
}

// Inset comes from the width on both axes and the rectangle origin is not
// applied, so substrate drawings always start at the buffer's top-left.
fn layout_substrate(network: &mut NetworkView, rect: Rect) -> LayoutReport {
    let mut report = LayoutReport {
        mode: LayoutMode::Substrate,
        neuron_count: network.neurons.len(),
        occupied_depths: 0,
        degenerate_axes: Vec::new(),
    };

    if network.neurons.is_empty() {
        return report;
    }

    let bounds = |axis: usize| {
        network.neurons.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| {
            let v = n.substrate_coords[axis];
            (lo.min(v), hi.max(v))
        })
    };
    let (min_x, max_x) = bounds(0);
    let (min_y, max_y) = bounds(1);

    if min_x == max_x {
        report.degenerate_axes.push(Axis::X);
    }
    if min_y == max_y {
        report.degenerate_axes.push(Axis::Y);
    }

    let inset = rect.width / SUBSTRATE_INSET_DIVISOR;
    for neuron in network.neurons.iter_mut() {
        let x = rescale(neuron.substrate_coords[0], min_x, max_x, inset, rect.width - inset);
        let y = rescale(neuron.substrate_coords[1], min_y, max_y, inset, rect.height - inset);
        neuron.set_position(x, y);
    }

    report
}
