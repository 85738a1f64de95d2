// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
# neatkit Visualization

Deterministic 2-D layout and rendering of evolved networks.

## Architecture

- `network` - neuron / connection views and the saved-network parser
- `layout` - layered (by depth) and substrate (by fixed position) placement
- `render` - weight-encoded arrows drawn into an `image::RgbImage`
- `primitives` - rescale / clamp / almost-equal helpers

```rust
use image::RgbImage;
use neatkit_visualization::{draw_phenotype, ConnectionView, DrawOptions, NetworkView, NeuronView, Rect};

let mut net = NetworkView::new();
let input = net.add_neuron(NeuronView::new(0, 0.0));
let output = net.add_neuron(NeuronView::new(1, 1.0));
net.add_connection(ConnectionView::new(input, output, 0.5, false));

let mut image = RgbImage::new(200, 200);
draw_phenotype(&mut image, Rect::from_size(200, 200), &mut net, &DrawOptions::default())
    .expect("draw failed");
```
*/

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod layout;
pub mod network;
pub mod primitives;
pub mod render;

pub use error::{VisResult, VisualizationError};
pub use layout::{layout_network, Axis, LayoutMode, LayoutReport, Rect, MAX_DEPTH};
pub use network::{ConnectionView, NetworkView, NeuronView};
pub use primitives::{almost_equal, clamp, rescale};
pub use render::{
    connection_color, connection_thickness, draw_connections, draw_phenotype,
    rendering_available, DrawOptions, RenderReport,
};
