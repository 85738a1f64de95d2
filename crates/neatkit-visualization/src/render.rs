// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

/*!
Connection rendering.

Each connection is drawn as an arrow from source to target. Colour encodes
sign and recurrence, brightness and width encode magnitude relative to the
strongest connection:

| connection   | weight < 0 | weight >= 0 |
|--------------|------------|-------------|
| feed-forward | blue       | red         |
| recurrent    | green      | grey        |

Self-loops are recognised but not drawn. Neurons themselves are not drawn.

The rasteriser is compiled in with the `raster` feature (on by default).
Without it [`draw_phenotype`] and [`draw_connections`] fail with
[`VisualizationError::RenderingUnavailable`].
*/

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{VisResult, VisualizationError};
use crate::layout::{layout_network, LayoutMode, LayoutReport, Rect};
use crate::network::NetworkView;
use crate::primitives::{clamp, rescale};

/// Length of each arrow-head stroke in pixels
pub const ARROW_HEAD_LENGTH: f64 = 9.0;

/// Dimmest channel value, as a fraction of full brightness
const MIN_INTENSITY: f64 = 0.75;

/// Whether this build can draw into pixel buffers
pub fn rendering_available() -> bool {
    cfg!(feature = "raster")
}

/// Drawing settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    pub neuron_radius: f64,
    pub max_line_thickness: f64,
    pub mode: LayoutMode,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            neuron_radius: 10.0,
            max_line_thickness: 3.0,
            mode: LayoutMode::Layered,
        }
    }
}

impl DrawOptions {
    pub fn substrate() -> Self {
        Self {
            mode: LayoutMode::Substrate,
            ..Self::default()
        }
    }
}

/// Outcome of one drawing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    pub layout: Option<LayoutReport>,
    pub connections_drawn: usize,
    pub self_loops_skipped: usize,
}

/// Colour of a connection given the strongest absolute weight in the network
pub fn connection_color(weight: f64, recurrent: bool, max_abs_weight: f64) -> Rgb<u8> {
    let intensity = clamp(
        rescale(weight.abs(), 0.0, max_abs_weight, 0.0, 1.0),
        MIN_INTENSITY,
        1.0,
    );
    let v = (255.0 * intensity) as u8;

    match (recurrent, weight < 0.0) {
        (true, true) => Rgb([0, v, 0]),
        (true, false) => Rgb([v, v, v]),
        (false, true) => Rgb([0, 0, v]),
        (false, false) => Rgb([v, 0, 0]),
    }
}

/// Stroke width in whole pixels; negative weights get the minimum width
pub fn connection_thickness(weight: f64, max_abs_weight: f64, max_line_thickness: f64) -> u32 {
    let thickness = clamp(
        rescale(weight, 0.0, max_abs_weight, 1.0, max_line_thickness),
        1.0,
        max_line_thickness,
    );
    (thickness as u32).max(1)
}

/// Lay out the network inside `rect`, then draw its connections
///
/// # Errors
///
/// - `RenderingUnavailable` without the `raster` feature
/// - `ConnectionOutOfRange` before anything is laid out or drawn
/// - any layout error (`InvalidRect`, `MissingSubstrateCoordinates`)
pub fn draw_phenotype(
    image: &mut RgbImage,
    rect: Rect,
    network: &mut NetworkView,
    options: &DrawOptions,
) -> VisResult<RenderReport> {
    if !rendering_available() {
        return Err(VisualizationError::RenderingUnavailable);
    }
    network.check_connections()?;

    let layout = layout_network(network, rect, options.mode, options.neuron_radius)?;
    let mut report = draw_connections(image, network, options)?;
    report.layout = Some(layout);
    Ok(report)
}

/// Draw every connection using the neurons' current screen positions
pub fn draw_connections(
    image: &mut RgbImage,
    network: &NetworkView,
    options: &DrawOptions,
) -> VisResult<RenderReport> {
    if !rendering_available() {
        return Err(VisualizationError::RenderingUnavailable);
    }
    network.check_connections()?;

    let max_abs_weight = network.max_abs_weight();
    let mut report = RenderReport {
        layout: None,
        connections_drawn: 0,
        self_loops_skipped: 0,
    };

    for conn in &network.connections {
        if conn.is_self_loop() {
            report.self_loops_skipped += 1;
            continue;
        }

        let color = connection_color(conn.weight, conn.recurrent, max_abs_weight);
        let thickness = connection_thickness(conn.weight, max_abs_weight, options.max_line_thickness);
        let from = network.neurons[conn.source].pixel();
        let to = network.neurons[conn.target].pixel();

        #[cfg(feature = "raster")]
        raster::draw_arrow(image, from, to, color, thickness);
        #[cfg(not(feature = "raster"))]
        let _ = (&image, from, to, color, thickness);

        report.connections_drawn += 1;
    }

    debug!(
        target: "neatkit-visualization",
        "Drew {} connections ({} self-loops skipped)",
        report.connections_drawn,
        report.self_loops_skipped
    );

    Ok(report)
}

#[cfg(feature = "raster")]
pub(crate) mod raster {
    use super::ARROW_HEAD_LENGTH;
    use image::{Rgb, RgbImage};
    use std::f64::consts::FRAC_PI_4;

    pub type Point = (i64, i64);

    /// Line from `p` to `q` plus two head strokes meeting at `q`
    pub fn draw_arrow(image: &mut RgbImage, p: Point, q: Point, color: Rgb<u8>, thickness: u32) {
        draw_line(image, p, q, color, thickness);

        let angle = (p.1 as f64 - q.1 as f64).atan2(p.0 as f64 - q.0 as f64);
        for head_angle in [angle + FRAC_PI_4, angle - FRAC_PI_4] {
            let head = (
                (q.0 as f64 + ARROW_HEAD_LENGTH * head_angle.cos()) as i64,
                (q.1 as f64 + ARROW_HEAD_LENGTH * head_angle.sin()) as i64,
            );
            draw_line(image, head, q, color, thickness);
        }
    }

    /// Bresenham line stamped with a square brush `thickness` pixels wide
    ///
    /// The segment is first clipped to the buffer grown by the brush size, so
    /// the walk only visits pixels that can land in the image.
    pub fn draw_line(image: &mut RgbImage, p: Point, q: Point, color: Rgb<u8>, thickness: u32) {
        let pad = f64::from(thickness.max(1));
        let min = (-pad, -pad);
        let max = (
            f64::from(image.width()) - 1.0 + pad,
            f64::from(image.height()) - 1.0 + pad,
        );
        let Some((a, b)) = clip_segment(
            (p.0 as f64, p.1 as f64),
            (q.0 as f64, q.1 as f64),
            min,
            max,
        ) else {
            return;
        };
        let p = (a.0.round() as i64, a.1.round() as i64);
        let q = (b.0.round() as i64, b.1.round() as i64);

        let (mut x, mut y) = p;
        let dx = (q.0 - p.0).abs();
        let dy = -(q.1 - p.1).abs();
        let sx = if p.0 < q.0 { 1 } else { -1 };
        let sy = if p.1 < q.1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            stamp(image, x, y, color, thickness);
            if x == q.0 && y == q.1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Liang-Barsky clip of segment `p -> q` to the box `[min, max]`
    ///
    /// Returns `None` when the segment misses the box entirely.
    fn clip_segment(
        p: (f64, f64),
        q: (f64, f64),
        min: (f64, f64),
        max: (f64, f64),
    ) -> Option<((f64, f64), (f64, f64))> {
        let dx = q.0 - p.0;
        let dy = q.1 - p.1;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for (edge, dist) in [
            (-dx, p.0 - min.0),
            (dx, max.0 - p.0),
            (-dy, p.1 - min.1),
            (dy, max.1 - p.1),
        ] {
            if edge == 0.0 {
                // Parallel to this edge
                if dist < 0.0 {
                    return None;
                }
                continue;
            }
            let t = dist / edge;
            if edge < 0.0 {
                if t > t1 {
                    return None;
                }
                t0 = t0.max(t);
            } else if t < t0 {
                return None;
            } else {
                t1 = t1.min(t);
            }
        }

        // Far endpoints lose precision; keep the result inside the box
        let inside = |x: f64, y: f64| (x.clamp(min.0, max.0), y.clamp(min.1, max.1));
        Some((
            inside(p.0 + t0 * dx, p.1 + t0 * dy),
            inside(p.0 + t1 * dx, p.1 + t1 * dy),
        ))
    }

    fn stamp(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, thickness: u32) {
        let t = i64::from(thickness.max(1));
        let lo = -((t - 1) / 2);
        let hi = t / 2;
        for oy in lo..=hi {
            for ox in lo..=hi {
                put_clipped(image, x + ox, y + oy, color);
            }
        }
    }

    fn put_clipped(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
        if x < 0 || y < 0 || x >= i64::from(image.width()) || y >= i64::from(image.height()) {
            return;
        }
        image.put_pixel(x as u32, y as u32, color);
    }

}
