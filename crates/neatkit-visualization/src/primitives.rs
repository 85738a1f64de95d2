// Copyright 2025 The neatkit Authors
// SPDX-License-Identifier: Apache-2.0

//! Numeric helpers shared by layout and rendering

use tracing::warn;

/// Linearly map `value` from `[src_min, src_max]` onto `[dst_min, dst_max]`
///
/// A collapsed source range (`src_min == src_max`) maps every value to
/// `dst_max` and logs a warning. Values outside the source range extrapolate.
pub fn rescale(value: f64, src_min: f64, src_max: f64, dst_min: f64, dst_max: f64) -> f64 {
    let src_range = src_max - src_min;
    if src_range == 0.0 {
        warn!(
            target: "neatkit-visualization",
            "Degenerate scale: source range [{}, {}] is empty, mapping {} to {}",
            src_min, src_max, value, dst_max
        );
        return dst_max;
    }

    let relative = (value - src_min) / src_range;
    dst_min + (dst_max - dst_min) * relative
}

/// Bound `value` to `[min, max]`
///
/// Unlike `f64::clamp` this never panics: with `min > max` the lower bound
/// is checked first.
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// True when `|a - b| <= margin`
pub fn almost_equal(a: f64, b: f64, margin: f64) -> bool {
    (a - b).abs() <= margin
}
