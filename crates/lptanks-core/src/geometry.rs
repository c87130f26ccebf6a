//! Shared math primitives for the arena.
//!
//! Everything here operates on `f64` so that replays agree bit-for-bit with
//! the reference game balance. Angles are radians unless a function name says
//! otherwise.
//!
//! # Conventions
//!
//! - Headings live in `[0, TAU)`; see [`normalize_angle`].
//! - Turn deltas live in `(-PI, PI]`; see [`shortest_rotation`].
//! - The field is a torus: coordinates wrap into `[0, extent)` and the
//!   separation between two points is the shortest wrapped vector.

use std::f64::consts::{PI, TAU};

use glam::DVec2;

/// Normalizes an angle into `[0, TAU)`.
///
/// # Example
///
/// ```
/// use lptanks_core::geometry::normalize_angle;
/// use std::f64::consts::{PI, TAU};
///
/// assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
/// assert_eq!(normalize_angle(TAU), 0.0);
/// ```
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid rounds up to TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Returns the shortest signed rotation taking `from` to `to`, in `(-PI, PI]`.
#[must_use]
pub fn shortest_rotation(from: f64, to: f64) -> f64 {
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI {
        delta - TAU
    } else {
        delta
    }
}

/// Wraps a coordinate into `[0, extent)`.
///
/// Agents leaving one edge of the field reappear at the opposite edge; the
/// value is never clamped.
#[must_use]
pub fn wrap_coordinate(value: f64, extent: f64) -> f64 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Wraps both components of a position onto the torus.
#[must_use]
pub fn wrap_position(position: DVec2, dims: DVec2) -> DVec2 {
    DVec2::new(
        wrap_coordinate(position.x, dims.x),
        wrap_coordinate(position.y, dims.y),
    )
}

/// Rotates a vector counter-clockwise by `angle` radians.
#[must_use]
pub fn rotate_point(angle: f64, point: DVec2) -> DVec2 {
    let (sin, cos) = angle.sin_cos();
    DVec2::new(
        point.x * cos - point.y * sin,
        point.x * sin + point.y * cos,
    )
}

/// Shortest vector from `from` to `to` on a torus of size `dims`.
///
/// Each axis is folded independently: a raw difference larger than half the
/// extent is replaced by the equivalent difference going the other way.
#[must_use]
pub fn toroidal_vector(from: DVec2, to: DVec2, dims: DVec2) -> DVec2 {
    let fold = |delta: f64, extent: f64| {
        let half = extent / 2.0;
        if delta > half {
            delta - extent
        } else if delta < -half {
            delta + extent
        } else {
            delta
        }
    };
    DVec2::new(fold(to.x - from.x, dims.x), fold(to.y - from.y, dims.y))
}

/// Converts degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Converts radians to degrees.
#[must_use]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians * 180.0 / PI
}
