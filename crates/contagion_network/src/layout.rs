//! # Circular Layout
//!
//! Display-only positions. Nothing in the simulation reads them.

use std::f32::consts::TAU;

/// Radius of the default circular layout.
pub const DEFAULT_LAYOUT_RADIUS: f32 = 0.8;

/// A 2-D point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Distance from the origin.
    #[inline]
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }
}

/// Places `node_count` nodes evenly on a circle, node `i` at angle `2π·i/N`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn circle_positions(node_count: usize, radius: f32) -> Vec<Point> {
    (0..node_count)
        .map(|i| {
            let angle = TAU * i as f32 / node_count as f32;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
