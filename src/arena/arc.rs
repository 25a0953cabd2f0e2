//! Angular spans for ring arcs and protected corridors
//!
//! A span is the angular extent [start, end] swept counter-clockwise from
//! `start`. Both ends are wrapped to [0, 2π), so a span may cross 0.

use glam::Vec2;

use crate::{polar_to_cartesian, wrap_angle};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpan {
    /// Start angle (radians, wrapped to [0, 2π))
    pub start: f32,
    /// End angle (radians, wrapped to [0, 2π))
    pub end: f32,
}

impl ArcSpan {
    pub fn new(start: f32, end: f32) -> Self {
        Self {
            start: wrap_angle(start),
            end: wrap_angle(end),
        }
    }

    /// The `index`-th of `segments` equal arcs around a ring
    pub fn ring_arc(index: u32, segments: u32) -> Self {
        let step = std::f32::consts::TAU / segments.max(1) as f32;
        Self::new(index as f32 * step, (index + 1) as f32 * step)
    }

    /// Angular span of the arc (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.end - self.start;
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }

    /// Angle halfway along the span
    pub fn mid_angle(&self) -> f32 {
        wrap_angle(self.start + self.angular_span() / 2.0)
    }

    /// Widen both ends by `margin` radians
    pub fn expanded(&self, margin: f32) -> Self {
        Self::new(self.start - margin, self.end + margin)
    }

    /// Check if an angle is within the span
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = wrap_angle(theta);
        if self.start <= self.end {
            theta >= self.start && theta <= self.end
        } else {
            // Wraparound case (e.g., start=350°, end=10°)
            theta >= self.start || theta <= self.end
        }
    }

    /// Chord endpoints of the span on a circle around `center`
    pub fn chord(&self, center: Vec2, radius: f32) -> (Vec2, Vec2) {
        (
            center + polar_to_cartesian(radius, self.start),
            center + polar_to_cartesian(radius, self.start + self.angular_span()),
        )
    }
}
