//! Arena spec data model
//!
//! An `ArenaSpec` is a plain value: produced once per match, then handed
//! to renderers and round logic as read-only configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What a wall segment belongs to (descriptive only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallKind {
    Perimeter,
    Ring,
    Spoke,
}

/// A straight, thick wall between two world-space points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallSegment {
    pub a: Vec2,
    pub b: Vec2,
    pub thickness: f32,
    pub kind: WallKind,
}

impl WallSegment {
    pub fn new(a: Vec2, b: Vec2, thickness: f32, kind: WallKind) -> Self {
        Self {
            a,
            b,
            thickness,
            kind,
        }
    }
}

/// Axis-aligned spawn pad for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnZone {
    pub team: u8,
    /// Minimum corner
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Facing angle (radians), pointing into the arena
    pub facing: f32,
}

impl SpawnZone {
    /// Pad of the given size centered on `center`
    pub fn centered(team: u8, center: Vec2, width: f32, height: f32, facing: f32) -> Self {
        Self {
            team,
            position: center - Vec2::new(width, height) / 2.0,
            width,
            height,
            facing,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) / 2.0
    }

    /// The pad grown by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            position: self.position - Vec2::splat(margin),
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
            ..self.clone()
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    pub fn overlaps(&self, other: &SpawnZone) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// Circular goal area at the arena center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveZone {
    pub center: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverKind {
    #[default]
    Crate,
    Pillar,
    Rubble,
}

/// Scattered cover (placement data only, never blocks connectivity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cover {
    pub center: Vec2,
    pub radius: f32,
    pub kind: CoverKind,
}

/// Complete description of one generated arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSpec {
    /// Schema tag (`consts::SPEC_VERSION`)
    pub version: String,
    pub seed: String,
    /// Side length of the square arena
    pub size: f32,
    pub center: Vec2,
    pub ring_count: u32,
    /// Ring radii, outermost first, strictly decreasing
    pub ring_radii: Vec<f32>,
    /// Arcs per ring
    pub segments: u32,
    /// Radial corridor walls actually placed
    pub spokes: u32,
    /// Open arc indices per ring, parallel to `ring_radii`
    pub ring_gates: Vec<Vec<u32>>,
    pub spawn_zones: Vec<SpawnZone>,
    pub objective: ObjectiveZone,
    pub walls: Vec<WallSegment>,
    pub cover: Vec<Cover>,
}

impl ArenaSpec {
    /// Outermost ring radius (falls back to half the arena size)
    pub fn outer_radius(&self) -> f32 {
        self.ring_radii.first().copied().unwrap_or(self.size / 2.0)
    }

    /// Innermost ring radius
    pub fn inner_radius(&self) -> f32 {
        self.ring_radii.last().copied().unwrap_or(self.size / 2.0)
    }

    pub fn walls_of_kind(&self, kind: WallKind) -> impl Iterator<Item = &WallSegment> {
        self.walls.iter().filter(move |w| w.kind == kind)
    }
}
