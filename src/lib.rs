//! Arena Gen - seeded ring arenas that are guaranteed to be playable
//!
//! Core modules:
//! - `rng`: Deterministic seeded RNG (mulberry32-style)
//! - `arena`: Spec generation, structural validation, occupancy grids,
//!   connectivity search and the retry/fallback orchestrator
//! - `persistence`: Canonical serialization and content digests
//! - `settings`: Generation options and runtime mode

pub mod arena;
pub mod error;
pub mod persistence;
pub mod rng;
pub mod settings;

pub use arena::{
    ArenaSpec, GeneratedArena, OccupancyGrid, generate_arena, generate_valid_arena,
    validate_connectivity, validate_spec,
};
pub use error::ArenaError;
pub use rng::ArenaRng;
pub use settings::{ArenaOptions, GenerationConfig, RuntimeMode};

use glam::Vec2;

/// Generation configuration constants
pub mod consts {
    /// Spec schema tag, bumped whenever the serialized layout changes
    pub const SPEC_VERSION: &str = "arena-spec/1";

    /// Arena side length in world units
    pub const DEFAULT_ARENA_SIZE: f32 = 250.0;
    /// Smaller arenas cannot fit a spawn pad between the outer rings
    pub const MIN_ARENA_SIZE: f32 = 150.0;
    /// Teams per match, one spawn pad each
    pub const TEAM_COUNT: u8 = 4;

    /// Ring count bounds (inclusive)
    pub const MIN_RINGS: u32 = 3;
    pub const MAX_RINGS: u32 = 5;

    /// Outer ring radius as a fraction of half the arena size, ± jitter
    pub const OUTER_RADIUS_FRACTION: f32 = 0.84;
    pub const OUTER_RADIUS_JITTER: f32 = 0.03;
    /// Innermost ring never shrinks below this fraction of the outer radius
    pub const INNER_RADIUS_FRACTION: f32 = 0.21;
    /// Minimum radial gap between consecutive rings
    pub const MIN_RING_GAP: f32 = 6.0;
    /// Each corridor keeps 85-100% of its share of the radial budget
    pub const RING_GAP_MIN_FILL: f32 = 0.85;

    /// Arcs per ring, always a multiple of 4 so quadrants hold whole arcs
    pub const SEGMENT_CHOICES: [u32; 3] = [16, 20, 24];

    /// Wall thicknesses (world units)
    pub const PERIMETER_THICKNESS: f32 = 2.0;
    pub const RING_THICKNESS: f32 = 2.0;
    pub const SPOKE_THICKNESS: f32 = 2.0;

    /// Spokes requested per arena (inclusive)
    pub const MIN_SPOKES: i32 = 3;
    pub const MAX_SPOKES: i32 = 6;
    pub const SPOKE_PLACEMENT_ATTEMPTS: u32 = 8;
    /// Minimum angular separation between two spokes (radians)
    pub const MIN_SPOKE_SEPARATION: f32 = 0.2;
    /// Spokes stop this far short of the outer and innermost rings
    pub const SPOKE_INSET: f32 = 0.5;
    pub const SPOKE_GAP_CHANCE: f32 = 0.45;
    pub const SPOKE_GAP_WIDTH: f32 = 8.0;

    /// Maze spurs reach at most this fraction across a corridor
    pub const SPUR_DEPTH_FRACTION: f32 = 0.4;
    pub const SPUR_CHANCE: f32 = 0.5;

    /// Objective radius range at the default arena size
    pub const OBJECTIVE_MIN_RADIUS: f32 = 6.0;
    pub const OBJECTIVE_MAX_RADIUS: f32 = 9.0;

    /// Spawn pad side length at the default arena size
    pub const SPAWN_PAD_SIZE: f32 = 10.0;
    pub const SPAWN_ANGLE_JITTER: f32 = 0.25;
    pub const SPAWN_PLACEMENT_ATTEMPTS: u32 = 12;
    pub const MIN_SPAWN_DISTANCE: f32 = 30.0;
    /// Clearance kept between a pad and the ring walls of its corridor
    pub const SPAWN_WALL_CLEARANCE: f32 = 4.0;

    /// Cover scatter
    pub const MIN_COVER: i32 = 8;
    pub const MAX_COVER: i32 = 14;
    pub const COVER_DRAWS_PER_ITEM: i32 = 10;
    pub const COVER_MIN_RADIUS: f32 = 1.5;
    pub const COVER_MAX_RADIUS: f32 = 3.0;
    pub const COVER_RING_CLEARANCE: f32 = 3.0;
    /// No cover within objective radius + this distance
    pub const NO_COVER_OBJECTIVE_MARGIN: f32 = 14.0;
    /// Spawn pads are expanded by this much before rejecting cover
    pub const SPAWN_COVER_CLEARANCE: f32 = 6.0;

    /// Cells beyond outer radius + margin are blocked
    pub const BOUNDARY_MARGIN: f32 = 3.0;
    /// Extra world units kept around the boundary when cropping
    pub const CROP_PADDING: f32 = 2.0;
    /// Connectivity always runs at full resolution
    pub const CONNECTIVITY_CELL_SIZE: f32 = 1.0;

    /// Retry budget
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 12;
    /// Pre-vetted fallback seed; every fallback seed starts with the marker
    pub const FALLBACK_MARKER: &str = "fallback:";
    pub const FALLBACK_SEED: &str = "fallback:bastion";
    pub const FALLBACK_RING_COUNT: u32 = 3;

    /// Cosmetic render grid resolution
    pub const DEFAULT_RENDER_CELL_SIZE: f32 = 2.0;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Convert polar (r, theta) to a cartesian offset
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert a cartesian offset to polar (r, theta), theta in [0, 2π)
#[inline]
pub fn cartesian_to_polar(offset: Vec2) -> (f32, f32) {
    (offset.length(), wrap_angle(offset.y.atan2(offset.x)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_polar_roundtrip() {
        let p = polar_to_cartesian(10.0, 1.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 10.0).abs() < 1e-4);
        assert!((theta - 1.0).abs() < 1e-4);
    }
}
