//! Structural validation: an arena spec's declared shape, never its reachability

use std::cmp::Ordering;

use thiserror::Error;

use super::spec::ArenaSpec;
use crate::consts::*;

/// Objective and arena centers must agree to within this distance
const CENTER_TOLERANCE: f32 = 1e-3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StructuralError {
    #[error("version must be {expected}, found {found}")]
    VersionMismatch { expected: &'static str, found: String },

    #[error("size must be positive, found {0}")]
    NonPositiveSize(f32),

    #[error("ring count must be within {min}..={max}, found {found}")]
    RingCountOutOfRange { min: u32, max: u32, found: u32 },

    #[error("ring radii length {found} does not match ring count {expected}")]
    RingRadiiLength { expected: usize, found: usize },

    #[error("ring radius {index} must be positive, found {radius}")]
    NonPositiveRingRadius { index: usize, radius: f32 },

    #[error("ring radii must be strictly decreasing (ring {index}: {radius} after {previous})")]
    RingRadiiNotDecreasing { index: usize, radius: f32, previous: f32 },

    #[error("ring gate lists {found} do not match ring count {expected}")]
    RingGatesLength { expected: usize, found: usize },

    #[error("ring {ring} gate index {index} out of range for {segments} segments")]
    GateOutOfRange { ring: usize, index: u32, segments: u32 },

    #[error("expected exactly 4 spawnZones, found {0}")]
    SpawnZoneCount(usize),

    #[error("spawn zone team {0} is not a valid team id")]
    UnknownTeam(u8),

    #[error("spawn zone team {0} appears more than once")]
    DuplicateTeam(u8),

    #[error("no spawn zone for team {0}")]
    MissingTeam(u8),

    #[error("spawn zone for team {0} must have positive width and height")]
    NonPositiveSpawnSize(u8),

    #[error("spawn zone for team {0} lies outside the arena bounds")]
    SpawnOutOfBounds(u8),

    #[error("objective radius must be positive, found {0}")]
    NonPositiveObjectiveRadius(f32),

    #[error("objective center must equal arena center")]
    ObjectiveOffCenter,

    #[error("wall segments must not be empty")]
    NoWalls,
}

/// Check every shape invariant, collecting all violations
pub fn validate_spec(spec: &ArenaSpec) -> Result<(), Vec<StructuralError>> {
    let mut errors = Vec::new();

    if spec.version != SPEC_VERSION {
        errors.push(StructuralError::VersionMismatch {
            expected: SPEC_VERSION,
            found: spec.version.clone(),
        });
    }

    if !positive(spec.size) {
        errors.push(StructuralError::NonPositiveSize(spec.size));
    }

    check_rings(spec, &mut errors);
    check_spawns(spec, &mut errors);

    if !positive(spec.objective.radius) {
        errors.push(StructuralError::NonPositiveObjectiveRadius(
            spec.objective.radius,
        ));
    }
    let offset = spec.objective.center.distance(spec.center);
    if offset.is_nan() || offset > CENTER_TOLERANCE {
        errors.push(StructuralError::ObjectiveOffCenter);
    }

    if spec.walls.is_empty() {
        errors.push(StructuralError::NoWalls);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// False for zero, negatives and NaN
fn positive(value: f32) -> bool {
    value > 0.0
}

fn check_rings(spec: &ArenaSpec, errors: &mut Vec<StructuralError>) {
    if !(MIN_RINGS..=MAX_RINGS).contains(&spec.ring_count) {
        errors.push(StructuralError::RingCountOutOfRange {
            min: MIN_RINGS,
            max: MAX_RINGS,
            found: spec.ring_count,
        });
    }

    if spec.ring_radii.len() != spec.ring_count as usize {
        errors.push(StructuralError::RingRadiiLength {
            expected: spec.ring_count as usize,
            found: spec.ring_radii.len(),
        });
    }

    for (index, &radius) in spec.ring_radii.iter().enumerate() {
        if !positive(radius) {
            errors.push(StructuralError::NonPositiveRingRadius { index, radius });
        }
    }

    // Report the first ordering violation only
    let radii = &spec.ring_radii;
    if let Some(index) =
        (1..radii.len()).find(|&i| radii[i].partial_cmp(&radii[i - 1]) != Some(Ordering::Less))
    {
        errors.push(StructuralError::RingRadiiNotDecreasing {
            index,
            radius: radii[index],
            previous: radii[index - 1],
        });
    }

    if spec.ring_gates.len() != spec.ring_count as usize {
        errors.push(StructuralError::RingGatesLength {
            expected: spec.ring_count as usize,
            found: spec.ring_gates.len(),
        });
    }
    for (ring, gates) in spec.ring_gates.iter().enumerate() {
        for &index in gates.iter().filter(|&&k| k >= spec.segments) {
            errors.push(StructuralError::GateOutOfRange {
                ring,
                index,
                segments: spec.segments,
            });
        }
    }
}

fn check_spawns(spec: &ArenaSpec, errors: &mut Vec<StructuralError>) {
    if spec.spawn_zones.len() != TEAM_COUNT as usize {
        errors.push(StructuralError::SpawnZoneCount(spec.spawn_zones.len()));
    }

    let mut seen = [false; TEAM_COUNT as usize];
    for zone in &spec.spawn_zones {
        match seen.get_mut(zone.team as usize) {
            None => errors.push(StructuralError::UnknownTeam(zone.team)),
            Some(true) => errors.push(StructuralError::DuplicateTeam(zone.team)),
            Some(slot) => *slot = true,
        }
    }
    for team in (0..TEAM_COUNT).filter(|&t| !seen[t as usize]) {
        errors.push(StructuralError::MissingTeam(team));
    }

    for zone in &spec.spawn_zones {
        if !(positive(zone.width) && positive(zone.height)) {
            errors.push(StructuralError::NonPositiveSpawnSize(zone.team));
        }
        let (min, max) = (zone.min(), zone.max());
        let inside = min.x >= 0.0 && min.y >= 0.0 && max.x <= spec.size && max.y <= spec.size;
        if !inside {
            errors.push(StructuralError::SpawnOutOfBounds(zone.team));
        }
    }
}
