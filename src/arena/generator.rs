//! Arena spec generation
//!
//! One owned `ArenaRng` drives the whole layout. Draw order is fixed:
//! outer radius, ring count, corridor gaps, segmentation, gates per ring,
//! spawn pads, spokes, maze spurs, objective, cover.
//!
//! Every quadrant gets a protected angular window covering its spawn pad
//! and its guaranteed gate on each inner ring. Spokes never enter those
//! windows and spurs never cross a whole corridor, so each pad has a
//! gate-to-gate route to the center by construction. Connectivity
//! validation still has the final say.

use std::collections::BTreeSet;
use std::f32::consts::{FRAC_PI_2, PI, SQRT_2, TAU};

use glam::Vec2;

use super::arc::ArcSpan;
use super::spec::{ArenaSpec, Cover, CoverKind, ObjectiveZone, SpawnZone, WallKind, WallSegment};
use crate::consts::*;
use crate::rng::ArenaRng;
use crate::settings::ArenaOptions;
use crate::{polar_to_cartesian, wrap_angle};

const COVER_KINDS: [CoverKind; 3] = [CoverKind::Crate, CoverKind::Pillar, CoverKind::Rubble];

/// A ring before its walls are emitted
#[derive(Debug, Clone)]
struct RingPlan {
    radius: f32,
    /// Open arc indices
    gates: BTreeSet<u32>,
    /// The guaranteed gate in each quadrant
    quadrant_gates: [u32; 4],
}

/// Generate a complete arena spec from a seed
pub fn generate_arena(seed: &str, options: &ArenaOptions) -> ArenaSpec {
    let mut rng = ArenaRng::new(seed);

    let size = if options.size.is_finite() && options.size >= MIN_ARENA_SIZE {
        options.size
    } else {
        log::warn!(
            "Arena size {} below supported minimum, using {}",
            options.size,
            MIN_ARENA_SIZE
        );
        MIN_ARENA_SIZE
    };
    let scale = size / DEFAULT_ARENA_SIZE;
    let center = Vec2::splat(size / 2.0);

    let ring_count = match options.ring_count {
        Some(n) if (MIN_RINGS..=MAX_RINGS).contains(&n) => n,
        Some(n) => {
            let clamped = n.clamp(MIN_RINGS, MAX_RINGS);
            log::warn!("Ring count {} out of range, clamped to {}", n, clamped);
            clamped
        }
        None => rng.int(MIN_RINGS as i32, MAX_RINGS as i32) as u32,
    };

    let radii = ring_radii(&mut rng, size, ring_count);
    let segments = rng
        .pick(&SEGMENT_CHOICES)
        .copied()
        .unwrap_or(SEGMENT_CHOICES[0]);

    let rings: Vec<RingPlan> = radii
        .iter()
        .enumerate()
        .map(|(i, &radius)| plan_ring(&mut rng, radius, i as u32, ring_count, segments))
        .collect();

    let (spawn_zones, spawn_angles) = place_spawns(&mut rng, center, &radii, scale);
    let windows = protected_windows(&rings, &spawn_angles, segments);

    let mut walls = perimeter_walls(size);
    walls.extend(ring_walls(center, &rings, segments));
    let (spoke_walls, spokes) = place_spokes(&mut rng, center, &radii, &windows);
    walls.extend(spoke_walls);
    walls.extend(spur_walls(&mut rng, center, &rings, segments));

    let objective = ObjectiveZone {
        center,
        radius: rng.range(OBJECTIVE_MIN_RADIUS, OBJECTIVE_MAX_RADIUS) * scale,
    };
    let cover = scatter_cover(&mut rng, center, &radii, &objective, &spawn_zones);

    log::debug!(
        "Arena '{}': rings={} radii={:?} segments={} spokes={} walls={} cover={}",
        seed,
        ring_count,
        radii,
        segments,
        spokes,
        walls.len(),
        cover.len()
    );

    ArenaSpec {
        version: SPEC_VERSION.to_string(),
        seed: seed.to_string(),
        size,
        center,
        ring_count,
        ring_gates: rings
            .iter()
            .map(|ring| ring.gates.iter().copied().collect())
            .collect(),
        ring_radii: radii,
        segments,
        spokes,
        spawn_zones,
        objective,
        walls,
        cover,
    }
}

/// Outer radius with jitter, then one shrinking gap per inner ring
fn ring_radii(rng: &mut ArenaRng, size: f32, ring_count: u32) -> Vec<f32> {
    let outer =
        size / 2.0 * (OUTER_RADIUS_FRACTION + rng.range(-OUTER_RADIUS_JITTER, OUTER_RADIUS_JITTER));
    let budget = outer * (1.0 - INNER_RADIUS_FRACTION);

    // Corridor i has weight n - i + 1: wide outside, tight toward the center
    let weights: Vec<f32> = (1..ring_count).map(|i| (ring_count - i + 1) as f32).collect();
    let total: f32 = weights.iter().sum();

    let mut radii = Vec::with_capacity(ring_count as usize);
    radii.push(outer);
    let mut prev = outer;
    for weight in weights {
        let gap = budget * weight / total * rng.range(RING_GAP_MIN_FILL, 1.0);
        let next = (prev - gap.max(MIN_RING_GAP)).max(1.0);
        radii.push(next);
        prev = next;
    }
    radii
}

/// Pick the open arcs of one ring
fn plan_ring(
    rng: &mut ArenaRng,
    radius: f32,
    ring_index: u32,
    ring_count: u32,
    segments: u32,
) -> RingPlan {
    let per_quadrant = segments / 4;
    let mut gates = BTreeSet::new();
    let mut quadrant_gates = [0u32; 4];

    for (q, slot) in quadrant_gates.iter_mut().enumerate() {
        // Interior arcs only: quadrant boundaries stay free for spokes
        let offset = rng.int(1, per_quadrant as i32 - 2) as u32;
        *slot = q as u32 * per_quadrant + offset;
        gates.insert(*slot);
    }

    // Outer rings are more porous than inner ones
    let target = 4 + (ring_count - 1 - ring_index) as usize + rng.int(0, 1) as usize;
    let mut candidates: Vec<u32> = (0..segments).filter(|k| !gates.contains(k)).collect();
    rng.shuffle(&mut candidates);
    let extra = target.saturating_sub(gates.len());
    gates.extend(candidates.into_iter().take(extra));

    RingPlan {
        radius,
        gates,
        quadrant_gates,
    }
}

/// One pad per team in the outermost corridor, returned with its angle
fn place_spawns(
    rng: &mut ArenaRng,
    center: Vec2,
    radii: &[f32],
    scale: f32,
) -> (Vec<SpawnZone>, [f32; 4]) {
    let pad = SPAWN_PAD_SIZE * scale;
    let half_diagonal = pad * SQRT_2 / 2.0;
    let corridor_mid = (radii[0] + radii[1]) / 2.0;
    let radial_jitter =
        ((radii[0] - radii[1]) / 2.0 - half_diagonal - SPAWN_WALL_CLEARANCE).max(0.0);
    let min_distance = MIN_SPAWN_DISTANCE * scale;

    let mut zones: Vec<SpawnZone> = Vec::with_capacity(TEAM_COUNT as usize);
    let mut angles = [0.0f32; 4];

    for team in 0..TEAM_COUNT {
        let base = (team as f32 + 0.5) * FRAC_PI_2;
        let mut attempt = 0;
        let (zone, theta) = loop {
            attempt += 1;
            let theta = wrap_angle(base + rng.range(-SPAWN_ANGLE_JITTER, SPAWN_ANGLE_JITTER));
            let r = corridor_mid + rng.range(-radial_jitter, radial_jitter);
            let zone = SpawnZone::centered(
                team,
                center + polar_to_cartesian(r, theta),
                pad,
                pad,
                wrap_angle(theta + PI),
            );
            let clear = zones.iter().all(|other| {
                !zone.overlaps(other) && zone.center().distance(other.center()) >= min_distance
            });
            if clear {
                break (zone, theta);
            }
            if attempt >= SPAWN_PLACEMENT_ATTEMPTS {
                log::debug!("Spawn {} kept last position after {} attempts", team, attempt);
                break (zone, theta);
            }
        };
        angles[team as usize] = theta;
        zones.push(zone);
    }

    (zones, angles)
}

/// Angular hull of each quadrant's pad and guaranteed inner gates
fn protected_windows(rings: &[RingPlan], spawn_angles: &[f32; 4], segments: u32) -> Vec<ArcSpan> {
    let half_arc = PI / segments as f32;
    (0..4)
        .map(|q| {
            let mut lo = spawn_angles[q];
            let mut hi = spawn_angles[q];
            for ring in rings.iter().skip(1) {
                let arc = ArcSpan::ring_arc(ring.quadrant_gates[q], segments);
                lo = lo.min(arc.start);
                hi = hi.max(arc.start + arc.angular_span());
            }
            ArcSpan::new(lo, hi).expanded(half_arc)
        })
        .collect()
}

fn perimeter_walls(size: f32) -> Vec<WallSegment> {
    let inset = PERIMETER_THICKNESS / 2.0;
    let corners = [
        Vec2::new(inset, inset),
        Vec2::new(size - inset, inset),
        Vec2::new(size - inset, size - inset),
        Vec2::new(inset, size - inset),
    ];
    (0..4)
        .map(|i| {
            WallSegment::new(
                corners[i],
                corners[(i + 1) % 4],
                PERIMETER_THICKNESS,
                WallKind::Perimeter,
            )
        })
        .collect()
}

/// A chord for every closed arc of every ring
fn ring_walls(center: Vec2, rings: &[RingPlan], segments: u32) -> Vec<WallSegment> {
    let mut walls = Vec::new();
    for ring in rings {
        for k in (0..segments).filter(|k| !ring.gates.contains(k)) {
            let (a, b) = ArcSpan::ring_arc(k, segments).chord(center, ring.radius);
            walls.push(WallSegment::new(a, b, RING_THICKNESS, WallKind::Ring));
        }
    }
    walls
}

fn radial_wall(center: Vec2, theta: f32, from: f32, to: f32) -> WallSegment {
    let dir = polar_to_cartesian(1.0, theta);
    WallSegment::new(
        center + dir * from,
        center + dir * to,
        SPOKE_THICKNESS,
        WallKind::Spoke,
    )
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs() % TAU;
    d.min(TAU - d)
}

/// Radial corridor walls outside the protected windows
fn place_spokes(
    rng: &mut ArenaRng,
    center: Vec2,
    radii: &[f32],
    windows: &[ArcSpan],
) -> (Vec<WallSegment>, u32) {
    let requested = rng.int(MIN_SPOKES, MAX_SPOKES);
    let outer = radii[0] - SPOKE_INSET;
    let inner = radii[radii.len() - 1] + SPOKE_INSET;

    let mut angles: Vec<f32> = Vec::with_capacity(requested as usize);
    let mut walls = Vec::new();

    for _ in 0..requested {
        let mut placed = None;
        for _ in 0..SPOKE_PLACEMENT_ATTEMPTS {
            let theta = rng.float() * TAU;
            let protected = windows.iter().any(|w| w.contains_angle(theta));
            let crowded = angles
                .iter()
                .any(|&other| angular_distance(theta, other) < MIN_SPOKE_SEPARATION);
            if !protected && !crowded {
                placed = Some(theta);
                break;
            }
        }
        let Some(theta) = placed else {
            continue;
        };
        angles.push(theta);

        if rng.bool(SPOKE_GAP_CHANCE) {
            // Choke point somewhere in the middle of the span
            let mid = inner + (outer - inner) * rng.range(0.3, 0.7);
            let half_gap = SPOKE_GAP_WIDTH / 2.0;
            walls.push(radial_wall(center, theta, inner, mid - half_gap));
            walls.push(radial_wall(center, theta, mid + half_gap, outer));
        } else {
            walls.push(radial_wall(center, theta, inner, outer));
        }
    }

    (walls, angles.len() as u32)
}

/// Short dead-end walls hanging inward from the middle rings
fn spur_walls(
    rng: &mut ArenaRng,
    center: Vec2,
    rings: &[RingPlan],
    segments: u32,
) -> Vec<WallSegment> {
    let mut walls = Vec::new();
    let sagitta_cos = (PI / segments as f32).cos();

    // The outermost corridor holds the spawn pads, so start at ring 1
    for pair in rings.windows(2).skip(1) {
        let (ring, next) = (&pair[0], &pair[1]);
        if !rng.bool(SPUR_CHANCE) {
            continue;
        }
        let solid: Vec<u32> = (0..segments).filter(|k| !ring.gates.contains(k)).collect();
        let depth = (ring.radius - next.radius) * SPUR_DEPTH_FRACTION;
        // Hang from the chord midpoint, not the circle
        let rim = ring.radius * sagitta_cos;

        for _ in 0..rng.int(1, 2) {
            let Ok(&k) = rng.pick(&solid) else {
                break;
            };
            let theta = ArcSpan::ring_arc(k, segments).mid_angle();
            walls.push(radial_wall(center, theta, rim - depth, rim));
        }
    }
    walls
}

/// Cover in the band between the innermost and outer rings
fn scatter_cover(
    rng: &mut ArenaRng,
    center: Vec2,
    radii: &[f32],
    objective: &ObjectiveZone,
    spawns: &[SpawnZone],
) -> Vec<Cover> {
    let target = rng.int(MIN_COVER, MAX_COVER) as usize;
    let band_inner = radii[radii.len() - 1] + COVER_RING_CLEARANCE;
    let band_outer = radii[0] - COVER_RING_CLEARANCE;
    let keep_out = objective.radius + NO_COVER_OBJECTIVE_MARGIN;
    let max_draws = target * COVER_DRAWS_PER_ITEM as usize;

    let mut cover = Vec::with_capacity(target);
    let mut draws = 0;
    while cover.len() < target && draws < max_draws {
        draws += 1;
        let theta = rng.float() * TAU;
        let r = rng.range(band_inner, band_outer);
        let radius = rng.range(COVER_MIN_RADIUS, COVER_MAX_RADIUS);
        let point = center + polar_to_cartesian(r, theta);

        if point.distance(objective.center) < keep_out + radius {
            continue;
        }
        if spawns
            .iter()
            .any(|s| s.expanded(SPAWN_COVER_CLEARANCE).contains(point))
        {
            continue;
        }

        let kind = rng.pick(&COVER_KINDS).copied().unwrap_or_default();
        cover.push(Cover {
            center: point,
            radius,
            kind,
        });
    }
    cover
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartesian_to_polar;

    fn generate(seed: &str) -> ArenaSpec {
        generate_arena(seed, &ArenaOptions::default())
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate("match_1"), generate("match_1"));
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(generate("match_1").ring_radii, generate("match_2").ring_radii);
    }

    #[test]
    fn test_ring_radii_shape() {
        for i in 0..50 {
            let spec = generate(&format!("rings_{}", i));
            assert!((MIN_RINGS..=MAX_RINGS).contains(&spec.ring_count));
            assert_eq!(spec.ring_radii.len(), spec.ring_count as usize);
            assert!(spec.ring_radii.windows(2).all(|w| w[0] > w[1]));
            assert!(spec.inner_radius() > 0.0);
            assert!(spec.outer_radius() < spec.size / 2.0);
        }
    }

    #[test]
    fn test_ring_count_option() {
        for rings in MIN_RINGS..=MAX_RINGS {
            let spec = generate_arena("fixed", &ArenaOptions::default().with_rings(rings));
            assert_eq!(spec.ring_count, rings);
        }
        let clamped = generate_arena("fixed", &ArenaOptions::default().with_rings(9));
        assert_eq!(clamped.ring_count, MAX_RINGS);
        let clamped = generate_arena("fixed", &ArenaOptions::default().with_rings(1));
        assert_eq!(clamped.ring_count, MIN_RINGS);
    }

    #[test]
    fn test_small_size_is_clamped() {
        let spec = generate_arena(
            "tiny",
            &ArenaOptions {
                size: 40.0,
                ring_count: None,
            },
        );
        assert_eq!(spec.size, MIN_ARENA_SIZE);
    }

    #[test]
    fn test_gates_cover_every_quadrant() {
        for i in 0..30 {
            let spec = generate(&format!("gates_{}", i));
            let per_quadrant = spec.segments / 4;
            for gates in &spec.ring_gates {
                for q in 0..4 {
                    assert!(
                        gates.iter().any(|&k| k / per_quadrant == q),
                        "quadrant {} has no gate",
                        q
                    );
                }
            }
            // Outer ring is at least as porous as the innermost ring
            let outer = spec.ring_gates.first().map(Vec::len).unwrap_or(0);
            let inner = spec.ring_gates.last().map(Vec::len).unwrap_or(0);
            assert!(outer >= inner);
        }
    }

    #[test]
    fn test_ring_walls_skip_gates() {
        let spec = generate("walls");
        let expected: usize = spec
            .ring_gates
            .iter()
            .map(|gates| spec.segments as usize - gates.len())
            .sum();
        assert_eq!(spec.walls_of_kind(WallKind::Ring).count(), expected);
        assert_eq!(spec.walls_of_kind(WallKind::Perimeter).count(), 4);
    }

    #[test]
    fn test_spawn_zones() {
        for i in 0..30 {
            let spec = generate(&format!("spawns_{}", i));
            assert_eq!(spec.spawn_zones.len(), TEAM_COUNT as usize);
            for (team, zone) in spec.spawn_zones.iter().enumerate() {
                assert_eq!(zone.team as usize, team);
                assert!(zone.min().x >= 0.0 && zone.min().y >= 0.0);
                assert!(zone.max().x <= spec.size && zone.max().y <= spec.size);

                // Pad sits between the two outermost rings
                let r = zone.center().distance(spec.center);
                assert!(r < spec.ring_radii[0] && r > spec.ring_radii[1]);

                // Facing points back at the center
                let to_center = (spec.center - zone.center()).normalize();
                let facing = polar_to_cartesian(1.0, zone.facing);
                assert!(facing.dot(to_center) > 0.99);
            }
        }
    }

    #[test]
    fn test_objective_centered() {
        let spec = generate("objective");
        assert_eq!(spec.objective.center, spec.center);
        assert!(spec.objective.radius >= OBJECTIVE_MIN_RADIUS);
        assert!(spec.objective.radius < spec.inner_radius());
    }

    #[test]
    fn test_cover_respects_keep_out_zones() {
        for i in 0..30 {
            let spec = generate(&format!("cover_{}", i));
            for item in &spec.cover {
                let d = item.center.distance(spec.objective.center);
                assert!(d >= spec.objective.radius + NO_COVER_OBJECTIVE_MARGIN);
                assert!(d <= spec.outer_radius());
                for zone in &spec.spawn_zones {
                    assert!(!zone.expanded(SPAWN_COVER_CLEARANCE).contains(item.center));
                }
            }
        }
    }

    #[test]
    fn test_spokes_avoid_protected_windows() {
        let mut rng = ArenaRng::new("windows");
        let windows = vec![ArcSpan::new(0.2, 1.4), ArcSpan::new(1.8, 3.0)];
        let radii = [100.0, 70.0, 40.0];
        let (walls, count) = place_spokes(&mut rng, Vec2::ZERO, &radii, &windows);
        assert!(walls.len() >= count as usize);
        for wall in &walls {
            let (inner, _) = cartesian_to_polar(wall.a);
            let (outer, theta) = cartesian_to_polar(wall.b);
            assert!(windows.iter().all(|w| !w.contains_angle(theta)));
            // Both ends stay between the outer and innermost ring
            assert!(inner >= 40.0 && outer <= 100.0);
        }
    }

    #[test]
    fn test_angular_distance() {
        assert!((angular_distance(0.1, TAU - 0.1) - 0.2).abs() < 1e-4);
        assert!((angular_distance(1.0, 2.0) - 1.0).abs() < 1e-4);
    }
}
