//! Retry/fallback orchestration
//!
//! Attempts run sequentially through a deterministic seed sequence
//! (`seed`, `seed:r1`, `seed:r2`, ...). A spec is returned only once it
//! passes structural and connectivity validation. When the budget runs out
//! the pre-vetted fallback arena is served in production; in development the
//! process aborts.

use std::fmt;

use super::connectivity::{ConnectivityError, validate_connectivity};
use super::generator::generate_arena;
use super::spec::ArenaSpec;
use super::structure::{StructuralError, validate_spec};
use crate::consts::{FALLBACK_MARKER, FALLBACK_SEED};
use crate::settings::{ArenaOptions, GenerationConfig, RuntimeMode};

/// Why one attempt was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Structural(Vec<StructuralError>),
    Connectivity(Vec<ConnectivityError>),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (stage, messages): (&str, Vec<String>) = match self {
            FailureReason::Structural(errors) => {
                ("structural", errors.iter().map(ToString::to_string).collect())
            }
            FailureReason::Connectivity(errors) => {
                ("connectivity", errors.iter().map(ToString::to_string).collect())
            }
        };
        write!(f, "{}: {}", stage, messages.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptFailure {
    /// 1-based attempt number
    pub attempt: u32,
    pub seed: String,
    pub reason: FailureReason,
}

/// A validated arena and how it was obtained
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArena {
    pub spec: ArenaSpec,
    /// Seed the arena was generated from
    pub used_seed: String,
    /// 1-based attempt number; `max_attempts + 1` for the fallback
    pub attempt: u32,
    pub fallback: bool,
    /// Rejected attempts, in order
    pub failures: Vec<AttemptFailure>,
}

/// Seed for a 0-based attempt index
pub fn retry_seed(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}:r{}", base, attempt)
    }
}

pub fn is_fallback_seed(seed: &str) -> bool {
    seed.starts_with(FALLBACK_MARKER)
}

/// Generate arenas until one validates
pub fn generate_valid_arena(seed: &str, config: &GenerationConfig) -> GeneratedArena {
    generate_valid_arena_with(seed, config, generate_arena)
}

/// Same as [`generate_valid_arena`] with a caller-supplied generator
pub fn generate_valid_arena_with<G>(
    seed: &str,
    config: &GenerationConfig,
    mut generate: G,
) -> GeneratedArena
where
    G: FnMut(&str, &ArenaOptions) -> ArenaSpec,
{
    let mut failures = Vec::new();

    for index in 0..config.max_attempts {
        let attempt = index + 1;
        let candidate = retry_seed(seed, index);
        let spec = generate(&candidate, &config.arena);

        match check(&spec) {
            Ok(()) => {
                if attempt > 1 {
                    log::info!(
                        "Arena '{}' validated on attempt {} as '{}'",
                        seed,
                        attempt,
                        candidate
                    );
                } else {
                    log::debug!("Arena '{}' validated on first attempt", seed);
                }
                return GeneratedArena {
                    spec,
                    used_seed: candidate,
                    attempt,
                    fallback: false,
                    failures,
                };
            }
            Err(reason) => {
                log::debug!("Attempt {} ('{}') rejected: {}", attempt, candidate, reason);
                failures.push(AttemptFailure {
                    attempt,
                    seed: candidate,
                    reason,
                });
            }
        }
    }

    log::error!(
        "Arena '{}' failed all {} attempts, using fallback '{}'",
        seed,
        config.max_attempts,
        FALLBACK_SEED
    );
    if config.mode == RuntimeMode::Development {
        log::error!("Fallback is fatal in development mode, aborting");
        std::process::abort();
    }

    GeneratedArena {
        spec: fallback_arena(&config.arena),
        used_seed: FALLBACK_SEED.to_string(),
        attempt: config.max_attempts + 1,
        fallback: true,
        failures,
    }
}

/// The pre-vetted fallback arena
pub fn fallback_arena(options: &ArenaOptions) -> ArenaSpec {
    generate_arena(FALLBACK_SEED, &options.fallback())
}

fn check(spec: &ArenaSpec) -> Result<(), FailureReason> {
    validate_spec(spec).map_err(FailureReason::Structural)?;
    validate_connectivity(spec).map_err(FailureReason::Connectivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArcSpan;
    use crate::arena::spec::{WallKind, WallSegment};

    fn production(max_attempts: u32) -> GenerationConfig {
        GenerationConfig {
            max_attempts,
            mode: RuntimeMode::Production,
            ..GenerationConfig::default()
        }
    }

    /// Objective sealed inside a gateless ring
    fn disconnected(seed: &str, options: &ArenaOptions) -> ArenaSpec {
        let mut spec = generate_arena(seed, options);
        let radius = spec.objective.radius + 4.0;
        for k in 0..32 {
            let (a, b) = ArcSpan::ring_arc(k, 32).chord(spec.center, radius);
            spec.walls.push(WallSegment::new(a, b, 2.0, WallKind::Ring));
        }
        spec
    }

    #[test]
    fn test_retry_seed_sequence() {
        let seeds: Vec<String> = (0..4).map(|i| retry_seed("duel", i)).collect();
        assert_eq!(seeds, ["duel", "duel:r1", "duel:r2", "duel:r3"]);
    }

    #[test]
    fn test_first_attempt_success() {
        let result = generate_valid_arena("match_1", &production(8));
        assert_eq!(result.attempt, 1);
        assert_eq!(result.used_seed, "match_1");
        assert!(!result.fallback);
        assert!(result.failures.is_empty());
    }

    #[test]
    fn test_retries_after_failure() {
        let mut calls = Vec::new();
        let result = generate_valid_arena_with("flaky", &production(6), |seed, options| {
            calls.push(seed.to_string());
            if calls.len() < 3 {
                disconnected(seed, options)
            } else {
                generate_arena(seed, options)
            }
        });
        assert_eq!(calls, ["flaky", "flaky:r1", "flaky:r2"]);
        assert_eq!(result.attempt, 3);
        assert_eq!(result.used_seed, "flaky:r2");
        assert_eq!(result.failures.len(), 2);
        assert!(matches!(result.failures[0].reason, FailureReason::Connectivity(_)));
    }

    #[test]
    fn test_structural_failure_is_recorded() {
        let result = generate_valid_arena_with("broken", &production(1), |seed, options| {
            let mut spec = generate_arena(seed, options);
            spec.walls.clear();
            spec
        });
        assert!(result.fallback);
        let failure = &result.failures[0];
        assert_eq!(failure.seed, "broken");
        assert!(matches!(
            &failure.reason,
            FailureReason::Structural(e) if e.contains(&StructuralError::NoWalls)
        ));
        assert!(failure.reason.to_string().starts_with("structural: "));
    }

    #[test]
    fn test_exhaustion_serves_fallback_in_production() {
        let result = generate_valid_arena_with("doomed", &production(4), disconnected);
        assert!(result.fallback);
        assert!(is_fallback_seed(&result.used_seed));
        assert_eq!(result.attempt, 5);
        assert_eq!(result.failures.len(), 4);
        assert_eq!(result.spec, fallback_arena(&ArenaOptions::default()));
    }

    #[test]
    fn test_fallback_arena_is_valid() {
        let spec = fallback_arena(&ArenaOptions::default());
        assert_eq!(spec.seed, FALLBACK_SEED);
        assert_eq!(spec.ring_count, 3);
        assert_eq!(validate_spec(&spec), Ok(()));
        assert_eq!(validate_connectivity(&spec), Ok(()));
    }

    #[test]
    fn test_zero_budget_goes_straight_to_fallback() {
        let result = generate_valid_arena("none", &production(0));
        assert!(result.fallback);
        assert_eq!(result.attempt, 1);
    }
}
