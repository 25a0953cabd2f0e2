//! Arena generation and validation pipeline
//!
//! Leaves first: geometry helpers, the arena data model, the generator,
//! structural validation, occupancy grids, connectivity search, and the
//! retry/fallback orchestrator on top.

mod arc;
pub mod connectivity;
pub mod generator;
pub mod grid;
pub mod orchestrator;
pub mod spec;
pub mod structure;

pub use arc::ArcSpan;
pub use connectivity::{
    ConnectivityError, ConnectivityReport, SpawnReach, connectivity_report, validate_connectivity,
};
pub use generator::generate_arena;
pub use grid::OccupancyGrid;
pub use orchestrator::{
    AttemptFailure, FailureReason, GeneratedArena, fallback_arena, generate_valid_arena,
    generate_valid_arena_with, is_fallback_seed, retry_seed,
};
pub use spec::{ArenaSpec, Cover, CoverKind, ObjectiveZone, SpawnZone, WallKind, WallSegment};
pub use structure::{StructuralError, validate_spec};
