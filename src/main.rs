//! Arena Gen command line
//!
//! Generates a validated arena for a seed and prints its canonical JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use arena_gen::arena::OccupancyGrid;
use arena_gen::persistence::{ArenaEnvelope, canonical_json, content_hash};
use arena_gen::{ArenaError, GenerationConfig, RuntimeMode, generate_valid_arena};

/// Seeded ring arena generator
#[derive(Parser, Debug)]
#[command(name = "arena-gen")]
#[command(about = "Generate a validated ring arena and print it as canonical JSON")]
struct Args {
    /// Base seed; retries derive from it
    #[arg(long, default_value = "match_1")]
    seed: String,

    /// Arena side length in world units
    #[arg(long)]
    size: Option<f32>,

    /// Fixed ring count (3-5)
    #[arg(long)]
    rings: Option<u32>,

    /// Attempts before falling back
    #[arg(long)]
    max_attempts: Option<u32>,

    /// JSON generation config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serve the fallback arena instead of aborting when attempts run out
    #[arg(long)]
    production: bool,

    /// Print the render grid instead of JSON
    #[arg(long)]
    ascii: bool,

    /// Print a sealed envelope instead of bare JSON
    #[arg(long)]
    envelope: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), ArenaError> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    config.apply_env_overrides()?;

    // Flags win over file and environment
    if let Some(size) = args.size {
        config.arena.size = size;
    }
    if let Some(rings) = args.rings {
        config.arena.ring_count = Some(rings);
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if args.production {
        config.mode = RuntimeMode::Production;
    }

    log::info!(
        "Generating '{}' (mode={}, max_attempts={})",
        args.seed,
        config.mode.as_str(),
        config.max_attempts
    );
    let result = generate_valid_arena(&args.seed, &config);
    log::info!(
        "Used seed '{}' on attempt {}{}, hash {}",
        result.used_seed,
        result.attempt,
        if result.fallback { " (fallback)" } else { "" },
        content_hash(&result.spec)?
    );

    if args.ascii {
        let grid = OccupancyGrid::build(&result.spec, config.render_cell_size);
        print!("{}", grid.to_ascii());
    } else if args.envelope {
        println!("{}", ArenaEnvelope::seal(result.spec)?.to_json()?);
    } else {
        println!("{}", canonical_json(&result.spec)?);
    }
    Ok(())
}
