//! Generation settings and runtime mode
//!
//! Loaded from JSON (or defaults), with environment overrides applied last.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ArenaError;

/// Environment variable selecting the runtime mode
pub const MODE_ENV: &str = "ARENA_MODE";
/// Environment variable overriding the retry budget
pub const MAX_ATTEMPTS_ENV: &str = "ARENA_MAX_ATTEMPTS";

/// How the orchestrator treats an exhausted retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Serve the fallback arena and keep going
    Production,
    /// Abort the process so generator bugs surface immediately
    Development,
}

impl Default for RuntimeMode {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            RuntimeMode::Development
        } else {
            RuntimeMode::Production
        }
    }
}

impl RuntimeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeMode::Production => "production",
            RuntimeMode::Development => "development",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(RuntimeMode::Production),
            "development" | "dev" => Some(RuntimeMode::Development),
            _ => None,
        }
    }

    /// Mode from `ARENA_MODE`, else the build profile default
    pub fn from_env() -> Self {
        std::env::var(MODE_ENV)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or_default()
    }
}

/// Shape options for a single generated arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaOptions {
    /// Side length of the square arena (world units)
    pub size: f32,
    /// Fixed ring count; random in 3..=5 when unset
    pub ring_count: Option<u32>,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_ARENA_SIZE,
            ring_count: None,
        }
    }
}

impl ArenaOptions {
    pub fn with_rings(mut self, ring_count: u32) -> Self {
        self.ring_count = Some(ring_count);
        self
    }

    /// Options the fallback arena is generated with
    pub fn fallback(&self) -> Self {
        Self {
            size: self.size.max(MIN_ARENA_SIZE),
            ring_count: Some(FALLBACK_RING_COUNT),
        }
    }
}

/// Everything the retry/fallback orchestrator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub arena: ArenaOptions,
    /// Attempts before falling back
    pub max_attempts: u32,
    pub mode: RuntimeMode,
    /// Cosmetic grid resolution for renderers; connectivity ignores it
    pub render_cell_size: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            arena: ArenaOptions::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            mode: RuntimeMode::default(),
            render_cell_size: DEFAULT_RENDER_CELL_SIZE,
        }
    }
}

impl GenerationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ArenaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArenaError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded generation config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply `ARENA_MODE` / `ARENA_MAX_ATTEMPTS` if set
    pub fn apply_env_overrides(&mut self) -> Result<(), ArenaError> {
        self.apply_overrides(
            std::env::var(MODE_ENV).ok().as_deref(),
            std::env::var(MAX_ATTEMPTS_ENV).ok().as_deref(),
        )
    }

    fn apply_overrides(
        &mut self,
        mode: Option<&str>,
        max_attempts: Option<&str>,
    ) -> Result<(), ArenaError> {
        if let Some(value) = mode {
            self.mode = RuntimeMode::parse(value).ok_or_else(|| ArenaError::InvalidSetting {
                key: MODE_ENV,
                value: value.to_string(),
            })?;
        }
        if let Some(value) = max_attempts {
            self.max_attempts =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ArenaError::InvalidSetting {
                        key: MAX_ATTEMPTS_ENV,
                        value: value.to_string(),
                    })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(RuntimeMode::parse("prod"), Some(RuntimeMode::Production));
        assert_eq!(RuntimeMode::parse(" Development "), Some(RuntimeMode::Development));
        assert_eq!(RuntimeMode::parse("staging"), None);
        assert_eq!(RuntimeMode::Production.as_str(), "production");
    }

    #[test]
    fn test_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.arena.size, DEFAULT_ARENA_SIZE);
        assert_eq!(config.arena.ring_count, None);
        assert_eq!(config.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.render_cell_size, DEFAULT_RENDER_CELL_SIZE);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GenerationConfig::from_json_str(
            r#"{ "max_attempts": 4, "mode": "production", "arena": { "ring_count": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.mode, RuntimeMode::Production);
        assert_eq!(config.arena.ring_count, Some(5));
        assert_eq!(config.arena.size, DEFAULT_ARENA_SIZE);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(matches!(
            GenerationConfig::from_json_str("{ nope"),
            Err(ArenaError::Json(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let mut config = GenerationConfig::default();
        config
            .apply_overrides(Some("production"), Some("3"))
            .unwrap();
        assert_eq!(config.mode, RuntimeMode::Production);
        assert_eq!(config.max_attempts, 3);

        assert!(matches!(
            config.apply_overrides(None, Some("many")),
            Err(ArenaError::InvalidSetting { key: MAX_ATTEMPTS_ENV, .. })
        ));
        assert!(config.apply_overrides(Some("qa"), None).is_err());
    }

    #[test]
    fn test_fallback_options() {
        let options = ArenaOptions::default().with_rings(5);
        let fallback = options.fallback();
        assert_eq!(fallback.ring_count, Some(FALLBACK_RING_COUNT));
        assert_eq!(fallback.size, options.size);
    }
}
