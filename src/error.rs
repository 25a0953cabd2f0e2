use thiserror::Error;

/// Errors from the fallible, non-validation parts of the crate.
///
/// Validation failures are not represented here: the validators return
/// their own reason lists so every failure can be inspected at once.
#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("cannot pick from an empty list")]
    EmptyPick,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported envelope format {found} (expected {expected})")]
    UnsupportedFormat { found: u32, expected: u32 },

    #[error("content digest mismatch: envelope says {expected}, spec hashes to {computed}")]
    DigestMismatch { expected: String, computed: String },

    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
}
