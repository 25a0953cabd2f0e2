//! Canonical serialization and integrity digests
//!
//! Features:
//! - Key-sorted JSON so two specs compare by content
//! - BLAKE3 content hash over the canonical bytes
//! - Versioned envelope carrying the digest next to the arena
//!
//! Storage is the caller's concern; nothing here touches the filesystem.

use serde::{Deserialize, Serialize};

use crate::arena::ArenaSpec;
use crate::error::ArenaError;

/// Envelope format version
pub const ENVELOPE_FORMAT: u32 = 1;

/// Key-sorted compact JSON of a spec
///
/// Going through `serde_json::Value` sorts every object's keys, so field
/// declaration order never leaks into the bytes.
pub fn canonical_json(spec: &ArenaSpec) -> Result<String, ArenaError> {
    let value = serde_json::to_value(spec)?;
    Ok(serde_json::to_string(&value)?)
}

/// BLAKE3 hex digest of the canonical JSON
pub fn content_hash(spec: &ArenaSpec) -> Result<String, ArenaError> {
    let json = canonical_json(spec)?;
    Ok(blake3::hash(json.as_bytes()).to_hex().to_string())
}

/// A spec plus the digest it was sealed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaEnvelope {
    pub format: u32,
    pub digest: String,
    pub spec: ArenaSpec,
}

impl ArenaEnvelope {
    pub fn seal(spec: ArenaSpec) -> Result<Self, ArenaError> {
        let digest = content_hash(&spec)?;
        Ok(Self {
            format: ENVELOPE_FORMAT,
            digest,
            spec,
        })
    }

    /// Check format and digest, then hand back the arena
    pub fn open(self) -> Result<ArenaSpec, ArenaError> {
        if self.format != ENVELOPE_FORMAT {
            return Err(ArenaError::UnsupportedFormat {
                found: self.format,
                expected: ENVELOPE_FORMAT,
            });
        }
        let computed = content_hash(&self.spec)?;
        if computed != self.digest {
            log::warn!("Envelope digest mismatch for arena '{}'", self.spec.seed);
            return Err(ArenaError::DigestMismatch {
                expected: self.digest,
                computed,
            });
        }
        Ok(self.spec)
    }

    pub fn to_json(&self) -> Result<String, ArenaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ArenaError> {
        Ok(serde_json::from_str(json)?)
    }
}
