//! Opaque work identifiers.
//!
//! Ids look like `wk-3f9a0c12be`: a fixed prefix followed by ten lowercase
//! hex characters taken from a `blake3` digest. They are assigned once at
//! creation and never reused.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every generated work id.
pub const WORK_ID_PREFIX: &str = "wk-";

const DIGEST_CHARS: usize = 10;

/// Identifier of a stored work.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(String);

impl WorkId {
    /// Derive a fresh id from the creation timestamp, title and a nonce.
    ///
    /// Callers retry with a different nonce if the id is already taken.
    #[must_use]
    pub fn generate(created_at_ms: i64, title: &str, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&created_at_ms.to_le_bytes());
        hasher.update(title.as_bytes());
        hasher.update(&nonce.to_le_bytes());
        let digest = hasher.finalize().to_hex();
        Self(format!("{WORK_ID_PREFIX}{}", &digest[..DIGEST_CHARS]))
    }

    /// Wrap caller-supplied text without checking its shape.
    ///
    /// Lookups with a malformed id simply find nothing, so no validation
    /// is needed here.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for WorkId {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

impl AsRef<str> for WorkId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
