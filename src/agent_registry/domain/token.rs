//! Agent authentication tokens.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Secret token issued once at agent registration.
///
/// The token is derived from fresh random material and is never
/// reissued; losing it requires re-registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Generates a fresh token from random UUID material.
    #[must_use]
    pub fn generate() -> Self {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(Uuid::new_v4().as_bytes());
        let digest = hasher.finalize();
        Self(digest.iter().map(|byte| format!("{byte:02x}")).collect())
    }

    /// Reconstructs a token from its persisted representation.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns whether the supplied secret matches this token.
    ///
    /// Comparison folds over every byte so the outcome does not depend
    /// on the position of the first mismatch.
    #[must_use]
    pub fn matches(&self, supplied: &str) -> bool {
        if self.0.len() != supplied.len() {
            return false;
        }
        self.0
            .bytes()
            .zip(supplied.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
