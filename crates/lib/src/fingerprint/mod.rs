//! Dependency manifest fingerprints.
//!
//! A fingerprint is the SHA-256 digest of the manifest's bytes. Comparing it
//! with the fingerprint persisted by the previous successful install tells the
//! orchestrator whether the dependency install can be skipped.

pub mod store;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::hash::{ContentHash, hash_bytes, hash_file};

pub use store::{FingerprintRecord, FingerprintStore, StoreError};

/// The manifest could not be read, so no fingerprint can be produced.
#[derive(Debug, Error)]
#[error("failed to read manifest {}: {source}", path.display())]
pub struct ReadError {
  pub path: PathBuf,
  #[source]
  pub source: std::io::Error,
}

/// Digest of a manifest file's bytes at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestFingerprint(ContentHash);

impl ManifestFingerprint {
  /// Fingerprint raw manifest bytes.
  pub fn of_bytes(data: &[u8]) -> Self {
    Self(hash_bytes(data))
  }

  /// Read and fingerprint a manifest file.
  pub fn of_file(path: &Path) -> Result<Self, ReadError> {
    hash_file(path).map(Self).map_err(|e| ReadError {
      path: e.path,
      source: e.source,
    })
  }

  /// Lowercase hex digest.
  pub fn as_str(&self) -> &str {
    &self.0.0
  }

  /// Whether a persisted record holds this exact digest.
  pub fn matches(&self, record: &FingerprintRecord) -> bool {
    record.digest() == self.as_str()
  }
}

impl std::fmt::Display for ManifestFingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}
