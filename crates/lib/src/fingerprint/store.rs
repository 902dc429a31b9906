//! Fingerprint record storage.
//!
//! Each manifest has at most one record, a plain text file next to it:
//!
//! ```text
//! frontend/
//! ├── package.json
//! └── package.json.sha256   # digest of package.json at the last successful install
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::ManifestFingerprint;
use crate::consts::FINGERPRINT_EXT;

/// Errors from reading or writing fingerprint records.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("failed to read fingerprint record {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to persist fingerprint record {}: {source}", path.display())]
  Persist { path: PathBuf, source: io::Error },
}

/// The previously persisted fingerprint for a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintRecord(String);

impl FingerprintRecord {
  pub fn new(digest: impl Into<String>) -> Self {
    Self(digest.into())
  }

  pub fn digest(&self) -> &str {
    &self.0
  }
}

/// Reads and writes the sibling `<manifest>.sha256` record files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FingerprintStore;

impl FingerprintStore {
  pub fn new() -> Self {
    Self
  }

  /// Path of the record belonging to `manifest`.
  pub fn record_path(&self, manifest: &Path) -> PathBuf {
    let mut name = manifest.file_name().unwrap_or_default().to_os_string();
    name.push(".");
    name.push(FINGERPRINT_EXT);
    manifest.with_file_name(name)
  }

  /// Load the record for `manifest`.
  ///
  /// Returns `Ok(None)` if no record exists yet.
  pub fn load(&self, manifest: &Path) -> Result<Option<FingerprintRecord>, StoreError> {
    let path = self.record_path(manifest);

    match fs::read_to_string(&path) {
      Ok(content) => Ok(Some(FingerprintRecord::new(content.trim()))),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
      Err(source) => Err(StoreError::Read { path, source }),
    }
  }

  /// Overwrite the record for `manifest`.
  ///
  /// Uses atomic write (write to temp, then rename) so readers see either the
  /// old or the new digest.
  pub fn save(&self, manifest: &Path, fingerprint: &ManifestFingerprint) -> Result<(), StoreError> {
    let path = self.record_path(manifest);
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let persist_err = |source| StoreError::Persist {
      path: path.clone(),
      source,
    };

    let written = fs::write(&temp_path, fingerprint.as_str()).and_then(|()| fs::rename(&temp_path, &path));
    if let Err(source) = written {
      // Best effort; the temp file may never have been created.
      let _ = fs::remove_file(&temp_path);
      return Err(persist_err(source));
    }

    debug!(record = %path.display(), "fingerprint saved");
    Ok(())
  }
}
