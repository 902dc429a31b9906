//! Types describing pipeline stages and their outcomes.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::execute::{CommandSpec, RunError};

/// The stages of a build, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StageKind {
  Install,
  Bridge,
  Frontend,
  Compile,
  Package,
}

impl StageKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Install => "install",
      Self::Bridge => "bridge",
      Self::Frontend => "frontend",
      Self::Compile => "compile",
      Self::Package => "package",
    }
  }
}

impl fmt::Display for StageKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// What a stage does when it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageAction {
  /// Run an external command.
  Run(CommandSpec),
  /// Write a bundled asset to `target`, creating parent directories.
  WriteAsset { contents: &'static str, target: PathBuf },
}

/// When a stage may be skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipPredicate {
  /// Always runs.
  Never,
  /// Skippable when the manifest's fingerprint equals its persisted record.
  ManifestUnchanged { manifest: PathBuf },
}

/// One stage of a `BuildPlan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
  pub kind: StageKind,
  /// Human readable progress message, e.g. "Building frontend...".
  pub description: String,
  pub action: StageAction,
  /// Paths that must exist before the action runs.
  pub required_inputs: Vec<PathBuf>,
  pub skip: SkipPredicate,
}

/// Whether the executor should run a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipDecision {
  Run,
  Skip { reason: String },
}

/// Why a stage failed.
#[derive(Debug, Error)]
pub enum StageError {
  #[error("required input missing: {}", path.display())]
  MissingInput { path: PathBuf },

  #[error(transparent)]
  Command(#[from] RunError),

  #[error("failed to write {}: {source}", path.display())]
  AssetCopy { path: PathBuf, source: std::io::Error },
}

#[derive(Debug)]
pub enum StageOutcome {
  Skipped { reason: String },
  Succeeded,
  Failed(StageError),
}

/// Result of a single stage.
#[derive(Debug)]
pub struct StageResult {
  pub kind: StageKind,
  pub outcome: StageOutcome,
  /// Non-fatal problems, such as a fingerprint that could not be saved.
  pub warnings: Vec<String>,
}

impl StageResult {
  pub fn is_skipped(&self) -> bool {
    matches!(self.outcome, StageOutcome::Skipped { .. })
  }

  pub fn is_failed(&self) -> bool {
    matches!(self.outcome, StageOutcome::Failed(_))
  }
}
