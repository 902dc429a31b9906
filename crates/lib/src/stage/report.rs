//! Stage progress reporting.

use tracing::{error, info, warn};

use super::types::{StageError, StageKind};

/// Receives begin/skip/success/failure notifications for each stage.
pub trait StageReporter {
  fn begin(&self, stage: StageKind, description: &str);
  fn skipped(&self, stage: StageKind, reason: &str);
  fn succeeded(&self, stage: StageKind);
  fn failed(&self, stage: StageKind, error: &StageError);
  fn warn(&self, stage: StageKind, message: &str);
}

/// Reports stage progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl StageReporter for LogReporter {
  fn begin(&self, stage: StageKind, description: &str) {
    info!(%stage, "{}", description);
  }

  fn skipped(&self, stage: StageKind, reason: &str) {
    info!(%stage, "{}", reason);
  }

  fn succeeded(&self, stage: StageKind) {
    info!(%stage, "stage succeeded");
  }

  fn failed(&self, stage: StageKind, err: &StageError) {
    error!(%stage, error = %err, "stage failed");
  }

  fn warn(&self, stage: StageKind, message: &str) {
    warn!(%stage, "{}", message);
  }
}
