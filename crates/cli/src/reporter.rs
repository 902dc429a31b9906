//! Terminal rendering of stage progress.

use shipwright_lib::stage::{StageError, StageKind, StageReporter};

use crate::output::{Status, print_error, print_success, print_warning, status};

/// Prints one line per stage event with the CLI's status symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter;

impl StageReporter for TerminalReporter {
  fn begin(&self, _stage: StageKind, description: &str) {
    status(Status::Step, description);
  }

  fn skipped(&self, _stage: StageKind, reason: &str) {
    status(Status::Skip, reason);
  }

  fn succeeded(&self, stage: StageKind) {
    print_success(&format!("{} done", stage));
  }

  fn failed(&self, stage: StageKind, error: &StageError) {
    print_error(&format!("{} failed: {}", stage, error));
  }

  fn warn(&self, _stage: StageKind, message: &str) {
    print_warning(message);
  }
}
