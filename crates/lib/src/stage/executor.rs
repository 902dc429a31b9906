//! Stage execution.
//!
//! The executor gives every stage the same contract: report begin, run the
//! action, and apply the post-action only after the action succeeded.

use std::fmt::Display;

use tracing::debug;

use super::report::StageReporter;
use super::types::{SkipDecision, StageAction, StageDescriptor, StageError, StageOutcome, StageResult};
use crate::execute::CommandRunner;

pub struct StageExecutor<'a, R, P> {
  runner: &'a R,
  reporter: &'a P,
}

impl<'a, R: CommandRunner, P: StageReporter> StageExecutor<'a, R, P> {
  pub fn new(runner: &'a R, reporter: &'a P) -> Self {
    Self { runner, reporter }
  }

  /// Execute a stage that has no post-action.
  pub async fn execute(&self, stage: &StageDescriptor, decision: SkipDecision) -> StageResult {
    self
      .execute_then(stage, decision, || Ok::<(), std::convert::Infallible>(()))
      .await
  }

  /// Execute a stage, then run `post_action` if the stage action succeeded.
  ///
  /// A failing post-action is reported as a warning and does not fail the stage.
  pub async fn execute_then<F, E>(&self, stage: &StageDescriptor, decision: SkipDecision, post_action: F) -> StageResult
  where
    F: FnOnce() -> Result<(), E>,
    E: Display,
  {
    if let SkipDecision::Skip { reason } = decision {
      self.reporter.skipped(stage.kind, &reason);
      return StageResult {
        kind: stage.kind,
        outcome: StageOutcome::Skipped { reason },
        warnings: Vec::new(),
      };
    }

    self.reporter.begin(stage.kind, &stage.description);

    if let Err(err) = self.perform(stage).await {
      self.reporter.failed(stage.kind, &err);
      return StageResult {
        kind: stage.kind,
        outcome: StageOutcome::Failed(err),
        warnings: Vec::new(),
      };
    }

    let mut warnings = Vec::new();
    if let Err(err) = post_action() {
      let message = err.to_string();
      self.reporter.warn(stage.kind, &message);
      warnings.push(message);
    }

    self.reporter.succeeded(stage.kind);
    StageResult {
      kind: stage.kind,
      outcome: StageOutcome::Succeeded,
      warnings,
    }
  }

  async fn perform(&self, stage: &StageDescriptor) -> Result<(), StageError> {
    for input in &stage.required_inputs {
      if !input.exists() {
        return Err(StageError::MissingInput { path: input.clone() });
      }
    }

    match &stage.action {
      StageAction::Run(spec) => self.runner.run(spec).await?,
      StageAction::WriteAsset { contents, target } => {
        debug!(target = %target.display(), "writing asset");
        let asset_err = |source| StageError::AssetCopy {
          path: target.clone(),
          source,
        };
        if let Some(parent) = target.parent() {
          tokio::fs::create_dir_all(parent).await.map_err(asset_err)?;
        }
        tokio::fs::write(target, *contents).await.map_err(asset_err)?;
      }
    }

    Ok(())
  }
}
