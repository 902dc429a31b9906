//! Build orchestration.
//!
//! Runs the stages of a `BuildPlan` strictly in order and stops at the first
//! failure. The dependency install is the only stage that can be skipped: it
//! is skipped when the manifest fingerprint equals the record persisted by the
//! last successful install and no forced rebuild was requested.
//!
//! Per-run state machine:
//!
//! ```text
//! Validating → InstallingOrSkipping → CopyingAssets → BuildingFrontend → Compiling → Packaging → Done
//!      └──────────────┴─────────────────────┴───────────────┴───────────────┴───────────┴──→ Failed
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info};

use super::plan::BuildPlan;
use crate::config::{BuildOptions, ConfigError, ProjectOptions};
use crate::execute::{CommandRunner, RunError};
use crate::fingerprint::{FingerprintStore, ManifestFingerprint, ReadError};
use crate::stage::{
  SkipDecision, SkipPredicate, StageError, StageExecutor, StageKind, StageOutcome, StageReporter, StageResult,
};

/// Reason given when the dependency install is skipped.
pub const INSTALL_SKIPPED_REASON: &str = "Skipped frontend dependencies (-f to force rebuild)";

/// Errors that end a build run.
#[derive(Debug, Error)]
pub enum BuildError {
  /// Required configuration is missing. Raised before any process is spawned.
  #[error("invalid configuration: {0}")]
  ConfigInvalid(String),

  /// The dependency manifest could not be fingerprinted.
  #[error(transparent)]
  Read(#[from] ReadError),

  /// An external command failed to start or exited unsuccessfully.
  #[error("{stage} stage failed: {source}")]
  CommandFailed { stage: StageKind, source: RunError },

  #[error("{stage} stage failed: required input missing: {}", path.display())]
  MissingInput { stage: StageKind, path: PathBuf },

  #[error("{stage} stage failed: could not write {}: {source}", path.display())]
  AssetCopy {
    stage: StageKind,
    path: PathBuf,
    source: std::io::Error,
  },
}

impl BuildError {
  fn from_stage(stage: StageKind, err: StageError) -> Self {
    match err {
      StageError::Command(source) => Self::CommandFailed { stage, source },
      StageError::MissingInput { path } => Self::MissingInput { stage, path },
      StageError::AssetCopy { path, source } => Self::AssetCopy { stage, path, source },
    }
  }

  /// The stage that failed, if the error came from a stage.
  pub fn stage(&self) -> Option<StageKind> {
    match self {
      Self::CommandFailed { stage, .. } | Self::MissingInput { stage, .. } | Self::AssetCopy { stage, .. } => {
        Some(*stage)
      }
      Self::ConfigInvalid(_) | Self::Read(_) => None,
    }
  }
}

impl From<ConfigError> for BuildError {
  fn from(err: ConfigError) -> Self {
    match err {
      ConfigError::Invalid(message) => Self::ConfigInvalid(message),
      other => Self::ConfigInvalid(other.to_string()),
    }
  }
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
  Validating,
  InstallingOrSkipping,
  CopyingAssets,
  BuildingFrontend,
  Compiling,
  Packaging,
  Done,
  Failed,
}

impl BuildState {
  fn for_stage(kind: StageKind) -> Self {
    match kind {
      StageKind::Install => Self::InstallingOrSkipping,
      StageKind::Bridge => Self::CopyingAssets,
      StageKind::Frontend => Self::BuildingFrontend,
      StageKind::Compile => Self::Compiling,
      StageKind::Package => Self::Packaging,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Done | Self::Failed)
  }
}

impl fmt::Display for BuildState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Validating => "validating",
      Self::InstallingOrSkipping => "installing-or-skipping",
      Self::CopyingAssets => "copying-assets",
      Self::BuildingFrontend => "building-frontend",
      Self::Compiling => "compiling",
      Self::Packaging => "packaging",
      Self::Done => "done",
      Self::Failed => "failed",
    };
    write!(f, "{}", name)
  }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct BuildReport {
  /// One result per executed or skipped stage, in pipeline order.
  pub stages: Vec<StageResult>,
  pub elapsed: Duration,
}

impl BuildReport {
  pub fn result(&self, kind: StageKind) -> Option<&StageResult> {
    self.stages.iter().find(|r| r.kind == kind)
  }

  pub fn skipped(&self) -> impl Iterator<Item = StageKind> + '_ {
    self.stages.iter().filter(|r| r.is_skipped()).map(|r| r.kind)
  }

  pub fn warnings(&self) -> impl Iterator<Item = &str> + '_ {
    self.stages.iter().flat_map(|r| r.warnings.iter().map(String::as_str))
  }
}

/// What a run would do, computed without running anything.
#[derive(Debug)]
pub struct PlanPreview {
  pub plan: BuildPlan,
  pub install: SkipDecision,
  pub fingerprint: ManifestFingerprint,
}

/// Sequences the stages of one build.
pub struct Orchestrator<'a, R, P> {
  project: &'a ProjectOptions,
  options: BuildOptions,
  runner: &'a R,
  reporter: &'a P,
  store: FingerprintStore,
  state: BuildState,
}

impl<'a, R: CommandRunner, P: StageReporter> Orchestrator<'a, R, P> {
  pub fn new(project: &'a ProjectOptions, options: BuildOptions, runner: &'a R, reporter: &'a P) -> Self {
    Self {
      project,
      options,
      runner,
      reporter,
      store: FingerprintStore::new(),
      state: BuildState::Validating,
    }
  }

  pub fn state(&self) -> BuildState {
    self.state
  }

  /// Run the full pipeline, stopping at the first failing stage.
  ///
  /// Side effects of stages that already succeeded are left in place.
  pub async fn run(&mut self) -> Result<BuildReport, BuildError> {
    let started = Instant::now();
    self.state = BuildState::Validating;

    match self.run_stages().await {
      Ok(stages) => {
        self.advance(BuildState::Done);
        let report = BuildReport {
          stages,
          elapsed: started.elapsed(),
        };
        info!(elapsed = ?report.elapsed, "build finished");
        Ok(report)
      }
      Err(err) => {
        self.advance(BuildState::Failed);
        Err(err)
      }
    }
  }

  /// Validate, resolve the plan and decide on the install without running anything.
  pub fn preview(&self) -> Result<PlanPreview, BuildError> {
    self.project.validate(&self.options)?;
    let plan = BuildPlan::resolve(self.project, &self.options);
    let manifest = self.project.manifest_path();
    let fingerprint = ManifestFingerprint::of_file(&manifest)?;
    let install = self.install_decision(&manifest, &fingerprint);

    Ok(PlanPreview {
      plan,
      install,
      fingerprint,
    })
  }

  async fn run_stages(&mut self) -> Result<Vec<StageResult>, BuildError> {
    self.project.validate(&self.options)?;

    let plan = BuildPlan::resolve(self.project, &self.options);
    debug!(mode = %plan.mode, force = plan.force_rebuild, stages = plan.stages.len(), "resolved build plan");

    let executor = StageExecutor::new(self.runner, self.reporter);
    let mut results = Vec::with_capacity(plan.stages.len());

    for stage in &plan.stages {
      self.advance(BuildState::for_stage(stage.kind));

      let result = match &stage.skip {
        SkipPredicate::Never => executor.execute(stage, SkipDecision::Run).await,
        SkipPredicate::ManifestUnchanged { manifest } => {
          let fingerprint = ManifestFingerprint::of_file(manifest)?;
          let decision = self.install_decision(manifest, &fingerprint);
          let store = self.store;
          executor
            .execute_then(stage, decision, || store.save(manifest, &fingerprint))
            .await
        }
      };

      if let StageOutcome::Failed(err) = result.outcome {
        return Err(BuildError::from_stage(stage.kind, err));
      }
      results.push(result);
    }

    Ok(results)
  }

  /// Decide whether the install can be skipped for the current manifest.
  ///
  /// An unreadable record is treated as a cache miss.
  fn install_decision(&self, manifest: &Path, fingerprint: &ManifestFingerprint) -> SkipDecision {
    if self.options.force_rebuild {
      debug!("forced rebuild, ignoring fingerprint record");
      return SkipDecision::Run;
    }

    match self.store.load(manifest) {
      Ok(Some(record)) if fingerprint.matches(&record) => SkipDecision::Skip {
        reason: INSTALL_SKIPPED_REASON.to_string(),
      },
      Ok(Some(_)) => {
        debug!(manifest = %manifest.display(), "manifest changed since last install");
        SkipDecision::Run
      }
      Ok(None) => SkipDecision::Run,
      Err(err) => {
        self.reporter.warn(StageKind::Install, &err.to_string());
        SkipDecision::Run
      }
    }
  }

  fn advance(&mut self, next: BuildState) {
    if self.state.is_terminal() {
      return;
    }
    debug!(from = %self.state, to = %next, "build state");
    self.state = next;
  }
}
