//! Implementation of the `ship plan` command.
//!
//! Resolves the build plan and the install decision without spawning any
//! process, so the user can see what `ship build` would do.

use std::path::Path;

use anyhow::{Context, Result};

use shipwright_lib::build::Orchestrator;
use shipwright_lib::config::{BuildMode, BuildOptions, ProjectOptions};
use shipwright_lib::execute::ProcessRunner;
use shipwright_lib::stage::{LogReporter, SkipDecision, SkipPredicate, StageAction, StageDescriptor};

use crate::output::{OutputFormat, Status, print_json, print_stat, short_digest, status};

pub fn cmd_plan(project_dir: &Path, debug: bool, force: bool, package: bool, format: OutputFormat) -> Result<()> {
  let project = ProjectOptions::load(project_dir)?;
  let options = BuildOptions {
    mode: if debug { BuildMode::Debug } else { BuildMode::Release },
    force_rebuild: force,
    package,
    ..Default::default()
  };

  let orchestrator = Orchestrator::new(&project, options, &ProcessRunner, &LogReporter);
  let preview = orchestrator.preview().context("Failed to plan build")?;
  let plan = &preview.plan;

  if format.is_json() {
    let stages: Vec<_> = plan
      .stages
      .iter()
      .map(|stage| {
        serde_json::json!({
          "stage": stage.kind.as_str(),
          "description": stage.description,
          "action": describe_action(&stage.action),
          "cwd": action_cwd(&stage.action),
          "skipped": skip_reason(stage, &preview.install).is_some(),
        })
      })
      .collect();
    let json_output = serde_json::json!({
      "project": project.name,
      "project_dir": plan.project_dir,
      "binary": plan.binary_name,
      "mode": plan.mode,
      "force_rebuild": plan.force_rebuild,
      "bridge": plan.bridge.as_str(),
      "manifest_fingerprint": preview.fingerprint.as_str(),
      "stages": stages,
    });
    return print_json(&json_output);
  }

  println!("Plan for '{}'", project.name);
  print_stat("Mode", plan.mode.as_str());
  print_stat("Force rebuild", &plan.force_rebuild.to_string());
  print_stat("Manifest", short_digest(preview.fingerprint.as_str()));
  println!();

  for stage in &plan.stages {
    match skip_reason(stage, &preview.install) {
      Some(reason) => status(Status::Skip, &format!("{}: {}", stage.kind, reason)),
      None => println!(
        "  {} {}: {}",
        Status::Step.symbol(),
        stage.kind,
        describe_action(&stage.action)
      ),
    }
  }

  Ok(())
}

/// Why `stage` would be skipped, given the install decision.
fn skip_reason<'a>(stage: &StageDescriptor, install: &'a SkipDecision) -> Option<&'a str> {
  match (&stage.skip, install) {
    (SkipPredicate::ManifestUnchanged { .. }, SkipDecision::Skip { reason }) => Some(reason.as_str()),
    _ => None,
  }
}

fn describe_action(action: &StageAction) -> String {
  match action {
    StageAction::Run(spec) => spec.to_string(),
    StageAction::WriteAsset { target, .. } => format!("write {}", target.display()),
  }
}

fn action_cwd(action: &StageAction) -> Option<&Path> {
  match action {
    StageAction::Run(spec) => Some(&spec.cwd),
    StageAction::WriteAsset { .. } => None,
  }
}
