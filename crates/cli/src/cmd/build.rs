//! Implementation of the `ship build` command.
//!
//! Loads `project.json`, runs the build pipeline and prints a summary of the
//! stages that ran or were skipped.

use std::path::Path;

use anyhow::{Context, Result};

use shipwright_lib::build::{BuildReport, Orchestrator};
use shipwright_lib::config::{BuildMode, BuildOptions, ProjectOptions};
use shipwright_lib::execute::ProcessRunner;

use crate::output::{format_elapsed, print_info, print_stat, print_success};
use crate::reporter::TerminalReporter;

pub fn cmd_build(project_dir: &Path, debug: bool, force: bool, package: bool) -> Result<()> {
  let project = ProjectOptions::load(project_dir)?;
  let options = BuildOptions {
    mode: if debug { BuildMode::Debug } else { BuildMode::Release },
    force_rebuild: force,
    package,
    ..Default::default()
  };

  print_info(&format!("Building {} ({})", project.name, options.mode));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(run_build(&project, options))?;

  print_summary(&project, &report);
  Ok(())
}

/// Run the pipeline with real processes and terminal progress.
///
/// Shared with `ship serve`, which builds before running the binary.
pub(crate) async fn run_build(project: &ProjectOptions, options: BuildOptions) -> Result<BuildReport> {
  let runner = ProcessRunner;
  let reporter = TerminalReporter;
  let mut orchestrator = Orchestrator::new(project, options, &runner, &reporter);
  let report = orchestrator.run().await.context("Build failed")?;
  Ok(report)
}

fn print_summary(project: &ProjectOptions, report: &BuildReport) {
  println!();
  print_success(&format!("Built '{}'", project.binary_name));
  print_stat("Stages", &report.stages.len().to_string());
  print_stat("Skipped", &report.skipped().count().to_string());
  print_stat("Warnings", &report.warnings().count().to_string());
  print_stat("Elapsed", &format_elapsed(report.elapsed));
}
