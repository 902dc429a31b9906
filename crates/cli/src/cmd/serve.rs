//! Implementation of the `ship serve` command.
//!
//! Builds the project in debug mode with the dev-server bridge, then runs the
//! binary in the foreground and reminds the user to start the frontend dev
//! server.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use shipwright_lib::build::BridgeVariant;
use shipwright_lib::config::{BuildMode, BuildOptions, ProjectOptions};
use shipwright_lib::consts::SERVE_REMINDER_DELAY_SECS;
use shipwright_lib::execute::ProcessRunner;
use shipwright_lib::serve::serve;

use super::build::run_build;
use crate::output::{print_info, print_success};

pub fn cmd_serve(project_dir: &Path, force: bool, reminder_delay: Option<Duration>) -> Result<()> {
  let reminder_delay = reminder_delay.unwrap_or(Duration::from_secs(SERVE_REMINDER_DELAY_SECS));
  let project = ProjectOptions::load(project_dir)?;
  let options = BuildOptions {
    mode: BuildMode::Debug,
    force_rebuild: force,
    package: false,
    bridge: BridgeVariant::Serve,
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(async {
    run_build(&project, options).await?;
    print_success(&format!("Serving '{}'", project.binary_name));

    serve(&project, &ProcessRunner, reminder_delay, |message| print_info(&message))
      .await
      .context("Application exited with an error")
  })?;

  Ok(())
}
