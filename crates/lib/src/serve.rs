//! Serving a built application.
//!
//! Runs the compiled binary in the foreground. A detached reminder tells the
//! user how to start the frontend dev server once the application has had a
//! moment to come up; it is never awaited and has no ordering guarantee
//! relative to the application's own output.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ProjectOptions;
use crate::execute::{CommandRunner, CommandSpec, RunError};

#[derive(Debug, Error)]
pub enum ServeError {
  #[error("no binary name set in project.json")]
  NoBinaryName,

  #[error("binary not found: {} (run 'ship build' first)", path.display())]
  MissingBinary { path: PathBuf },

  #[error(transparent)]
  Run(#[from] RunError),
}

/// Message shown to the user after the application starts.
pub fn reminder_message(project: &ProjectOptions) -> String {
  format!(
    ">>>>> To connect, you will need to run '{}' in the '{}' directory <<<<<",
    project.frontend.serve, project.frontend.dir
  )
}

/// Schedule `notify` to run after `delay` on a background task.
///
/// Must be called from within a tokio runtime. The returned handle may be
/// dropped; the task keeps running until the runtime shuts down.
pub fn schedule_reminder<F>(delay: Duration, notify: F) -> JoinHandle<()>
where
  F: FnOnce() + Send + 'static,
{
  tokio::spawn(async move {
    tokio::time::sleep(delay).await;
    notify();
  })
}

/// Absolute path of the project's binary.
pub fn binary_path(project: &ProjectOptions) -> Result<PathBuf, ServeError> {
  if project.binary_name.is_empty() {
    return Err(ServeError::NoBinaryName);
  }
  Ok(project.project_dir.join(&project.binary_name))
}

/// Run the project's binary until it exits, with a delayed reminder.
pub async fn serve<R, F>(project: &ProjectOptions, runner: &R, reminder_delay: Duration, notify: F) -> Result<(), ServeError>
where
  R: CommandRunner,
  F: FnOnce(String) + Send + 'static,
{
  let location = binary_path(project)?;
  if !location.exists() {
    return Err(ServeError::MissingBinary { path: location });
  }

  let message = reminder_message(project);
  schedule_reminder(reminder_delay, move || notify(message));

  info!(binary = %location.display(), "serving application");
  let spec = CommandSpec::new(location.to_string_lossy(), &project.project_dir);
  runner.run(&spec).await?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  use tempfile::TempDir;
  use tokio::sync::oneshot;

  use crate::config::FrontendOptions;
  use crate::util::testutil::RecordingRunner;

  fn project(dir: &std::path::Path) -> ProjectOptions {
    ProjectOptions {
      name: "demo".into(),
      binary_name: "demo".into(),
      frontend: FrontendOptions {
        dir: "frontend".into(),
        serve: "npm run serve".into(),
        ..Default::default()
      },
      compiler: "go".into(),
      build_mode_symbol: "main.BuildMode".into(),
      package: None,
      project_dir: dir.to_path_buf(),
    }
  }

  #[test]
  fn reminder_names_serve_command_and_directory() {
    let temp = TempDir::new().unwrap();
    let message = reminder_message(&project(temp.path()));
    assert!(message.contains("'npm run serve'"));
    assert!(message.contains("'frontend' directory"));
  }

  #[tokio::test]
  async fn reminder_fires_after_delay() {
    let (tx, rx) = oneshot::channel();
    schedule_reminder(Duration::from_millis(10), move || {
      let _ = tx.send("fired");
    });

    assert_eq!(rx.await.unwrap(), "fired");
  }

  #[tokio::test]
  async fn serve_runs_binary_from_project_dir() {
    let temp = TempDir::new().unwrap();
    let project = project(temp.path());
    fs::write(temp.path().join("demo"), "").unwrap();
    let runner = RecordingRunner::new();

    serve(&project, &runner, Duration::from_secs(60), |_| {}).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(PathBuf::from(&calls[0].program), temp.path().join("demo"));
    assert_eq!(calls[0].cwd, temp.path());
  }

  #[tokio::test]
  async fn serve_requires_built_binary() {
    let temp = TempDir::new().unwrap();
    let runner = RecordingRunner::new();

    let err = serve(&project(temp.path()), &runner, Duration::from_secs(60), |_| {})
      .await
      .unwrap_err();

    assert!(matches!(err, ServeError::MissingBinary { .. }));
    assert!(runner.calls().is_empty());
  }

  #[test]
  fn binary_name_required() {
    let temp = TempDir::new().unwrap();
    let mut project = project(temp.path());
    project.binary_name.clear();
    assert!(matches!(binary_path(&project), Err(ServeError::NoBinaryName)));
  }
}
