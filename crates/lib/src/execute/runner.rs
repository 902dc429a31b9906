//! Command runner implementation.
//!
//! Every command carries an explicit working directory; the process-wide
//! current directory is never changed.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// Errors from running an external command.
#[derive(Debug, Error)]
pub enum RunError {
  /// The process could not be started.
  #[error("failed to start {program}: {source}")]
  Spawn { program: String, source: std::io::Error },

  /// The process exited unsuccessfully.
  #[error("{program} {}", exit_description(code))]
  Exit { program: String, code: Option<i32> },
}

fn exit_description(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exited with code {}", code),
    None => "was terminated by signal".to_string(),
  }
}

/// A fully resolved command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  pub cwd: PathBuf,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      cwd: cwd.into(),
    }
  }

  /// Run a configured command string (e.g. `npm install`) through the platform shell.
  pub fn shell(script: &str, cwd: impl Into<PathBuf>) -> Self {
    let (shell, shell_args) = get_shell();
    Self::new(shell, cwd).args(shell_args).arg(script)
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args.extend(args.into_iter().map(Into::into));
    self
  }
}

impl fmt::Display for CommandSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " {:?}", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// Runs a command to completion.
///
/// The returned future resolves only once the child process has exited.
pub trait CommandRunner {
  fn run(&self, spec: &CommandSpec) -> impl Future<Output = Result<(), RunError>>;
}

/// Spawns real processes with inherited stdout/stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<(), RunError> {
    info!(cmd = %spec, "executing command");
    debug!(working_dir = ?spec.cwd, "spawning process");

    let status = Command::new(&spec.program)
      .args(&spec.args)
      .current_dir(&spec.cwd)
      .status()
      .await
      .map_err(|source| RunError::Spawn {
        program: spec.program.clone(),
        source,
      })?;

    if !status.success() {
      return Err(RunError::Exit {
        program: spec.program.clone(),
        code: status.code(),
      });
    }

    Ok(())
  }
}

/// Get the shell command and arguments for the current platform.
///
/// Uses `/bin/sh` (Unix) or `cmd.exe` (Windows) rather than `$SHELL`, so user
/// profiles are not sourced.
fn get_shell() -> (&'static str, Vec<&'static str>) {
  #[cfg(unix)]
  {
    ("/bin/sh", vec!["-c"])
  }

  #[cfg(windows)]
  {
    ("cmd.exe", vec!["/C"])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{shell_script, touch_file};
  use tempfile::TempDir;

  #[test]
  fn shell_spec_wraps_script() {
    let spec = CommandSpec::shell("npm install", "/p/frontend");
    #[cfg(unix)]
    {
      assert_eq!(spec.program, "/bin/sh");
      assert_eq!(spec.args, vec!["-c", "npm install"]);
    }
    assert_eq!(spec.cwd, PathBuf::from("/p/frontend"));
  }

  #[test]
  fn display_quotes_args_with_spaces() {
    let spec = CommandSpec::new("go", "/p").args(["build", "-ldflags", "-w -s"]);
    assert_eq!(spec.to_string(), r#"go build -ldflags "-w -s""#);
  }

  #[tokio::test]
  async fn run_succeeds_on_zero_exit() {
    let temp = TempDir::new().unwrap();
    let (program, args) = shell_script("exit 0");

    let spec = CommandSpec::new(program, temp.path()).args(args);
    ProcessRunner.run(&spec).await.unwrap();
  }

  #[tokio::test]
  async fn run_reports_exit_code() {
    let temp = TempDir::new().unwrap();
    let (program, args) = shell_script("exit 3");

    let spec = CommandSpec::new(program, temp.path()).args(args);
    let err = ProcessRunner.run(&spec).await.unwrap_err();

    assert!(matches!(err, RunError::Exit { code: Some(3), .. }));
  }

  #[test]
  fn exit_error_shows_plain_code() {
    let err = RunError::Exit {
      program: "/bin/sh".into(),
      code: Some(7),
    };
    assert_eq!(err.to_string(), "/bin/sh exited with code 7");

    let err = RunError::Exit {
      program: "/bin/sh".into(),
      code: None,
    };
    assert_eq!(err.to_string(), "/bin/sh was terminated by signal");
  }

  #[tokio::test]
  async fn run_reports_spawn_failure() {
    let temp = TempDir::new().unwrap();
    let spec = CommandSpec::new("definitely-not-a-real-program-1f3a", temp.path());

    let err = ProcessRunner.run(&spec).await.unwrap_err();
    assert!(matches!(err, RunError::Spawn { .. }));
  }

  #[tokio::test]
  async fn run_uses_explicit_working_directory() {
    let temp = TempDir::new().unwrap();
    let sub_dir = temp.path().join("frontend");
    std::fs::create_dir(&sub_dir).unwrap();
    let (program, args) = touch_file("cwd_marker");

    ProcessRunner
      .run(&CommandSpec::new(program, &sub_dir).args(args))
      .await
      .unwrap();

    assert!(sub_dir.join("cwd_marker").exists());
    assert!(!temp.path().join("cwd_marker").exists());
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn shell_spec_runs_configured_command_string() {
    let temp = TempDir::new().unwrap();

    ProcessRunner
      .run(&CommandSpec::shell("echo built > out.txt", temp.path()))
      .await
      .unwrap();

    let out = std::fs::read_to_string(temp.path().join("out.txt")).unwrap();
    assert_eq!(out.trim(), "built");
  }
}
