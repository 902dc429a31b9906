//! Test utilities for shipwright-lib.
//!
//! Cross-platform helpers for tests that spawn real processes, plus a
//! recording runner for tests that must not.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::execute::{CommandRunner, CommandSpec, RunError};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_script(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

#[cfg(windows)]
pub fn shell_script(script: &str) -> (&'static str, Vec<String>) {
  ("cmd.exe", vec!["/C".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

#[cfg(windows)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  (
    "powershell.exe",
    vec![
      "-NoProfile".to_string(),
      "-Command".to_string(),
      format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
    ],
  )
}

/// Records every command it is asked to run and replays scripted outcomes.
///
/// Commands with no scripted outcome succeed.
#[derive(Default)]
pub struct RecordingRunner {
  calls: RefCell<Vec<CommandSpec>>,
  failures: RefCell<VecDeque<(String, i32)>>,
}

impl RecordingRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail the first command whose display text contains `needle`.
  pub fn fail_on(self, needle: &str, code: i32) -> Self {
    self.failures.borrow_mut().push_back((needle.to_string(), code));
    self
  }

  pub fn calls(&self) -> Vec<CommandSpec> {
    self.calls.borrow().clone()
  }
}

impl CommandRunner for RecordingRunner {
  async fn run(&self, spec: &CommandSpec) -> Result<(), RunError> {
    self.calls.borrow_mut().push(spec.clone());

    let text = spec.to_string();
    let mut failures = self.failures.borrow_mut();
    if let Some(pos) = failures.iter().position(|(needle, _)| text.contains(needle.as_str())) {
      let (_, code) = failures.remove(pos).unwrap_or_default();
      return Err(RunError::Exit {
        program: spec.program.clone(),
        code: Some(code),
      });
    }

    Ok(())
  }
}
