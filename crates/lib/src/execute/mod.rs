//! External command execution.
//!
//! Stages hand a `CommandSpec` to a `CommandRunner`. The production runner
//! spawns the process with inherited standard streams so users see live
//! progress; tests substitute a recording runner.

pub mod runner;

pub use runner::{CommandRunner, CommandSpec, ProcessRunner, RunError};
