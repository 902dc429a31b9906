//! Pipeline stages.
//!
//! A stage is one independently succeeding or failing unit of the build:
//! dependency install, runtime bridge copy, frontend build, compile, package.

pub mod executor;
pub mod report;
pub mod types;

pub use executor::StageExecutor;
pub use report::{LogReporter, StageReporter};
pub use types::{
  SkipDecision, SkipPredicate, StageAction, StageDescriptor, StageError, StageKind, StageOutcome, StageResult,
};
