//! Build pipeline.
//!
//! - `plan`: resolve project and build options into ordered stage descriptors
//! - `orchestrator`: execute the plan with incremental install skipping
//! - `bridge`: runtime bridge assets written into the frontend tree

pub mod bridge;
pub mod orchestrator;
pub mod plan;

pub use bridge::BridgeVariant;
pub use orchestrator::{BuildError, BuildReport, BuildState, INSTALL_SKIPPED_REASON, Orchestrator, PlanPreview};
pub use plan::{BuildPlan, compile_args, ldflags};
