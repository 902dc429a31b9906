mod build;
mod info;
mod plan;
mod serve;

pub use build::cmd_build;
pub use info::cmd_info;
pub use plan::cmd_plan;
pub use serve::cmd_serve;
