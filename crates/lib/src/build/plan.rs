//! Build plan assembly.
//!
//! Turns project options and per-run build options into the ordered list of
//! stage descriptors the orchestrator executes.

use std::path::PathBuf;

use super::bridge::BridgeVariant;
use crate::config::{BuildMode, BuildOptions, ProjectOptions};
use crate::consts::BRIDGE_FILE;
use crate::execute::CommandSpec;
use crate::stage::{SkipPredicate, StageAction, StageDescriptor, StageKind};

/// The resolved, immutable configuration of one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
  pub project_dir: PathBuf,
  pub binary_name: String,
  pub mode: BuildMode,
  pub force_rebuild: bool,
  pub bridge: BridgeVariant,
  /// Stages in execution order.
  pub stages: Vec<StageDescriptor>,
}

impl BuildPlan {
  /// Resolve the plan for `project`. Assumes the project options were validated.
  pub fn resolve(project: &ProjectOptions, options: &BuildOptions) -> Self {
    let frontend_dir = project.frontend_dir();
    let manifest = project.manifest_path();

    let mut stages = vec![
      StageDescriptor {
        kind: StageKind::Install,
        description: "Installing frontend dependencies (This may take a while)...".to_string(),
        action: StageAction::Run(CommandSpec::shell(&project.frontend.install, &frontend_dir)),
        required_inputs: vec![frontend_dir.clone()],
        skip: SkipPredicate::ManifestUnchanged { manifest },
      },
      StageDescriptor {
        kind: StageKind::Bridge,
        description: format!("Copying {} runtime bridge...", options.bridge),
        action: StageAction::WriteAsset {
          contents: options.bridge.contents(),
          target: project.bridge_dir().join(BRIDGE_FILE),
        },
        required_inputs: vec![frontend_dir.clone()],
        skip: SkipPredicate::Never,
      },
      StageDescriptor {
        kind: StageKind::Frontend,
        description: "Building frontend...".to_string(),
        action: StageAction::Run(CommandSpec::shell(&project.frontend.build, &frontend_dir)),
        required_inputs: vec![frontend_dir],
        skip: SkipPredicate::Never,
      },
      StageDescriptor {
        kind: StageKind::Compile,
        description: compile_message(options.mode),
        action: StageAction::Run(
          CommandSpec::new(&project.compiler, &project.project_dir).args(compile_args(
            &project.binary_name,
            options.force_rebuild,
            options.mode,
            &project.build_mode_symbol,
          )),
        ),
        required_inputs: Vec::new(),
        skip: SkipPredicate::Never,
      },
    ];

    if let (true, Some(command)) = (options.package, project.package.as_deref()) {
      let required_inputs = if project.binary_name.is_empty() {
        Vec::new()
      } else {
        vec![project.project_dir.join(&project.binary_name)]
      };
      stages.push(StageDescriptor {
        kind: StageKind::Package,
        description: "Packaging application...".to_string(),
        action: StageAction::Run(CommandSpec::shell(command, &project.project_dir)),
        required_inputs,
        skip: SkipPredicate::Never,
      });
    }

    Self {
      project_dir: project.project_dir.clone(),
      binary_name: project.binary_name.clone(),
      mode: options.mode,
      force_rebuild: options.force_rebuild,
      bridge: options.bridge,
      stages,
    }
  }

  pub fn stage(&self, kind: StageKind) -> Option<&StageDescriptor> {
    self.stages.iter().find(|s| s.kind == kind)
  }
}

fn compile_message(mode: BuildMode) -> String {
  match mode {
    BuildMode::Debug => "Packing + Compiling project (Debug Mode)...".to_string(),
    BuildMode::Release => "Packing + Compiling project...".to_string(),
  }
}

/// Arguments passed to the compiler: `build [-o <name>] [-a] -ldflags "<flags>"`.
pub fn compile_args(binary_name: &str, force_rebuild: bool, mode: BuildMode, mode_symbol: &str) -> Vec<String> {
  let mut args = vec!["build".to_string()];

  if !binary_name.is_empty() {
    args.push("-o".to_string());
    args.push(binary_name.to_string());
  }

  if force_rebuild {
    args.push("-a".to_string());
  }

  args.push("-ldflags".to_string());
  args.push(ldflags(mode, mode_symbol));
  args
}

/// Linker flags: release strips symbol tables, both embed the build mode.
pub fn ldflags(mode: BuildMode, mode_symbol: &str) -> String {
  let strip = match mode {
    BuildMode::Release => "-w -s ",
    BuildMode::Debug => "",
  };
  format!("{}-X {}={}", strip, mode_symbol, mode)
}
