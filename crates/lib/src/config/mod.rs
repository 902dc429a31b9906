//! Project configuration.
//!
//! A project is described by `project.json` in its root directory:
//!
//! ```json
//! {
//!   "name": "app",
//!   "binaryname": "app",
//!   "frontend": {
//!     "dir": "frontend",
//!     "install": "npm install",
//!     "build": "npm run build",
//!     "serve": "npm run serve",
//!     "bridge": "src"
//!   }
//! }
//! ```
//!
//! Per-invocation choices (build mode, forced rebuild, packaging) live in
//! `BuildOptions` and come from the caller.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::build::BridgeVariant;
use crate::consts::{DEFAULT_BUILD_MODE_SYMBOL, DEFAULT_COMPILER, DEFAULT_MANIFEST, PROJECT_FILE};

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("project file not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("failed to read project file {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse project file {}: {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("{0}")]
  Invalid(String),
}

/// Frontend section of `project.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendOptions {
  /// Frontend directory, relative to the project root.
  pub dir: String,
  /// Dependency install command, e.g. `npm install`.
  pub install: String,
  /// Frontend build command, e.g. `npm run build`.
  pub build: String,
  /// Development server command, only shown to the user by `ship serve`.
  pub serve: String,
  /// Directory inside the frontend that receives the runtime bridge.
  pub bridge: String,
  /// Dependency manifest inside the frontend directory.
  pub manifest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectOptions {
  #[serde(default)]
  pub name: String,

  #[serde(default, rename = "binaryname")]
  pub binary_name: String,

  #[serde(default)]
  pub frontend: FrontendOptions,

  #[serde(default = "default_compiler")]
  pub compiler: String,

  #[serde(default = "default_build_mode_symbol", rename = "buildmodesymbol")]
  pub build_mode_symbol: String,

  /// Platform packaging command, run after a successful compile when requested.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub package: Option<String>,

  /// Absolute project root. Not part of the file.
  #[serde(skip)]
  pub project_dir: PathBuf,
}

fn default_compiler() -> String {
  DEFAULT_COMPILER.to_string()
}

fn default_build_mode_symbol() -> String {
  DEFAULT_BUILD_MODE_SYMBOL.to_string()
}

impl ProjectOptions {
  /// Load `project.json` from `project_dir`.
  pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
    let path = project_dir.join(PROJECT_FILE);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ConfigError::NotFound { path }),
      Err(source) => return Err(ConfigError::Read { path, source }),
    };

    let mut options: ProjectOptions =
      serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;

    options.project_dir = dunce::canonicalize(project_dir).unwrap_or_else(|_| project_dir.to_path_buf());
    debug!(project = %options.project_dir.display(), name = %options.name, "loaded project options");

    Ok(options)
  }

  /// Check that everything the pipeline needs is configured.
  pub fn validate(&self, build: &BuildOptions) -> Result<(), ConfigError> {
    let frontend = &self.frontend;
    if frontend.dir.is_empty() {
      return Err(invalid("Frontend directory not set in project.json"));
    }
    if frontend.build.is_empty() {
      return Err(invalid("Frontend build command not set in project.json"));
    }
    if frontend.install.is_empty() {
      return Err(invalid("Frontend install command not set in project.json"));
    }
    if frontend.bridge.is_empty() {
      return Err(invalid("Frontend bridge config not set in project.json"));
    }
    if self.compiler.is_empty() {
      return Err(invalid("Compiler not set in project.json"));
    }
    if self.binary_name.contains(['/', '\\']) {
      return Err(invalid(&format!(
        "Binary name '{}' must be a file name, not a path",
        self.binary_name
      )));
    }
    if build.package && self.package.as_deref().is_none_or(str::is_empty) {
      return Err(invalid("Packaging requested but no package command set in project.json"));
    }
    Ok(())
  }

  pub fn frontend_dir(&self) -> PathBuf {
    self.project_dir.join(&self.frontend.dir)
  }

  /// Path of the dependency manifest that drives install skipping.
  pub fn manifest_path(&self) -> PathBuf {
    let manifest = if self.frontend.manifest.is_empty() {
      DEFAULT_MANIFEST
    } else {
      &self.frontend.manifest
    };
    self.frontend_dir().join(manifest)
  }

  pub fn bridge_dir(&self) -> PathBuf {
    self.frontend_dir().join(&self.frontend.bridge)
  }
}

fn invalid(message: &str) -> ConfigError {
  ConfigError::Invalid(message.to_string())
}

/// Compilation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
  Debug,
  #[default]
  Release,
}

impl BuildMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "debug",
      Self::Release => "release",
    }
  }
}

impl fmt::Display for BuildMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for BuildMode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "debug" => Ok(Self::Debug),
      "release" => Ok(Self::Release),
      other => Err(ConfigError::Invalid(format!(
        "unknown build mode '{}' (expected debug or release)",
        other
      ))),
    }
  }
}

/// Per-invocation build choices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
  pub mode: BuildMode,
  /// Ignore the install cache and pass `-a` to the compiler.
  pub force_rebuild: bool,
  /// Run the packaging stage after compiling.
  pub package: bool,
  pub bridge: BridgeVariant,
}
