//! Plugins for optional OS integrations.
//!
//! Plugins sit outside the build pipeline. Each one is initialized with a
//! handle to its host, exposes a set of named operations to the frontend, and
//! is shut down when the host exits.

pub mod start_at_login;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use start_at_login::StartAtLogin;

#[derive(Debug, Error)]
pub enum PluginError {
  #[error("plugin {name} failed to initialize: {message}")]
  Init { name: String, message: String },

  #[error("plugin {0} is already registered")]
  Duplicate(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
  Debug,
  Info,
  Warn,
  Error,
}

impl fmt::Display for LogLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Debug => "DEBUG",
      Self::Info => "INFO",
      Self::Warn => "WARN",
      Self::Error => "ERROR",
    };
    write!(f, "{}", s)
  }
}

/// What a plugin may ask of the application hosting it.
pub trait PluginHost: Send + Sync {
  fn log(&self, level: LogLevel, message: &str);

  /// Bundle identifier of the running application, if it runs from a bundle.
  fn bundle_id(&self) -> Option<String>;
}

/// Lifecycle contract every plugin implements.
pub trait Plugin {
  /// Unique name, in module path form, e.g. `shipwright/plugins/start_at_login`.
  fn name(&self) -> &'static str;

  fn init(&mut self, host: Arc<dyn PluginHost>) -> Result<(), PluginError>;

  fn shutdown(&mut self);

  /// Operations callable from the frontend.
  fn exposed_operations(&self) -> BTreeSet<&'static str>;
}

/// Host that logs through `tracing` and reads the bundle id from the environment.
///
/// macOS sets `__CFBundleIdentifier` for processes launched from an app bundle.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvHost;

impl PluginHost for EnvHost {
  fn log(&self, level: LogLevel, message: &str) {
    match level {
      LogLevel::Debug => debug!("{}", message),
      LogLevel::Info => info!("{}", message),
      LogLevel::Warn => warn!("{}", message),
      LogLevel::Error => error!("{}", message),
    }
  }

  fn bundle_id(&self) -> Option<String> {
    std::env::var("__CFBundleIdentifier").ok().filter(|id| !id.is_empty())
  }
}

/// Owns plugins and drives their lifecycle.
///
/// Plugins are initialized in registration order and shut down in reverse.
#[derive(Default)]
pub struct PluginRegistry {
  plugins: Vec<Box<dyn Plugin>>,
  initialized: usize,
}

impl PluginRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
    if self.plugins.iter().any(|p| p.name() == plugin.name()) {
      return Err(PluginError::Duplicate(plugin.name().to_string()));
    }
    self.plugins.push(plugin);
    Ok(())
  }

  /// Initialize every registered plugin, stopping at the first error.
  ///
  /// Plugins initialized before the failure stay initialized and are shut
  /// down by `shutdown_all`.
  pub fn init_all(&mut self, host: Arc<dyn PluginHost>) -> Result<(), PluginError> {
    for plugin in self.plugins.iter_mut().skip(self.initialized) {
      debug!(plugin = plugin.name(), "initializing plugin");
      plugin.init(Arc::clone(&host))?;
      self.initialized += 1;
    }
    Ok(())
  }

  pub fn shutdown_all(&mut self) {
    for plugin in self.plugins[..self.initialized].iter_mut().rev() {
      debug!(plugin = plugin.name(), "shutting down plugin");
      plugin.shutdown();
    }
    self.initialized = 0;
  }

  pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.plugins.iter().map(|p| p.name())
  }

  /// Operations exposed by the named plugin.
  pub fn operations(&self, name: &str) -> Option<BTreeSet<&'static str>> {
    self
      .plugins
      .iter()
      .find(|p| p.name() == name)
      .map(|p| p.exposed_operations())
  }
}
