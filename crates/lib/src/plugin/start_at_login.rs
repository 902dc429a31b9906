//! Launch the application when the user logs in.
//!
//! On macOS login items are registered by bundle identifier, so the plugin
//! disables itself when the application is not running from a bundle.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{LogLevel, Plugin, PluginError, PluginHost};
use crate::platform::Os;

pub const NAME: &str = "shipwright/plugins/start_at_login";

pub struct StartAtLogin {
  os: Option<Os>,
  host: Option<Arc<dyn PluginHost>>,
  disabled: bool,
}

impl StartAtLogin {
  pub fn new() -> Self {
    Self::for_os(Os::current())
  }

  /// Build the plugin as if running on `os`.
  pub fn for_os(os: Option<Os>) -> Self {
    Self {
      os,
      host: None,
      disabled: false,
    }
  }

  pub fn is_disabled(&self) -> bool {
    self.disabled
  }
}

impl Default for StartAtLogin {
  fn default() -> Self {
    Self::new()
  }
}

impl Plugin for StartAtLogin {
  fn name(&self) -> &'static str {
    NAME
  }

  fn init(&mut self, host: Arc<dyn PluginHost>) -> Result<(), PluginError> {
    if self.os == Some(Os::MacOs) && host.bundle_id().is_none() {
      host.log(
        LogLevel::Info,
        "Application is not in bundle. StartAtLogin will not work.",
      );
      self.disabled = true;
    }
    self.host = Some(host);
    Ok(())
  }

  fn shutdown(&mut self) {
    if let Some(host) = self.host.take() {
      host.log(LogLevel::Debug, "StartAtLogin shut down");
    }
  }

  fn exposed_operations(&self) -> BTreeSet<&'static str> {
    BTreeSet::from(["StartAtLogin", "IsStartAtLogin"])
  }
}
