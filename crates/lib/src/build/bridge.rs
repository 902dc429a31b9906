//! Runtime bridge assets bundled into the binary.

use std::fmt;

const SERVE_BRIDGE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/bridge/runtimebridge.js"));
const PRODUCTION_BRIDGE: &str = include_str!(concat!(
  env!("CARGO_MANIFEST_DIR"),
  "/assets/bridge/runtimebridge.prod.js"
));

/// Which bridge script is written into the frontend tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BridgeVariant {
  /// Talks to a running application from the frontend dev server.
  Serve,
  #[default]
  Production,
}

impl BridgeVariant {
  pub fn contents(&self) -> &'static str {
    match self {
      Self::Serve => SERVE_BRIDGE,
      Self::Production => PRODUCTION_BRIDGE,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Serve => "serve",
      Self::Production => "production",
    }
  }
}

impl fmt::Display for BridgeVariant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
