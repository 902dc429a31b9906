//! Host platform detection.

use std::fmt;

/// Operating systems plugins and packaging distinguish between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    Self::from_target(std::env::consts::OS)
  }

  fn from_target(os: &str) -> Option<Self> {
    match os {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "windows",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Platform identifier for display, e.g. `aarch64-darwin`.
///
/// Falls back to the raw target names when the OS is not one of `Os`.
pub fn platform_triple() -> String {
  let os = Os::current().map_or(std::env::consts::OS, |os| os.as_str());
  format!("{}-{}", std::env::consts::ARCH, os)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn macos_uses_darwin_identifier() {
    assert_eq!(Os::from_target("macos"), Some(Os::MacOs));
    assert_eq!(Os::MacOs.as_str(), "darwin");
  }

  #[test]
  fn unknown_os_is_none() {
    assert_eq!(Os::from_target("plan9"), None);
  }

  #[test]
  fn triple_ends_with_os() {
    let triple = platform_triple();
    assert!(triple.starts_with(std::env::consts::ARCH));
    assert!(triple.contains('-'));
  }
}
