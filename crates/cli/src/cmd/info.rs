//! Implementation of the `ship info` command.

use std::sync::Arc;

use anyhow::{Context, Result};

use shipwright_lib::platform::platform_triple;
use shipwright_lib::plugin::{EnvHost, PluginHost, PluginRegistry, StartAtLogin};

use crate::output::{print_stat, print_warning};

pub fn cmd_info(verbose: bool) -> Result<()> {
  println!("System:");
  print_stat("Platform", &platform_triple());
  print_stat("Version", env!("CARGO_PKG_VERSION"));

  let host = Arc::new(EnvHost);
  if let Some(bundle_id) = host.bundle_id() {
    print_stat("Bundle", &bundle_id);
  }

  let mut registry = PluginRegistry::new();
  registry
    .register(Box::new(StartAtLogin::new()))
    .context("Failed to register plugins")?;

  if let Err(err) = registry.init_all(host) {
    print_warning(&err.to_string());
  }

  println!();
  println!("Plugins:");
  for name in registry.names() {
    print_stat("Plugin", name);
    if verbose {
      for operation in registry.operations(name).unwrap_or_default() {
        println!("    {}", operation);
      }
    }
  }

  registry.shutdown_all();
  Ok(())
}
