//! shipwright-lib: Core types and logic for shipwright
//!
//! This crate provides the incremental build pipeline used by the `ship` CLI:
//! - `ProjectOptions`: the project configuration loaded from `project.json`
//! - `ManifestFingerprint`: content digest of the frontend dependency manifest
//! - `FingerprintStore`: persisted fingerprints that let installs be skipped
//! - `Orchestrator`: runs install, bridge, frontend, compile and package stages
//! - `Plugin`: lifecycle contract for optional OS integrations

pub mod build;
pub mod config;
pub mod consts;
pub mod execute;
pub mod fingerprint;
pub mod platform;
pub mod plugin;
pub mod serve;
pub mod stage;
pub mod util;
