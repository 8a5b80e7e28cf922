//! Runtime adapter for `mcpo-doctor`.
//!
//! Provides the concrete MCPO plugin the diagnostic exercises: the plugin
//! configuration loader, gateway process control with PID file tracking,
//! and the HTTP probes used for health checks and tool listing.
#![deny(unused_crate_dependencies)]

pub mod health;
pub mod paths;
pub mod pidfile;
mod plugin;
pub mod process;
pub mod settings;
pub mod tools;

pub use plugin::McpoPlugin;
pub use settings::{ConfigLoadError, PLUGIN_ENV_FILE, load_plugin_config};
