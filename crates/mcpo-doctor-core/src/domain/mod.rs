//! Domain types for the diagnostic pipeline.

mod config;
mod manifest;
mod outcome;
mod step;

pub use config::{DEFAULT_MCPO_PORT, DEFAULT_STARTUP_TIMEOUT, PluginConfig};
pub use manifest::{MCP_SERVERS_FIELD, ServerEntry, ServerManifest};
pub use outcome::{CheckOutcome, Stage, Verdict};
pub use step::{SUCCESS_STATUS, ServerAction, StepResult, StepVerdict};
