//! Managed server port.
//!
//! Every operation may fail with a fault instead of returning a result; the
//! lifecycle exerciser converts faults into failed outcomes.

use async_trait::async_trait;

use crate::domain::{PluginConfig, ServerAction, StepResult};

/// The MCPO plugin under test.
#[async_trait]
pub trait ManagedServer: Send + Sync {
    /// Configuration snapshot captured when the plugin was constructed.
    fn config(&self) -> &PluginConfig;

    /// Start or stop the gateway process.
    async fn manage_server(&self, action: ServerAction) -> anyhow::Result<StepResult>;

    /// Probe the running gateway.
    async fn health_check(&self) -> anyhow::Result<StepResult>;

    /// Enumerate the tools exposed through the gateway.
    async fn list_tools(&self) -> anyhow::Result<StepResult>;
}
