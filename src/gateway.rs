//! Provider gateway abstraction (C3).
//!
//! The engine never talks to the flight scraper or the train ticket
//! service directly — both are out of scope for this crate. Instead it
//! calls through a `ProviderGateway`, the same shape `MCPClientWorker`
//! exposes to its GUI caller: `call_tool(name, args, timeout)` returning a
//! string payload, with `is_running` flags so the scheduler can tell
//! whether a provider process is even available before it wastes a call.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Flight,
    Train,
}

#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    #[error("provider {0:?} is not running")]
    NotRunning(Provider),
    #[error("call to {tool} timed out after {timeout_secs}s")]
    Timeout { tool: String, timeout_secs: u64 },
}

#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Invokes a named tool with JSON-ish arguments and returns the raw
    /// string payload the provider replied with. A timeout is honoured by
    /// the implementation; callers should still wrap this with
    /// `tokio::time::timeout` defensively since a gateway may be backed by
    /// a subprocess that ignores its own deadline.
    async fn call_tool(
        &self,
        tool: &str,
        args: serde_json::Value,
        timeout: Duration,
    ) -> Result<String, GatewayError>;

    fn is_running(&self, provider: Provider) -> bool;
}

/// Wraps any gateway call with an engine-side timeout, turning an elapsed
/// deadline into the same synthetic-error shape a caller would see from a
/// slow subprocess, rather than letting the `Elapsed` type escape.
pub async fn call_with_timeout(
    gateway: &dyn ProviderGateway,
    tool: &str,
    args: serde_json::Value,
    timeout: Duration,
) -> Result<String, GatewayError> {
    match tokio::time::timeout(timeout, gateway.call_tool(tool, args, timeout)).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout {
            tool: tool.to_string(),
            timeout_secs: timeout.as_secs(),
        }),
    }
}
