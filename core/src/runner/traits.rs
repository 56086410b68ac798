use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::types::{RunOutcome, RunnerStartArgs, Signal};

#[async_trait]
pub trait RunnerSession: Send {
    /// The child's stdout and stderr merged into one stream. Taken once.
    fn output(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    /// Handle used by the signal relay while `wait` is pending.
    fn forwarder(&self) -> Option<Arc<dyn SignalForwarder>>;
    async fn wait(&mut self) -> anyhow::Result<RunOutcome>;
}

#[async_trait]
pub trait RunnerPlugin: Send + Sync {
    fn name(&self) -> &str;
    async fn start_session(&self, args: &RunnerStartArgs)
        -> anyhow::Result<Box<dyn RunnerSession>>;
}

pub trait SignalForwarder: Send + Sync {
    fn forward(&self, signal: Signal) -> anyhow::Result<()>;
}
