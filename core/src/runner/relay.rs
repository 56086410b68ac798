use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::RunnerError;

use super::traits::SignalForwarder;
use super::types::Signal;

/// Background task forwarding signals received by this process to the child
/// until [`SignalRelay::stop`] is called.
pub struct SignalRelay {
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SignalRelay {
    /// Handlers are registered before this returns.
    pub fn spawn(forwarder: Arc<dyn SignalForwarder>) -> Result<Self, RunnerError> {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = platform::spawn(forwarder, stop_rx)?;
        Ok(Self { stop_tx, task })
    }

    pub async fn stop(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.task.await {
            tracing::debug!(error = %e, "signal relay task ended abnormally");
        }
    }
}

fn relay_one(forwarder: &dyn SignalForwarder, sig: Signal) {
    tracing::debug!(signal = sig.name(), "relaying signal to child");
    // The child may already be gone.
    if let Err(e) = forwarder.forward(sig) {
        tracing::debug!(signal = sig.name(), error = %e, "signal not delivered");
    }
}

#[cfg(unix)]
mod platform {
    use super::*;
    use futures::future::select_all;
    use tokio::signal::unix::{signal, SignalKind};

    pub(super) fn spawn(
        forwarder: Arc<dyn SignalForwarder>,
        mut stop_rx: oneshot::Receiver<()>,
    ) -> Result<JoinHandle<()>, RunnerError> {
        let mut streams = Vec::new();
        for sig in Signal::relayable() {
            match signal(SignalKind::from_raw(sig.as_raw())) {
                Ok(stream) => streams.push((sig, stream)),
                Err(e) => tracing::debug!(signal = sig.name(), error = %e, "signal not relayed"),
            }
        }
        if streams.is_empty() {
            return Err(RunnerError::Signal("no signal could be registered".to_string()));
        }

        Ok(tokio::spawn(async move {
            loop {
                let received = {
                    let recvs = streams.iter_mut().map(|(sig, stream)| {
                        let sig = *sig;
                        Box::pin(async move { stream.recv().await.map(|()| sig) })
                    });
                    tokio::select! {
                        _ = &mut stop_rx => return,
                        (got, _, _) = select_all(recvs) => got,
                    }
                };
                match received {
                    Some(sig) => relay_one(forwarder.as_ref(), sig),
                    None => return,
                }
            }
        }))
    }
}

#[cfg(not(unix))]
mod platform {
    use super::*;

    pub(super) fn spawn(
        _forwarder: Arc<dyn SignalForwarder>,
        _stop_rx: oneshot::Receiver<()>,
    ) -> Result<JoinHandle<()>, RunnerError> {
        Err(RunnerError::Signal(
            "signal relay is only available on Unix".to_string(),
        ))
    }
}
