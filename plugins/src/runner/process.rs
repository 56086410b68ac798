use super::{
    exit_code_of, RunOutcome, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal,
    SignalForwarder,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::PipeReader;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Launches the command with stdout and stderr sharing a single pipe, so the
/// reader sees both streams interleaved in the order they were written.
pub struct ProcessRunnerPlugin {}

impl ProcessRunnerPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProcessRunnerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunnerPlugin for ProcessRunnerPlugin {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> Result<Box<dyn RunnerSession>> {
        let (reader, writer) = std::io::pipe().context("create output pipe")?;
        let writer_err = writer.try_clone().context("duplicate output pipe")?;

        let mut cmd = Command::new(&args.cmd);
        cmd.args(&args.args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err);

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to launch `{}`", args.cmd))?;
        // The Command still owns our copies of the write end; once they are
        // closed, EOF on the reader means the child side is done.
        drop(cmd);

        let output = async_reader(reader).context("attach output pipe")?;
        let exited = Arc::new(AtomicBool::new(false));
        let forwarder = child.id().and_then(|pid| forwarder_for(pid, exited.clone()));
        tracing::debug!(cmd = %args.cmd, pid = ?child.id(), "child started");

        Ok(Box::new(ProcessRunnerSession {
            child,
            output: Some(output),
            forwarder,
            exited,
            started_at: Instant::now(),
        }))
    }
}

#[cfg(unix)]
fn async_reader(reader: PipeReader) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
    use std::os::fd::OwnedFd;
    let rx = tokio::net::unix::pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;
    Ok(Box::new(rx))
}

#[cfg(windows)]
fn async_reader(reader: PipeReader) -> std::io::Result<Box<dyn AsyncRead + Unpin + Send>> {
    use std::os::windows::io::OwnedHandle;
    let file = std::fs::File::from(OwnedHandle::from(reader));
    Ok(Box::new(tokio::fs::File::from_std(file)))
}

#[cfg(unix)]
fn forwarder_for(pid: u32, exited: Arc<AtomicBool>) -> Option<Arc<dyn SignalForwarder>> {
    let pid = i32::try_from(pid).ok()?;
    Some(Arc::new(PidForwarder {
        pid: nix::unistd::Pid::from_raw(pid),
        exited,
    }))
}

#[cfg(not(unix))]
fn forwarder_for(_pid: u32, _exited: Arc<AtomicBool>) -> Option<Arc<dyn SignalForwarder>> {
    None
}

#[cfg(unix)]
struct PidForwarder {
    pid: nix::unistd::Pid,
    exited: Arc<AtomicBool>,
}

#[cfg(unix)]
impl SignalForwarder for PidForwarder {
    fn forward(&self, signal: Signal) -> Result<()> {
        // Once reaped the pid may belong to someone else.
        if self.exited.load(Ordering::SeqCst) {
            anyhow::bail!("process {} already exited", self.pid);
        }
        let sig = nix::sys::signal::Signal::try_from(signal)
            .with_context(|| format!("unsupported signal {}", signal.as_raw()))?;
        nix::sys::signal::kill(self.pid, sig)
            .with_context(|| format!("kill({}, {})", self.pid, signal.name()))
    }
}

struct ProcessRunnerSession {
    child: Child,
    output: Option<Box<dyn AsyncRead + Unpin + Send>>,
    forwarder: Option<Arc<dyn SignalForwarder>>,
    exited: Arc<AtomicBool>,
    started_at: Instant,
}

#[async_trait]
impl RunnerSession for ProcessRunnerSession {
    fn output(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.output.take()
    }

    fn forwarder(&self) -> Option<Arc<dyn SignalForwarder>> {
        self.forwarder.clone()
    }

    async fn wait(&mut self) -> Result<RunOutcome> {
        let status = self.child.wait().await;
        self.exited.store(true, Ordering::SeqCst);
        let status = status.context("wait for child")?;
        tracing::debug!(%status, "child exited");
        Ok(RunOutcome {
            exit_code: exit_code_of(status),
            duration_ms: Some(self.started_at.elapsed().as_millis() as u64),
        })
    }
}
