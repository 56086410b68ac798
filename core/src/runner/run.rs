use std::ffi::OsString;
use std::sync::Arc;

use tokio::io::AsyncWrite;

use crate::config::RunnerConfig;
use crate::style::Renderer;

use super::io_pump::{self, PumpStats};
use super::relay::SignalRelay;
use super::traits::RunnerPlugin;
use super::types::{RunState, RunnerResult, RunnerStartArgs};

pub struct RunSessionArgs<'a> {
    pub plugin: &'a dyn RunnerPlugin,
    pub start: RunnerStartArgs,
    pub renderer: Arc<Renderer>,
    pub output: Box<dyn AsyncWrite + Unpin + Send>,
}

/// `<program> <subcommand> <passthrough...>` with the inherited environment.
pub fn start_args<I>(cfg: &RunnerConfig, passthrough: I) -> RunnerStartArgs
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = vec![OsString::from(&cfg.subcommand)];
    args.extend(passthrough);
    RunnerStartArgs {
        cmd: cfg.program.clone(),
        args,
    }
}

fn transition(state: &mut RunState, next: RunState) {
    debug_assert!(!state.is_terminal(), "{state:?} is terminal");
    tracing::debug!(from = ?*state, to = ?next, "run state");
    *state = next;
}

/// Launch the child once, stream its output, relay signals to it, and derive
/// the exit code. Internal failures are logged and folded into exit code 1.
pub async fn run_session(args: RunSessionArgs<'_>) -> RunnerResult {
    let RunSessionArgs {
        plugin,
        start,
        renderer,
        output,
    } = args;

    let mut state = RunState::NotStarted;

    let mut session = match plugin.start_session(&start).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error.kind = "runner.spawn", program = %start.cmd, "{e:#}");
            transition(&mut state, RunState::FailedToLaunch);
            return RunnerResult {
                state,
                exit_code: state.exit_code().unwrap_or(1),
                duration_ms: None,
                lines: 0,
                suppressed: 0,
            };
        }
    };
    transition(&mut state, RunState::Running);

    // Registered before any child output is forwarded.
    let relay = session
        .forwarder()
        .and_then(|fwd| match SignalRelay::spawn(fwd) {
            Ok(relay) => Some(relay),
            Err(e) => {
                tracing::warn!(error = %e, "continuing without signal relay");
                None
            }
        });

    let pump_task = match session.output() {
        Some(rd) => Some(io_pump::pump(rd, output, renderer)),
        None => {
            tracing::warn!(runner = plugin.name(), "session exposes no output stream");
            None
        }
    };

    let (exit_code, duration_ms) = match session.wait().await {
        Ok(outcome) => (outcome.exit_code.unwrap_or(1), outcome.duration_ms),
        Err(e) => {
            tracing::error!(error.kind = "runner.wait", "{e:#}");
            (1, None)
        }
    };

    if let Some(relay) = relay {
        relay.stop().await;
    }
    drop(session);

    let stats = match pump_task {
        Some(task) => match task.await {
            Ok(Ok(stats)) => stats,
            Ok(Err(e)) => {
                tracing::error!(error.kind = "runner.stream", "{e}");
                PumpStats::default()
            }
            Err(e) => {
                tracing::error!(error.kind = "runner.stream", "output task failed: {e}");
                PumpStats::default()
            }
        },
        None => PumpStats::default(),
    };
    tracing::debug!(
        lines = stats.lines,
        suppressed = stats.suppressed,
        bytes = stats.bytes,
        "output drained"
    );

    let next = if exit_code == 0 {
        RunState::Succeeded
    } else {
        RunState::Terminated(exit_code)
    };
    transition(&mut state, next);

    RunnerResult {
        state,
        exit_code: state.exit_code().unwrap_or(exit_code),
        duration_ms,
        lines: stats.lines,
        suppressed: stats.suppressed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Palette;
    use crate::runner::traits::{RunnerSession, SignalForwarder};
    use crate::runner::types::{RunOutcome, Signal};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream};

    struct Scripted {
        output: &'static [u8],
        exit_code: Option<i32>,
        wait_fails: bool,
    }

    struct ScriptedSession {
        output: Option<DuplexStream>,
        exit_code: Option<i32>,
        wait_fails: bool,
    }

    struct Noop;

    impl SignalForwarder for Noop {
        fn forward(&self, _signal: Signal) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl RunnerPlugin for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn start_session(
            &self,
            _args: &RunnerStartArgs,
        ) -> anyhow::Result<Box<dyn RunnerSession>> {
            let (mut wr, rd) = tokio::io::duplex(64 * 1024);
            wr.write_all(self.output).await?;
            drop(wr);
            Ok(Box::new(ScriptedSession {
                output: Some(rd),
                exit_code: self.exit_code,
                wait_fails: self.wait_fails,
            }))
        }
    }

    #[async_trait]
    impl RunnerSession for ScriptedSession {
        fn output(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
            self.output
                .take()
                .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
        }

        fn forwarder(&self) -> Option<Arc<dyn SignalForwarder>> {
            Some(Arc::new(Noop))
        }

        async fn wait(&mut self) -> anyhow::Result<RunOutcome> {
            if self.wait_fails {
                anyhow::bail!("wait failed");
            }
            Ok(RunOutcome {
                exit_code: self.exit_code,
                duration_ms: Some(7),
            })
        }
    }

    struct Unlaunchable;

    #[async_trait]
    impl RunnerPlugin for Unlaunchable {
        fn name(&self) -> &str {
            "unlaunchable"
        }

        async fn start_session(
            &self,
            _args: &RunnerStartArgs,
        ) -> anyhow::Result<Box<dyn RunnerSession>> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file").into())
        }
    }

    async fn run(plugin: &dyn RunnerPlugin, skip_no_tests: bool) -> (RunnerResult, String) {
        let (out_wr, mut out_rd) = tokio::io::duplex(64 * 1024);
        let result = run_session(RunSessionArgs {
            plugin,
            start: start_args(&RunnerConfig::default(), Vec::new()),
            renderer: Arc::new(Renderer::with_ansi(
                Palette::default(),
                skip_no_tests,
                false,
            )),
            output: Box::new(out_wr),
        })
        .await;
        let mut out = String::new();
        out_rd.read_to_string(&mut out).await.unwrap();
        (result, out)
    }

    #[test]
    fn start_args_prepend_subcommand() {
        let args = start_args(
            &RunnerConfig::default(),
            ["-run".into(), "TestFoo".into(), "--".into()],
        );
        assert_eq!(args.cmd, "go");
        assert_eq!(args.args, vec!["test", "-run", "TestFoo", "--"]);
    }

    #[tokio::test]
    async fn drains_output_and_reports_success() {
        let plugin = Scripted {
            output: b"=== RUN   TestA\n--- PASS: TestA (0.00s)\nPASS\nok  \tpkg\t0.01s\n",
            exit_code: Some(0),
            wait_fails: false,
        };
        let (result, out) = run(&plugin, false).await;
        assert_eq!(result.state, RunState::Succeeded);
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.duration_ms, Some(7));
        assert_eq!(result.lines, 4);
        assert_eq!(
            out,
            "=== RUN   TestA\n--- PASS: TestA (0.00s)\nPASS\nok  \tpkg\t0.01s\n"
        );
    }

    #[tokio::test]
    async fn propagates_child_exit_code() {
        let plugin = Scripted {
            output: b"--- FAIL: TestFoo (0.00s)\nFAIL\n",
            exit_code: Some(2),
            wait_fails: false,
        };
        let (result, out) = run(&plugin, false).await;
        assert_eq!(result.state, RunState::Terminated(2));
        assert_eq!(result.exit_code, 2);
        assert_eq!(out, "--- FAIL: TestFoo (0.00s)\nFAIL\n");
    }

    #[tokio::test]
    async fn unavailable_status_maps_to_one() {
        let plugin = Scripted {
            output: b"",
            exit_code: None,
            wait_fails: false,
        };
        let (result, _) = run(&plugin, false).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.state, RunState::Terminated(1));

        let plugin = Scripted {
            output: b"",
            exit_code: Some(0),
            wait_fails: true,
        };
        let (result, _) = run(&plugin, false).await;
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.duration_ms, None);
    }

    #[tokio::test]
    async fn launch_failure_is_exit_one_without_output() {
        let (result, out) = run(&Unlaunchable, false).await;
        assert_eq!(result.state, RunState::FailedToLaunch);
        assert_eq!(result.exit_code, 1);
        assert_eq!(result.lines, 0);
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn counts_suppressed_lines() {
        let plugin = Scripted {
            output: b"?   \tpkg/a\t[no test files]\nok  \tpkg/b\t0.01s\n",
            exit_code: Some(0),
            wait_fails: false,
        };
        let (result, out) = run(&plugin, true).await;
        assert_eq!(result.lines, 2);
        assert_eq!(result.suppressed, 1);
        assert_eq!(out, "ok  \tpkg/b\t0.01s\n");
    }
}
