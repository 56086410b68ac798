#![cfg(unix)]

use std::ffi::OsString;
use std::sync::Arc;

use gotest_core::api::{
    run_session, start_args, Palette, Renderer, RunSessionArgs, RunState, RunnerConfig,
    RunnerResult, SIGNALED_EXIT_CODE,
};
use gotest_plugins::runner::process::ProcessRunnerPlugin;
use pretty_assertions::assert_eq;
use tokio::io::AsyncReadExt;

fn sh() -> RunnerConfig {
    RunnerConfig {
        program: "sh".to_string(),
        subcommand: "-c".to_string(),
    }
}

async fn run_script(
    cfg: &RunnerConfig,
    script: &str,
    skip_no_tests: bool,
) -> (RunnerResult, String) {
    let plugin = ProcessRunnerPlugin::new();
    let (out_wr, mut out_rd) = tokio::io::duplex(64 * 1024);
    let result = run_session(RunSessionArgs {
        plugin: &plugin,
        start: start_args(cfg, [OsString::from(script)]),
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

#[tokio::test]
async fn propagates_exit_code_two() {
    let (result, out) =
        run_script(&sh(), "echo '--- FAIL: TestFoo (0.00s)'; exit 2", false).await;
    assert_eq!(result.exit_code, 2);
    assert_eq!(result.state, RunState::Terminated(2));
    assert_eq!(out, "--- FAIL: TestFoo (0.00s)\n");
}

#[tokio::test]
async fn success_is_zero() {
    let (result, out) = run_script(&sh(), "printf 'PASS\\nok  \\tpkg\\t0.01s\\n'", false).await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.state, RunState::Succeeded);
    assert_eq!(result.lines, 2);
    assert_eq!(out, "PASS\nok  \tpkg\t0.01s\n");
}

#[tokio::test]
async fn missing_executable_is_exit_one() {
    let cfg = RunnerConfig {
        program: "gotest-definitely-not-a-real-binary".to_string(),
        subcommand: "test".to_string(),
    };
    let (result, out) = run_script(&cfg, "./...", false).await;
    assert_eq!(result.exit_code, 1);
    assert_eq!(result.state, RunState::FailedToLaunch);
    assert_eq!(out, "");
}

#[tokio::test]
async fn stdout_and_stderr_share_one_stream() {
    let (result, out) =
        run_script(&sh(), "echo one; echo two 1>&2; echo three", false).await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(out, "one\ntwo\nthree\n");
}

#[tokio::test]
async fn signal_terminated_child_has_no_exit_code_of_its_own() {
    let (result, _) = run_script(&sh(), "kill -TERM $$", false).await;
    assert_eq!(result.exit_code, SIGNALED_EXIT_CODE);
    assert_eq!(result.state, RunState::Terminated(SIGNALED_EXIT_CODE));
}

#[tokio::test]
async fn child_stdin_is_closed() {
    let (result, out) = run_script(&sh(), "cat; echo done", false).await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(out, "done\n");
}

#[tokio::test]
async fn inherits_environment() {
    let (result, out) = run_script(&sh(), "echo \"${PATH:+has-path}\"", false).await;
    assert_eq!(result.exit_code, 0);
    assert_eq!(out, "has-path\n");
}

#[tokio::test]
async fn no_test_files_lines_are_dropped_when_configured() {
    let script = "printf '?   \\tpkg/a\\t[no test files]\\nok  \\tpkg/b\\t0.01s\\n'";
    let (result, out) = run_script(&sh(), script, true).await;
    assert_eq!(result.suppressed, 1);
    assert_eq!(out, "ok  \tpkg/b\t0.01s\n");
}

#[tokio::test]
async fn trailing_partial_line_is_emitted() {
    let (_, out) = run_script(&sh(), "printf 'no newline'", false).await;
    assert_eq!(out, "no newline\n");
}
