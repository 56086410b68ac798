//! Wires configuration, the runner plugin and stdout together for one run.
use std::ffi::OsString;
use std::sync::Arc;

use gotest_core::api as core_api;

#[tracing::instrument(name = "cli.run_app", skip(cfg, passthrough))]
pub async fn run_app(cfg: &core_api::AppConfig, passthrough: Vec<OsString>) -> i32 {
    let plugin = gotest_plugins::factory::build_runner();
    let renderer = Arc::new(core_api::Renderer::new(&cfg.style));

    let result = core_api::run_session(core_api::RunSessionArgs {
        plugin: plugin.as_ref(),
        start: core_api::start_args(&cfg.runner, passthrough),
        renderer,
        output: Box::new(tokio::io::stdout()),
    })
    .await;

    tracing::debug!(
        state = ?result.state,
        exit_code = result.exit_code,
        lines = result.lines,
        suppressed = result.suppressed,
        duration_ms = ?result.duration_ms,
        "run finished"
    );
    result.exit_code
}
