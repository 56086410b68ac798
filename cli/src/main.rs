mod app;

use gotest_core::config::LoggingConfig;
use gotest_core::error::CliError;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("gotest: {e}");
            1
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    // Dropped on return, before `process::exit`, so the log file is flushed.
    let _log_guard = init_tracing(&gotest_core::config::load_logging())?;
    let cfg = gotest_core::config::load_default();

    // Everything after the program name belongs to `go test`, verbatim.
    let passthrough: Vec<_> = std::env::args_os().skip(1).collect();
    Ok(app::run_app(&cfg, passthrough).await)
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>, CliError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(&logging.level).map_err(|e| {
            CliError::Config(format!("invalid log filter {:?}: {e}", logging.level))
        })?,
    };

    let (file_writer, guard) = match logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .map_err(|e| CliError::Logging(format!("create log dir failed: {e}")))?;
            let file_name = format!("gotest.{}.log", std::process::id());
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let file_layer = file_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}
