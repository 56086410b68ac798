//! Stable re-exports for consumers (`cli`, `plugins`, and integration tests).
//!
//! Prefer importing from `gotest_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, load_from, load_logging, AppConfig, ColorMode, LoggingConfig, Palette,
    RunnerConfig, StyleConfig,
};
pub use crate::error::{CliError, RunnerError};
pub use crate::runner::{
    run_session, start_args, RunOutcome, RunSessionArgs, RunState, RunnerPlugin, RunnerResult,
    RunnerSession, RunnerStartArgs, Signal, SignalForwarder, SIGNALED_EXIT_CODE,
};
pub use crate::style::{classify, Renderer, Style};
