pub mod process;

pub(crate) use gotest_core::runner::{
    exit_code_of, RunOutcome, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal,
    SignalForwarder,
};
