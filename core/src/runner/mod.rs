mod exit;
mod io_pump;
mod relay;
mod run;
mod traits;
pub mod types;

pub use exit::{exit_code_of, SIGNALED_EXIT_CODE};
pub use io_pump::{pump, PumpStats};
pub use relay::SignalRelay;
pub use run::{run_session, start_args, RunSessionArgs};
pub use traits::{RunnerPlugin, RunnerSession, SignalForwarder};
pub use types::{RunOutcome, RunState, RunnerResult, RunnerStartArgs, Signal};
