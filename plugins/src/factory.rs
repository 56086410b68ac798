use gotest_core::runner::RunnerPlugin;

use crate::runner::process::ProcessRunnerPlugin;

pub fn build_runner() -> Box<dyn RunnerPlugin> {
    Box::new(ProcessRunnerPlugin::new())
}
