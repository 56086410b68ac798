use std::ffi::OsString;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// `None` when the platform could not report a numeric status.
    pub exit_code: Option<i32>,
    pub duration_ms: Option<u64>,
}

/// A signal number received by this process and relayed to the child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signal(i32);

impl Signal {
    pub const fn from_raw(signo: i32) -> Self {
        Self(signo)
    }

    pub const fn as_raw(self) -> i32 {
        self.0
    }

    pub fn name(self) -> &'static str {
        #[cfg(unix)]
        {
            nix::sys::signal::Signal::try_from(self.0)
                .map(|s| s.as_str())
                .unwrap_or("unknown signal")
        }
        #[cfg(not(unix))]
        {
            "signal"
        }
    }
}

#[cfg(unix)]
impl Signal {
    /// Every signal this process can catch and hand on to the child.
    /// Uncatchable and fault signals are left out, as are `SIGCHLD` and
    /// `SIGPIPE`.
    pub fn relayable() -> Vec<Signal> {
        use nix::sys::signal::Signal as Nix;
        const NOT_RELAYED: [Nix; 9] = [
            Nix::SIGKILL,
            Nix::SIGSTOP,
            Nix::SIGILL,
            Nix::SIGFPE,
            Nix::SIGSEGV,
            Nix::SIGBUS,
            Nix::SIGTRAP,
            Nix::SIGCHLD,
            Nix::SIGPIPE,
        ];
        Nix::iterator()
            .filter(|sig| !NOT_RELAYED.contains(sig))
            .map(Signal::from)
            .collect()
    }
}

#[cfg(unix)]
impl From<nix::sys::signal::Signal> for Signal {
    fn from(sig: nix::sys::signal::Signal) -> Self {
        Self(sig as i32)
    }
}

#[cfg(unix)]
impl TryFrom<Signal> for nix::sys::signal::Signal {
    type Error = nix::Error;

    fn try_from(sig: Signal) -> Result<Self, Self::Error> {
        nix::sys::signal::Signal::try_from(sig.0)
    }
}

#[derive(Debug, Clone)]
pub struct RunnerStartArgs {
    pub cmd: String,
    pub args: Vec<OsString>,
}

/// Lifecycle of the single subprocess launched per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Succeeded,
    FailedToLaunch,
    Terminated(i32),
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::FailedToLaunch | RunState::Terminated(_)
        )
    }

    /// Exit code for terminal states, `None` while the run is in flight.
    pub fn exit_code(self) -> Option<i32> {
        match self {
            RunState::Succeeded => Some(0),
            RunState::FailedToLaunch => Some(1),
            RunState::Terminated(code) => Some(code),
            RunState::NotStarted | RunState::Running => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerResult {
    pub state: RunState,
    pub exit_code: i32,
    pub duration_ms: Option<u64>,
    /// Lines read from the child's output.
    pub lines: u64,
    /// Lines dropped by the `[no test files]` rule.
    pub suppressed: u64,
}
