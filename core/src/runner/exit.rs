use std::process::ExitStatus;

/// Reported for a child that was killed by a signal instead of exiting.
/// The process exit status truncates it to 255.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// Numeric exit code of a finished child, or `None` if the platform cannot
/// express its termination as a number.
pub fn exit_code_of(status: ExitStatus) -> Option<i32> {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        status
            .code()
            .or_else(|| status.signal().map(|_| SIGNALED_EXIT_CODE))
    }
    #[cfg(not(unix))]
    {
        status.code()
    }
}
