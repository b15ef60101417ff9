use std::process::ExitStatus;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Returned when no target is baked in or the target does not exist.
pub const EXIT_NOT_FOUND: ExitCode = 127;
/// Returned when the target exists but could not be started.
pub const EXIT_CANNOT_EXECUTE: ExitCode = 126;
/// Returned when waiting for the launched application failed.
pub const EXIT_WAIT_FAILED: ExitCode = 125;
/// Returned when a baked configuration slot cannot be decoded.
pub const EXIT_BAD_CONFIG: ExitCode = 124;

/// Translate the status reported by the platform's wait into an exit code.
pub fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> ExitCode {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn plain_exit_code_is_kept() {
        use std::os::unix::process::ExitStatusExt;
        // wait(2) encoding: exit code in the second byte.
        let status = ExitStatus::from_raw(42 << 8);
        assert_eq!(exit_code(status), 42);
    }

    #[test]
    #[cfg(unix)]
    fn killed_by_signal_maps_to_128_plus_signal() {
        use std::os::unix::process::ExitStatusExt;
        let status = ExitStatus::from_raw(9);
        assert_eq!(exit_code(status), 137);
    }

    #[test]
    fn failure_codes_are_distinct() {
        let codes = [
            EXIT_NOT_FOUND,
            EXIT_CANNOT_EXECUTE,
            EXIT_WAIT_FAILED,
            EXIT_BAD_CONFIG,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
