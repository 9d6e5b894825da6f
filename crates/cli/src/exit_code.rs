//! Process exit codes
//!
//! Usage errors (exit code 2) are reported by clap before any command runs.

/// Exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Everything completed
    Success = 0,
    /// Configuration, connection or transfer failure
    GeneralError = 1,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
