use std::fmt;
use std::io;

use msgslot_host::HostError;

pub const SUCCESS: i32 = 0;
// The wrappers collapse every failure to one exit code; the diagnostic
// line carries the distinction.
pub const FAILURE: i32 = 1;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(format!("{context}: {err}"))
}

pub fn host_error(context: &str, err: HostError) -> CliError {
    CliError::new(format!("{context}: {err}"))
}
