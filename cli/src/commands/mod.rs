//! Command implementations

pub mod apps;
pub mod compose;
pub mod ports;
pub mod transfer;
pub mod update;
pub mod version;

use std::process::ExitCode;

/// Process exit status for a child's exit code; out-of-range codes become 1.
#[must_use]
pub fn exit_status(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
