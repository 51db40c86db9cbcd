// src/exit.rs
//! Standardized process exit codes for `recnet`.
//!
//! Provides a stable contract for sweep scripts.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum RecnetExit {
    /// All runs completed.
    Success = 0,
    /// Generic error (e.g. IO, config).
    Error = 1,
    /// Input data failed integrity checks.
    InvalidInput = 2,
    /// A sweep finished but at least one run failed.
    RunsFailed = 3,
}

impl RecnetExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for RecnetExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

impl RecnetExit {
    /// Maps a top-level error to its exit code.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<crate::error::RecnetError>() {
            Some(crate::error::RecnetError::DataIntegrity(_)) => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecnetError;

    #[test]
    fn test_integrity_errors_map_to_invalid_input() {
        let err = anyhow::Error::new(RecnetError::DataIntegrity("bad".into()));
        assert_eq!(RecnetExit::for_error(&err), RecnetExit::InvalidInput);
        assert_eq!(RecnetExit::for_error(&anyhow::anyhow!("other")), RecnetExit::Error);
    }
}
