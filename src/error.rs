use crate::command::{
    EXIT_BAD_CONFIG, EXIT_CANNOT_EXECUTE, EXIT_NOT_FOUND, EXIT_WAIT_FAILED, ExitCode,
};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that ends a launch before the child's exit code is known.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no target application is baked into this launcher")]
    MissingTarget,

    #[error("the baked {slot} value is not valid UTF-8")]
    InvalidSlot { slot: &'static str },

    #[error("failed to start `{}`", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for the launched application")]
    Wait(#[source] io::Error),
}

impl LaunchError {
    /// The exit code the launcher reports for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LaunchError::MissingTarget => EXIT_NOT_FOUND,
            LaunchError::InvalidSlot { .. } => EXIT_BAD_CONFIG,
            LaunchError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                EXIT_NOT_FOUND
            }
            LaunchError::Spawn { .. } => EXIT_CANNOT_EXECUTE,
            LaunchError::Wait(_) => EXIT_WAIT_FAILED,
        }
    }
}
