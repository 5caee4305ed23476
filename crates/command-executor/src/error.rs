//! Error types for command execution

use thiserror::Error;

/// Unified error type for command execution
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to spawn a process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// The executable could not be found
    #[error("command not found: {command}")]
    CommandNotFound {
        /// The command that was not found
        command: String,
    },

    /// A standard stream of the child could not be captured
    #[error("{stream} of spawned process is unavailable")]
    StreamUnavailable {
        /// Name of the missing stream (`stdout` or `stderr`)
        stream: &'static str,
    },

    /// Waiting for the child to terminate failed
    #[error("failed to wait for process: {reason}")]
    WaitFailed {
        /// The reason reported by the operating system
        reason: String,
    },

    /// Wrapping a command in an execution layer failed
    #[error("cannot wrap command in {layer}: {reason}")]
    LayerFailed {
        /// Description of the layer
        layer: String,
        /// Why the command could not be wrapped
        reason: String,
    },

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Classify an I/O error raised while spawning `command`
    pub fn from_spawn(command: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::CommandNotFound {
                command: command.to_string(),
            },
            _ => Self::spawn_failed(format!("{}: {}", command, err)),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_classified() {
        let err = Error::from_spawn(
            "ansible",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(matches!(err, Error::CommandNotFound { ref command } if command == "ansible"));
        assert_eq!(err.to_string(), "command not found: ansible");
    }

    #[test]
    fn test_other_spawn_errors_keep_reason() {
        let err = Error::from_spawn(
            "ansible",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to spawn process: ansible: denied");
    }
}
