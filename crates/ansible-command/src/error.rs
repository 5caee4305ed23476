//! Error types for building and executing ansible commands

use thiserror::Error;

/// Message carried by every configuration error
pub const MISCONFIGURED: &str = "Ansible execution was mis-configured";

/// Errors produced while building, executing or parsing a command
#[derive(Error, Debug)]
pub enum Error {
    /// Mandatory options are missing; no process was spawned
    #[error("{message}: {}", reasons.join("; "))]
    Configuration {
        /// Human readable summary
        message: String,
        /// One entry per problem found, in validation order
        reasons: Vec<String>,
    },

    /// The process could not be spawned or its output captured
    #[error(transparent)]
    Spawn(#[from] command_executor::Error),

    /// Playbook variables could not be encoded as JSON; no process was spawned
    #[error("variables could not be serialized: {reason}")]
    Variables {
        /// Encoder error message
        reason: String,
    },

    /// `exec` was called while a previous run of the same command was in flight
    #[error("command is already executing")]
    AlreadyRunning,

    /// The process exited unsuccessfully (see `ExecutionResult::into_success`)
    #[error("{output}")]
    ProcessFailed {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Accumulated stdout and stderr
        output: String,
    },

    /// A host block in ansible output did not contain valid JSON
    #[error("invalid JSON result for host {host}: {source}")]
    Parse {
        /// Host the block belonged to
        host: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Settings could not be resolved
    #[error("invalid settings: {0}")]
    Settings(String),

    /// YAML settings could not be decoded
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Regular expression failed to compile
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error from validation reasons
    pub fn configuration(reasons: Vec<String>) -> Self {
        Self::Configuration {
            message: MISCONFIGURED.to_string(),
            reasons,
        }
    }

    /// Validation reasons, if this is a configuration error
    pub fn reasons(&self) -> Option<&[String]> {
        match self {
            Self::Configuration { reasons, .. } => Some(reasons.as_slice()),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
