//! Error types for the bitloop CLI
//!
//! Provides structured error handling with context and proper error chains,
//! and maps every failure onto the process exit code it should produce.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the bitloop CLI
#[derive(Error, Debug)]
pub enum BitloopError {
    /// A required value was empty or malformed
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The requested operation is not available on this operating system
    #[error("Unsupported platform: {reason}")]
    UnsupportedPlatform { reason: String },

    /// An expected file or directory is absent
    #[error("{what} not found at {}", .path.display())]
    NotFound { what: String, path: PathBuf },

    /// The target of an operation already exists
    #[error("Conflict: {message} ({})", .path.display())]
    Conflict { message: String, path: PathBuf },

    /// A delegated process exited nonzero or could not be launched
    #[error("Process error: {command} failed{}", describe_exit(.exit_code))]
    ChildProcess {
        command: String,
        exit_code: Option<i32>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// File system operation errors
    #[error("File system error: {operation} failed on {}", .path.display())]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A bootstrap stage failed; later stages were not attempted
    #[error("Bootstrap stage '{stage}' failed")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<BitloopError>,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(String::new, |c| format!(" with exit code {c}"))
}

impl BitloopError {
    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new unsupported platform error
    pub fn unsupported_platform(reason: impl Into<String>) -> Self {
        Self::UnsupportedPlatform {
            reason: reason.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<P: Into<PathBuf>>(what: impl Into<String>, path: P) -> Self {
        Self::NotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Create a new conflict error
    pub fn conflict<P: Into<PathBuf>>(message: impl Into<String>, path: P) -> Self {
        Self::Conflict {
            message: message.into(),
            path: path.into(),
        }
    }

    /// A child process ran but exited unsuccessfully
    pub fn child_exit(command: impl Into<String>, exit_code: Option<i32>) -> Self {
        Self::ChildProcess {
            command: command.into(),
            exit_code,
            source: None,
        }
    }

    /// A child process could not be started at all
    pub fn child_launch(command: impl Into<String>, source: std::io::Error) -> Self {
        let exit_code = match source.kind() {
            std::io::ErrorKind::NotFound => 127,
            std::io::ErrorKind::PermissionDenied => 126,
            _ => 1,
        };
        Self::ChildProcess {
            command: command.into(),
            exit_code: Some(exit_code),
            source: Some(source),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Wrap an error as the failure of a named bootstrap stage
    pub fn stage(stage: &'static str, source: Self) -> Self {
        Self::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// Exit code the process should terminate with for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ChildProcess {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            Self::Stage { source, .. } => source.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BitloopError>;
