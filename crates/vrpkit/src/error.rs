//! Error types for VRP resource operations.
//!
//! Errors are categorized so callers can tell a bad task apart from a
//! device that refused a command. The engine never retries; a transport
//! failure is reported as-is.

use thiserror::Error;

/// Categories of VRP errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The desired configuration does not pass schema validation
    Validation,
    /// The task cannot run as requested (empty config, unsupported state)
    Precondition,
    /// The connection to the device failed
    Transport,
    /// The device rejected a command
    Device,
}

impl ErrorCategory {
    /// Whether the failure happened before anything was sent to the device.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Validation | Self::Precondition)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid configuration",
            Self::Precondition => "Task precondition not met",
            Self::Transport => "Device connection failed",
            Self::Device => "Command rejected by device",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Validation => "Fix the reported field in the task configuration",
            Self::Precondition => "Provide a config list or choose a supported state",
            Self::Transport => "Check connectivity and credentials, then run the task again",
            Self::Device => {
                "Inspect the rejected command; earlier commands in the same run were applied"
            }
        }
    }
}

/// Errors that can occur while gathering facts or applying commands.
#[derive(Debug, Error)]
pub enum Error {
    /// A desired-state entry failed validation
    #[error("invalid {resource} config: {message}")]
    Validation {
        /// Resource type the entry belongs to
        resource: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Reconciliation refused to run
    #[error(transparent)]
    Reconcile(#[from] reconcile::Error),

    /// The transport failed while talking to the device
    #[error("transport error: {message}")]
    Transport {
        /// Detailed error message from the transport
        message: String,
    },

    /// The device rejected a command
    #[error("command '{command}' rejected: {message}")]
    CommandRejected {
        /// First command the device refused
        command: String,
        /// Device error text
        message: String,
    },

    /// Facts could not be decoded
    #[error("failed to parse facts: {0}")]
    Facts(#[from] serde_json::Error),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::Reconcile(_) => ErrorCategory::Precondition,
            Error::Transport { .. } | Error::Facts(_) => ErrorCategory::Transport,
            Error::CommandRejected { .. } => ErrorCategory::Device,
        }
    }

    pub(crate) fn validation(resource: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            resource,
            message: message.into(),
        }
    }

    pub(crate) fn rejected(command: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CommandRejected {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Result type for VRP operations.
pub type Result<T> = std::result::Result<T, Error>;
