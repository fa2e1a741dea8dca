//! Error types for reconciliation.
//!
//! The engine is a pure function of `(want, have, policy)`, so the only
//! failures it can raise are precondition failures detected before any
//! command is produced.

use crate::types::Policy;
use thiserror::Error;

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The policy cannot run with the given input (e.g. empty want)
    Precondition,
    /// The policy is not offered by this resource type
    Unsupported,
    /// Input could not be interpreted
    Invalid,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Precondition => "Policy precondition failed",
            Self::Unsupported => "Policy not supported",
            Self::Invalid => "Invalid input",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Precondition => "Provide at least one config entry, or use state 'deleted'",
            Self::Unsupported => "Choose one of the states this resource supports",
            Self::Invalid => "Use one of: merged, replaced, overridden, deleted",
        }
    }
}

/// Errors raised by the reconciliation engine.
///
/// A want instance without a have partner is not an error: the engine only
/// reconciles existing resources and skips such instances.
#[derive(Debug, Error)]
pub enum Error {
    /// merged/replaced/overridden were given an empty want
    #[error("value of config parameter must not be empty for state {policy}")]
    EmptyWant {
        /// The policy that requires desired state
        policy: Policy,
    },

    /// The resource type does not implement this policy
    #[error("state {policy} is not supported by resource {resource}")]
    UnsupportedPolicy {
        /// Resource type name
        resource: &'static str,
        /// The rejected policy
        policy: Policy,
    },

    /// Unrecognised policy name
    #[error("invalid state '{0}': expected one of merged, replaced, overridden, deleted")]
    InvalidPolicy(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyWant { .. } => ErrorCategory::Precondition,
            Error::UnsupportedPolicy { .. } => ErrorCategory::Unsupported,
            Error::InvalidPolicy(_) => ErrorCategory::Invalid,
        }
    }
}

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, Error>;
