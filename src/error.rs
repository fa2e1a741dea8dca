//! Error type for task runs.

use thiserror::Error;
use vrpkit::ErrorCategory;

/// A task run failed; nothing partial is reported alongside it
#[derive(Debug, Error)]
pub enum Error {
    /// Validation, transport or device failure
    #[error(transparent)]
    Vrp(#[from] vrpkit::Error),

    /// The engine refused the task
    #[error(transparent)]
    Reconcile(#[from] reconcile::Error),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Vrp(e) => e.category(),
            Error::Reconcile(_) => ErrorCategory::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
