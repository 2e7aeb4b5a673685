use thiserror::Error;

use almanac_storage::StorageError;

/// Errors surfaced by the scheduling rules engine.
///
/// The validation variants (`NoOwner` through `DateBusy`) are returned in a
/// fixed order — owner, title, time-in-past, busy-check — so callers see the
/// same first-failing reason regardless of backend. None of them is ever
/// retried by the engine.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no owner id of the event")]
    NoOwner,

    #[error("no title of the event")]
    EmptyTitle,

    #[error("start time of the event in the past")]
    StartInPast,

    #[error("this time is already occupied by another event")]
    DateBusy,

    /// The target event does not exist. Raised by update; delete is
    /// idempotent and never raises this.
    #[error("Event not found: {id}")]
    NotFound { id: i64 },

    /// Any other backend failure, passed upward unchanged.
    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for SchedulerError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound { id } => SchedulerError::NotFound { id },
            other => SchedulerError::Storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
