use thiserror::Error;

/// Errors that can occur within a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying SQLite / rusqlite failure, tagged with the operation that
    /// issued the statement.
    #[error("Database error during {op}: {source}")]
    Database {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// The backend is not connected (or was closed).
    #[error("Connection error: {0}")]
    Connection(String),

    /// No event with the given id exists in the store.
    #[error("Event not found: {id}")]
    NotFound { id: i64 },

    /// A persisted row could not be decoded back into an event.
    #[error("Decode error during {op}: {reason}")]
    Decode { op: &'static str, reason: String },
}

impl StorageError {
    pub(crate) fn db(op: &'static str, source: rusqlite::Error) -> Self {
        StorageError::Database { op, source }
    }

    pub(crate) fn decode(op: &'static str, reason: impl Into<String>) -> Self {
        StorageError::Decode {
            op,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
