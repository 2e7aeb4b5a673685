//! `almanac-app` — the scheduling rules engine.
//!
//! Transport adapters (HTTP/RPC) construct a [`Scheduler`] over whatever
//! backend [`almanac_storage::new_storage`] hands them and call its surface;
//! everything below the adapter boundary lives here and in the storage
//! crates. See [`error::SchedulerError`] for the full failure taxonomy.

pub mod engine;
pub mod error;

pub use engine::Scheduler;
pub use error::{Result, SchedulerError};
