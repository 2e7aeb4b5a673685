use async_trait::async_trait;
use chrono::{DateTime, Utc};

use almanac_core::Event;

use crate::error::Result;

/// The persistence contract every backend satisfies.
///
/// All methods are async: the returned futures are the caller's cancellable
/// execution context — wrap a call in `tokio::time::timeout` for a deadline,
/// or drop the future to abandon it. The rules engine depends only on this
/// trait, never on a concrete backend.
///
/// Business rules (non-empty titles, overlap rejection, ...) are *not*
/// enforced here; backends persist whatever they are handed.
///
/// Precision contract: timestamps round-trip at microsecond and
/// notification offsets at millisecond granularity — the finest the SQLite
/// column encoding holds. The rules engine truncates its inputs to this
/// granularity before they reach any backend, so the memory and SQLite
/// backends stay observably identical.
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Establish backend readiness. A no-op for the memory backend; opens
    /// the database for SQLite. Idempotent if called once before first use.
    async fn connect(&self, target: &str) -> Result<()>;

    /// Release backend resources. Operations after close are undefined.
    async fn close(&self) -> Result<()>;

    /// Assign a fresh unique id, persist the event, return the id.
    async fn create(&self, event: Event) -> Result<i64>;

    /// Replace the mutable fields (title, start, stop, description,
    /// notification) of the event matching `id`. `id` and `owner_id` are
    /// immutable: a `change` whose `owner_id` differs from the stored one
    /// matches nothing. Returns [`StorageError::NotFound`] if no such event
    /// on that owner's calendar; never inserts.
    async fn update(&self, id: i64, change: Event) -> Result<()>;

    /// Remove the event if present. Deleting an absent id is a no-op success.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Remove every event as one atomic operation. Assigned ids are not
    /// reused afterwards.
    async fn delete_all(&self) -> Result<()>;

    /// Every event, ascending by `start` (ties broken by id).
    async fn list_all(&self) -> Result<Vec<Event>>;

    /// Events whose `start` falls on the same calendar day (UTC) as `date`.
    async fn list_day(&self, date: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Events whose `start` falls in the same ISO year + week as `date`.
    async fn list_week(&self, date: DateTime<Utc>) -> Result<Vec<Event>>;

    /// Events whose `start` falls in the same year + month as `date`.
    async fn list_month(&self, date: DateTime<Utc>) -> Result<Vec<Event>>;

    /// True iff some event of `owner_id` other than `exclude_id` strictly
    /// intersects `[start, stop)`. Touching endpoints do not count.
    async fn is_time_busy(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        exclude_id: i64,
    ) -> Result<bool>;
}
