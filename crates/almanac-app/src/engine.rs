use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use almanac_core::Event;
use almanac_storage::EventStorage;

use crate::error::{Result, SchedulerError};

/// The scheduling rules engine — the only component transport adapters talk
/// to, and the sole caller of the storage port.
///
/// Validates input in a fixed order (owner, title, time-in-past, busy-check),
/// enforces the no-overlap invariant per owner, and delegates persistence to
/// whichever backend it was constructed with. Performs no local recovery:
/// backend errors propagate unchanged.
pub struct Scheduler {
    storage: Arc<dyn EventStorage>,
}

impl Scheduler {
    pub fn new(storage: Arc<dyn EventStorage>) -> Self {
        Self { storage }
    }

    /// Validate and persist a new event, returning its assigned id.
    ///
    /// Reversed `start`/`stop` are swapped before validation continues.
    /// `start` must be strictly in the future at the moment of the check.
    pub async fn create(
        &self,
        owner_id: i64,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        notification: Option<Duration>,
    ) -> Result<i64> {
        if owner_id == 0 {
            return Err(SchedulerError::NoOwner);
        }
        if title.is_empty() {
            return Err(SchedulerError::EmptyTitle);
        }
        let (start, stop) = ordered(start, stop);
        let (start, stop) = (truncate_us(start), truncate_us(stop));
        let notification = notification.map(truncate_ms);
        if start <= Utc::now() {
            return Err(SchedulerError::StartInPast);
        }
        if self.storage.is_time_busy(owner_id, start, stop, 0).await? {
            return Err(SchedulerError::DateBusy);
        }

        let id = self
            .storage
            .create(Event {
                id: 0,
                title: title.to_string(),
                start,
                stop,
                description: description.to_string(),
                owner_id,
                notification,
            })
            .await?;
        info!(id, owner_id, %title, "event scheduled");
        Ok(id)
    }

    /// Validate `change` and replace the mutable fields of event `id`.
    ///
    /// Same validation sequence as create, except the busy-check excludes the
    /// event's own id so it never conflicts with itself. A missing id
    /// surfaces as [`SchedulerError::NotFound`].
    pub async fn update(&self, id: i64, mut change: Event) -> Result<()> {
        if change.owner_id == 0 {
            return Err(SchedulerError::NoOwner);
        }
        if change.title.is_empty() {
            return Err(SchedulerError::EmptyTitle);
        }
        (change.start, change.stop) = ordered(change.start, change.stop);
        change.start = truncate_us(change.start);
        change.stop = truncate_us(change.stop);
        change.notification = change.notification.map(truncate_ms);
        if change.start <= Utc::now() {
            return Err(SchedulerError::StartInPast);
        }
        if self
            .storage
            .is_time_busy(change.owner_id, change.start, change.stop, id)
            .await?
        {
            return Err(SchedulerError::DateBusy);
        }

        self.storage.update(id, change).await?;
        info!(id, "event rescheduled");
        Ok(())
    }

    /// Remove event `id`. Idempotent: an absent id is a no-op success.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.storage.delete(id).await?;
        info!(id, "event removed");
        Ok(())
    }

    /// Remove every event. Mainly a test/reset affordance.
    pub async fn delete_all(&self) -> Result<()> {
        self.storage.delete_all().await?;
        info!("calendar cleared");
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<Event>> {
        debug!("listing all events");
        Ok(self.storage.list_all().await?)
    }

    pub async fn list_day(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self.storage.list_day(date).await?)
    }

    pub async fn list_week(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self.storage.list_week(date).await?)
    }

    pub async fn list_month(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        Ok(self.storage.list_month(date).await?)
    }
}

fn ordered(start: DateTime<Utc>, stop: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    if start > stop {
        (stop, start)
    } else {
        (start, stop)
    }
}

// The storage port exchanges timestamps at microsecond and notification
// offsets at millisecond granularity. Truncating here, at the single entry
// point, keeps the memory and SQLite backends observably identical.
fn truncate_us(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(t.timestamp_micros()).unwrap_or(t)
}

fn truncate_ms(d: Duration) -> Duration {
    Duration::milliseconds(d.num_milliseconds())
}
