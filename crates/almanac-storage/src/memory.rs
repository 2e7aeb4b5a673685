use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use almanac_core::{buckets, Event};

use crate::error::Result;
use crate::error::StorageError;
use crate::port::EventStorage;

/// In-process backend: an id-keyed table behind one exclusive lock.
///
/// Every operation is a single critical section, so concurrent creates never
/// share an id and list queries never observe a half-written event. Queries
/// are linear scans — fine for the tests and small deployments this backend
/// is meant for, a scaling limit otherwise.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Table>,
}

#[derive(Default)]
struct Table {
    /// Monotonic id counter. Never reset, not even by delete_all, so ids are
    /// unique for the lifetime of the store.
    last_id: i64,
    events: HashMap<i64, Event>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn list_in(&self, lo: DateTime<Utc>, hi: DateTime<Utc>) -> Vec<Event> {
        let table = self.inner.lock().unwrap();
        let mut result: Vec<Event> = table
            .events
            .values()
            .filter(|e| lo <= e.start && e.start < hi)
            .cloned()
            .collect();
        result.sort_by_key(|e| (e.start, e.id));
        result
    }
}

#[async_trait]
impl EventStorage for MemoryStorage {
    async fn connect(&self, _target: &str) -> Result<()> {
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    async fn create(&self, mut event: Event) -> Result<i64> {
        let mut table = self.inner.lock().unwrap();
        table.last_id += 1;
        let id = table.last_id;
        event.id = id;
        table.events.insert(id, event);
        debug!(id, "event created");
        Ok(id)
    }

    async fn update(&self, id: i64, change: Event) -> Result<()> {
        let mut table = self.inner.lock().unwrap();
        let event = table
            .events
            .get_mut(&id)
            .ok_or(StorageError::NotFound { id })?;
        // owner_id is immutable: a change carrying a different owner refers
        // to an event that does not exist on that owner's calendar.
        if event.owner_id != change.owner_id {
            return Err(StorageError::NotFound { id });
        }
        event.title = change.title;
        event.start = change.start;
        event.stop = change.stop;
        event.description = change.description;
        event.notification = change.notification;
        debug!(id, "event updated");
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut table = self.inner.lock().unwrap();
        table.events.remove(&id);
        debug!(id, "event deleted");
        Ok(())
    }

    async fn delete_all(&self) -> Result<()> {
        let mut table = self.inner.lock().unwrap();
        table.events.clear();
        debug!("all events deleted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Event>> {
        let table = self.inner.lock().unwrap();
        let mut result: Vec<Event> = table.events.values().cloned().collect();
        result.sort_by_key(|e| (e.start, e.id));
        Ok(result)
    }

    async fn list_day(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::day_bounds(date);
        Ok(self.list_in(lo, hi))
    }

    async fn list_week(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::week_bounds(date);
        Ok(self.list_in(lo, hi))
    }

    async fn list_month(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::month_bounds(date);
        Ok(self.list_in(lo, hi))
    }

    async fn is_time_busy(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        exclude_id: i64,
    ) -> Result<bool> {
        let table = self.inner.lock().unwrap();
        Ok(table
            .events
            .values()
            .any(|e| e.owner_id == owner_id && e.id != exclude_id && e.overlaps(start, stop)))
    }
}
