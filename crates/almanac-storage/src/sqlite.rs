use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use tracing::debug;

use almanac_core::{buckets, Event};

use crate::db::init_db;
use crate::error::{Result, StorageError};
use crate::port::EventStorage;

const LIST_COLUMNS: &str = "id, title, start_us, stop_us, description, owner_id, notification_ms";

/// Relational backend over SQLite.
///
/// The connection lives behind one mutex; concurrency control beyond that is
/// SQLite's business. Bucket queries bind `[lo, hi)` bounds computed by
/// [`almanac_core::buckets`], the same helper the memory backend filters
/// with, so calendar semantics cannot drift between the two.
#[derive(Default)]
pub struct SqliteStorage {
    conn: Mutex<Option<Connection>>,
}

impl SqliteStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_conn<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let guard = self.conn.lock().unwrap();
        let conn = guard
            .as_ref()
            .ok_or_else(|| StorageError::Connection(format!("{op}: backend not connected")))?;
        f(conn)
    }

    fn query_list<P: rusqlite::Params>(
        conn: &Connection,
        op: &'static str,
        sql: &str,
        params: P,
    ) -> Result<Vec<Event>> {
        let mut stmt = conn.prepare(sql).map_err(|e| StorageError::db(op, e))?;
        let rows = stmt
            .query_map(params, |row| {
                Ok((
                    row.get::<_, i64>(0)?,         // id
                    row.get::<_, String>(1)?,      // title
                    row.get::<_, i64>(2)?,         // start_us
                    row.get::<_, i64>(3)?,         // stop_us
                    row.get::<_, String>(4)?,      // description
                    row.get::<_, i64>(5)?,         // owner_id
                    row.get::<_, Option<i64>>(6)?, // notification_ms
                ))
            })
            .map_err(|e| StorageError::db(op, e))?;

        let mut result = Vec::new();
        for row in rows {
            let (id, title, start_us, stop_us, description, owner_id, notification_ms) =
                row.map_err(|e| StorageError::db(op, e))?;
            result.push(Event {
                id,
                title,
                start: decode_timestamp(op, start_us)?,
                stop: decode_timestamp(op, stop_us)?,
                description,
                owner_id,
                notification: notification_ms.map(Duration::milliseconds),
            });
        }
        Ok(result)
    }

    fn list_in(&self, op: &'static str, lo: DateTime<Utc>, hi: DateTime<Utc>) -> Result<Vec<Event>> {
        self.with_conn(op, |conn| {
            Self::query_list(
                conn,
                op,
                &format!(
                    "SELECT {LIST_COLUMNS} FROM events
                     WHERE start_us >= ?1 AND start_us < ?2
                     ORDER BY start_us, id"
                ),
                rusqlite::params![lo.timestamp_micros(), hi.timestamp_micros()],
            )
        })
    }
}

fn decode_timestamp(op: &'static str, us: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(us)
        .ok_or_else(|| StorageError::decode(op, format!("timestamp out of range: {us}")))
}

#[async_trait]
impl EventStorage for SqliteStorage {
    async fn connect(&self, target: &str) -> Result<()> {
        let mut guard = self.conn.lock().unwrap();
        if guard.is_some() {
            return Ok(());
        }
        let conn = Connection::open(target)
            .map_err(|e| StorageError::Connection(format!("failed to open {target}: {e}")))?;
        init_db(&conn).map_err(|e| StorageError::db("connect", e))?;
        debug!(target, "sqlite backend connected");
        *guard = Some(conn);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap().take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, e)| StorageError::db("close", e))?;
            debug!("sqlite backend closed");
        }
        Ok(())
    }

    async fn create(&self, event: Event) -> Result<i64> {
        self.with_conn("create", |conn| {
            conn.execute(
                "INSERT INTO events (title, start_us, stop_us, description, owner_id, notification_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    event.title,
                    event.start.timestamp_micros(),
                    event.stop.timestamp_micros(),
                    event.description,
                    event.owner_id,
                    event.notification.map(|d| d.num_milliseconds()),
                ],
            )
            .map_err(|e| StorageError::db("create", e))?;
            let id = conn.last_insert_rowid();
            debug!(id, "event created");
            Ok(id)
        })
    }

    async fn update(&self, id: i64, change: Event) -> Result<()> {
        self.with_conn("update", |conn| {
            let affected = conn
                .execute(
                    // owner_id in the predicate, not the SET list: the owner
                    // is immutable, and a change carrying a different owner
                    // must not match the row.
                    "UPDATE events
                     SET title = ?1, start_us = ?2, stop_us = ?3,
                         description = ?4, notification_ms = ?5
                     WHERE id = ?6 AND owner_id = ?7",
                    rusqlite::params![
                        change.title,
                        change.start.timestamp_micros(),
                        change.stop.timestamp_micros(),
                        change.description,
                        change.notification.map(|d| d.num_milliseconds()),
                        id,
                        change.owner_id,
                    ],
                )
                .map_err(|e| StorageError::db("update", e))?;
            if affected != 1 {
                return Err(StorageError::NotFound { id });
            }
            debug!(id, "event updated");
            Ok(())
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.with_conn("delete", |conn| {
            conn.execute("DELETE FROM events WHERE id = ?1", [id])
                .map_err(|e| StorageError::db("delete", e))?;
            debug!(id, "event deleted");
            Ok(())
        })
    }

    async fn delete_all(&self) -> Result<()> {
        self.with_conn("delete_all", |conn| {
            // Plain DELETE keeps the AUTOINCREMENT sequence, so ids assigned
            // after a bulk reset stay unique.
            conn.execute("DELETE FROM events", [])
                .map_err(|e| StorageError::db("delete_all", e))?;
            debug!("all events deleted");
            Ok(())
        })
    }

    async fn list_all(&self) -> Result<Vec<Event>> {
        self.with_conn("list_all", |conn| {
            Self::query_list(
                conn,
                "list_all",
                &format!("SELECT {LIST_COLUMNS} FROM events ORDER BY start_us, id"),
                [],
            )
        })
    }

    async fn list_day(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::day_bounds(date);
        self.list_in("list_day", lo, hi)
    }

    async fn list_week(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::week_bounds(date);
        self.list_in("list_week", lo, hi)
    }

    async fn list_month(&self, date: DateTime<Utc>) -> Result<Vec<Event>> {
        let (lo, hi) = buckets::month_bounds(date);
        self.list_in("list_month", lo, hi)
    }

    async fn is_time_busy(
        &self,
        owner_id: i64,
        start: DateTime<Utc>,
        stop: DateTime<Utc>,
        exclude_id: i64,
    ) -> Result<bool> {
        self.with_conn("is_time_busy", |conn| {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM events
                     WHERE owner_id = ?1 AND id != ?2
                       AND start_us < ?3 AND stop_us > ?4",
                    rusqlite::params![
                        owner_id,
                        exclude_id,
                        stop.timestamp_micros(),
                        start.timestamp_micros(),
                    ],
                    |row| row.get(0),
                )
                .map_err(|e| StorageError::db("is_time_busy", e))?;
            Ok(count > 0)
        })
    }
}
