use rusqlite::Connection;

/// Initialise the events schema in `conn`. Safe to run on every connect
/// (idempotent).
///
/// Timestamps are stored as INTEGER unix microseconds so `ORDER BY` and the
/// half-open range predicates compare numerically. `AUTOINCREMENT` keeps the
/// id counter in `sqlite_sequence`, so ids are never reused after deletion —
/// not even after a bulk `DELETE FROM events`.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS events (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT    NOT NULL,
            start_us        INTEGER NOT NULL,
            stop_us         INTEGER NOT NULL,
            description     TEXT    NOT NULL DEFAULT '',
            owner_id        INTEGER NOT NULL,
            notification_ms INTEGER             -- NULL means no notification
        ) STRICT;

        -- Range queries: SELECT ... WHERE start_us >= ? AND start_us < ?
        CREATE INDEX IF NOT EXISTS idx_events_start ON events (start_us);
        -- Busy checks are scoped per owner.
        CREATE INDEX IF NOT EXISTS idx_events_owner ON events (owner_id, start_us);
        ",
    )
}
