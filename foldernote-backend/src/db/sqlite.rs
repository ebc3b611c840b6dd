//! SQLite persistence behind an r2d2 connection pool.
//!
//! `Database` is constructed once at startup and shared by `Arc`. Table
//! operations live in `db/tables/*.rs` as further `impl Database` blocks.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::time::Duration;

use super::errors::DbResult;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        account_id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY,
        custom_id TEXT NOT NULL,
        owner_account_id TEXT NOT NULL,
        kind TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (owner_account_id, kind, title)
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_folder_custom_id
        ON entries (custom_id) WHERE kind = 'folder';
    CREATE INDEX IF NOT EXISTS idx_entries_owner ON entries (owner_account_id);

    CREATE TABLE IF NOT EXISTS nested_notes (
        folder_id TEXT NOT NULL REFERENCES entries (id) ON DELETE CASCADE,
        custom_id TEXT NOT NULL,
        owner_account_id TEXT NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (folder_id, custom_id),
        UNIQUE (folder_id, title, owner_account_id)
    );

    CREATE INDEX IF NOT EXISTS idx_nested_notes_order ON nested_notes (folder_id, position);
";

pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Open (or create) the database file, build the pool and ensure the schema exists
    pub fn new(database_url: &str, pool_size: u32, busy_timeout_ms: u64) -> DbResult<Self> {
        let busy_timeout = Duration::from_millis(busy_timeout_ms);
        let manager = SqliteConnectionManager::file(database_url).with_init(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            // Cascading folder deletes depend on foreign keys, which SQLite
            // enables per connection.
            conn.pragma_update(None, "foreign_keys", true)?;
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })?;
            Ok(())
        });

        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self { pool };
        db.init_schema()?;

        log::info!(
            "[DB] Opened {} (pool size {}, busy timeout {}ms)",
            database_url,
            pool_size,
            busy_timeout_ms
        );
        Ok(db)
    }

    /// Check out a pooled connection
    pub fn conn(&self) -> DbResult<DbConn> {
        Ok(self.pool.get()?)
    }

    fn init_schema(&self) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

/// Current time in the RFC 3339 form stored in every timestamp column
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parse a stored RFC 3339 timestamp, reporting the column on failure
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_creates_schema_and_enables_foreign_keys() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::new(db_path.to_str().unwrap(), 2, 1000).expect("Failed to open db");

        let conn = db.conn().unwrap();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(tables, vec!["accounts", "entries", "nested_notes"]);

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_database_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        drop(Database::new(db_path.to_str().unwrap(), 1, 1000).unwrap());
        assert!(Database::new(db_path.to_str().unwrap(), 1, 1000).is_ok());
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp(0, "2024-01-02T03:04:05+00:00").is_ok());
        assert!(parse_timestamp(3, "yesterday").is_err());
    }
}
