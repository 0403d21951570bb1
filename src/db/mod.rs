//! SQLite persistence.
//!
//! Queries are plain functions over a `rusqlite::Connection`, grouped by
//! table. Async callers go through [`Database::call`], which runs the
//! closure on tokio's blocking pool while holding the connection lock.

pub mod blogs;
pub mod bookmarks;
pub mod comments;
pub mod schema;
pub mod settings;
pub mod usage;
pub mod users;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Database file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DbError {
    /// True when the statement violated a UNIQUE or NOT NULL constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DbError::Sqlite(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Shared handle to the blog database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) a database file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("SQLite journal mode: {}", mode);
        info!("Opened SQLite database at {}", path.display());
        Self::from_connection(conn)
    }

    /// Fresh private in-memory database.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    pub async fn call<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&mut Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| DbError::Poisoned)?;
            f(&mut *guard).map_err(DbError::from)
        })
        .await?
    }
}

/// Wrap a serde failure so it can travel through a rusqlite result.
pub(crate) fn json_error(e: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_runs_queries() {
        let db = Database::open_in_memory().unwrap();
        let n: i64 = db
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM blogs", [], |r| r.get(0)))
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_open_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("blog.db");

        let db = Database::open(&path).unwrap();
        db.call(|conn| usage::record(conn, "summarizer", true))
            .await
            .unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_constraint_violation_is_detected() {
        let db = Database::open_in_memory().unwrap();
        let insert = |conn: &mut Connection| {
            conn.execute(
                "INSERT INTO users (email, created_at) VALUES ('dup@x.io', '2026-01-01T00:00:00')",
                [],
            )
        };

        db.call(insert).await.unwrap();
        let err = db.call(insert).await.unwrap_err();
        assert!(err.is_constraint_violation());
    }
}
