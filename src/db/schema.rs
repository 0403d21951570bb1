//! Schema creation and in-place upgrades.

use rusqlite::Connection;
use tracing::info;

const SCHEMA: &str = include_str!("../../sql/schema.sql");

/// Columns added after the first release. Older database files are
/// upgraded by adding whichever of these are missing.
const LATE_COLUMNS: &[(&str, &str, &str)] = &[
    ("users", "avatar_url", "TEXT NOT NULL DEFAULT ''"),
    ("users", "social_links", "TEXT NOT NULL DEFAULT '{}'"),
    ("users", "bio", "TEXT NOT NULL DEFAULT 'No bio yet.'"),
    ("blogs", "user_id", "INTEGER"),
];

/// Create all tables and add any missing late columns.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;

    for (table, column, decl) in LATE_COLUMNS {
        if !has_column(conn, table, column)? {
            info!("Adding missing column {}.{}", table, column);
            conn.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))?;
        }
    }

    // Needs blogs.user_id, which older files only have after the upgrade above.
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_blogs_user_id ON blogs (user_id);")?;

    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}
