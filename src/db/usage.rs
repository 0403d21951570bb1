//! AI usage log.

use crate::models::timestamp_now;
use rusqlite::{params, Connection};

pub fn record(conn: &Connection, tool: &str, success: bool) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO ai_usage (tool_used, timestamp, success) VALUES (?1, ?2, ?3)",
        params![tool, timestamp_now(), success],
    )?;
    Ok(())
}

pub fn count(conn: &Connection) -> rusqlite::Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM ai_usage", [], |r| r.get::<_, i64>(0))
        .map(|n| n as usize)
}

/// Timestamps at or after `since` (same text format as stored).
pub fn timestamps_since(conn: &Connection, since: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT timestamp FROM ai_usage WHERE timestamp >= ?1")?;
    let rows = stmt.query_map([since], |r| r.get::<_, String>(0))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrate;

    #[test]
    fn test_record_and_window() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        record(&conn, "blog_generator", true).unwrap();
        record(&conn, "summarizer", false).unwrap();
        conn.execute(
            "INSERT INTO ai_usage (tool_used, timestamp, success) VALUES ('old', '2001-01-01T00:00:00.000000', 1)",
            [],
        )
        .unwrap();

        assert_eq!(count(&conn).unwrap(), 3);
        assert_eq!(timestamps_since(&conn, "2020-01-01T00:00:00").unwrap().len(), 2);
    }
}
