//! Queries on the `comments` table.

use crate::models::{timestamp_now, Comment};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, content, author, blog_id, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        content: row.get(1)?,
        author: row
            .get::<_, Option<String>>(2)?
            .unwrap_or_else(|| "Anonymous".to_string()),
        blog_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

pub fn insert(conn: &Connection, blog_id: i64, content: &str, author: &str) -> rusqlite::Result<Comment> {
    conn.execute(
        "INSERT INTO comments (content, author, blog_id, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![content, author, blog_id, timestamp_now()],
    )?;

    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Comment>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM comments WHERE id = ?1"),
        [id],
        from_row,
    )
    .optional()
}

/// Comments on a blog, newest first.
pub fn list_for_blog(conn: &Connection, blog_id: i64) -> rusqlite::Result<Vec<Comment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM comments WHERE blog_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([blog_id], from_row)?;
    rows.collect()
}

pub fn delete(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    Ok(conn.execute("DELETE FROM comments WHERE id = ?1", [id])? > 0)
}
