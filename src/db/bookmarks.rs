//! Queries on the `bookmarks` table.

use super::blogs;
use crate::models::{timestamp_now, Blog};
use rusqlite::{params, Connection, OptionalExtension};

/// Add the bookmark if absent, remove it if present.
///
/// Returns `true` when the blog is bookmarked afterwards.
pub fn toggle(conn: &mut Connection, user_id: i64, blog_id: i64) -> rusqlite::Result<bool> {
    let tx = conn.transaction()?;

    let existing: Option<i64> = tx
        .query_row(
            "SELECT id FROM bookmarks WHERE user_id = ?1 AND blog_id = ?2",
            params![user_id, blog_id],
            |r| r.get(0),
        )
        .optional()?;

    let bookmarked = match existing {
        Some(id) => {
            tx.execute("DELETE FROM bookmarks WHERE id = ?1", [id])?;
            false
        }
        None => {
            tx.execute(
                "INSERT INTO bookmarks (user_id, blog_id, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, blog_id, timestamp_now()],
            )?;
            true
        }
    };

    tx.commit()?;
    Ok(bookmarked)
}

pub fn is_bookmarked(conn: &Connection, user_id: i64, blog_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = ?1 AND blog_id = ?2)",
        params![user_id, blog_id],
        |r| r.get(0),
    )
}

/// Blogs a user has bookmarked, most recently saved first.
pub fn list_blogs(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Blog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM bookmarks k JOIN blogs b ON b.id = k.blog_id
         WHERE k.user_id = ?1
         ORDER BY k.created_at DESC, k.id DESC",
        blogs::QUALIFIED_COLUMNS
    ))?;
    let rows = stmt.query_map([user_id], blogs::from_row)?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrate;
    use crate::models::NewBlog;

    fn blog(conn: &Connection, title: &str) -> Blog {
        blogs::insert(
            conn,
            &NewBlog {
                title: title.to_string(),
                content: "body".to_string(),
                author: "Anonymous".to_string(),
                user_id: None,
                tags: vec![],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_toggle_flips_state() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let b = blog(&conn, "Saved");

        assert!(toggle(&mut conn, 3, b.id).unwrap());
        assert!(is_bookmarked(&conn, 3, b.id).unwrap());
        assert!(!toggle(&mut conn, 3, b.id).unwrap());
        assert!(!is_bookmarked(&conn, 3, b.id).unwrap());
    }

    #[test]
    fn test_list_blogs_for_user() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let a = blog(&conn, "A");
        let b = blog(&conn, "B");

        toggle(&mut conn, 1, a.id).unwrap();
        toggle(&mut conn, 1, b.id).unwrap();
        toggle(&mut conn, 2, a.id).unwrap();
        // dangling bookmark to a blog that no longer exists
        toggle(&mut conn, 1, 999).unwrap();

        let titles: Vec<String> = list_blogs(&conn, 1)
            .unwrap()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
        assert!(list_blogs(&conn, 42).unwrap().is_empty());
    }
}
