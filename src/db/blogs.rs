//! Queries on the `blogs` table.

use super::json_error;
use crate::analytics::parse_tags;
use crate::models::{timestamp_now, Blog, BlogChanges, NewBlog};
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, title, content, author, user_id, tags, created_at, updated_at";

/// Same columns qualified with the `b` alias, for joins.
pub(super) const QUALIFIED_COLUMNS: &str =
    "b.id, b.title, b.content, b.author, b.user_id, b.tags, b.created_at, b.updated_at";

pub(super) fn from_row(row: &Row<'_>) -> rusqlite::Result<Blog> {
    let tags: Option<String> = row.get(5)?;
    Ok(Blog {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        content: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        author: row
            .get::<_, Option<String>>(3)?
            .unwrap_or_else(|| "Anonymous".to_string()),
        user_id: row.get(4)?,
        tags: tags.as_deref().map(parse_tags).unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        updated_at: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
    })
}

fn encode_tags(tags: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(tags).map_err(json_error)
}

/// Escape `%`, `_` and `\` so user text matches literally inside LIKE.
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

pub fn insert(conn: &Connection, blog: &NewBlog) -> rusqlite::Result<Blog> {
    let now = timestamp_now();
    conn.execute(
        "INSERT INTO blogs (title, content, author, user_id, tags, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            blog.title,
            blog.content,
            blog.author,
            blog.user_id,
            encode_tags(&blog.tags)?,
            now
        ],
    )?;

    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<Blog>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM blogs WHERE id = ?1"),
        [id],
        from_row,
    )
    .optional()
}

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row("SELECT EXISTS(SELECT 1 FROM blogs WHERE id = ?1)", [id], |r| {
        r.get(0)
    })
}

/// All blogs, newest first. `search` matches title or content,
/// case-insensitively for ASCII.
pub fn list(conn: &Connection, search: Option<&str>) -> rusqlite::Result<Vec<Blog>> {
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(search) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM blogs
                 WHERE title LIKE ?1 ESCAPE '\\' OR content LIKE ?1 ESCAPE '\\'
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([like_pattern(search)], from_row)?;
            rows.collect()
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM blogs ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], from_row)?;
            rows.collect()
        }
    }
}

pub fn list_by_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<Blog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM blogs WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([user_id], from_row)?;
    rows.collect()
}

/// Apply `changes` and bump `updated_at`. Returns `None` for unknown ids.
pub fn update(conn: &Connection, id: i64, changes: &BlogChanges) -> rusqlite::Result<Option<Blog>> {
    let Some(mut blog) = get(conn, id)? else {
        return Ok(None);
    };

    if let Some(title) = changes.title.as_deref().filter(|t| !t.is_empty()) {
        blog.title = title.to_string();
    }
    if let Some(content) = changes.content.as_deref().filter(|c| !c.is_empty()) {
        blog.content = content.to_string();
    }
    if let Some(tags) = &changes.tags {
        blog.tags = tags.clone();
    }
    blog.updated_at = timestamp_now();

    conn.execute(
        "UPDATE blogs SET title = ?1, content = ?2, tags = ?3, updated_at = ?4 WHERE id = ?5",
        params![
            blog.title,
            blog.content,
            encode_tags(&blog.tags)?,
            blog.updated_at,
            id
        ],
    )?;

    Ok(Some(blog))
}

/// Delete a blog together with its comments and bookmarks.
pub fn delete(conn: &mut Connection, id: i64) -> rusqlite::Result<bool> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM comments WHERE blog_id = ?1", [id])?;
    tx.execute("DELETE FROM bookmarks WHERE blog_id = ?1", [id])?;
    let removed = tx.execute("DELETE FROM blogs WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(removed > 0)
}

pub fn count(conn: &Connection) -> rusqlite::Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM blogs", [], |r| r.get::<_, i64>(0))
        .map(|n| n as usize)
}

/// Blogs written by a user, matched by id or by display name for posts
/// created before authorship was linked.
pub fn count_by_author(conn: &Connection, user_id: i64, full_name: &str) -> rusqlite::Result<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM blogs WHERE user_id = ?1 OR (user_id IS NULL AND author = ?2)",
        params![user_id, full_name],
        |r| r.get::<_, i64>(0),
    )
    .map(|n| n as usize)
}

/// Raw tag column of every blog, as stored.
pub fn raw_tags(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT tags FROM blogs WHERE tags IS NOT NULL")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    rows.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrate;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn new_blog(title: &str, content: &str) -> NewBlog {
        NewBlog {
            title: title.to_string(),
            content: content.to_string(),
            author: "Ada".to_string(),
            user_id: Some(7),
            tags: vec!["Rust".to_string()],
        }
    }

    #[test]
    fn test_insert_and_get() {
        let conn = setup();
        let blog = insert(&conn, &new_blog("Hello", "World")).unwrap();

        assert_eq!(blog.title, "Hello");
        assert_eq!(blog.tags, vec!["Rust"]);
        assert_eq!(blog.created_at, blog.updated_at);
        assert_eq!(get(&conn, blog.id).unwrap(), Some(blog));
        assert_eq!(get(&conn, 999).unwrap(), None);
    }

    #[test]
    fn test_search_is_case_insensitive_and_literal() {
        let conn = setup();
        insert(&conn, &new_blog("Rust Ownership", "borrowing")).unwrap();
        insert(&conn, &new_blog("Cooking", "100% butter")).unwrap();
        insert(&conn, &new_blog("Travel", "trains")).unwrap();

        let found = list(&conn, Some("rust")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Rust Ownership");

        let found = list(&conn, Some("BORROW")).unwrap();
        assert_eq!(found.len(), 1);

        let found = list(&conn, Some("%")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Cooking");

        assert_eq!(list(&conn, Some("  ")).unwrap().len(), 3);
        assert_eq!(list(&conn, None).unwrap().len(), 3);
    }

    #[test]
    fn test_list_newest_first() {
        let conn = setup();
        let first = insert(&conn, &new_blog("First", "a")).unwrap();
        let second = insert(&conn, &new_blog("Second", "b")).unwrap();

        let ids: Vec<i64> = list(&conn, None).unwrap().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn test_update_ignores_blank_fields() {
        let conn = setup();
        let blog = insert(&conn, &new_blog("Title", "Body")).unwrap();

        let changes = BlogChanges {
            title: Some(String::new()),
            content: Some("New body".to_string()),
            tags: Some(vec![]),
        };
        let updated = update(&conn, blog.id, &changes).unwrap().unwrap();

        assert_eq!(updated.title, "Title");
        assert_eq!(updated.content, "New body");
        assert!(updated.tags.is_empty());
        assert_eq!(get(&conn, blog.id).unwrap().unwrap().content, "New body");
        assert!(update(&conn, 404, &changes).unwrap().is_none());
    }

    #[test]
    fn test_delete_cascades() {
        let mut conn = setup();
        let blog = insert(&conn, &new_blog("Doomed", "x")).unwrap();
        crate::db::comments::insert(&conn, blog.id, "nice", "Bob").unwrap();
        crate::db::bookmarks::toggle(&mut conn, 1, blog.id).unwrap();

        assert!(delete(&mut conn, blog.id).unwrap());
        assert!(!delete(&mut conn, blog.id).unwrap());
        assert!(crate::db::comments::list_for_blog(&conn, blog.id).unwrap().is_empty());
        assert!(crate::db::bookmarks::list_blogs(&conn, 1).unwrap().is_empty());
    }

    #[test]
    fn test_legacy_tag_encodings_are_read() {
        let conn = setup();
        let blog = insert(&conn, &new_blog("Legacy", "x")).unwrap();
        conn.execute("UPDATE blogs SET tags = 'Tech, Life' WHERE id = ?1", [blog.id])
            .unwrap();

        let blog = get(&conn, blog.id).unwrap().unwrap();
        assert_eq!(blog.tags, vec!["Tech", "Life"]);
        assert_eq!(raw_tags(&conn).unwrap(), vec!["Tech, Life".to_string()]);
    }

    #[test]
    fn test_counts() {
        let conn = setup();
        insert(&conn, &new_blog("A", "x")).unwrap();
        let mut unlinked = new_blog("B", "y");
        unlinked.user_id = None;
        insert(&conn, &unlinked).unwrap();
        let mut other = new_blog("C", "z");
        other.user_id = None;
        other.author = "Someone Else".to_string();
        insert(&conn, &other).unwrap();

        assert_eq!(count(&conn).unwrap(), 3);
        assert_eq!(count_by_author(&conn, 7, "Ada").unwrap(), 2);
        assert_eq!(list_by_user(&conn, 7).unwrap().len(), 1);
    }
}
