//! Queries on the `users` table.

use super::json_error;
use crate::auth::normalize_email;
use crate::models::{timestamp_now, NewUser, ProfileChanges, Role, User};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};

const COLUMNS: &str =
    "id, email, full_name, password, role, bio, avatar_url, social_links, created_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role: Option<String> = row.get(4)?;
    let links: Option<String> = row.get(7)?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        full_name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        password: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        role: role.as_deref().map(Role::from).unwrap_or_default(),
        bio: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        avatar_url: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        social_links: links.as_deref().map(decode_links).unwrap_or_default(),
        created_at: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
    })
}

fn decode_links(raw: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

pub fn insert(conn: &Connection, user: &NewUser) -> rusqlite::Result<User> {
    conn.execute(
        "INSERT INTO users (email, full_name, password, role, bio, avatar_url, social_links, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, '', '{}', ?6)",
        params![
            user.email,
            user.full_name,
            user.password_hash,
            user.role.as_str(),
            user.bio,
            timestamp_now()
        ],
    )?;

    let id = conn.last_insert_rowid();
    get(conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

pub fn get(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
        [id],
        from_row,
    )
    .optional()
}

/// Case-insensitive lookup, so rows stored before normalization still match.
pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM users WHERE lower(email) = ?1 ORDER BY id LIMIT 1"),
        [normalize_email(email)],
        from_row,
    )
    .optional()
}

/// Every user, newest first.
pub fn list(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map([], from_row)?;
    rows.collect()
}

pub fn count(conn: &Connection) -> rusqlite::Result<usize> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get::<_, i64>(0))
        .map(|n| n as usize)
}

/// Apply non-blank profile fields. Returns `None` for unknown ids.
pub fn update_profile(
    conn: &Connection,
    id: i64,
    changes: &ProfileChanges,
) -> rusqlite::Result<Option<User>> {
    let Some(mut user) = get(conn, id)? else {
        return Ok(None);
    };

    fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    if let Some(name) = non_blank(&changes.full_name) {
        user.full_name = name.to_string();
    }
    if let Some(email) = non_blank(&changes.email) {
        user.email = normalize_email(email);
    }
    if let Some(bio) = non_blank(&changes.bio) {
        user.bio = bio.to_string();
    }
    if let Some(links) = &changes.social_links {
        user.social_links = links.clone();
    }

    let links = serde_json::to_string(&user.social_links).map_err(json_error)?;
    conn.execute(
        "UPDATE users SET full_name = ?1, email = ?2, bio = ?3, social_links = ?4 WHERE id = ?5",
        params![user.full_name, user.email, user.bio, links, id],
    )?;

    Ok(Some(user))
}

pub fn set_password(conn: &Connection, id: i64, password_hash: &str) -> rusqlite::Result<bool> {
    let n = conn.execute(
        "UPDATE users SET password = ?1 WHERE id = ?2",
        params![password_hash, id],
    )?;
    Ok(n > 0)
}

pub fn set_role(conn: &Connection, id: i64, role: Role) -> rusqlite::Result<bool> {
    let n = conn.execute(
        "UPDATE users SET role = ?1 WHERE id = ?2",
        params![role.as_str(), id],
    )?;
    Ok(n > 0)
}

pub fn set_avatar(conn: &Connection, id: i64, avatar_url: &str) -> rusqlite::Result<bool> {
    let n = conn.execute(
        "UPDATE users SET avatar_url = ?1 WHERE id = ?2",
        params![avatar_url, id],
    )?;
    Ok(n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrate;
    use serde_json::json;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            full_name: "Grace Hopper".to_string(),
            password_hash: "hash".to_string(),
            role: Role::User,
            bio: "New user".to_string(),
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let conn = setup();
        let user = insert(&conn, &new_user("grace@navy.mil")).unwrap();

        assert_eq!(user.role, Role::User);
        assert!(user.social_links.is_empty());
        assert_eq!(
            find_by_email(&conn, "grace@navy.mil").unwrap().map(|u| u.id),
            Some(user.id)
        );
        assert!(find_by_email(&conn, "nobody@x.io").unwrap().is_none());
        assert_eq!(count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_lookup_ignores_case_of_stored_rows() {
        let conn = setup();
        let legacy = insert(&conn, &new_user("Grace@Navy.mil")).unwrap();

        assert_eq!(
            find_by_email(&conn, " GRACE@navy.MIL ").unwrap().map(|u| u.id),
            Some(legacy.id)
        );
    }

    #[test]
    fn test_update_profile_keeps_blank_fields() {
        let conn = setup();
        let user = insert(&conn, &new_user("g@x.io")).unwrap();

        let links = json!({"github": "gh/grace"});
        let changes = ProfileChanges {
            full_name: Some("  ".to_string()),
            email: None,
            bio: Some("Compiler pioneer".to_string()),
            social_links: links.as_object().cloned(),
        };
        let updated = update_profile(&conn, user.id, &changes).unwrap().unwrap();

        assert_eq!(updated.full_name, "Grace Hopper");
        assert_eq!(updated.bio, "Compiler pioneer");
        assert_eq!(updated.social_links.get("github"), Some(&json!("gh/grace")));

        let reloaded = get(&conn, user.id).unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn test_setters() {
        let conn = setup();
        let user = insert(&conn, &new_user("g@x.io")).unwrap();

        assert!(set_password(&conn, user.id, "new-hash").unwrap());
        assert!(set_role(&conn, user.id, Role::Admin).unwrap());
        assert!(set_avatar(&conn, user.id, "/static/avatars/a.png").unwrap());
        assert!(!set_password(&conn, 999, "x").unwrap());

        let user = get(&conn, user.id).unwrap().unwrap();
        assert_eq!(user.password, "new-hash");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.avatar_url, "/static/avatars/a.png");
    }

    #[test]
    fn test_malformed_social_links_decode_empty() {
        let conn = setup();
        let user = insert(&conn, &new_user("g@x.io")).unwrap();
        conn.execute("UPDATE users SET social_links = 'nope' WHERE id = ?1", [user.id])
            .unwrap();

        assert!(get(&conn, user.id).unwrap().unwrap().social_links.is_empty());
    }
}
