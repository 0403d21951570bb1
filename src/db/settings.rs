//! The single-row `system_config` table.

use crate::models::{timestamp_now, SiteSettings};
use rusqlite::{params, Connection, OptionalExtension};

fn first(conn: &Connection) -> rusqlite::Result<Option<(i64, SiteSettings)>> {
    conn.query_row(
        "SELECT id, site_name, ai_model, image_model, image_style
         FROM system_config ORDER BY id LIMIT 1",
        [],
        |r| {
            Ok((
                r.get(0)?,
                SiteSettings {
                    site_name: r.get(1)?,
                    ai_model: r.get(2)?,
                    image_model: r.get(3)?,
                    image_style: r.get(4)?,
                },
            ))
        },
    )
    .optional()
}

fn insert(conn: &Connection, settings: &SiteSettings) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO system_config (site_name, ai_model, image_model, image_style, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            settings.site_name,
            settings.ai_model,
            settings.image_model,
            settings.image_style,
            timestamp_now()
        ],
    )?;
    Ok(())
}

/// Current settings, writing the defaults on first access.
pub fn get_or_create(conn: &Connection) -> rusqlite::Result<SiteSettings> {
    if let Some((_, settings)) = first(conn)? {
        return Ok(settings);
    }

    let defaults = SiteSettings::default();
    insert(conn, &defaults)?;
    Ok(defaults)
}

pub fn update(conn: &Connection, settings: &SiteSettings) -> rusqlite::Result<()> {
    match first(conn)? {
        Some((id, _)) => {
            conn.execute(
                "UPDATE system_config
                 SET site_name = ?1, ai_model = ?2, image_model = ?3, image_style = ?4, updated_at = ?5
                 WHERE id = ?6",
                params![
                    settings.site_name,
                    settings.ai_model,
                    settings.image_model,
                    settings.image_style,
                    timestamp_now(),
                    id
                ],
            )?;
            Ok(())
        }
        None => insert(conn, settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::migrate;

    #[test]
    fn test_defaults_then_update() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_or_create(&conn).unwrap(), SiteSettings::default());

        let custom = SiteSettings {
            site_name: "Inkwell".to_string(),
            ..SiteSettings::default()
        };
        update(&conn, &custom).unwrap();
        assert_eq!(get_or_create(&conn).unwrap(), custom);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM system_config", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_update_without_existing_row_inserts() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let custom = SiteSettings {
            image_style: "Watercolor".to_string(),
            ..SiteSettings::default()
        };
        update(&conn, &custom).unwrap();
        assert_eq!(get_or_create(&conn).unwrap().image_style, "Watercolor");
    }
}
