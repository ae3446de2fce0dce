use crate::domain::favorites::Favorites;
use crate::errors::ServerError;
use rusqlite::{params, Connection};

pub fn load_favorites(conn: &Connection, session_id: i64) -> Result<Favorites, ServerError> {
    let mut stmt = conn
        .prepare("SELECT listing_url FROM favorites WHERE session_id = ? ORDER BY added_at, rowid")
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![session_id], |row| row.get::<_, String>(0))
        .map_err(|e| ServerError::DbError(e.to_string()))?;

    let mut favorites = Favorites::default();
    for r in rows {
        let url = r.map_err(|e| ServerError::DbError(e.to_string()))?;
        favorites.add(url);
    }
    Ok(favorites)
}

pub fn save_favorite(
    conn: &Connection,
    session_id: i64,
    listing_url: &str,
    now: i64,
) -> Result<(), ServerError> {
    conn.execute(
        "INSERT OR IGNORE INTO favorites (session_id, listing_url, added_at) VALUES (?, ?, ?)",
        params![session_id, listing_url, now],
    )
    .map_err(|e| ServerError::DbError(format!("save favorite failed: {e}")))?;
    Ok(())
}
