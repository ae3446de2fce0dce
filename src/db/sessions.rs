// src/db/sessions.rs
use crate::errors::ServerError;
use crate::session::token::hash_token;
use rusqlite::{params, Connection, OptionalExtension};

pub fn create_session(conn: &Connection, raw_token: &str, now: i64) -> Result<i64, ServerError> {
    let hash = hash_token(raw_token);

    conn.execute(
        "insert into browse_sessions (token_hash, created_at) values (?, ?)",
        params![hash.as_slice(), now],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

pub fn find_session(conn: &Connection, raw_token: &str) -> Result<Option<i64>, ServerError> {
    let hash = hash_token(raw_token);

    conn.query_row(
        "select id from browse_sessions where token_hash = ?",
        params![hash.as_slice()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}
