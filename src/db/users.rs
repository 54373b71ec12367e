use rusqlite::{params, OptionalExtension};

use crate::db::models::User;
use crate::error::AppResult;
use crate::state::DbPool;

pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub whatsapp: Option<&'a str>,
    pub messenger: Option<&'a str>,
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        whatsapp: row.get(4)?,
        messenger: row.get(5)?,
        created_at: row.get(6)?,
    })
}

const USER_COLUMNS: &str = "id, username, email, password_hash, whatsapp, messenger, created_at";

pub fn create(pool: &DbPool, new: &NewUser<'_>) -> AppResult<User> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO users (username, email, password_hash, whatsapp, messenger)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.username,
            new.email,
            new.password_hash,
            new.whatsapp,
            new.messenger
        ],
    )?;
    let id = conn.last_insert_rowid();

    let user = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![id],
        user_from_row,
    )?;
    Ok(user)
}

pub fn find_by_username(pool: &DbPool, username: &str) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn username_or_email_taken(pool: &DbPool, username: &str, email: &str) -> AppResult<bool> {
    let conn = pool.get()?;
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
        params![username, email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get(pool: &DbPool, id: i64) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}
