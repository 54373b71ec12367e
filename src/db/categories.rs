use rusqlite::{params, OptionalExtension};

use crate::db::models::Category;
use crate::error::AppResult;
use crate::state::DbPool;

/// All categories, alphabetical. The listing pages and the create form both
/// render this order directly.
pub fn list(pool: &DbPool) -> AppResult<Vec<Category>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name ASC")?;
    let categories = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(categories)
}

pub fn exists(pool: &DbPool, id: i64) -> AppResult<bool> {
    let conn = pool.get()?;
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}
