use rusqlite::{params, OptionalExtension};

use crate::db::models::Product;
use crate::error::AppResult;
use crate::state::DbPool;

/// Store-facing input for a listing. Callers validate before constructing
/// this; the owner comes from the authenticated principal, never the payload.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub show_email: bool,
    pub show_whatsapp: bool,
    pub show_messenger: bool,
}

const PRODUCT_COLUMNS: &str = "id, user_id, category_id, title, description, price, location, \
                               image_url, is_sold, show_email, show_whatsapp, show_messenger, \
                               created_at";

fn product_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        price: row.get(5)?,
        location: row.get(6)?,
        image_url: row.get(7)?,
        is_sold: row.get(8)?,
        show_email: row.get(9)?,
        show_whatsapp: row.get(10)?,
        show_messenger: row.get(11)?,
        created_at: row.get(12)?,
    })
}

/// List all products, newest first, optionally narrowed to one category.
pub fn list(pool: &DbPool, category_id: Option<i64>) -> AppResult<Vec<Product>> {
    let conn = pool.get()?;
    let products = match category_id {
        Some(category_id) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products WHERE category_id = ?1 ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map(params![category_id], product_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC"
            ))?;
            let rows = stmt.query_map([], product_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(products)
}

pub fn list_by_owner(pool: &DbPool, user_id: i64) -> AppResult<Vec<Product>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = ?1 ORDER BY id DESC"
    ))?;
    let products = stmt
        .query_map(params![user_id], product_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(products)
}

pub fn get(pool: &DbPool, id: i64) -> AppResult<Option<Product>> {
    let conn = pool.get()?;
    let product = conn
        .query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            product_from_row,
        )
        .optional()?;
    Ok(product)
}

pub fn create(pool: &DbPool, owner_id: i64, new: &NewProduct) -> AppResult<Product> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO products (user_id, category_id, title, description, price, location, \
         image_url, show_email, show_whatsapp, show_messenger)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            owner_id,
            new.category_id,
            new.title,
            new.description,
            new.price,
            new.location,
            new.image_url,
            new.show_email,
            new.show_whatsapp,
            new.show_messenger,
        ],
    )?;
    let id = conn.last_insert_rowid();

    let product = conn.query_row(
        &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
        params![id],
        product_from_row,
    )?;
    Ok(product)
}

/// Flip a listing to sold. One-directional; calling it on an already-sold
/// listing is a no-op.
pub fn mark_sold(pool: &DbPool, id: i64) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("UPDATE products SET is_sold = 1 WHERE id = ?1", params![id])?;
    Ok(())
}

/// Hard delete. Returns whether a row was removed.
pub fn delete(pool: &DbPool, id: i64) -> AppResult<bool> {
    let conn = pool.get()?;
    let rows = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, users};

    fn seed_user(pool: &DbPool, username: &str) -> i64 {
        users::create(
            pool,
            &users::NewUser {
                username,
                email: &format!("{username}@example.com"),
                password_hash: "hash",
                whatsapp: None,
                messenger: None,
            },
        )
        .unwrap()
        .id
    }

    fn desk(category_id: i64) -> NewProduct {
        NewProduct {
            category_id,
            title: "Desk".to_string(),
            description: None,
            price: 500.0,
            location: Some("Dhaka".to_string()),
            image_url: None,
            show_email: true,
            show_whatsapp: false,
            show_messenger: false,
        }
    }

    #[test]
    fn create_sets_owner_and_defaults() {
        let pool = test_pool();
        let owner = seed_user(&pool, "alice");

        let product = create(&pool, owner, &desk(1)).unwrap();
        assert_eq!(product.user_id, owner);
        assert!(!product.is_sold);
        assert_eq!(product.price, 500.0);
        assert_eq!(product.location.as_deref(), Some("Dhaka"));
    }

    #[test]
    fn list_filters_by_category() {
        let pool = test_pool();
        let owner = seed_user(&pool, "alice");

        create(&pool, owner, &desk(1)).unwrap();
        create(&pool, owner, &desk(1)).unwrap();
        create(&pool, owner, &desk(2)).unwrap();

        let all = list(&pool, None).unwrap();
        assert_eq!(all.len(), 3);

        let filtered = list(&pool, Some(1)).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|p| p.category_id == 1));

        let empty = list(&pool, Some(3)).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let pool = test_pool();
        let owner = seed_user(&pool, "alice");

        let first = create(&pool, owner, &desk(1)).unwrap();
        let second = create(&pool, owner, &desk(1)).unwrap();

        let all = list(&pool, None).unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn list_by_owner_excludes_other_sellers() {
        let pool = test_pool();
        let alice = seed_user(&pool, "alice");
        let bob = seed_user(&pool, "bob");

        create(&pool, alice, &desk(1)).unwrap();
        create(&pool, bob, &desk(1)).unwrap();

        let mine = list_by_owner(&pool, alice).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice);
    }

    #[test]
    fn mark_sold_is_idempotent() {
        let pool = test_pool();
        let owner = seed_user(&pool, "alice");
        let product = create(&pool, owner, &desk(1)).unwrap();

        mark_sold(&pool, product.id).unwrap();
        mark_sold(&pool, product.id).unwrap();

        let reloaded = get(&pool, product.id).unwrap().unwrap();
        assert!(reloaded.is_sold);
    }

    #[test]
    fn delete_removes_the_row() {
        let pool = test_pool();
        let owner = seed_user(&pool, "alice");
        let product = create(&pool, owner, &desk(1)).unwrap();

        assert!(delete(&pool, product.id).unwrap());
        assert!(get(&pool, product.id).unwrap().is_none());
        // Second delete finds nothing
        assert!(!delete(&pool, product.id).unwrap());
    }
}
