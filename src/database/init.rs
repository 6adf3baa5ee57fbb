//! Database bootstrap: pool type alias, schema creation and shop seeding.
//! The schema is created at startup so a fresh deployment only needs a
//! writable data directory.

use crate::game::items::Item;
use sqlx::{Pool, Sqlite};

/// A type alias for the database connection pool (`Pool<Sqlite>`).
/// This is used throughout the application to provide a consistent, clear name
/// for the shared database connection state.
pub type DbPool = Pool<Sqlite>;

/// Creates all tables if they do not yet exist and seeds the shop listings.
/// Idempotent; safe to run on every startup.
pub async fn create_schema(pool: &DbPool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            user_id      INTEGER PRIMARY KEY,
            cash         INTEGER NOT NULL DEFAULT 0,
            bank         INTEGER NOT NULL DEFAULT 0,
            exp          INTEGER NOT NULL DEFAULT 0,
            realm        INTEGER NOT NULL DEFAULT 0,
            jailed_until INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS inventories (
            user_id  INTEGER NOT NULL,
            item_id  INTEGER NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, item_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shop (
            item_id  INTEGER PRIMARY KEY,
            name     TEXT NOT NULL,
            price    INTEGER NOT NULL,
            category TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    seed_shop(pool).await?;
    Ok(())
}

/// Inserts the default shop listings without clobbering admin price edits.
async fn seed_shop(pool: &DbPool) -> sqlx::Result<()> {
    for item in Item::all() {
        let props = item.properties();
        if let Some(price) = props.buy_price {
            sqlx::query(
                "INSERT OR IGNORE INTO shop (item_id, name, price, category) VALUES (?, ?, ?, ?)",
            )
            .bind(item as i64)
            .bind(props.display_name)
            .bind(price)
            .bind(props.category.as_str())
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}
