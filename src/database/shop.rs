//! Shop listings: the purchasable subset of the item catalog, with prices
//! that admins can override at runtime.

use super::init::DbPool;
use super::models::ShopListing;
use crate::game::error::GameError;

/// All listings, grouped for display by category then price.
pub async fn all_listings(pool: &DbPool) -> sqlx::Result<Vec<ShopListing>> {
    sqlx::query_as::<_, ShopListing>("SELECT * FROM shop ORDER BY category, price")
        .fetch_all(pool)
        .await
}

/// A single listing by item id, if that item is sold at all.
pub async fn get_listing(pool: &DbPool, item_id: i64) -> sqlx::Result<Option<ShopListing>> {
    sqlx::query_as::<_, ShopListing>("SELECT * FROM shop WHERE item_id = ?")
        .bind(item_id)
        .fetch_optional(pool)
        .await
}

/// Inserts or reprices a listing. Admin-only surface.
pub async fn upsert_listing(
    pool: &DbPool,
    item_id: i64,
    name: &str,
    price: i64,
    category: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO shop (item_id, name, price, category) VALUES (?, ?, ?, ?) \
         ON CONFLICT (item_id) DO UPDATE SET name = excluded.name, \
         price = excluded.price, category = excluded.category",
    )
    .bind(item_id)
    .bind(name)
    .bind(price)
    .bind(category)
    .execute(pool)
    .await?;
    Ok(())
}

/// Buys `quantity` of a listed item: the cash debit and the inventory credit
/// commit together or not at all. Fails with `InsufficientFunds` when the
/// buyer's cash is short at commit time.
pub async fn purchase(
    pool: &DbPool,
    user_id: i64,
    item_id: i64,
    quantity: i64,
    unit_price: i64,
) -> Result<(), GameError> {
    let cost = unit_price * quantity;
    let mut tx = pool.begin().await?;
    sqlx::query("INSERT OR IGNORE INTO accounts (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    let debited = sqlx::query(
        "UPDATE accounts SET cash = cash - ? WHERE user_id = ? AND cash >= ?",
    )
    .bind(cost)
    .bind(user_id)
    .bind(cost)
    .execute(&mut *tx)
    .await?;
    if debited.rows_affected() != 1 {
        let (available,): (i64,) =
            sqlx::query_as("SELECT cash FROM accounts WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        tx.rollback().await.ok();
        return Err(GameError::InsufficientFunds {
            needed: cost,
            available,
        });
    }
    sqlx::query(
        "INSERT INTO inventories (user_id, item_id, quantity) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, item_id) DO UPDATE SET quantity = quantity + excluded.quantity",
    )
    .bind(user_id)
    .bind(item_id)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

/// Removes a listing from sale. The item itself still exists in inventories.
pub async fn delist(pool: &DbPool, item_id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM shop WHERE item_id = ?")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}
