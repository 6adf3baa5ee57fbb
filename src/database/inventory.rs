//! Inventory rows: (player, item) -> count. Counts never go negative; a
//! consume that would overdraw is rejected with no mutation.

use super::init::DbPool;
use super::ledger;
use super::models::{Account, AccountDelta, InventoryEntry};
use crate::game::error::GameError;
use crate::game::items::Item;

/// All items a player owns with a positive count.
pub async fn get_inventory(pool: &DbPool, user_id: i64) -> sqlx::Result<Vec<InventoryEntry>> {
    sqlx::query_as::<_, InventoryEntry>(
        "SELECT item_id, quantity FROM inventories \
         WHERE user_id = ? AND quantity > 0 ORDER BY item_id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// How many of one item the player owns.
pub async fn item_count(pool: &DbPool, user_id: i64, item: Item) -> sqlx::Result<i64> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT quantity FROM inventories WHERE user_id = ? AND item_id = ?")
            .bind(user_id)
            .bind(item as i64)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(q,)| q).unwrap_or(0))
}

/// Adds a quantity of an item, inserting the row if needed.
pub async fn add_item(pool: &DbPool, user_id: i64, item: Item, quantity: i64) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO inventories (user_id, item_id, quantity) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, item_id) DO UPDATE SET quantity = quantity + excluded.quantity",
    )
    .bind(user_id)
    .bind(item as i64)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(())
}

/// Consumes a quantity of an item. The conditional update keeps the count
/// non-negative even under concurrent consumes of the same stack.
pub async fn consume_item(
    pool: &DbPool,
    user_id: i64,
    item: Item,
    quantity: i64,
) -> Result<(), GameError> {
    let result = sqlx::query(
        "UPDATE inventories SET quantity = quantity - ? \
         WHERE user_id = ? AND item_id = ? AND quantity >= ?",
    )
    .bind(quantity)
    .bind(user_id)
    .bind(item as i64)
    .bind(quantity)
    .execute(pool)
    .await?;

    if result.rows_affected() == 1 {
        Ok(())
    } else {
        let owned = item_count(pool, user_id, item).await?;
        Err(GameError::InsufficientInventory {
            needed: quantity,
            owned,
        })
    }
}

/// Consumes a stack of pills and credits the exp in one transaction, so a
/// failed credit can never destroy the pills without paying out. Returns the
/// updated account.
pub async fn consume_for_exp(
    pool: &DbPool,
    user_id: i64,
    item: Item,
    quantity: i64,
    exp_gain: i64,
) -> Result<Account, GameError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        "UPDATE inventories SET quantity = quantity - ? \
         WHERE user_id = ? AND item_id = ? AND quantity >= ?",
    )
    .bind(quantity)
    .bind(user_id)
    .bind(item as i64)
    .bind(quantity)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() != 1 {
        tx.rollback().await.ok();
        let owned = item_count(pool, user_id, item).await?;
        return Err(GameError::InsufficientInventory {
            needed: quantity,
            owned,
        });
    }
    let account = ledger::apply_delta_tx(&mut tx, user_id, AccountDelta::exp(exp_gain)).await?;
    tx.commit().await?;
    Ok(account)
}
