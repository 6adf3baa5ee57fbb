//! The ledger store: every read and write of player account rows goes
//! through here. Single-account mutations use [`apply_delta`], which funnels
//! all arithmetic through the pure `models::settle` clamp. Anything touching
//! two accounts (transfer, rob, duel settlement) runs inside one sqlx
//! transaction so a mid-update crash can never duplicate or destroy money.

use super::init::DbPool;
use super::models::{Account, AccountDelta, settle};
use crate::game::error::GameError;
use sqlx::{Sqlite, Transaction};

/// Fetches an account, creating a zeroed row first if the player has never
/// interacted before. Never fails on a missing player.
pub async fn get_or_create_account(pool: &DbPool, user_id: i64) -> sqlx::Result<Account> {
    sqlx::query("INSERT OR IGNORE INTO accounts (user_id) VALUES (?)")
        .bind(user_id)
        .execute(pool)
        .await?;
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Fetches an account without creating it. Used where a missing row means
/// "invalid target" rather than "new player".
pub async fn get_account(pool: &DbPool, user_id: i64) -> sqlx::Result<Option<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

async fn fetch_for_update(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
) -> sqlx::Result<Account> {
    sqlx::query("INSERT OR IGNORE INTO accounts (user_id) VALUES (?)")
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
}

async fn store(tx: &mut Transaction<'_, Sqlite>, account: &Account) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE accounts SET cash = ?, bank = ?, exp = ?, realm = ?, jailed_until = ? \
         WHERE user_id = ?",
    )
    .bind(account.cash)
    .bind(account.bank)
    .bind(account.exp)
    .bind(account.realm)
    .bind(account.jailed_until)
    .bind(account.user_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Atomically applies one delta to one account and returns the new state.
/// Debits beyond total wealth are capped, never rejected; callers that need
/// a hard "insufficient funds" must check first (see [`transfer_cash`]).
pub async fn apply_delta(pool: &DbPool, user_id: i64, delta: AccountDelta) -> sqlx::Result<Account> {
    let mut tx = pool.begin().await?;
    let account = fetch_for_update(&mut tx, user_id).await?;
    let updated = settle(&account, &delta);
    store(&mut tx, &updated).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Same as [`apply_delta`] but composable inside a caller-owned transaction.
pub async fn apply_delta_tx(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: i64,
    delta: AccountDelta,
) -> sqlx::Result<Account> {
    let account = fetch_for_update(tx, user_id).await?;
    let updated = settle(&account, &delta);
    store(tx, &updated).await?;
    Ok(updated)
}

/// Moves `amount` of cash from one account to another, all or nothing.
/// Fails with `InsufficientFunds` (and no mutation) when the sender's cash
/// is short at commit time, even if a pre-check said otherwise.
pub async fn transfer_cash(
    pool: &DbPool,
    from: i64,
    to: i64,
    amount: i64,
) -> Result<(), GameError> {
    let mut tx = pool.begin().await?;
    let sender = fetch_for_update(&mut tx, from).await?;
    if sender.cash < amount {
        tx.rollback().await.ok();
        return Err(GameError::InsufficientFunds {
            needed: amount,
            available: sender.cash,
        });
    }
    store(&mut tx, &settle(&sender, &AccountDelta::cash(-amount))).await?;
    apply_delta_tx(&mut tx, to, AccountDelta::cash(amount)).await?;
    tx.commit().await?;
    Ok(())
}

/// Moves up to `amount` cash from `from` to `to`, capped at what the payer
/// actually holds. Returns the amount moved. Used by robbery, where the
/// payment is "as much as they have" rather than a hard requirement.
pub async fn transfer_up_to(
    pool: &DbPool,
    from: i64,
    to: i64,
    amount: i64,
) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;
    let payer = fetch_for_update(&mut tx, from).await?;
    let moved = amount.min(payer.cash).max(0);
    if moved > 0 {
        store(&mut tx, &settle(&payer, &AccountDelta::cash(-moved))).await?;
        apply_delta_tx(&mut tx, to, AccountDelta::cash(moved)).await?;
    }
    tx.commit().await?;
    Ok(moved)
}

/// Settles an accepted duel in one transaction: the loser pays the wager and
/// the exp penalty, the winner collects the wager and the exp reward.
/// Returns `false` (no mutation) when either side no longer holds the wager,
/// which can happen between the challenge and the accept click.
pub async fn settle_duel(
    pool: &DbPool,
    winner: i64,
    loser: i64,
    wager: i64,
    exp_reward: i64,
    exp_penalty: i64,
) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;
    let loser_acc = fetch_for_update(&mut tx, loser).await?;
    let winner_acc = fetch_for_update(&mut tx, winner).await?;
    if loser_acc.cash < wager || winner_acc.cash < wager {
        tx.rollback().await.ok();
        return Ok(false);
    }
    store(
        &mut tx,
        &settle(
            &loser_acc,
            &AccountDelta {
                cash: -wager,
                exp: -exp_penalty,
                ..AccountDelta::default()
            },
        ),
    )
    .await?;
    store(
        &mut tx,
        &settle(
            &winner_acc,
            &AccountDelta {
                cash: wager,
                exp: exp_reward,
                ..AccountDelta::default()
            },
        ),
    )
    .await?;
    tx.commit().await?;
    Ok(true)
}

/// Debits a wager up front, failing with no mutation when cash is short.
pub async fn debit_wager(pool: &DbPool, user_id: i64, wager: i64) -> Result<Account, GameError> {
    let mut tx = pool.begin().await?;
    let account = fetch_for_update(&mut tx, user_id).await?;
    if account.cash < wager {
        tx.rollback().await.ok();
        return Err(GameError::InsufficientFunds {
            needed: wager,
            available: account.cash,
        });
    }
    let updated = settle(&account, &AccountDelta::cash(-wager));
    store(&mut tx, &updated).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Moves cash into the bank, failing with no mutation when cash is short.
/// The in-transaction check keeps a concurrent spend from pushing the
/// deposit into drain semantics.
pub async fn bank_deposit(pool: &DbPool, user_id: i64, amount: i64) -> Result<Account, GameError> {
    let mut tx = pool.begin().await?;
    let account = fetch_for_update(&mut tx, user_id).await?;
    if account.cash < amount {
        tx.rollback().await.ok();
        return Err(GameError::InsufficientFunds {
            needed: amount,
            available: account.cash,
        });
    }
    let updated = settle(
        &account,
        &AccountDelta {
            cash: -amount,
            bank: amount,
            ..AccountDelta::default()
        },
    );
    store(&mut tx, &updated).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Moves bank funds back to cash, failing with no mutation when the bank
/// balance is short.
pub async fn bank_withdraw(pool: &DbPool, user_id: i64, amount: i64) -> Result<Account, GameError> {
    let mut tx = pool.begin().await?;
    let account = fetch_for_update(&mut tx, user_id).await?;
    if account.bank < amount {
        tx.rollback().await.ok();
        return Err(GameError::InsufficientFunds {
            needed: amount,
            available: account.bank,
        });
    }
    let updated = settle(
        &account,
        &AccountDelta {
            cash: amount,
            bank: -amount,
            ..AccountDelta::default()
        },
    );
    store(&mut tx, &updated).await?;
    tx.commit().await?;
    Ok(updated)
}

/// Sets the jail expiry (unix seconds; 0 clears it).
pub async fn set_jail(pool: &DbPool, user_id: i64, until: i64) -> sqlx::Result<Account> {
    apply_delta(
        pool,
        user_id,
        AccountDelta {
            jailed_until: Some(until),
            ..AccountDelta::default()
        },
    )
    .await
}

/// The richest accounts by total wealth, for the leaderboard view.
pub async fn top_accounts(pool: &DbPool, limit: i64) -> sqlx::Result<Vec<Account>> {
    sqlx::query_as::<_, Account>(
        "SELECT * FROM accounts ORDER BY cash + bank DESC, exp DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Every account except the given one. Used by the admin punish-all sweep.
pub async fn accounts_except(pool: &DbPool, user_id: i64) -> sqlx::Result<Vec<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE user_id != ?")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

/// Every account. Used by the random-event sweep.
pub async fn all_accounts(pool: &DbPool) -> sqlx::Result<Vec<Account>> {
    sqlx::query_as::<_, Account>("SELECT * FROM accounts")
        .fetch_all(pool)
        .await
}
