//! Key/value runtime configuration. Admins can retune cooldowns and the
//! currency display without a redeploy; anything unset falls back to the
//! compiled-in defaults.

use super::init::DbPool;
use crate::constants::{DEFAULT_CURRENCY_EMOJI, DEFAULT_CURRENCY_NAME};
use crate::cooldown::ActionKind;

pub async fn get(pool: &DbPool, key: &str) -> sqlx::Result<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM config WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v))
}

pub async fn set(pool: &DbPool, key: &str, value: &str) -> sqlx::Result<()> {
    sqlx::query(
        "INSERT INTO config (key, value) VALUES (?, ?) \
         ON CONFLICT (key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Configured cooldown for an action, falling back to the built-in default
/// when the key is missing or unparseable.
pub async fn cooldown_secs(pool: &DbPool, action: ActionKind) -> sqlx::Result<u64> {
    let value = get(pool, action.config_key()).await?;
    Ok(value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or_else(|| action.default_secs()))
}

/// Currency display as `(name, emoji)`.
pub async fn currency(pool: &DbPool) -> sqlx::Result<(String, String)> {
    let name = get(pool, "currency_name")
        .await?
        .unwrap_or_else(|| DEFAULT_CURRENCY_NAME.to_string());
    let emoji = get(pool, "currency_emoji")
        .await?
        .unwrap_or_else(|| DEFAULT_CURRENCY_EMOJI.to_string());
    Ok((name, emoji))
}
