//! The error taxonomy for game actions. Every variant is local to a single
//! invocation: the handler reports it to the player and nothing else happens.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("not enough items: need {needed}, have {owned}")]
    InsufficientInventory { needed: i64, owned: i64 },

    #[error("invalid target for this action")]
    InvalidTarget,

    #[error("action is on cooldown for another {remaining_secs}s")]
    OnCooldown { remaining_secs: u64 },

    #[error("jailed until unix {until}")]
    Jailed { until: i64 },

    #[error("not enough experience: need {needed}, have {current}")]
    InsufficientExperience { needed: i64, current: i64 },

    #[error("already at the highest realm")]
    MaxTierReached,

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}
