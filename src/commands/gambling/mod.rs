//! The gambling den: instant dice games, the slot machine, blackjack, the
//! horse race and the stock round. Every game debits the full wager up
//! front and credits whatever the resolution returns.

pub mod baucua;
pub mod blackjack;
pub mod race;
pub mod slots;
pub mod stock;
pub mod taixiu;

use crate::commands::{self, describe_error};
use crate::database::ledger;
use crate::database::models::AccountDelta;
use crate::game::error::GameError;
use crate::model::AppState;
use serenity::builder::CreateEmbed;

/// Debits the wager, translating a shortfall into a user-facing embed.
pub async fn take_wager(state: &AppState, user_id: i64, wager: i64) -> Result<(), CreateEmbed> {
    match ledger::debit_wager(&state.db, user_id, wager).await {
        Ok(_) => Ok(()),
        Err(e @ GameError::InsufficientFunds { .. }) => {
            Err(commands::error_embed(describe_error(&e)))
        }
        Err(e) => {
            tracing::error!(error = ?e, "failed to debit wager");
            Err(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau."))
        }
    }
}

/// Credits a game's return. A zero return is a no-op.
pub async fn credit_return(state: &AppState, user_id: i64, amount: i64) {
    if amount <= 0 {
        return;
    }
    if let Err(e) = ledger::apply_delta(&state.db, user_id, AccountDelta::cash(amount)).await {
        tracing::error!(error = ?e, user_id, amount, "failed to credit game return");
    }
}
