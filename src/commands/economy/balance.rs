//! Implements the `balance` command (`!sodu`).

use crate::commands::{self, followup_embed, reply_embed};
use crate::database::{config, ledger};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("balance").description("Xem số dư ví và ngân hàng.")
}

async fn build(state: &AppState, user: &User) -> CreateEmbed {
    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "balance: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let (name, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
    CreateEmbed::new()
        .title(format!("{emoji} Số dư của {}", user.name))
        .field("Ví", format!("{} {name}", account.cash), true)
        .field("Ngân hàng", format!("{} {name}", account.bank), true)
        .field("Tổng", format!("{} {name}", account.wealth()), true)
        .color(0xF1C40F)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state, &interaction.user).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state, &msg.author).await;
    reply_embed(ctx, msg, embed).await;
}
