//! Implements the `leaderboard` command (`!bxh`): top players by total
//! wealth.

use crate::commands::{self, followup_embed, reply_embed};
use crate::database::{config, ledger};
use crate::game::realms;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::*;

const TOP_N: i64 = 10;

pub fn register() -> CreateCommand {
    CreateCommand::new("leaderboard").description("Bảng xếp hạng đại gia.")
}

async fn build(state: &AppState) -> CreateEmbed {
    let accounts = match ledger::top_accounts(&state.db, TOP_N).await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!(error = ?e, "leaderboard: query failed");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    if accounts.is_empty() {
        return commands::warn_embed("Chưa có ai trên bảng xếp hạng.");
    }
    let (name, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));

    let medals = ["🥇", "🥈", "🥉"];
    let lines: Vec<String> = accounts
        .iter()
        .enumerate()
        .map(|(i, account)| {
            let rank = medals
                .get(i)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("`{:>2}.`", i + 1));
            format!(
                "{rank} <@{}> — **{}** {emoji} {name} ({})",
                account.user_id,
                account.wealth(),
                realms::get(account.realm).name
            )
        })
        .collect();

    CreateEmbed::new()
        .title("🏆 BẢNG XẾP HẠNG")
        .description(lines.join("\n"))
        .color(0xF1C40F)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state).await;
    reply_embed(ctx, msg, embed).await;
}
