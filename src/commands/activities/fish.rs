//! Implements the `fish` command (`!cau`). Same gate stack as mining.

use crate::commands::{self, anti_bot_gate, followup_embed, grind_gate, reply_embed};
use crate::cooldown::ActionKind;
use crate::database::models::AccountDelta;
use crate::database::{config, ledger};
use crate::game::rules::{self, FishOutcome};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("fish").description("Câu cá kiếm tiền.")
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
) -> CreateEmbed {
    if let Err(embed) = anti_bot_gate(ctx, state, channel_id, user).await {
        return embed;
    }
    if let Err(embed) = grind_gate(state, user.id.get(), ActionKind::Fish).await {
        return embed;
    }

    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "fish: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let outcome = rules::resolve_fish(account.realm, rand::random(), rand::random(), rand::random());
    match outcome {
        FishOutcome::Escaped => {
            commands::warn_embed("🎣 Cá cắn câu rồi... nhưng nó giật mạnh và thoát mất!")
        }
        FishOutcome::Caught { amount, kind } => {
            if let Err(e) =
                ledger::apply_delta(&state.db, account.user_id, AccountDelta::cash(amount)).await
            {
                tracing::error!(error = ?e, "fish: failed to credit payout");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
            let (_, emoji) = config::currency(&state.db)
                .await
                .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
            commands::success_embed(
                "🎣 Câu Cá",
                format!("Bạn câu được **{kind}**, bán được **+{amount}** {emoji}."),
            )
        }
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(ctx, &state, interaction.channel_id, &interaction.user).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(ctx, &state, msg.channel_id, &msg.author).await;
    reply_embed(ctx, msg, embed).await;
}
