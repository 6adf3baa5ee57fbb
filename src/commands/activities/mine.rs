//! Implements the `mine` command (`!dao`): the fast money grind, policed by
//! the two-strike spam fine and the anti-automation gate.

use crate::commands::{self, anti_bot_gate, followup_embed, grind_gate, reply_embed};
use crate::cooldown::ActionKind;
use crate::database::models::AccountDelta;
use crate::database::{config, ledger};
use crate::game::rules::{self, MineOutcome};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("mine").description("Đào khoáng thạch kiếm tiền.")
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
    if let Err(embed) = grind_gate(state, user.id.get(), ActionKind::Mine).await {
        return embed;
    }

    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "mine: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let outcome = rules::resolve_mine(account.realm, rand::random(), rand::random());
    let (_, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));

    match outcome {
        MineOutcome::Nothing => commands::warn_embed(
            "⛏️ Bạn đào cả buổi nhưng chỉ thấy đá vụn. Không có gì cả!",
        ),
        MineOutcome::Found { amount, lucky } => {
            if let Err(e) =
                ledger::apply_delta(&state.db, account.user_id, AccountDelta::cash(amount)).await
            {
                tracing::error!(error = ?e, "mine: failed to credit payout");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
            if lucky {
                commands::success_embed(
                    "⛏️ MẠCH KHOÁNG QUÝ!",
                    format!("Bạn đào trúng mạch khoáng hiếm: **+{amount}** {emoji}!"),
                )
            } else {
                commands::success_embed(
                    "⛏️ Đào Khoáng",
                    format!("Bạn đào được **+{amount}** {emoji}."),
                )
            }
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
