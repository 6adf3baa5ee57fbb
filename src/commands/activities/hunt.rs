//! Implements the `hunt` command (`!san`): fight a random beast scaled to
//! your realm. Victory pays exp and cash and a short rest; defeat costs
//! nothing but a long rest.

use crate::commands::{self, anti_bot_gate, followup_embed, reply_embed};
use crate::constants::{HUNT_LOSS_CD_SECS, HUNT_WIN_CD_SECS};
use crate::cooldown::ActionKind;
use crate::database::models::AccountDelta;
use crate::database::{config, ledger};
use crate::game::beasts;
use crate::game::rules::{self, HuntOutcome};
use crate::model::AppState;
use rand::seq::IndexedRandom;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::time::Duration;

pub fn register() -> CreateCommand {
    CreateCommand::new("hunt").description("Săn yêu thú kiếm EXP và tiền.")
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
    // The rest period is armed after the fight, by outcome; here we only
    // check whether one is still running.
    {
        let cooldowns = state.cooldowns.lock().await;
        if let Some(remaining) = cooldowns.remaining_secs(user.id.get(), ActionKind::Hunt) {
            return commands::warn_embed(format!(
                "🤕 Bạn còn đang dưỡng thương/mệt mỏi. Nghỉ thêm **{remaining}s**."
            ));
        }
    }

    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "hunt: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let pool = beasts::encounter_pool(account.realm);
    let Some(beast) = pool.choose(&mut rand::rng()).copied() else {
        return commands::warn_embed("🧭 Quanh đây không có yêu thú nào.");
    };

    let outcome = rules::resolve_hunt(account.realm, beast, rand::random());
    match outcome {
        HuntOutcome::Victory { exp, money } => {
            let delta = AccountDelta {
                cash: money,
                exp,
                ..AccountDelta::default()
            };
            if let Err(e) = ledger::apply_delta(&state.db, account.user_id, delta).await {
                tracing::error!(error = ?e, "hunt: failed to credit rewards");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
            state.cooldowns.lock().await.arm_cooldown(
                user.id.get(),
                ActionKind::Hunt,
                Duration::from_secs(HUNT_WIN_CD_SECS),
            );
            let (_, emoji) = config::currency(&state.db)
                .await
                .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
            commands::success_embed(
                "⚔️ SĂN YÊU THÚ",
                format!(
                    "Bạn gặp **{}** và chiến thắng!\n🎁 **+{exp} EXP**, **+{money}** {emoji}.",
                    beast.name
                ),
            )
        }
        HuntOutcome::Defeat => {
            state.cooldowns.lock().await.arm_cooldown(
                user.id.get(),
                ActionKind::Hunt,
                Duration::from_secs(HUNT_LOSS_CD_SECS),
            );
            commands::error_embed(format!(
                "⚔️ Bạn gặp **{}** nhưng không đánh lại!\n🤕 Bị thương, cần nghỉ **{HUNT_LOSS_CD_SECS}s**.",
                beast.name
            ))
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
