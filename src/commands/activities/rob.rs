//! Implements the `rob` command (`!cuop`): steal a cut of another player's
//! cash, or get caught and pay them a fine instead. Bank balances are never
//! at risk; both legs of the money movement run in one transaction.

use crate::commands::{self, anti_bot_gate, describe_error, followup_embed, reply_embed, simple_gate};
use crate::constants::ROB_MIN_CASH;
use crate::cooldown::ActionKind;
use crate::database::{config, ledger};
use crate::game::error::GameError;
use crate::game::rules::{self, RobOutcome};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("rob")
        .description("Cướp tiền mặt của đạo hữu khác.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "target", "Nạn nhân.")
                .required(true),
        )
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
    target_id: u64,
) -> CreateEmbed {
    if target_id == user.id.get() {
        return commands::error_embed("🚫 Không thể tự cướp chính mình.");
    }
    if let Err(embed) = anti_bot_gate(ctx, state, channel_id, user).await {
        return embed;
    }

    let robber = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "rob: failed to load robber");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    if robber.cash < ROB_MIN_CASH {
        return commands::error_embed(describe_error(&GameError::InsufficientFunds {
            needed: ROB_MIN_CASH,
            available: robber.cash,
        }));
    }
    // A victim with no account yet has nothing to steal.
    let victim = match ledger::get_account(&state.db, target_id as i64).await {
        Ok(Some(account)) => account,
        Ok(None) => return commands::error_embed(describe_error(&GameError::InvalidTarget)),
        Err(e) => {
            tracing::error!(error = ?e, "rob: failed to load victim");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    // Cooldown binds the robber only, and only once the attempt is valid.
    if let Err(embed) = simple_gate(state, user.id.get(), ActionKind::Rob).await {
        return embed;
    }

    let outcome = rules::resolve_rob(robber.cash, victim.cash, rand::random(), rand::random());
    let (_, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));

    match outcome {
        RobOutcome::Success { stolen } => {
            match ledger::transfer_up_to(&state.db, victim.user_id, robber.user_id, stolen).await {
                Ok(moved) => commands::success_embed(
                    "🥷 CƯỚP THÀNH CÔNG!",
                    format!("Bạn trộm được **+{moved}** {emoji} từ <@{target_id}>!"),
                ),
                Err(e) => {
                    tracing::error!(error = ?e, "rob: failed to move stolen cash");
                    commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
                }
            }
        }
        RobOutcome::Caught { fine } => {
            match ledger::transfer_up_to(&state.db, robber.user_id, victim.user_id, fine).await {
                Ok(paid) => commands::error_embed(format!(
                    "🚨 BỊ BẮT QUẢ TANG! Bạn phải bồi thường **{paid}** {emoji} cho <@{target_id}>."
                )),
                Err(e) => {
                    tracing::error!(error = ?e, "rob: failed to pay fine");
                    commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
                }
            }
        }
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(target_id) = interaction
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_user_id())
    else {
        followup_embed(ctx, interaction, commands::error_embed("🚫 Thiếu mục tiêu.")).await;
        return;
    };
    let embed = perform(
        ctx,
        &state,
        interaction.channel_id,
        &interaction.user,
        target_id.get(),
    )
    .await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(target) = msg.mentions.first() else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Hãy tag người bạn muốn cướp. Ví dụ: `!cuop @người_chơi`"),
        )
        .await;
        return;
    };
    let embed = perform(ctx, &state, msg.channel_id, &msg.author, target.id.get()).await;
    reply_embed(ctx, msg, embed).await;
}
