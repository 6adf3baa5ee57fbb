//! Implements the `transfer` command (`!chuyen`): cash to cash between
//! players, atomic, with the receiver created lazily.

use crate::commands::{self, describe_error, followup_embed, parse_amount, reply_embed};
use crate::database::{config, ledger};
use crate::game::error::GameError;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("transfer")
        .description("Chuyển tiền mặt cho đạo hữu khác.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "target", "Người nhận.")
                .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "amount", "Số tiền (hoặc all).")
                .required(true),
        )
}

async fn perform(state: &AppState, user: &User, target_id: UserId, amount_arg: &str) -> CreateEmbed {
    if target_id == user.id {
        return commands::error_embed("🚫 Không thể tự chuyển cho chính mình.");
    }
    let sender = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "transfer: failed to load sender");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let Some(amount) = parse_amount(amount_arg, sender.cash) else {
        return commands::error_embed("🚫 Số tiền không hợp lệ.");
    };

    match ledger::transfer_cash(&state.db, sender.user_id, target_id.get() as i64, amount).await {
        Ok(()) => {
            let (name, emoji) = config::currency(&state.db)
                .await
                .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
            commands::success_embed(
                "💸 Chuyển tiền thành công",
                format!("Đã chuyển **{amount}** {emoji} {name} cho <@{target_id}>."),
            )
        }
        Err(e @ GameError::InsufficientFunds { .. }) => commands::error_embed(describe_error(&e)),
        Err(e) => {
            tracing::error!(error = ?e, "transfer: failed");
            commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        }
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let target = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "target")
        .and_then(|opt| opt.value.as_user_id());
    let amount_arg = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "amount")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let Some(target_id) = target else {
        followup_embed(ctx, interaction, commands::error_embed("🚫 Thiếu người nhận.")).await;
        return;
    };
    let embed = perform(&state, &interaction.user, target_id, amount_arg).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(target) = msg.mentions.first() else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!chuyen @người_nhận <số tiền|all>`"),
        )
        .await;
        return;
    };
    let Some(amount_arg) = args.iter().find(|a| !a.starts_with("<@")).copied() else {
        reply_embed(ctx, msg, commands::error_embed("🚫 Thiếu số tiền.")).await;
        return;
    };
    let embed = perform(&state, &msg.author, target.id, amount_arg).await;
    reply_embed(ctx, msg, embed).await;
}
