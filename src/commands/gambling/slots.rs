//! Implements the `slots` command (`!quay`): three weighted reels against
//! the paytable.

use super::{credit_return, take_wager};
use crate::commands::{self, followup_embed, parse_amount, reply_embed};
use crate::database::ledger;
use crate::game::gamble;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("slots")
        .description("Máy quay: bộ ba 7️⃣ trả ×100.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (hoặc all).")
                .required(true),
        )
}

pub async fn perform(state: &AppState, user: &User, wager_arg: &str) -> CreateEmbed {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "slots: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let Some(wager) = parse_amount(wager_arg, account.cash) else {
        return commands::error_embed("🚫 Tiền cược không hợp lệ.");
    };
    if let Err(embed) = take_wager(state, user_id, wager).await {
        return embed;
    }

    let reels = [
        gamble::spin_reel(rand::random()),
        gamble::spin_reel(rand::random()),
        gamble::spin_reel(rand::random()),
    ];
    let multiplier = gamble::slots_multiplier(reels);
    let returned = wager * multiplier;
    credit_return(state, user_id, returned).await;

    let display = format!(
        "┃ {} ┃ {} ┃ {} ┃",
        reels[0].emoji, reels[1].emoji, reels[2].emoji
    );
    if multiplier > 0 {
        commands::success_embed(
            "🎰 MÁY QUAY",
            format!("{display}\n\nTrúng **×{multiplier}** → nhận **+{returned}**!"),
        )
    } else {
        commands::error_embed(format!("🎰 {display}\n\nKhông trúng gì, mất **{wager}**."))
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let wager_arg = interaction
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let embed = perform(&state, &interaction.user, wager_arg).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(wager_arg) = args.first() else {
        reply_embed(ctx, msg, commands::error_embed("🚫 Dùng: `!quay <tiền cược|all>`")).await;
        return;
    };
    let embed = perform(&state, &msg.author, wager_arg).await;
    reply_embed(ctx, msg, embed).await;
}
