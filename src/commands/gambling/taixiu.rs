//! Implements the `taixiu` command (`!tx`, `!tai`, `!xiu`): three dice,
//! call big or small, triples go to the house.

use super::{credit_return, take_wager};
use crate::commands::{self, followup_embed, parse_amount, reply_embed};
use crate::database::ledger;
use crate::game::gamble::{self, TaiXiuBet, TaiXiuOutcome};
use crate::model::AppState;
use rand::Rng;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

const DIE_FACES: [&str; 6] = ["⚀", "⚁", "⚂", "⚃", "⚄", "⚅"];

pub fn register() -> CreateCommand {
    CreateCommand::new("taixiu")
        .description("Tài xỉu: 3 xúc xắc, bộ ba thuộc về nhà cái.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "bet", "tai hoặc xiu.")
                .required(true)
                .add_string_choice("Tài (11-17)", "tai")
                .add_string_choice("Xỉu (3-10)", "xiu"),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (hoặc all).")
                .required(true),
        )
}

pub async fn perform(state: &AppState, user: &User, bet: TaiXiuBet, wager_arg: &str) -> CreateEmbed {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "taixiu: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let Some(wager) = parse_amount(wager_arg, account.cash) else {
        return commands::error_embed("🚫 Tiền cược không hợp lệ.");
    };
    if let Err(embed) = take_wager(state, user_id, wager).await {
        return embed;
    }

    let dice = {
        let mut rng = rand::rng();
        [
            rng.random_range(1..=6u32),
            rng.random_range(1..=6u32),
            rng.random_range(1..=6u32),
        ]
    };
    let faces: Vec<&str> = dice.iter().map(|&d| DIE_FACES[d as usize - 1]).collect();
    let faces = faces.join(" ");

    match gamble::resolve_taixiu(dice, bet) {
        TaiXiuOutcome::HouseTriple => commands::error_embed(format!(
            "🎲 {faces} — **BỘ BA**! Nhà cái ăn trọn, bạn mất **{wager}**."
        )),
        TaiXiuOutcome::Win { sum } => {
            credit_return(state, user_id, wager * 2).await;
            commands::success_embed(
                "🎲 Tài Xỉu",
                format!("{faces} — tổng **{sum}**. Bạn đoán đúng, nhận **+{wager}**!"),
            )
        }
        TaiXiuOutcome::Lose { sum } => commands::error_embed(format!(
            "🎲 {faces} — tổng **{sum}**. Đoán sai, mất **{wager}**."
        )),
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let bet = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "bet")
        .and_then(|opt| opt.value.as_str())
        .and_then(|s| s.parse::<TaiXiuBet>().ok());
    let wager_arg = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "wager")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let Some(bet) = bet else {
        followup_embed(ctx, interaction, commands::error_embed("🚫 Cửa cược không hợp lệ.")).await;
        return;
    };
    let embed = perform(&state, &interaction.user, bet, wager_arg).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>, fixed_bet: Option<TaiXiuBet>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    // `!tx tai 100` carries the bet in args; `!tai 100` / `!xiu 100` fix it.
    let (bet, wager_arg) = match fixed_bet {
        Some(bet) => (Some(bet), args.first().copied()),
        None => (
            args.first().and_then(|s| s.parse::<TaiXiuBet>().ok()),
            args.get(1).copied(),
        ),
    };
    let (Some(bet), Some(wager_arg)) = (bet, wager_arg) else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!tx <tai|xiu> <tiền cược|all>`"),
        )
        .await;
        return;
    };
    let embed = perform(&state, &msg.author, bet, wager_arg).await;
    reply_embed(ctx, msg, embed).await;
}
