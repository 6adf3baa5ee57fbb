//! Implements the `stock` command (`!ck`): call the direction of a short
//! price walk rendered live in the channel.

use super::{credit_return, take_wager};
use crate::commands::{self, parse_amount, reply_embed};
use crate::constants::STOCK_TICK_MILLIS;
use crate::database::ledger;
use crate::game::stock::{StockGuess, StockOutcome, StockRound};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed, CreateMessage, EditMessage};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::time::Duration;

pub fn register() -> CreateCommand {
    CreateCommand::new("stock")
        .description("Chứng khoán: đoán giá lên hay xuống, đúng trả ×2.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "guess", "tang hoặc giam.")
                .required(true)
                .add_string_choice("Tăng 📈", "tang")
                .add_string_choice("Giảm 📉", "giam"),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (hoặc all).")
                .required(true),
        )
}

fn chart_embed(round: &StockRound, guess: StockGuess, wager: i64) -> CreateEmbed {
    let direction = match guess {
        StockGuess::Up => "TĂNG 📈",
        StockGuess::Down => "GIẢM 📉",
    };
    CreateEmbed::new()
        .title("📊 SÀN CHỨNG KHOÁN")
        .description(format!(
            "{}\nGiá hiện tại: **{:.2}** (mở cửa {:.2})\nBạn cược **{wager}** vào cửa **{direction}**",
            round.render_chart(),
            round.price,
            round.start_price,
        ))
        .color(0x3498DB)
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
    guess: StockGuess,
    wager_arg: &str,
) -> Option<CreateEmbed> {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "stock: failed to load account");
            return Some(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau."));
        }
    };
    let Some(wager) = parse_amount(wager_arg, account.cash) else {
        return Some(commands::error_embed("🚫 Tiền cược không hợp lệ."));
    };
    if let Err(embed) = take_wager(state, user_id, wager).await {
        return Some(embed);
    }

    let mut round = StockRound::new();
    let builder = CreateMessage::new().embed(chart_embed(&round, guess, wager));
    let mut message = match channel_id.send_message(&ctx.http, builder).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = ?e, "stock: failed to post chart");
            credit_return(state, user_id, wager).await;
            return Some(commands::error_embed("🚫 Không mở được sàn, hoàn cược."));
        }
    };

    while !round.is_done() {
        tokio::time::sleep(Duration::from_millis(STOCK_TICK_MILLIS)).await;
        round.tick(rand::random());
        let edit = EditMessage::new().embed(chart_embed(&round, guess, wager));
        if let Err(e) = message.edit(&ctx.http, edit).await {
            // Losing the live view must not forfeit the stake: run the walk
            // to its close off-screen and settle on the real outcome.
            tracing::warn!(error = ?e, "stock: failed to edit chart, closing off-screen");
            round.run_to_close(|| rand::random());
            break;
        }
    }

    let returned = round.payout(guess, wager);
    credit_return(state, user_id, returned).await;
    let change = round.change();
    Some(match round.outcome(guess) {
        StockOutcome::Win => commands::success_embed(
            "📊 ĐÓNG PHIÊN",
            format!(
                "{} giá chốt **{:.2}** ({:+.2}). Bạn đoán đúng, nhận **+{wager}**!",
                user.mention(),
                round.price,
                change,
            ),
        ),
        StockOutcome::Flat => commands::warn_embed(format!(
            "📊 Giá chốt **{:.2}**, gần như đứng yên. Hoàn lại **{wager}**.",
            round.price
        )),
        StockOutcome::Lose => commands::error_embed(format!(
            "{} giá chốt **{:.2}** ({:+.2}). Đoán sai, mất **{wager}**.",
            user.mention(),
            round.price,
            change,
        )),
    })
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let guess = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "guess")
        .and_then(|opt| opt.value.as_str())
        .and_then(|s| s.parse::<StockGuess>().ok());
    let wager_arg = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "wager")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let Some(guess) = guess else {
        commands::followup_embed(ctx, interaction, commands::error_embed("🚫 Cửa cược không hợp lệ."))
            .await;
        return;
    };
    if let Some(embed) = perform(
        ctx,
        &state,
        interaction.channel_id,
        &interaction.user,
        guess,
        wager_arg,
    )
    .await
    {
        commands::followup_embed(ctx, interaction, embed).await;
    }
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let guess = args.first().and_then(|s| s.parse::<StockGuess>().ok());
    let (Some(guess), Some(wager_arg)) = (guess, args.get(1).copied()) else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!ck <tang|giam> <tiền cược|all>`"),
        )
        .await;
        return;
    };
    if let Some(embed) = perform(ctx, &state, msg.channel_id, &msg.author, guess, wager_arg).await {
        reply_embed(ctx, msg, embed).await;
    }
}
