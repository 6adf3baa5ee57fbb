//! Implements the `race` command (`!dn`): a live-edited horse race. The
//! message is re-rendered every tick until a horse crosses the line.

use super::{credit_return, take_wager};
use crate::commands::{self, parse_amount, reply_embed};
use crate::constants::{RACE_HORSES, RACE_TICK_MILLIS, RACE_WIN_MULTIPLIER};
use crate::database::ledger;
use crate::game::race::{Race, RaceState, HORSE_EMOJIS};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed, CreateMessage, EditMessage};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::time::Duration;

pub fn register() -> CreateCommand {
    CreateCommand::new("race")
        .description("Đua ngựa: chọn ngựa 1-5, thắng trả ×10.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "horse", "Số ngựa (1-5).")
                .required(true)
                .min_int_value(1)
                .max_int_value(RACE_HORSES as u64),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (hoặc all).")
                .required(true),
        )
}

fn race_embed(race: &Race, horse: usize, wager: i64) -> CreateEmbed {
    let status = match race.state {
        RaceState::Running => "Đang đua...".to_string(),
        RaceState::Finished { winner } => format!(
            "🏁 Ngựa **{}** {} về nhất!",
            winner + 1,
            HORSE_EMOJIS[winner]
        ),
    };
    CreateEmbed::new()
        .title("🏇 ĐUA NGỰA")
        .description(format!(
            "{}\n{status}\nBạn cược **{wager}** vào ngựa **{}** {}",
            race.render_track(),
            horse + 1,
            HORSE_EMOJIS[horse],
        ))
        .color(0xF1C40F)
}

/// Runs a full race in the channel. `horse` is zero-based.
async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
    horse: usize,
    wager_arg: &str,
) -> Option<CreateEmbed> {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "race: failed to load account");
            return Some(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau."));
        }
    };
    let Some(wager) = parse_amount(wager_arg, account.cash) else {
        return Some(commands::error_embed("🚫 Tiền cược không hợp lệ."));
    };
    if let Err(embed) = take_wager(state, user_id, wager).await {
        return Some(embed);
    }

    let mut race = Race::new();
    let builder = CreateMessage::new().embed(race_embed(&race, horse, wager));
    let mut message = match channel_id.send_message(&ctx.http, builder).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = ?e, "race: failed to post track");
            credit_return(state, user_id, wager).await;
            return Some(commands::error_embed("🚫 Không mở được trường đua, hoàn cược."));
        }
    };

    while race.state == RaceState::Running {
        tokio::time::sleep(Duration::from_millis(RACE_TICK_MILLIS)).await;
        let step_draws: [f64; RACE_HORSES] = std::array::from_fn(|_| rand::random());
        race.tick(step_draws, rand::random());
        let edit = EditMessage::new().embed(race_embed(&race, horse, wager));
        if let Err(e) = message.edit(&ctx.http, edit).await {
            // Losing the live view must not forfeit the stake: run the rest
            // of the race off-screen and settle on the real outcome.
            tracing::warn!(error = ?e, "race: failed to edit track, finishing off-screen");
            race.run_to_finish(|| rand::random());
            break;
        }
    }

    let returned = race.payout(horse, wager);
    credit_return(state, user_id, returned).await;
    Some(if returned > 0 {
        commands::success_embed(
            "🏇 THẮNG CƯỢC",
            format!(
                "{} ngựa của bạn về nhất! Nhận **+{returned}** (×{RACE_WIN_MULTIPLIER}).",
                user.mention()
            ),
        )
    } else {
        commands::error_embed(format!(
            "{} ngựa của bạn về sau, mất **{wager}**.",
            user.mention()
        ))
    })
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let horse = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "horse")
        .and_then(|opt| opt.value.as_i64())
        .unwrap_or(1);
    let wager_arg = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "wager")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    if let Some(embed) = perform(
        ctx,
        &state,
        interaction.channel_id,
        &interaction.user,
        (horse - 1) as usize,
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
    let horse = args
        .first()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&h| (1..=RACE_HORSES).contains(&h));
    let (Some(horse), Some(wager_arg)) = (horse, args.get(1).copied()) else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!dn <ngựa 1-5> <tiền cược|all>`"),
        )
        .await;
        return;
    };
    if let Some(embed) = perform(ctx, &state, msg.channel_id, &msg.author, horse - 1, wager_arg).await
    {
        reply_embed(ctx, msg, embed).await;
    }
}
