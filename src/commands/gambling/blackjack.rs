//! Implements the `blackjack` command (`!xd`): starts an interactive
//! session driven by hit/stand buttons. The wager is debited before the
//! deal; a natural settles instantly without a session.

use super::take_wager;
use crate::commands::{self, parse_amount, reply_embed};
use crate::database::ledger;
use crate::database::models::AccountDelta;
use crate::game::blackjack::BlackjackSession;
use crate::game::session::Session;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed, CreateMessage};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("blackjack")
        .description("Xì dách với nhà cái: blackjack trả 2.5 lần.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (hoặc all).")
                .required(true),
        )
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
    wager_arg: &str,
) -> Option<CreateEmbed> {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "blackjack: failed to load account");
            return Some(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau."));
        }
    };
    let Some(wager) = parse_amount(wager_arg, account.cash) else {
        return Some(commands::error_embed("🚫 Tiền cược không hợp lệ."));
    };
    if let Err(embed) = take_wager(state, user_id, wager).await {
        return Some(embed);
    }

    let session = BlackjackSession::new(user.id, wager);
    let (embed, components) = session.render();

    if session.is_settled() {
        // Natural on the deal: pay out immediately, no buttons needed.
        let payout = crate::game::blackjack::RoundOutcome::Natural.payout(wager);
        if let Err(e) = ledger::apply_delta(&state.db, user_id, AccountDelta::cash(payout)).await {
            tracing::error!(error = ?e, "blackjack: failed to pay natural");
        }
        return Some(embed);
    }

    let builder = CreateMessage::new().embed(embed).components(components);
    match channel_id.send_message(&ctx.http, builder).await {
        Ok(message) => {
            let mut sessions = state.sessions.lock().await;
            sessions.start_session(message.id, channel_id, Box::new(session));
            None
        }
        Err(e) => {
            tracing::warn!(error = ?e, "blackjack: failed to post session");
            // The table never opened; give the stake back.
            super::credit_return(state, user_id, wager).await;
            Some(commands::error_embed("🚫 Không mở được bàn chơi, hoàn cược."))
        }
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
    if let Some(embed) =
        perform(ctx, &state, interaction.channel_id, &interaction.user, wager_arg).await
    {
        commands::followup_embed(ctx, interaction, embed).await;
    } else {
        let builder = serenity::builder::CreateInteractionResponseFollowup::new()
            .content("🃏 Bàn chơi đã mở, bấm nút để rút hoặc dằn!")
            .ephemeral(true);
        interaction.create_followup(&ctx.http, builder).await.ok();
    }
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(wager_arg) = args.first() else {
        reply_embed(ctx, msg, commands::error_embed("🚫 Dùng: `!xd <tiền cược|all>`")).await;
        return;
    };
    if let Some(embed) = perform(ctx, &state, msg.channel_id, &msg.author, wager_arg).await {
        reply_embed(ctx, msg, embed).await;
    }
}
