//! Implements the `pvp` command (`!tythi`): challenge another player to a
//! duel over an equal cash wager. The target has 60 seconds to accept;
//! balances are re-checked at accept time and both legs of the settlement
//! run in one transaction. Only settled matches arm the challenger's
//! cooldown.

use crate::commands::{self, parse_amount, reply_embed};
use crate::constants::SESSION_MOVE_SECS;
use crate::cooldown::ActionKind;
use crate::database::{config, ledger};
use crate::game::{realms, rules};
use crate::model::AppState;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateCommand, CreateCommandOption, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage, EditMessage,
};
use serenity::model::application::{ButtonStyle, CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::user::User;
use serenity::prelude::*;
use std::time::Duration;

pub fn register() -> CreateCommand {
    CreateCommand::new("pvp")
        .description("Tỷ thí với đạo hữu khác, cược tiền mặt.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "target", "Đối thủ.").required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "wager", "Tiền cược (số hoặc all).")
                .required(true),
        )
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    challenger: &User,
    target_id: UserId,
    wager_arg: &str,
) {
    let send = |embed: CreateEmbed| async move {
        channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed))
            .await
            .ok();
    };

    if target_id == challenger.id {
        send(commands::error_embed("🚫 Không thể tỷ thí với chính mình.")).await;
        return;
    }
    {
        let cooldowns = state.cooldowns.lock().await;
        if let Some(remaining) = cooldowns.remaining_secs(challenger.id.get(), ActionKind::Pvp) {
            send(commands::warn_embed(format!(
                "⏳ Bạn vừa tỷ thí xong, còn **{remaining}s** mới được khiêu chiến tiếp."
            )))
            .await;
            return;
        }
    }

    let challenger_acc =
        match ledger::get_or_create_account(&state.db, challenger.id.get() as i64).await {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(error = ?e, "pvp: failed to load challenger");
                send(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")).await;
                return;
            }
        };
    let Some(wager) = parse_amount(wager_arg, challenger_acc.cash) else {
        send(commands::error_embed("🚫 Tiền cược không hợp lệ.")).await;
        return;
    };
    if challenger_acc.cash < wager {
        send(commands::error_embed(format!(
            "💸 Không đủ tiền mặt! Cần **{wager}**, bạn có **{}**.",
            challenger_acc.cash
        )))
        .await;
        return;
    }
    let target_acc = match ledger::get_or_create_account(&state.db, target_id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "pvp: failed to load target");
            send(commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")).await;
            return;
        }
    };
    if target_acc.cash < wager {
        send(commands::error_embed(format!(
            "💸 <@{target_id}> không đủ **{wager}** tiền mặt để nhận kèo."
        )))
        .await;
        return;
    }

    let (_, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
    let challenge = CreateEmbed::new()
        .title("⚔️ KHIÊU CHIẾN!")
        .description(format!(
            "<@{}> ({}) khiêu chiến <@{target_id}> ({})!\nTiền cược: **{wager}** {emoji} mỗi bên.\n⏳ {SESSION_MOVE_SECS} giây để trả lời.",
            challenger.id,
            realms::get(challenger_acc.realm).name,
            realms::get(target_acc.realm).name,
        ))
        .color(0xFFA500);
    let buttons = CreateActionRow::Buttons(vec![
        CreateButton::new("pvp_accept")
            .label("Nhận kèo")
            .style(ButtonStyle::Success),
        CreateButton::new("pvp_decline")
            .label("Từ chối")
            .style(ButtonStyle::Danger),
    ]);
    let builder = CreateMessage::new()
        .content(format!("<@{target_id}>"))
        .embed(challenge)
        .components(vec![buttons]);
    let mut message = match channel_id.send_message(&ctx.http, builder).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = ?e, "pvp: failed to post challenge");
            return;
        }
    };

    // Only the target may answer.
    let response = message
        .await_component_interaction(&ctx.shard)
        .author_id(target_id)
        .timeout(Duration::from_secs(SESSION_MOVE_SECS))
        .await;

    let Some(interaction) = response else {
        let edit = EditMessage::new()
            .embed(commands::warn_embed(format!(
                "⌛ <@{target_id}> không trả lời. Kèo bị hủy."
            )))
            .components(vec![]);
        message.edit(&ctx.http, edit).await.ok();
        return;
    };

    if interaction.data.custom_id == "pvp_decline" {
        let update = CreateInteractionResponseMessage::new()
            .embed(commands::warn_embed(format!(
                "🏳️ <@{target_id}> đã từ chối khiêu chiến."
            )))
            .components(vec![]);
        interaction
            .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
            .await
            .ok();
        return;
    }

    // Accepted. Decide the duel, then settle both legs atomically with a
    // balance re-check; either side may have spent the wager meanwhile.
    let chance = rules::pvp_win_chance(challenger_acc.realm, target_acc.realm);
    let challenger_wins = rand::random::<f64>() < chance;
    let (winner, loser) = if challenger_wins {
        (challenger.id, target_id)
    } else {
        (target_id, challenger.id)
    };
    let exp_reward = rules::pvp_exp_reward(rand::random());
    let exp_penalty = rules::pvp_exp_penalty(rand::random());

    let settled = match ledger::settle_duel(
        &state.db,
        winner.get() as i64,
        loser.get() as i64,
        wager,
        exp_reward,
        exp_penalty,
    )
    .await
    {
        Ok(settled) => settled,
        Err(e) => {
            tracing::error!(error = ?e, "pvp: settlement failed");
            let update = CreateInteractionResponseMessage::new()
                .embed(commands::error_embed("🚫 Lỗi hệ thống, kèo bị hủy."))
                .components(vec![]);
            interaction
                .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
                .await
                .ok();
            return;
        }
    };

    let result = if settled {
        state.cooldowns.lock().await.arm_cooldown(
            challenger.id.get(),
            ActionKind::Pvp,
            Duration::from_secs(
                config::cooldown_secs(&state.db, ActionKind::Pvp)
                    .await
                    .unwrap_or_else(|_| ActionKind::Pvp.default_secs()),
            ),
        );
        commands::success_embed(
            "⚔️ TỶ THÍ KẾT THÚC!",
            format!(
                "<@{winner}> chiến thắng!\n💰 **+{wager}** {emoji}, **+{exp_reward} EXP**.\n<@{loser}> thua cuộc: **-{wager}** {emoji}, **-{exp_penalty} EXP**.",
            ),
        )
    } else {
        commands::warn_embed("💸 Một trong hai bên không còn đủ tiền cược. Kèo bị hủy.")
    };
    let update = CreateInteractionResponseMessage::new()
        .embed(result)
        .components(vec![]);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
        .await
        .ok();
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let target = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "target")
        .and_then(|opt| opt.value.as_user_id());
    let wager = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "wager")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let Some(target_id) = target else {
        return;
    };
    // Acknowledge immediately; the duel plays out as channel messages.
    let ack = CreateInteractionResponseMessage::new()
        .content("⚔️ Đã gửi khiêu chiến!")
        .ephemeral(true);
    interaction
        .create_response(&ctx.http, CreateInteractionResponse::Message(ack))
        .await
        .ok();
    perform(
        ctx,
        &state,
        interaction.channel_id,
        &interaction.user,
        target_id,
        wager,
    )
    .await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(target) = msg.mentions.first() else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!tythi @đối_thủ <tiền cược>`"),
        )
        .await;
        return;
    };
    let wager_arg = args.iter().find(|a| !a.starts_with("<@")).copied();
    let Some(wager_arg) = wager_arg else {
        reply_embed(ctx, msg, commands::error_embed("🚫 Thiếu tiền cược.")).await;
        return;
    };
    perform(ctx, &state, msg.channel_id, &msg.author, target.id, wager_arg).await;
}
