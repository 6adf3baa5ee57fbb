//! All Discord-facing commands, grouped by domain, plus the shared helpers
//! they lean on: embed plumbing, amount parsing, the cooldown gates and the
//! anti-automation captcha round-trip.

pub mod activities;
pub mod admin;
pub mod cultivation;
pub mod economy;
pub mod gambling;
pub mod help;
pub mod inventory;
pub mod shop;
pub mod use_item;

use crate::captcha::{self, Challenge};
use crate::constants::{CAPTCHA_WINDOW_SECS, SPAM_FINE};
use crate::cooldown::{ActionKind, Gate};
use crate::database::models::AccountDelta;
use crate::database::{config, ledger};
use crate::game::error::GameError;
use crate::model::AppState;
use chrono::Utc;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, CreateMessage,
    EditMessage,
};
use serenity::model::application::{ButtonStyle, CommandInteraction};
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::time::Duration;

pub fn error_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new().description(description.into()).color(0xFF0000)
}

pub fn warn_embed(description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new().description(description.into()).color(0xFFA500)
}

pub fn success_embed(title: impl Into<String>, description: impl Into<String>) -> CreateEmbed {
    CreateEmbed::new()
        .title(title.into())
        .description(description.into())
        .color(0x00FF00)
}

/// Sends a command's embed as the followup of an already-deferred slash
/// interaction.
pub async fn followup_embed(ctx: &Context, interaction: &CommandInteraction, embed: CreateEmbed) {
    let builder = CreateInteractionResponseFollowup::new().embed(embed);
    if let Err(e) = interaction.create_followup(&ctx.http, builder).await {
        tracing::warn!(error = ?e, "failed to send slash followup");
    }
}

/// Sends a command's embed as a reply to a prefix message.
pub async fn reply_embed(ctx: &Context, msg: &Message, embed: CreateEmbed) {
    let builder = CreateMessage::new().embed(embed).reference_message(msg);
    if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
        tracing::warn!(error = ?e, "failed to send prefix response");
    }
}

/// Parses a wager/amount argument: a positive integer, or `all` for the
/// whole available balance.
pub fn parse_amount(input: &str, available: i64) -> Option<i64> {
    let amount = match input.trim().to_lowercase().as_str() {
        "all" | "tatca" => available,
        other => other.parse::<i64>().ok()?,
    };
    (amount > 0).then_some(amount)
}

/// User-facing text for a game error.
pub fn describe_error(error: &GameError) -> String {
    match error {
        GameError::InsufficientFunds { needed, available } => format!(
            "💸 Không đủ tiền! Cần **{needed}**, bạn chỉ có **{available}**."
        ),
        GameError::InsufficientInventory { needed, owned } => format!(
            "🎒 Không đủ vật phẩm! Cần **{needed}**, bạn có **{owned}**."
        ),
        GameError::InvalidTarget => "🚫 Mục tiêu không hợp lệ.".to_string(),
        GameError::OnCooldown { remaining_secs } => format!(
            "⏳ Hành động đang hồi. Thử lại sau **{remaining_secs}s**."
        ),
        GameError::Jailed { until } => format!(
            "⛓️ Bạn đang bị giam! Thời gian được thả: <t:{until}:R>."
        ),
        GameError::InsufficientExperience { needed, current } => format!(
            "🚫 Tu vi chưa đủ! Cần **{needed} EXP**, hiện có **{current} EXP**."
        ),
        GameError::MaxTierReached => {
            "👑 Độc Cô Cầu Bại! Bạn đã đạt cảnh giới cao nhất.".to_string()
        }
        GameError::Db(_) => "🚫 Lỗi hệ thống, thử lại sau.".to_string(),
    }
}

/// Checks the grind cooldown under the two-strike spam policy. A repeat
/// offense while still cooling fines the player on the spot.
pub async fn grind_gate(
    state: &AppState,
    user_id: u64,
    action: ActionKind,
) -> Result<(), CreateEmbed> {
    let secs = config::cooldown_secs(&state.db, action)
        .await
        .unwrap_or_else(|_| action.default_secs());
    let gate = {
        let mut cooldowns = state.cooldowns.lock().await;
        cooldowns.try_acquire_two_strike(user_id, action, Duration::from_secs(secs))
    };
    match gate {
        Gate::Clear => Ok(()),
        Gate::Wait { remaining_secs } => Err(warn_embed(format!(
            "⏳ Hành động đang hồi, còn **{remaining_secs}s**."
        ))),
        Gate::Warned { remaining_secs } => Err(warn_embed(format!(
            "⚠️ Chưa hồi xong (còn **{remaining_secs}s**)! Spam thêm lần nữa sẽ bị phạt **{SPAM_FINE}**."
        ))),
        Gate::Struck { remaining_secs } => {
            if let Err(e) =
                ledger::apply_delta(&state.db, user_id as i64, AccountDelta::cash(-SPAM_FINE)).await
            {
                tracing::error!(error = ?e, user_id, "failed to apply spam fine");
            }
            Err(error_embed(format!(
                "🚨 Spam! Bạn bị phạt **{SPAM_FINE}**. Cooldown còn **{remaining_secs}s**."
            )))
        }
    }
}

/// Plain cooldown check for the slower actions: no warning ladder, just a
/// rejection with the remaining time.
pub async fn simple_gate(
    state: &AppState,
    user_id: u64,
    action: ActionKind,
) -> Result<(), CreateEmbed> {
    let secs = config::cooldown_secs(&state.db, action)
        .await
        .unwrap_or_else(|_| action.default_secs());
    let gate = {
        let mut cooldowns = state.cooldowns.lock().await;
        cooldowns.try_acquire(user_id, action, Duration::from_secs(secs))
    };
    match gate {
        Gate::Clear => Ok(()),
        Gate::Wait { remaining_secs }
        | Gate::Warned { remaining_secs }
        | Gate::Struck { remaining_secs } => Err(warn_embed(format!(
            "⏳ Hành động đang hồi, còn **{remaining_secs}s**."
        ))),
    }
}

/// The anti-automation gate run before every gated action: rejects jailed
/// players up front, then with a small chance demands an icon captcha in
/// the channel. `Err` carries the embed to show instead of the action's
/// result; passing lets the action proceed this one time.
pub async fn anti_bot_gate(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
) -> Result<(), CreateEmbed> {
    let account = ledger::get_or_create_account(&state.db, user.id.get() as i64)
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "failed to load account for gate");
            error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        })?;
    let now = Utc::now().timestamp();
    if account.jailed_until > now {
        return Err(error_embed(describe_error(&GameError::Jailed {
            until: account.jailed_until,
        })));
    }

    if !captcha::should_challenge(rand::random::<f64>()) {
        return Ok(());
    }
    run_captcha(ctx, state, channel_id, user).await
}

/// One captcha round-trip: post the challenge, wait for the player's click,
/// jail on a wrong answer or a lapsed window.
async fn run_captcha(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
) -> Result<(), CreateEmbed> {
    let challenge = Challenge::generate();
    let target = challenge.target_icon();

    let buttons: Vec<CreateButton> = challenge
        .options
        .iter()
        .enumerate()
        .map(|(slot, &icon_idx)| {
            let icon = &captcha::ICONS[icon_idx];
            CreateButton::new(format!("captcha_{slot}"))
                .label(format!("{} {}", icon.emoji, icon.name))
                .style(ButtonStyle::Secondary)
        })
        .collect();

    let embed = CreateEmbed::new()
        .title("🛡️ KIỂM TRA BẢO MẬT (CAPTCHA)")
        .description(format!(
            "Hệ thống phát hiện bất thường. Vui lòng bấm vào nút **{} {}** để tiếp tục.\n⏳ Thời gian: {} giây.",
            target.emoji, target.name, CAPTCHA_WINDOW_SECS
        ))
        .color(0xFFA500);
    let builder = CreateMessage::new()
        .content(format!("<@{}>", user.id))
        .embed(embed)
        .components(vec![CreateActionRow::Buttons(buttons)]);
    let message = channel_id
        .send_message(&ctx.http, builder)
        .await
        .map_err(|e| {
            tracing::warn!(error = ?e, "failed to post captcha");
            error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        })?;

    let clicked = message
        .await_component_interaction(&ctx.shard)
        .author_id(user.id)
        .timeout(Duration::from_secs(CAPTCHA_WINDOW_SECS))
        .await;

    match clicked {
        Some(interaction) => {
            let slot = interaction
                .data
                .custom_id
                .strip_prefix("captcha_")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(usize::MAX);
            if challenge.verify(slot) {
                let update = CreateInteractionResponseMessage::new()
                    .content("✅ **Xác thực thành công!** Bạn có thể tiếp tục chơi.")
                    .embeds(vec![])
                    .components(vec![]);
                interaction
                    .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
                    .await
                    .ok();
                Ok(())
            } else {
                let until = jail_for_captcha(state, user.id.get() as i64).await;
                let update = CreateInteractionResponseMessage::new()
                    .content(format!(
                        "🚫 **Xác thực thất bại!**\nBạn bị giam 30 phút vì nghi vấn dùng tool.\nThời gian được thả: <t:{until}:R>"
                    ))
                    .embeds(vec![])
                    .components(vec![]);
                interaction
                    .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
                    .await
                    .ok();
                Err(error_embed("⛓️ Hành động bị hủy: xác thực thất bại."))
            }
        }
        None => {
            let until = jail_for_captcha(state, user.id.get() as i64).await;
            let mut message = message;
            let edit = EditMessage::new()
                .content(format!(
                    "⌛ **Hết thời gian!**\nBạn bị giam 30 phút vì không phản hồi.\nThời gian được thả: <t:{until}:R>"
                ))
                .embeds(vec![])
                .components(vec![]);
            message.edit(&ctx.http, edit).await.ok();
            Err(error_embed("⛓️ Hành động bị hủy: hết thời gian xác thực."))
        }
    }
}

async fn jail_for_captcha(state: &AppState, user_id: i64) -> i64 {
    let until = captcha::jail_until_from_now();
    if let Err(e) = ledger::set_jail(&state.db, user_id, until).await {
        tracing::error!(error = ?e, user_id, "failed to jail after captcha failure");
    }
    until
}
