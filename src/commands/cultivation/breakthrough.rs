//! Implements the `breakthrough` command (`!dotpha`): attempt to ascend to
//! the next realm. The highest-priority owned breakthrough pill is consumed
//! whether or not the tribulation succeeds; failure burns 10% of exp and
//! 10% of total wealth.

use crate::commands::{self, describe_error, followup_embed, reply_embed};
use crate::database::models::AccountDelta;
use crate::database::{inventory, ledger};
use crate::game::error::GameError;
use crate::game::items::{BONUS_PILLS, Item};
use crate::game::{realms, rules};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("breakthrough").description("Đột phá cảnh giới.")
}

/// First owned pill in priority order, if any.
async fn find_bonus_pill(state: &AppState, user_id: i64) -> sqlx::Result<Option<Item>> {
    for &pill in BONUS_PILLS {
        if inventory::item_count(&state.db, user_id, pill).await? > 0 {
            return Ok(Some(pill));
        }
    }
    Ok(None)
}

async fn perform(state: &AppState, user: &User) -> CreateEmbed {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "breakthrough: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let Some((next_idx, next_realm)) = realms::next(account.realm) else {
        return commands::warn_embed(describe_error(&GameError::MaxTierReached));
    };
    if account.exp < next_realm.req_exp {
        return commands::error_embed(format!(
            "{}\nĐể lên **{}** còn thiếu **{} EXP**.",
            describe_error(&GameError::InsufficientExperience {
                needed: next_realm.req_exp,
                current: account.exp,
            }),
            next_realm.name,
            next_realm.req_exp - account.exp
        ));
    }

    let pill = match find_bonus_pill(state, user_id).await {
        Ok(pill) => pill,
        Err(e) => {
            tracing::error!(error = ?e, "breakthrough: failed to read pills");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let bonus = pill.and_then(|p| p.properties().breakthrough_bonus);
    // The pill is spent on the attempt itself, success or not.
    if let Some(pill) = pill {
        if let Err(e) = inventory::consume_item(&state.db, user_id, pill, 1).await {
            tracing::error!(error = ?e, "breakthrough: failed to consume pill");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    }

    let chance = rules::breakthrough_chance(next_realm.base_rate, bonus);
    let pill_note = match pill {
        Some(p) => format!(
            " (+{:.0}% từ {})",
            next_realm.base_rate * bonus.unwrap_or(0.0) * 100.0,
            p.display_name()
        ),
        None => String::new(),
    };

    if rand::random::<f64>() < chance {
        let delta = AccountDelta {
            realm: Some(next_idx),
            ..AccountDelta::default()
        };
        if let Err(e) = ledger::apply_delta(&state.db, user_id, delta).await {
            tracing::error!(error = ?e, "breakthrough: failed to set realm");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
        commands::success_embed(
            "✨ ĐỘT PHÁ THÀNH CÔNG! ✨",
            format!(
                "Chúc mừng đạo hữu <@{}> bước vào cảnh giới **{}**!\nTỷ lệ: {:.0}%{}",
                user.id,
                next_realm.name,
                chance * 100.0,
                pill_note
            ),
        )
    } else {
        let penalty = rules::breakthrough_penalty(account.exp, account.wealth());
        let delta = AccountDelta {
            cash: -penalty.money_loss,
            exp: -penalty.exp_loss,
            ..AccountDelta::default()
        };
        if let Err(e) = ledger::apply_delta(&state.db, user_id, delta).await {
            tracing::error!(error = ?e, "breakthrough: failed to apply penalty");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
        commands::error_embed(format!(
            "🌩️ ĐỘ KIẾP THẤT BẠI! 🌩️\nThiên lôi giáng xuống, thân thể trọng thương.\n\
             Tổn thất: **-{} EXP**, tiền thuốc men **-{}**.\nCảnh giới: vẫn dậm chân tại chỗ.{}",
            penalty.exp_loss, penalty.money_loss, pill_note
        ))
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(&state, &interaction.user).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(&state, &msg.author).await;
    reply_embed(ctx, msg, embed).await;
}
