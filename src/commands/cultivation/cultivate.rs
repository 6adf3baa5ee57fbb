//! Implements the `cultivate` command (`!tu`): quiet meditation for a small,
//! flat exp gain on a slow cooldown.

use crate::commands::{self, anti_bot_gate, followup_embed, reply_embed, simple_gate};
use crate::cooldown::ActionKind;
use crate::database::ledger;
use crate::database::models::AccountDelta;
use crate::game::{realms, rules};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("cultivate").description("Đả tọa tu luyện, tích lũy tu vi.")
}

async fn perform(
    ctx: &Context,
    state: &AppState,
    channel_id: ChannelId,
    user: &User,
) -> CreateEmbed {
    if let Err(embed) = anti_bot_gate(ctx, state, channel_id, user).await {
        return embed;
    }
    if let Err(embed) = simple_gate(state, user.id.get(), ActionKind::Cultivate).await {
        return embed;
    }

    let gained = rules::resolve_cultivate(rand::random());
    let account =
        match ledger::apply_delta(&state.db, user.id.get() as i64, AccountDelta::exp(gained)).await
        {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(error = ?e, "cultivate: failed to credit exp");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
        };

    commands::success_embed(
        "🧘 Tu Luyện",
        format!(
            "Linh khí hội tụ, tu vi tăng **+{gained} EXP**.\nCảnh giới: **{}** — tổng **{} EXP**.",
            realms::get(account.realm).name,
            account.exp
        ),
    )
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(ctx, &state, interaction.channel_id, &interaction.user).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(ctx, &state, msg.channel_id, &msg.author).await;
    reply_embed(ctx, msg, embed).await;
}
