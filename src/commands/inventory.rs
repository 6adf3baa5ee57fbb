//! Implements the `inventory` command (`!tui`): what the player is carrying.

use crate::commands::{self, followup_embed, reply_embed};
use crate::database::inventory;
use crate::game::items::Item;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("inventory").description("Xem túi đồ của bạn.")
}

async fn build(state: &AppState, user: &User) -> CreateEmbed {
    let entries = match inventory::get_inventory(&state.db, user.id.get() as i64).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!(error = ?e, "inventory: failed to load");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    if entries.is_empty() {
        return commands::warn_embed("🎒 Túi đồ của bạn trống trơn.");
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| match Item::from_i64(entry.item_id) {
            Some(item) => format!(
                "{} **{}** (`{}`) × **{}**",
                item.emoji(),
                item.display_name(),
                item,
                entry.quantity
            ),
            // An id the catalog no longer knows, e.g. after a downgrade.
            None => format!("❓ Vật phẩm #{} × **{}**", entry.item_id, entry.quantity),
        })
        .collect();
    CreateEmbed::new()
        .title(format!("🎒 Túi đồ của {}", user.name))
        .description(lines.join("\n"))
        .color(0x95A5A6)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state, &interaction.user).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build(&state, &msg.author).await;
    reply_embed(ctx, msg, embed).await;
}
