//! Implements the `profile` command (`!ht`): a read-only card of realm,
//! exp, balances and progress toward the next breakthrough.

use crate::commands::{followup_embed, reply_embed};
use crate::database::{config, ledger};
use crate::game::realms;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("profile")
        .description("Xem hồ sơ tu luyện.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::User, "user", "Người cần xem.")
                .required(false),
        )
}

async fn build(state: &AppState, user: &User) -> CreateEmbed {
    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "profile: failed to load account");
            return crate::commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let (name, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));

    let realm = realms::get(account.realm);
    let next_line = match realms::next(account.realm) {
        Some((_, next)) => format!(
            "**{}** — cần {} EXP (còn thiếu {})",
            next.name,
            next.req_exp,
            (next.req_exp - account.exp).max(0)
        ),
        None => "Đã đạt cảnh giới cao nhất.".to_string(),
    };

    CreateEmbed::new()
        .title(format!("📜 Hồ sơ của {}", user.name))
        .field("Cảnh giới", realm.name, true)
        .field("Tu vi", format!("{} EXP", account.exp), true)
        .field(
            format!("{emoji} {name}"),
            format!("Ví: **{}** | Ngân hàng: **{}**", account.cash, account.bank),
            false,
        )
        .field("Đột phá kế tiếp", next_line, false)
        .color(0x3498DB)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let target = if let Some(option) = interaction.data.options.first() {
        match option.value.as_user_id() {
            Some(id) => id
                .to_user(&ctx.http)
                .await
                .unwrap_or_else(|_| interaction.user.clone()),
            None => interaction.user.clone(),
        }
    } else {
        interaction.user.clone()
    };
    let embed = build(&state, &target).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let target = msg
        .mentions
        .first()
        .cloned()
        .unwrap_or_else(|| msg.author.clone());
    let embed = build(&state, &target).await;
    reply_embed(ctx, msg, embed).await;
}
