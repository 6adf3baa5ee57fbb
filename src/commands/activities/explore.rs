//! Implements the `explore` command (`!khampha`): a single roll across six
//! outcome buckets, from beast ambush to buried treasure.

use crate::commands::{self, anti_bot_gate, followup_embed, reply_embed, simple_gate};
use crate::cooldown::ActionKind;
use crate::database::models::AccountDelta;
use crate::database::{config, ledger};
use crate::game::rules::{self, ExploreOutcome};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("explore").description("Khám phá bí cảnh, may rủi khó lường.")
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
    if let Err(embed) = simple_gate(state, user.id.get(), ActionKind::Explore).await {
        return embed;
    }

    let account = match ledger::get_or_create_account(&state.db, user.id.get() as i64).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "explore: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let outcome = rules::resolve_explore(account.realm, rand::random(), rand::random());
    let delta = match outcome {
        ExploreOutcome::BeastAttack { exp_loss } => AccountDelta::exp(-exp_loss),
        ExploreOutcome::Robbed { money_loss } => AccountDelta::cash(-money_loss),
        ExploreOutcome::Nothing => AccountDelta::default(),
        ExploreOutcome::FoundMoney { amount } => AccountDelta::cash(amount),
        ExploreOutcome::FoundExp { amount } => AccountDelta::exp(amount),
        ExploreOutcome::Treasure { money, exp } => AccountDelta {
            cash: money,
            exp,
            ..AccountDelta::default()
        },
    };
    if delta != AccountDelta::default() {
        if let Err(e) = ledger::apply_delta(&state.db, account.user_id, delta).await {
            tracing::error!(error = ?e, "explore: failed to apply outcome");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    }

    let (_, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
    match outcome {
        ExploreOutcome::BeastAttack { exp_loss } => commands::error_embed(format!(
            "🐺 Yêu thú phục kích! Bạn trọng thương, mất **{exp_loss} EXP**."
        )),
        ExploreOutcome::Robbed { money_loss } => commands::error_embed(format!(
            "🥷 Tán tu chặn đường cướp sạch! Bạn mất **{money_loss}** {emoji}."
        )),
        ExploreOutcome::Nothing => {
            commands::warn_embed("🧭 Bạn lang thang cả ngày nhưng không tìm thấy gì.")
        }
        ExploreOutcome::FoundMoney { amount } => commands::success_embed(
            "🧭 Khám Phá",
            format!("Bạn nhặt được túi tiền rơi: **+{amount}** {emoji}!"),
        ),
        ExploreOutcome::FoundExp { amount } => commands::success_embed(
            "🧭 Khám Phá",
            format!("Bạn tìm thấy động phủ bỏ hoang, lĩnh ngộ **+{amount} EXP**!"),
        ),
        ExploreOutcome::Treasure { money, exp } => commands::success_embed(
            "💎 KHO BÁU!",
            format!("Bạn đào trúng kho báu thượng cổ: **+{money}** {emoji} và **+{exp} EXP**!"),
        ),
    }
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
