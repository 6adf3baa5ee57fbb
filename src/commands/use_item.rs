//! Implements the `use` command (`!dung`): consumes exp pills for tu vi.
//! Breakthrough pills are not used here; `dotpha` picks one up on its own.

use crate::commands::{self, describe_error, followup_embed, reply_embed};
use crate::database::inventory;
use crate::game::error::GameError;
use crate::game::items::{Item, ItemCategory};
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("use")
        .description("Dùng đan dược trong túi.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "item",
                "Mã vật phẩm, ví dụ tukhi1.",
            )
            .required(true),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "amount", "Số lượng.")
                .min_int_value(1),
        )
}

/// Total exp a pill stack grants. The top pill is worth 50M exp each, so the
/// multiply saturates rather than overflowing on an absurd quantity.
fn stack_exp(exp_each: i64, amount: i64) -> i64 {
    exp_each.saturating_mul(amount)
}

async fn perform(state: &AppState, user: &User, item_arg: &str, amount: i64) -> CreateEmbed {
    if amount <= 0 {
        return commands::error_embed("🚫 Số lượng phải lớn hơn 0.");
    }
    let Ok(item) = item_arg.parse::<Item>() else {
        return commands::error_embed("🚫 Không có vật phẩm đó. Xem mã trong `!tui`.");
    };
    let props = item.properties();
    let user_id = user.id.get() as i64;

    match props.category {
        ItemCategory::BreakthroughPill => commands::warn_embed(format!(
            "💊 **{}** không dùng trực tiếp: nó tự kích hoạt khi bạn `!dotpha`.",
            props.display_name
        )),
        ItemCategory::ExpPill => {
            let gained = stack_exp(props.exp_value.unwrap_or(0), amount);
            match inventory::consume_for_exp(&state.db, user_id, item, amount, gained).await {
                Ok(account) => commands::success_embed(
                    "🧘 HẤP THỤ ĐAN DƯỢC",
                    format!(
                        "{} đã dùng **{amount}× {} {}**.\nTu vi tăng **+{gained} EXP** → tổng **{} EXP**.",
                        user.mention(),
                        props.emoji,
                        props.display_name,
                        account.exp,
                    ),
                ),
                Err(GameError::Db(e)) => {
                    tracing::error!(error = ?e, user_id, "use: failed to consume pills");
                    commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
                }
                Err(e) => commands::error_embed(describe_error(&e)),
            }
        }
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let item_arg = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "item")
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let amount = interaction
        .data
        .options
        .iter()
        .find(|opt| opt.name == "amount")
        .and_then(|opt| opt.value.as_i64())
        .unwrap_or(1);
    let embed = perform(&state, &interaction.user, item_arg, amount).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(item_arg) = args.first() else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!dung <mã vật phẩm> [số lượng]`"),
        )
        .await;
        return;
    };
    let amount = args.get(1).and_then(|s| s.parse::<i64>().ok()).unwrap_or(1);
    let embed = perform(&state, &msg.author, item_arg, amount).await;
    reply_embed(ctx, msg, embed).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_pill_stacks_saturate_instead_of_overflowing() {
        assert_eq!(stack_exp(50_000_000, 2), 100_000_000);
        assert_eq!(stack_exp(50_000_000, i64::MAX), i64::MAX);
    }
}
