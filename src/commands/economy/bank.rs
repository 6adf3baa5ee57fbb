//! Implements the `bank` command: deposit (`!gui`) and withdraw (`!rut`).
//! Banked money is safe from robbery, pvp and gambling.

use crate::commands::{self, describe_error, followup_embed, parse_amount, reply_embed};
use crate::database::{config, ledger};
use crate::game::error::GameError;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankOp {
    Deposit,
    Withdraw,
}

pub fn register() -> CreateCommand {
    CreateCommand::new("bank")
        .description("Gửi hoặc rút tiền ngân hàng.")
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "deposit", "Gửi tiền vào.")
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "amount",
                        "Số tiền (hoặc all).",
                    )
                    .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "withdraw", "Rút tiền ra.")
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "amount",
                        "Số tiền (hoặc all).",
                    )
                    .required(true),
                ),
        )
}

pub async fn perform(state: &AppState, user: &User, op: BankOp, amount_arg: &str) -> CreateEmbed {
    let user_id = user.id.get() as i64;
    let account = match ledger::get_or_create_account(&state.db, user_id).await {
        Ok(account) => account,
        Err(e) => {
            tracing::error!(error = ?e, "bank: failed to load account");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    let available = match op {
        BankOp::Deposit => account.cash,
        BankOp::Withdraw => account.bank,
    };
    let Some(amount) = parse_amount(amount_arg, available) else {
        return commands::error_embed("🚫 Số tiền không hợp lệ.");
    };

    let result = match op {
        BankOp::Deposit => ledger::bank_deposit(&state.db, user_id, amount).await,
        BankOp::Withdraw => ledger::bank_withdraw(&state.db, user_id, amount).await,
    };
    let updated = match result {
        Ok(updated) => updated,
        Err(e @ GameError::InsufficientFunds { .. }) => {
            return commands::error_embed(describe_error(&e));
        }
        Err(e) => {
            tracing::error!(error = ?e, "bank: operation failed");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let (name, emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".into(), "🪙".into()));
    let verb = match op {
        BankOp::Deposit => "Gửi",
        BankOp::Withdraw => "Rút",
    };
    commands::success_embed(
        format!("🏦 {verb} thành công"),
        format!(
            "{verb} **{amount}** {emoji} {name}.\nVí: **{}** | Ngân hàng: **{}**.",
            updated.cash, updated.bank
        ),
    )
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(sub) = interaction.data.options.first() else {
        return;
    };
    let op = match sub.name.as_str() {
        "deposit" => BankOp::Deposit,
        "withdraw" => BankOp::Withdraw,
        _ => return,
    };
    let amount_arg = match &sub.value {
        serenity::model::application::CommandDataOptionValue::SubCommand(opts) => opts
            .first()
            .and_then(|o| o.value.as_str())
            .unwrap_or(""),
        _ => "",
    };
    let embed = perform(&state, &interaction.user, op, amount_arg).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, op: BankOp, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(amount_arg) = args.first() else {
        let usage = match op {
            BankOp::Deposit => "🚫 Dùng: `!gui <số tiền|all>`",
            BankOp::Withdraw => "🚫 Dùng: `!rut <số tiền|all>`",
        };
        reply_embed(ctx, msg, commands::error_embed(usage)).await;
        return;
    };
    let embed = perform(&state, &msg.author, op, amount_arg).await;
    reply_embed(ctx, msg, embed).await;
}
