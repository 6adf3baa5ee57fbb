//! Implements the `admin` command family: jail management, punishments,
//! resource grants, cooldown tuning, shop curation and the thiên đạo
//! random event. Every entry point checks the caller against the admin
//! list from the environment.

use crate::commands::{self, followup_embed, reply_embed};
use crate::cooldown::ActionKind;
use crate::database::models::{Account, AccountDelta};
use crate::database::{config, inventory, ledger, shop};
use crate::game::items::Item;
use crate::model::AppState;
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandDataOptionValue, CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::id::UserId;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("admin")
        .description("Lệnh quản trị (chỉ admin).")
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "jail", "Giam một người chơi.")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "user", "Người bị giam.")
                        .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "minutes", "Số phút.")
                        .min_int_value(1),
                ),
        )
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "unjail", "Thả một người chơi.")
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::User, "user", "Người được thả.")
                        .required(true),
                ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "punish",
                "Phạt tiền/tu vi (bỏ trống user để phạt tất cả).",
            )
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Người bị phạt.",
            ))
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "money", "Tiền phạt.")
                    .min_int_value(0),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "exp", "Tu vi trừ.")
                    .min_int_value(0),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "give",
                "Cộng tài nguyên cho người chơi.",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::User, "user", "Người nhận.")
                    .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "kind",
                    "cash, bank, exp hoặc mã vật phẩm.",
                )
                .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "amount", "Số lượng.")
                    .required(true)
                    .min_int_value(1),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "take",
                "Trừ tài nguyên của người chơi.",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::User, "user", "Người bị trừ.")
                    .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "kind",
                    "cash, bank, exp hoặc mã vật phẩm.",
                )
                .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "amount", "Số lượng.")
                    .required(true)
                    .min_int_value(1),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "cooldown",
                "Xem hoặc chỉnh cooldown một hành động.",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "action",
                    "mine, fish, rob, cultivate, explore, hunt, pvp, chat.",
                )
                .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "secs", "Giá trị mới (giây).")
                    .min_int_value(0),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "shopset",
                "Thêm hoặc đổi giá vật phẩm trong cửa hàng.",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "item", "Mã vật phẩm.")
                    .required(true),
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Integer, "price", "Giá bán.")
                    .required(true)
                    .min_int_value(1),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "shopremove",
                "Gỡ vật phẩm khỏi cửa hàng.",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::String, "item", "Mã vật phẩm.")
                    .required(true),
            ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "thiendao",
            "Thiên đạo vô thường: tài lộc ngẫu nhiên giáng xuống.",
        ))
}

async fn perform_jail(state: &AppState, target: UserId, minutes: i64) -> CreateEmbed {
    let until = Utc::now().timestamp() + minutes * 60;
    match ledger::set_jail(&state.db, target.get() as i64, until).await {
        Ok(_) => commands::success_embed(
            "⛓️ ĐÃ GIAM",
            format!("<@{target}> bị giam **{minutes} phút**. Thời gian được thả: <t:{until}:R>."),
        ),
        Err(e) => {
            tracing::error!(error = ?e, "admin: jail failed");
            commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        }
    }
}

async fn perform_unjail(state: &AppState, target: UserId) -> CreateEmbed {
    match ledger::set_jail(&state.db, target.get() as i64, 0).await {
        Ok(_) => commands::success_embed("🔓 ĐÃ THẢ", format!("<@{target}> đã được thả.")),
        Err(e) => {
            tracing::error!(error = ?e, "admin: unjail failed");
            commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        }
    }
}

/// Applies one punishment to one account: money is drained cash-first, and
/// an exp debt the account cannot cover drops a realm instead of going
/// negative.
async fn punish_one(state: &AppState, account: &Account, money: i64, exp: i64) -> sqlx::Result<()> {
    let delta = if exp > account.exp && account.realm > 0 {
        AccountDelta {
            cash: -money,
            exp: -account.exp,
            realm: Some(account.realm - 1),
            ..AccountDelta::default()
        }
    } else {
        AccountDelta {
            cash: -money,
            exp: -exp,
            ..AccountDelta::default()
        }
    };
    ledger::apply_delta(&state.db, account.user_id, delta).await?;
    Ok(())
}

async fn perform_punish(
    state: &AppState,
    target: Option<UserId>,
    money: i64,
    exp: i64,
) -> CreateEmbed {
    if money <= 0 && exp <= 0 {
        return commands::error_embed("🚫 Phải phạt ít nhất tiền hoặc tu vi.");
    }
    match target {
        Some(user_id) => {
            let account = match ledger::get_or_create_account(&state.db, user_id.get() as i64).await
            {
                Ok(account) => account,
                Err(e) => {
                    tracing::error!(error = ?e, "admin: punish load failed");
                    return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
                }
            };
            if let Err(e) = punish_one(state, &account, money, exp).await {
                tracing::error!(error = ?e, "admin: punish failed");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
            commands::success_embed(
                "⚡ TRỪNG PHẠT",
                format!("<@{user_id}> bị trừ **{money}** tiền và **{exp} EXP**."),
            )
        }
        None => {
            let accounts = match ledger::all_accounts(&state.db).await {
                Ok(accounts) => accounts,
                Err(e) => {
                    tracing::error!(error = ?e, "admin: punish-all load failed");
                    return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
                }
            };
            let mut punished = 0usize;
            for account in &accounts {
                match punish_one(state, account, money, exp).await {
                    Ok(()) => punished += 1,
                    Err(e) => {
                        tracing::error!(error = ?e, user_id = account.user_id, "admin: punish failed")
                    }
                }
            }
            commands::success_embed(
                "⚡ TRỪNG PHẠT TOÀN SERVER",
                format!("Đã phạt **{punished}** người chơi: −{money} tiền, −{exp} EXP mỗi người."),
            )
        }
    }
}

async fn perform_resource(
    state: &AppState,
    target: UserId,
    kind: &str,
    amount: i64,
    give: bool,
) -> CreateEmbed {
    if amount <= 0 {
        return commands::error_embed("🚫 Số lượng phải lớn hơn 0.");
    }
    let user_id = target.get() as i64;
    let signed = if give { amount } else { -amount };
    let verb = if give { "cộng" } else { "trừ" };

    let result = match kind.to_lowercase().as_str() {
        "cash" | "tien" => {
            ledger::apply_delta(&state.db, user_id, AccountDelta::cash(signed))
                .await
                .map(|_| format!("Đã {verb} **{amount}** tiền mặt cho <@{target}>."))
                .map_err(|e| format!("{e:?}"))
        }
        "bank" => ledger::apply_delta(
            &state.db,
            user_id,
            AccountDelta {
                bank: signed,
                ..AccountDelta::default()
            },
        )
        .await
        .map(|_| format!("Đã {verb} **{amount}** tiền ngân hàng cho <@{target}>."))
        .map_err(|e| format!("{e:?}")),
        "exp" => ledger::apply_delta(&state.db, user_id, AccountDelta::exp(signed))
            .await
            .map(|_| format!("Đã {verb} **{amount} EXP** cho <@{target}>."))
            .map_err(|e| format!("{e:?}")),
        other => match other.parse::<Item>() {
            Ok(item) if give => inventory::add_item(&state.db, user_id, item, amount)
                .await
                .map(|_| {
                    format!(
                        "Đã cộng **{amount}× {}** cho <@{target}>.",
                        item.display_name()
                    )
                })
                .map_err(|e| format!("{e:?}")),
            Ok(item) => inventory::consume_item(&state.db, user_id, item, amount)
                .await
                .map(|_| {
                    format!(
                        "Đã trừ **{amount}× {}** của <@{target}>.",
                        item.display_name()
                    )
                })
                .map_err(|e| format!("{e:?}")),
            Err(()) => {
                return commands::error_embed(
                    "🚫 Loại tài nguyên không hợp lệ: dùng cash, bank, exp hoặc mã vật phẩm.",
                );
            }
        },
    };

    match result {
        Ok(line) => commands::success_embed("🛠️ TÀI NGUYÊN", line),
        Err(detail) => {
            tracing::error!(detail, "admin: resource op failed");
            commands::error_embed("🚫 Thao tác thất bại, xem log.")
        }
    }
}

async fn perform_cooldown(state: &AppState, action_arg: &str, secs: Option<i64>) -> CreateEmbed {
    let Ok(action) = action_arg.parse::<ActionKind>() else {
        return commands::error_embed(
            "🚫 Hành động không hợp lệ: mine, fish, rob, cultivate, explore, hunt, pvp, chat.",
        );
    };
    match secs {
        Some(secs) if secs >= 0 => {
            if let Err(e) = config::set(&state.db, action.config_key(), &secs.to_string()).await {
                tracing::error!(error = ?e, "admin: cooldown set failed");
                return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
            }
            commands::success_embed(
                "⏱️ COOLDOWN",
                format!("`{}` giờ là **{secs}s**.", action.config_key()),
            )
        }
        Some(_) => commands::error_embed("🚫 Giá trị phải không âm."),
        None => {
            let current = config::cooldown_secs(&state.db, action)
                .await
                .unwrap_or_else(|_| action.default_secs());
            commands::success_embed(
                "⏱️ COOLDOWN",
                format!(
                    "`{}` hiện là **{current}s** (mặc định {}s).",
                    action.config_key(),
                    action.default_secs()
                ),
            )
        }
    }
}

async fn perform_shop_set(state: &AppState, item_arg: &str, price: i64) -> CreateEmbed {
    let Ok(item) = item_arg.parse::<Item>() else {
        return commands::error_embed("🚫 Không có vật phẩm đó.");
    };
    if price <= 0 {
        return commands::error_embed("🚫 Giá phải lớn hơn 0.");
    }
    let props = item.properties();
    match shop::upsert_listing(
        &state.db,
        item as i64,
        props.display_name,
        price,
        props.category.as_str(),
    )
    .await
    {
        Ok(()) => commands::success_embed(
            "🏪 CỬA HÀNG",
            format!("**{}** giờ bán với giá **{price}**.", props.display_name),
        ),
        Err(e) => {
            tracing::error!(error = ?e, "admin: shop set failed");
            commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        }
    }
}

async fn perform_shop_remove(state: &AppState, item_arg: &str) -> CreateEmbed {
    let Ok(item) = item_arg.parse::<Item>() else {
        return commands::error_embed("🚫 Không có vật phẩm đó.");
    };
    match shop::delist(&state.db, item as i64).await {
        Ok(true) => commands::success_embed(
            "🏪 CỬA HÀNG",
            format!("**{}** đã bị gỡ khỏi cửa hàng.", item.display_name()),
        ),
        Ok(false) => commands::warn_embed("🏪 Vật phẩm này vốn không bán."),
        Err(e) => {
            tracing::error!(error = ?e, "admin: shop remove failed");
            commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.")
        }
    }
}

/// Thiên đạo vô thường: 1-5 random accounts each gain or lose 1-20% of
/// their wealth.
async fn perform_thiendao(state: &AppState) -> CreateEmbed {
    let mut accounts = match ledger::all_accounts(&state.db).await {
        Ok(accounts) => accounts,
        Err(e) => {
            tracing::error!(error = ?e, "admin: thiendao load failed");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    if accounts.is_empty() {
        return commands::warn_embed("☯️ Thiên đạo nhìn quanh: không có ai để độ kiếp.");
    }

    let (touched, blessings): (Vec<Account>, Vec<(i64, bool)>) = {
        let mut rng = rand::rng();
        accounts.shuffle(&mut rng);
        let count = rng.random_range(1..=5usize).min(accounts.len());
        let touched: Vec<Account> = accounts.drain(..count).collect();
        let blessings = touched
            .iter()
            .map(|account| {
                let percent = rng.random_range(1..=20i64);
                let amount = account.wealth() * percent / 100;
                let bless: bool = rng.random();
                (amount, bless)
            })
            .collect();
        (touched, blessings)
    };

    let mut lines: Vec<String> = Vec::new();
    for (account, (amount, bless)) in touched.iter().zip(blessings) {
        let signed = if bless { amount } else { -amount };
        match ledger::apply_delta(&state.db, account.user_id, AccountDelta::cash(signed)).await {
            Ok(_) => lines.push(if bless {
                format!("🌩️ <@{}> được thiên đạo ban thưởng **+{amount}**!", account.user_id)
            } else {
                format!("🌩️ <@{}> bị thiên kiếp đánh mất **{amount}**!", account.user_id)
            }),
            Err(e) => {
                tracing::error!(error = ?e, user_id = account.user_id, "admin: thiendao failed")
            }
        }
    }
    commands::success_embed("☯️ THIÊN ĐẠO VÔ THƯỜNG", lines.join("\n"))
}

fn sub_user(opts: &[serenity::model::application::CommandDataOption], name: &str) -> Option<UserId> {
    opts.iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_user_id())
}

fn sub_int(opts: &[serenity::model::application::CommandDataOption], name: &str) -> Option<i64> {
    opts.iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_i64())
}

fn sub_str<'a>(
    opts: &'a [serenity::model::application::CommandDataOption],
    name: &str,
) -> Option<&'a str> {
    opts.iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_str())
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    if !state.is_admin(interaction.user.id.get()) {
        followup_embed(
            ctx,
            interaction,
            commands::error_embed("🚫 Bạn không có quyền dùng lệnh này."),
        )
        .await;
        return;
    }
    let Some(sub) = interaction.data.options.first() else {
        return;
    };
    let CommandDataOptionValue::SubCommand(opts) = &sub.value else {
        return;
    };
    let embed = match sub.name.as_str() {
        "jail" => match sub_user(opts, "user") {
            Some(target) => {
                perform_jail(&state, target, sub_int(opts, "minutes").unwrap_or(30)).await
            }
            None => commands::error_embed("🚫 Thiếu người chơi."),
        },
        "unjail" => match sub_user(opts, "user") {
            Some(target) => perform_unjail(&state, target).await,
            None => commands::error_embed("🚫 Thiếu người chơi."),
        },
        "punish" => {
            perform_punish(
                &state,
                sub_user(opts, "user"),
                sub_int(opts, "money").unwrap_or(0),
                sub_int(opts, "exp").unwrap_or(0),
            )
            .await
        }
        "give" | "take" => match (sub_user(opts, "user"), sub_str(opts, "kind")) {
            (Some(target), Some(kind)) => {
                perform_resource(
                    &state,
                    target,
                    kind,
                    sub_int(opts, "amount").unwrap_or(0),
                    sub.name == "give",
                )
                .await
            }
            _ => commands::error_embed("🚫 Thiếu người chơi hoặc loại tài nguyên."),
        },
        "cooldown" => match sub_str(opts, "action") {
            Some(action) => perform_cooldown(&state, action, sub_int(opts, "secs")).await,
            None => commands::error_embed("🚫 Thiếu hành động."),
        },
        "shopset" => match (sub_str(opts, "item"), sub_int(opts, "price")) {
            (Some(item), Some(price)) => perform_shop_set(&state, item, price).await,
            _ => commands::error_embed("🚫 Thiếu vật phẩm hoặc giá."),
        },
        "shopremove" => match sub_str(opts, "item") {
            Some(item) => perform_shop_remove(&state, item).await,
            None => commands::error_embed("🚫 Thiếu vật phẩm."),
        },
        "thiendao" => perform_thiendao(&state).await,
        _ => commands::error_embed("🚫 Lệnh con không hợp lệ."),
    };
    followup_embed(ctx, interaction, embed).await;
}

/// `!admin <sub> [args]`. The mention, when the subcommand takes a target,
/// may sit anywhere in the message; remaining args are read positionally
/// with mention tokens skipped.
pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    if !state.is_admin(msg.author.id.get()) {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Bạn không có quyền dùng lệnh này."),
        )
        .await;
        return;
    }
    let target = msg.mentions.first().map(|user| user.id);
    let plain: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !arg.starts_with("<@"))
        .collect();
    let embed = match plain.first().copied() {
        Some("jail") => match target {
            Some(target) => {
                let minutes = plain.get(1).and_then(|s| s.parse().ok()).unwrap_or(30);
                perform_jail(&state, target, minutes).await
            }
            None => commands::error_embed("🚫 Dùng: `!admin jail @người [phút]`"),
        },
        Some("unjail") => match target {
            Some(target) => perform_unjail(&state, target).await,
            None => commands::error_embed("🚫 Dùng: `!admin unjail @người`"),
        },
        Some("punish") => {
            let money = plain.get(1).and_then(|s| s.parse().ok()).unwrap_or(0);
            let exp = plain.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
            perform_punish(&state, target, money, exp).await
        }
        Some(verb @ ("give" | "take")) => match (target, plain.get(1)) {
            (Some(target), Some(kind)) => {
                let amount = plain.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
                perform_resource(&state, target, kind, amount, verb == "give").await
            }
            _ => commands::error_embed("🚫 Dùng: `!admin give @người <loại> <số lượng>`"),
        },
        Some("cooldown") => match plain.get(1) {
            Some(action) => {
                let secs = plain.get(2).and_then(|s| s.parse().ok());
                perform_cooldown(&state, action, secs).await
            }
            None => commands::error_embed("🚫 Dùng: `!admin cooldown <hành động> [giây]`"),
        },
        Some("shopset") => match (plain.get(1), plain.get(2).and_then(|s| s.parse().ok())) {
            (Some(item), Some(price)) => perform_shop_set(&state, item, price).await,
            _ => commands::error_embed("🚫 Dùng: `!admin shopset <mã> <giá>`"),
        },
        Some("shopremove") => match plain.get(1) {
            Some(item) => perform_shop_remove(&state, item).await,
            None => commands::error_embed("🚫 Dùng: `!admin shopremove <mã>`"),
        },
        Some("thiendao") => perform_thiendao(&state).await,
        _ => commands::error_embed(
            "🚫 Lệnh con: jail, unjail, punish, give, take, cooldown, shopset, shopremove, thiendao.",
        ),
    };
    reply_embed(ctx, msg, embed).await;
}
