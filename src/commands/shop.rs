//! Implements the `shop` commands: `!cuahang` lists what is for sale and
//! `!mua` buys. Prices come from the shop table so admins can reprice
//! without a redeploy.

use crate::commands::{self, describe_error, followup_embed, reply_embed};
use crate::database::models::ShopListing;
use crate::database::{config, shop};
use crate::game::items::Item;
use crate::model::AppState;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandDataOptionValue, CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("shop")
        .description("Cửa hàng vật phẩm tu luyện.")
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "view",
            "Xem các vật phẩm đang bán.",
        ))
        .add_option(
            CreateCommandOption::new(CommandOptionType::SubCommand, "buy", "Mua vật phẩm.")
                .add_sub_option(
                    CreateCommandOption::new(
                        CommandOptionType::String,
                        "item",
                        "Mã vật phẩm, ví dụ tukhi1 hoặc phacanh.",
                    )
                    .required(true),
                )
                .add_sub_option(
                    CreateCommandOption::new(CommandOptionType::Integer, "amount", "Số lượng.")
                        .min_int_value(1),
                ),
        )
}

async fn build_catalog(state: &AppState) -> CreateEmbed {
    let listings = match shop::all_listings(&state.db).await {
        Ok(listings) => listings,
        Err(e) => {
            tracing::error!(error = ?e, "shop: failed to load listings");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };
    if listings.is_empty() {
        return commands::warn_embed("🏪 Cửa hàng đang trống.");
    }
    let (currency_name, currency_emoji) = config::currency(&state.db)
        .await
        .unwrap_or_else(|_| ("Xu".to_string(), "🪙".to_string()));

    let mut embed = CreateEmbed::new()
        .title("🏪 CỬA HÀNG")
        .description(format!(
            "Mua bằng `!mua <mã> [số lượng]`. Đơn vị: {currency_emoji} {currency_name}."
        ))
        .color(0x9B59B6);
    let mut current_category: Option<String> = None;
    let mut lines: Vec<String> = Vec::new();
    for listing in &listings {
        if current_category.as_deref() != Some(listing.category.as_str()) {
            if let Some(category) = current_category.take() {
                embed = embed.field(category_title(&category), lines.join("\n"), false);
                lines.clear();
            }
            current_category = Some(listing.category.clone());
        }
        lines.push(describe_listing(listing, &currency_emoji));
    }
    if let Some(category) = current_category {
        embed = embed.field(category_title(&category), lines.join("\n"), false);
    }
    embed
}

fn category_title(category: &str) -> String {
    match category {
        "exp-pill" => "🟢 Đan dược tu vi".to_string(),
        "breakthrough-pill" => "💊 Đan dược đột phá".to_string(),
        other => other.to_string(),
    }
}

fn describe_listing(listing: &ShopListing, currency_emoji: &str) -> String {
    let code = Item::from_i64(listing.item_id)
        .map(|item| item.to_string())
        .unwrap_or_else(|| listing.item_id.to_string());
    format!(
        "`{code}` — **{}** · {currency_emoji} {}",
        listing.name, listing.price
    )
}

async fn perform_buy(state: &AppState, user: &User, item_arg: &str, amount: i64) -> CreateEmbed {
    if amount <= 0 {
        return commands::error_embed("🚫 Số lượng phải lớn hơn 0.");
    }
    let Ok(item) = item_arg.parse::<Item>() else {
        return commands::error_embed(
            "🚫 Không có vật phẩm đó. Xem mã trong `!cuahang`.",
        );
    };
    let listing = match shop::get_listing(&state.db, item as i64).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return commands::warn_embed("🏪 Vật phẩm này hiện không bán."),
        Err(e) => {
            tracing::error!(error = ?e, "shop: failed to load listing");
            return commands::error_embed("🚫 Lỗi hệ thống, thử lại sau.");
        }
    };

    let user_id = user.id.get() as i64;
    match shop::purchase(&state.db, user_id, item as i64, amount, listing.price).await {
        Ok(()) => commands::success_embed(
            "🛒 MUA THÀNH CÔNG",
            format!(
                "{} Bạn đã mua **{amount}× {} {}** với giá **{}**.",
                user.mention(),
                item.emoji(),
                item.display_name(),
                listing.price * amount,
            ),
        ),
        Err(e) => commands::error_embed(describe_error(&e)),
    }
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(sub) = interaction.data.options.first() else {
        return;
    };
    let embed = match (&sub.name[..], &sub.value) {
        ("buy", CommandDataOptionValue::SubCommand(opts)) => {
            let item_arg = opts
                .iter()
                .find(|opt| opt.name == "item")
                .and_then(|opt| opt.value.as_str())
                .unwrap_or("");
            let amount = opts
                .iter()
                .find(|opt| opt.name == "amount")
                .and_then(|opt| opt.value.as_i64())
                .unwrap_or(1);
            perform_buy(&state, &interaction.user, item_arg, amount).await
        }
        _ => build_catalog(&state).await,
    };
    followup_embed(ctx, interaction, embed).await;
}

/// `!cuahang`: the catalog view.
pub async fn run_prefix_view(ctx: &Context, msg: &Message) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = build_catalog(&state).await;
    reply_embed(ctx, msg, embed).await;
}

/// `!mua <item> [amount]`.
pub async fn run_prefix_buy(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let Some(item_arg) = args.first() else {
        reply_embed(
            ctx,
            msg,
            commands::error_embed("🚫 Dùng: `!mua <mã vật phẩm> [số lượng]`"),
        )
        .await;
        return;
    };
    let amount = args.get(1).and_then(|s| s.parse::<i64>().ok()).unwrap_or(1);
    let embed = perform_buy(&state, &msg.author, item_arg, amount).await;
    reply_embed(ctx, msg, embed).await;
}
