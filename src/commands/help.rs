//! Implements the `help` command: the command directory.

use crate::commands::{followup_embed, reply_embed};
use crate::constants::COMMAND_PREFIX;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("help").description("Danh sách lệnh của bot.")
}

fn build() -> CreateEmbed {
    let p = COMMAND_PREFIX;
    CreateEmbed::new()
        .title("📜 DANH SÁCH LỆNH")
        .description(format!(
            "Lệnh dùng tiền tố `{p}` hoặc slash command tương ứng."
        ))
        .field(
            "⛏️ Kiếm sống",
            format!(
                "`{p}dao` đào khoáng · `{p}cau` câu cá · `{p}khampha` khám phá\n\
                 `{p}san` săn yêu thú · `{p}cuop @người` cướp tiền"
            ),
            false,
        )
        .field(
            "🧘 Tu luyện",
            format!(
                "`{p}tu` đả tọa · `{p}dotpha` đột phá cảnh giới · `{p}tythi @người <cược>` tỷ thí\n\
                 `{p}ht` hồ sơ tu sĩ · `{p}canhgioi` bảng cảnh giới"
            ),
            false,
        )
        .field(
            "💰 Tài sản",
            format!(
                "`{p}sodu` số dư · `{p}gui <tiền>` gửi ngân hàng · `{p}rut <tiền>` rút\n\
                 `{p}chuyen @người <tiền>` chuyển khoản · `{p}bxh` bảng xếp hạng"
            ),
            false,
        )
        .field(
            "🎲 Sòng bạc",
            format!(
                "`{p}tx <tai|xiu> <cược>` tài xỉu · `{p}bc <linh vật> <cược>...` bầu cua\n\
                 `{p}quay <cược>` máy quay · `{p}xd <cược>` xì dách\n\
                 `{p}dn <ngựa> <cược>` đua ngựa · `{p}ck <tang|giam> <cược>` chứng khoán"
            ),
            false,
        )
        .field(
            "🏪 Vật phẩm",
            format!(
                "`{p}cuahang` cửa hàng · `{p}mua <mã> [số lượng]` mua\n\
                 `{p}tui` túi đồ · `{p}dung <mã> [số lượng]` dùng đan dược"
            ),
            false,
        )
        .color(0x1ABC9C)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    followup_embed(ctx, interaction, build()).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    reply_embed(ctx, msg, build()).await;
}
