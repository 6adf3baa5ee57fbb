//! Implements the `realms` command (`!canhgioi`): the full progression
//! table with exp requirements and base breakthrough rates.

use crate::commands::{followup_embed, reply_embed};
use crate::game::realms::REALMS;
use serenity::builder::{CreateCommand, CreateEmbed};
use serenity::model::application::CommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("realms").description("Xem bảng cảnh giới tu luyện.")
}

fn build() -> CreateEmbed {
    let lines: Vec<String> = REALMS
        .iter()
        .enumerate()
        .map(|(i, realm)| {
            if i == 0 {
                format!("`{:>2}.` **{}** — xuất phát điểm", i, realm.name)
            } else {
                format!(
                    "`{:>2}.` **{}** — {} EXP, tỷ lệ gốc {:.0}%",
                    i,
                    realm.name,
                    realm.req_exp,
                    realm.base_rate * 100.0
                )
            }
        })
        .collect();
    CreateEmbed::new()
        .title("🏔️ BẢNG CẢNH GIỚI")
        .description(lines.join("\n"))
        .color(0x9B59B6)
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    followup_embed(ctx, interaction, build()).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message) {
    reply_embed(ctx, msg, build()).await;
}
