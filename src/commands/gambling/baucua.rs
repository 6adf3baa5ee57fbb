//! Implements the `baucua` command (`!bc`): bets on up to six symbols,
//! three symbol dice, each match pays the stake once more.

use super::{credit_return, take_wager};
use crate::commands::{self, followup_embed, reply_embed};
use crate::game::gamble::{self, BauCuaSymbol};
use crate::model::AppState;
use rand::seq::IndexedRandom;
use serenity::builder::{CreateCommand, CreateCommandOption, CreateEmbed};
use serenity::model::application::{CommandInteraction, CommandOptionType};
use serenity::model::channel::Message;
use serenity::model::user::User;
use serenity::prelude::*;

pub fn register() -> CreateCommand {
    CreateCommand::new("baucua")
        .description("Bầu cua: cược theo linh vật, ví dụ `cua 100 ca 50`.")
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::String,
                "bets",
                "Cặp linh vật + tiền, ví dụ: cua 100 ca 50.",
            )
            .required(true),
        )
}

/// Parses `cua 100 ca 50 ...` into at most one bet per symbol.
fn parse_bets(args: &[&str]) -> Option<Vec<(BauCuaSymbol, i64)>> {
    if args.is_empty() || args.len() % 2 != 0 {
        return None;
    }
    let mut bets: Vec<(BauCuaSymbol, i64)> = Vec::new();
    for pair in args.chunks(2) {
        let symbol = pair[0].parse::<BauCuaSymbol>().ok()?;
        let stake = pair[1].parse::<i64>().ok().filter(|&s| s > 0)?;
        if bets.iter().any(|(s, _)| *s == symbol) {
            return None;
        }
        bets.push((symbol, stake));
    }
    Some(bets)
}

pub async fn perform(state: &AppState, user: &User, args: &[&str]) -> CreateEmbed {
    let Some(bets) = parse_bets(args) else {
        return commands::error_embed(
            "🚫 Cược không hợp lệ. Dùng: `!bc <linh vật> <tiền> ...` với bau/cua/tom/ca/ga/nai.",
        );
    };
    let total: i64 = bets.iter().map(|(_, stake)| stake).sum();
    let user_id = user.id.get() as i64;
    if let Err(embed) = take_wager(state, user_id, total).await {
        return embed;
    }

    let dice: [BauCuaSymbol; 3] = {
        let mut rng = rand::rng();
        std::array::from_fn(|_| {
            *BauCuaSymbol::ALL.choose(&mut rng).unwrap_or(&BauCuaSymbol::Bau)
        })
    };

    let returned = gamble::resolve_baucua(dice, &bets);
    credit_return(state, user_id, returned).await;

    let faces = dice.map(|d| d.emoji()).join(" ");
    let bet_lines: Vec<String> = bets
        .iter()
        .map(|(symbol, stake)| {
            let matches = dice.iter().filter(|&&d| d == *symbol).count();
            if matches > 0 {
                format!("{symbol}: cược {stake}, trúng ×{matches} → **+{}**", stake * matches as i64)
            } else {
                format!("{symbol}: cược {stake}, trượt")
            }
        })
        .collect();

    let net = returned - total;
    let headline = if net > 0 {
        format!("Tổng kết: **+{net}** 🎉")
    } else if net == 0 {
        "Tổng kết: hòa vốn.".to_string()
    } else {
        format!("Tổng kết: **{net}** 😵")
    };
    CreateEmbed::new()
        .title("🦀 BẦU CUA")
        .description(format!("{faces}\n\n{}\n\n{headline}", bet_lines.join("\n")))
        .color(if net >= 0 { 0x00FF00 } else { 0xFF0000 })
}

pub async fn run_slash(ctx: &Context, interaction: &CommandInteraction) {
    interaction.defer(&ctx.http).await.ok();
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let bets_arg = interaction
        .data
        .options
        .first()
        .and_then(|opt| opt.value.as_str())
        .unwrap_or("");
    let args: Vec<&str> = bets_arg.split_whitespace().collect();
    let embed = perform(&state, &interaction.user, &args).await;
    followup_embed(ctx, interaction, embed).await;
}

pub async fn run_prefix(ctx: &Context, msg: &Message, args: Vec<&str>) {
    let Some(state) = AppState::from_ctx(ctx).await else {
        return;
    };
    let embed = perform(&state, &msg.author, &args).await;
    reply_embed(ctx, msg, embed).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_multiple_distinct_bets() {
        let bets = parse_bets(&["cua", "100", "ca", "50"]).unwrap();
        assert_eq!(bets.len(), 2);
        assert_eq!(bets[0], (BauCuaSymbol::Cua, 100));
        assert_eq!(bets[1], (BauCuaSymbol::Ca, 50));
    }

    #[test]
    fn rejects_duplicates_odd_args_and_bad_stakes() {
        assert!(parse_bets(&["cua", "100", "cua", "50"]).is_none());
        assert!(parse_bets(&["cua"]).is_none());
        assert!(parse_bets(&["cua", "0"]).is_none());
        assert!(parse_bets(&["rong", "100"]).is_none());
        assert!(parse_bets(&[]).is_none());
    }
}
