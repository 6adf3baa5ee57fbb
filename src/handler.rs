//! The gateway event handler: registers the slash commands on the allowed
//! guild, dispatches slash and prefix invocations to the command modules,
//! routes game-session button clicks, grants chat exp and runs the session
//! deadline sweep.

use crate::commands;
use crate::constants::{CHAT_EXP, COMMAND_PREFIX};
use crate::cooldown::{ActionKind, Gate};
use crate::database::config;
use crate::database::ledger;
use crate::database::models::AccountDelta;
use crate::game::gamble::TaiXiuBet;
use crate::commands::economy::bank::BankOp;
use crate::model::AppState;
use serenity::async_trait;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::str::FromStr;
use std::time::Duration;

/// How often the deadline sweep looks for lapsed sessions.
const SWEEP_INTERVAL_SECS: u64 = 5;

pub struct Handler {
    pub allowed_guild_id: GuildId,
}

/// Every prefix command, after alias resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Mine,
    Fish,
    Explore,
    Rob,
    Hunt,
    Cultivate,
    Breakthrough,
    Pvp,
    Profile,
    Realms,
    Balance,
    Bank(BankOp),
    Transfer,
    Leaderboard,
    TaiXiu(Option<TaiXiuBet>),
    BauCua,
    Slots,
    Blackjack,
    Race,
    Stock,
    Shop,
    Buy,
    Inventory,
    Use,
    Help,
    Admin,
}

impl FromStr for Command {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dao" | "mine" => Ok(Command::Mine),
            "cau" | "fish" => Ok(Command::Fish),
            "khampha" | "explore" => Ok(Command::Explore),
            "cuop" | "rob" => Ok(Command::Rob),
            "san" | "hunt" => Ok(Command::Hunt),
            "tu" | "tuluyen" | "cultivate" => Ok(Command::Cultivate),
            "dotpha" | "breakthrough" => Ok(Command::Breakthrough),
            "tythi" | "pvp" => Ok(Command::Pvp),
            "ht" | "hoso" | "profile" => Ok(Command::Profile),
            "canhgioi" | "cg" | "realms" => Ok(Command::Realms),
            "sodu" | "balance" | "bal" => Ok(Command::Balance),
            "gui" | "deposit" => Ok(Command::Bank(BankOp::Deposit)),
            "rut" | "withdraw" => Ok(Command::Bank(BankOp::Withdraw)),
            "chuyen" | "transfer" => Ok(Command::Transfer),
            "bxh" | "top" | "leaderboard" => Ok(Command::Leaderboard),
            "tx" | "taixiu" => Ok(Command::TaiXiu(None)),
            "tai" => Ok(Command::TaiXiu(Some(TaiXiuBet::Big))),
            "xiu" => Ok(Command::TaiXiu(Some(TaiXiuBet::Small))),
            "bc" | "baucua" => Ok(Command::BauCua),
            "quay" | "slots" => Ok(Command::Slots),
            "xd" | "xidach" | "blackjack" => Ok(Command::Blackjack),
            "dn" | "duangua" | "race" => Ok(Command::Race),
            "ck" | "chungkhoan" | "stock" => Ok(Command::Stock),
            "cuahang" | "shop" => Ok(Command::Shop),
            "mua" | "buy" => Ok(Command::Buy),
            "tui" | "inv" | "inventory" => Ok(Command::Inventory),
            "dung" | "use" => Ok(Command::Use),
            "help" | "trogiup" => Ok(Command::Help),
            "admin" => Ok(Command::Admin),
            _ => Err(()),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        tracing::info!(bot = %ready.user.name, "connected to Discord");

        let registrations = vec![
            commands::activities::mine::register(),
            commands::activities::fish::register(),
            commands::activities::explore::register(),
            commands::activities::rob::register(),
            commands::activities::hunt::register(),
            commands::cultivation::cultivate::register(),
            commands::cultivation::breakthrough::register(),
            commands::cultivation::pvp::register(),
            commands::cultivation::profile::register(),
            commands::cultivation::realms::register(),
            commands::economy::balance::register(),
            commands::economy::bank::register(),
            commands::economy::transfer::register(),
            commands::economy::leaderboard::register(),
            commands::gambling::taixiu::register(),
            commands::gambling::baucua::register(),
            commands::gambling::slots::register(),
            commands::gambling::blackjack::register(),
            commands::gambling::race::register(),
            commands::gambling::stock::register(),
            commands::shop::register(),
            commands::inventory::register(),
            commands::use_item::register(),
            commands::help::register(),
            commands::admin::register(),
        ];
        match self
            .allowed_guild_id
            .set_commands(&ctx.http, registrations)
            .await
        {
            Ok(registered) => {
                tracing::info!(count = registered.len(), "registered guild slash commands")
            }
            Err(e) => tracing::error!(error = ?e, "failed to register slash commands"),
        }

        // One sweep task for the whole process; ready() can fire again on
        // reconnect, so only the first call spawns it.
        if let Some(state) = AppState::from_ctx(&ctx).await {
            if state.sweeper_started.swap(true, std::sync::atomic::Ordering::SeqCst) {
                return;
            }
            tokio::spawn(async move {
                let mut interval =
                    tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
                loop {
                    interval.tick().await;
                    let mut sessions = state.sessions.lock().await;
                    sessions.sweep_expired(&ctx, &state.db).await;
                }
            });
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => {
                match command.data.name.as_str() {
                    "mine" => commands::activities::mine::run_slash(&ctx, &command).await,
                    "fish" => commands::activities::fish::run_slash(&ctx, &command).await,
                    "explore" => commands::activities::explore::run_slash(&ctx, &command).await,
                    "rob" => commands::activities::rob::run_slash(&ctx, &command).await,
                    "hunt" => commands::activities::hunt::run_slash(&ctx, &command).await,
                    "cultivate" => commands::cultivation::cultivate::run_slash(&ctx, &command).await,
                    "breakthrough" => {
                        commands::cultivation::breakthrough::run_slash(&ctx, &command).await
                    }
                    "pvp" => commands::cultivation::pvp::run_slash(&ctx, &command).await,
                    "profile" => commands::cultivation::profile::run_slash(&ctx, &command).await,
                    "realms" => commands::cultivation::realms::run_slash(&ctx, &command).await,
                    "balance" => commands::economy::balance::run_slash(&ctx, &command).await,
                    "bank" => commands::economy::bank::run_slash(&ctx, &command).await,
                    "transfer" => commands::economy::transfer::run_slash(&ctx, &command).await,
                    "leaderboard" => {
                        commands::economy::leaderboard::run_slash(&ctx, &command).await
                    }
                    "taixiu" => commands::gambling::taixiu::run_slash(&ctx, &command).await,
                    "baucua" => commands::gambling::baucua::run_slash(&ctx, &command).await,
                    "slots" => commands::gambling::slots::run_slash(&ctx, &command).await,
                    "blackjack" => commands::gambling::blackjack::run_slash(&ctx, &command).await,
                    "race" => commands::gambling::race::run_slash(&ctx, &command).await,
                    "stock" => commands::gambling::stock::run_slash(&ctx, &command).await,
                    "shop" => commands::shop::run_slash(&ctx, &command).await,
                    "inventory" => commands::inventory::run_slash(&ctx, &command).await,
                    "use" => commands::use_item::run_slash(&ctx, &command).await,
                    "help" => commands::help::run_slash(&ctx, &command).await,
                    "admin" => commands::admin::run_slash(&ctx, &command).await,
                    other => tracing::warn!(name = other, "unknown slash command"),
                }
            }
            Interaction::Component(component) => {
                // Captcha and duel-challenge buttons are consumed by inline
                // collectors; only session games route through the manager.
                if component.data.custom_id.starts_with("bj_") {
                    if let Some(state) = AppState::from_ctx(&ctx).await {
                        let mut sessions = state.sessions.lock().await;
                        sessions.on_component(&ctx, &component, &state.db).await;
                    }
                }
            }
            _ => {}
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || msg.guild_id != Some(self.allowed_guild_id) {
            return;
        }
        let Some(state) = AppState::from_ctx(&ctx).await else {
            return;
        };

        grant_chat_exp(&state, msg.author.id.get()).await;

        let Some(stripped) = msg.content.strip_prefix(COMMAND_PREFIX) else {
            return;
        };
        let mut tokens = stripped.split_whitespace();
        let Some(command) = tokens.next().and_then(|word| word.parse::<Command>().ok()) else {
            return;
        };
        let args: Vec<&str> = tokens.collect();

        match command {
            Command::Mine => commands::activities::mine::run_prefix(&ctx, &msg).await,
            Command::Fish => commands::activities::fish::run_prefix(&ctx, &msg).await,
            Command::Explore => commands::activities::explore::run_prefix(&ctx, &msg).await,
            Command::Rob => commands::activities::rob::run_prefix(&ctx, &msg).await,
            Command::Hunt => commands::activities::hunt::run_prefix(&ctx, &msg).await,
            Command::Cultivate => commands::cultivation::cultivate::run_prefix(&ctx, &msg).await,
            Command::Breakthrough => {
                commands::cultivation::breakthrough::run_prefix(&ctx, &msg).await
            }
            Command::Pvp => commands::cultivation::pvp::run_prefix(&ctx, &msg, args).await,
            Command::Profile => commands::cultivation::profile::run_prefix(&ctx, &msg).await,
            Command::Realms => commands::cultivation::realms::run_prefix(&ctx, &msg).await,
            Command::Balance => commands::economy::balance::run_prefix(&ctx, &msg).await,
            Command::Bank(op) => commands::economy::bank::run_prefix(&ctx, &msg, op, args).await,
            Command::Transfer => commands::economy::transfer::run_prefix(&ctx, &msg, args).await,
            Command::Leaderboard => commands::economy::leaderboard::run_prefix(&ctx, &msg).await,
            Command::TaiXiu(fixed_bet) => {
                commands::gambling::taixiu::run_prefix(&ctx, &msg, args, fixed_bet).await
            }
            Command::BauCua => commands::gambling::baucua::run_prefix(&ctx, &msg, args).await,
            Command::Slots => commands::gambling::slots::run_prefix(&ctx, &msg, args).await,
            Command::Blackjack => commands::gambling::blackjack::run_prefix(&ctx, &msg, args).await,
            Command::Race => commands::gambling::race::run_prefix(&ctx, &msg, args).await,
            Command::Stock => commands::gambling::stock::run_prefix(&ctx, &msg, args).await,
            Command::Shop => commands::shop::run_prefix_view(&ctx, &msg).await,
            Command::Buy => commands::shop::run_prefix_buy(&ctx, &msg, args).await,
            Command::Inventory => commands::inventory::run_prefix(&ctx, &msg).await,
            Command::Use => commands::use_item::run_prefix(&ctx, &msg, args).await,
            Command::Help => commands::help::run_prefix(&ctx, &msg).await,
            Command::Admin => commands::admin::run_prefix(&ctx, &msg, args).await,
        }
    }
}

/// Silent exp drip for chatting, rate-limited by the chat cooldown. Failures
/// only get logged; a dropped chat exp grant is not worth a user-facing
/// error.
async fn grant_chat_exp(state: &AppState, user_id: u64) {
    let secs = config::cooldown_secs(&state.db, ActionKind::Chat)
        .await
        .unwrap_or_else(|_| ActionKind::Chat.default_secs());
    let gate = {
        let mut cooldowns = state.cooldowns.lock().await;
        cooldowns.try_acquire(user_id, ActionKind::Chat, Duration::from_secs(secs))
    };
    if gate == Gate::Clear {
        if let Err(e) =
            ledger::apply_delta(&state.db, user_id as i64, AccountDelta::exp(CHAT_EXP)).await
        {
            tracing::error!(error = ?e, user_id, "failed to grant chat exp");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_resolve_to_the_same_command() {
        assert_eq!("dao".parse::<Command>(), Ok(Command::Mine));
        assert_eq!("mine".parse::<Command>(), Ok(Command::Mine));
        assert_eq!("gui".parse::<Command>(), Ok(Command::Bank(BankOp::Deposit)));
        assert_eq!("rut".parse::<Command>(), Ok(Command::Bank(BankOp::Withdraw)));
        assert_eq!("tai".parse::<Command>(), Ok(Command::TaiXiu(Some(TaiXiuBet::Big))));
        assert_eq!("tx".parse::<Command>(), Ok(Command::TaiXiu(None)));
        assert_eq!("CANHGIOI".parse::<Command>(), Ok(Command::Realms));
        assert!("notacommand".parse::<Command>().is_err());
    }
}
