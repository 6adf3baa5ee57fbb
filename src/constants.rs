// Central tunables for the game economy and the anti-automation gate.

/// Prefix for text commands, e.g. `!mine`.
pub const COMMAND_PREFIX: &str = "!";

/// Chance that a gated action triggers a captcha challenge.
pub const CAPTCHA_CHANCE: f64 = 0.05;
/// Seconds the player has to answer a captcha before it counts as failed.
pub const CAPTCHA_WINDOW_SECS: u64 = 60;
/// Jail duration applied on a failed or expired captcha.
pub const CAPTCHA_JAIL_MINUTES: i64 = 30;

/// Flat fine for spamming an action that is still on cooldown (second strike).
pub const SPAM_FINE: i64 = 50;

/// Minimum cash required to attempt a robbery (covers the fine when caught).
pub const ROB_MIN_CASH: i64 = 100;
/// Chance a robbery succeeds.
pub const ROB_SUCCESS_CHANCE: f64 = 0.35;

/// Per-move response window for interactive games (blackjack, pvp challenge).
pub const SESSION_MOVE_SECS: u64 = 60;

/// Horse race geometry.
pub const RACE_HORSES: usize = 5;
pub const RACE_TRACK_LEN: usize = 20;
pub const RACE_WIN_MULTIPLIER: i64 = 10;
pub const RACE_TICK_MILLIS: u64 = 2500;

/// Stock mini-game: number of price ticks and per-tick delay.
pub const STOCK_TICKS: u32 = 8;
pub const STOCK_TICK_MILLIS: u64 = 4000;

/// Default cooldown seconds, used when the config table has no override.
pub const DEFAULT_CD_MINE: u64 = 5;
pub const DEFAULT_CD_FISH: u64 = 5;
pub const DEFAULT_CD_ROB: u64 = 600;
pub const DEFAULT_CD_CULTIVATE: u64 = 60;
pub const DEFAULT_CD_EXPLORE: u64 = 60;
pub const DEFAULT_CD_PVP: u64 = 300;
pub const DEFAULT_CD_CHAT: u64 = 5;
pub const HUNT_WIN_CD_SECS: u64 = 30;
pub const HUNT_LOSS_CD_SECS: u64 = 120;

/// Fallback currency display when the config table is empty.
pub const DEFAULT_CURRENCY_NAME: &str = "Xu";
pub const DEFAULT_CURRENCY_EMOJI: &str = "🪙";

/// Exp granted per chatted message (outside the chat cooldown).
pub const CHAT_EXP: i64 = 1;
