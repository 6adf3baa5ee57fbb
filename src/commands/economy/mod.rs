//! The plain money commands: balance, bank, transfer and the leaderboard.

pub mod balance;
pub mod bank;
pub mod leaderboard;
pub mod transfer;
