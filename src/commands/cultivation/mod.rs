//! The cultivation arc: gain exp, break through realms, duel other players.

pub mod breakthrough;
pub mod cultivate;
pub mod profile;
pub mod pvp;
pub mod realms;
