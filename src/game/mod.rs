//! The core game engine. Everything here is pure rules and state machines;
//! Discord plumbing lives in `commands/` and persistence in `database/`.

pub mod beasts;
pub mod blackjack;
pub mod error;
pub mod gamble;
pub mod items;
pub mod race;
pub mod realms;
pub mod rules;
pub mod session;
pub mod stock;
