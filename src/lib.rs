// Library entry so integration tests and external tools can reference internal modules.
// Re-export the same modules used by the binary (`main.rs`).
pub mod captcha;
pub mod commands;
pub mod constants;
pub mod cooldown;
pub mod database;
pub mod game;
pub mod handler;
pub mod model;

pub use model::AppState;
