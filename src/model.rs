//! Shared application state, stored in serenity's global TypeMap so every
//! command and event handler can reach it.

use crate::cooldown::CooldownRegistry;
use crate::database::init::DbPool;
use crate::game::session::SessionManager;
use serenity::prelude::TypeMapKey;
use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    /// The SQLite connection pool.
    pub db: DbPool,
    /// Per-player, per-action cooldowns with the two-strike spam state.
    pub cooldowns: Mutex<CooldownRegistry>,
    /// Active interactive game sessions, keyed by their Discord message.
    pub sessions: Mutex<SessionManager>,
    /// User ids allowed to run the admin command, from the environment.
    pub admin_ids: HashSet<u64>,
    /// Set once the session deadline sweeper has been spawned; `ready` can
    /// fire again on reconnect and must not spawn a second one.
    pub sweeper_started: AtomicBool,
}

impl AppState {
    pub fn new(db: DbPool, admin_ids: HashSet<u64>) -> Self {
        AppState {
            db,
            cooldowns: Mutex::new(CooldownRegistry::new()),
            sessions: Mutex::new(SessionManager::new()),
            admin_ids,
            sweeper_started: AtomicBool::new(false),
        }
    }

    pub async fn from_ctx(ctx: &serenity::prelude::Context) -> Option<Arc<Self>> {
        ctx.data.read().await.get::<AppState>().cloned()
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

impl TypeMapKey for AppState {
    type Value = Arc<AppState>;
}
