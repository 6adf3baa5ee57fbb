//! The generic engine for interactive, button-driven games. It defines the
//! `Session` trait every such game implements and the `SessionManager` that
//! routes component clicks and enforces deadlines.
//!
//! A session settles exactly once: both the click path and the deadline
//! sweep go through the manager, which removes the session from its map
//! before paying out.

use crate::database::init::DbPool;
use crate::database::ledger;
use crate::database::models::AccountDelta;
use serenity::async_trait;
use serenity::builder::{CreateActionRow, CreateEmbed, EditMessage};
use serenity::model::application::ComponentInteraction;
use serenity::model::id::{ChannelId, MessageId, UserId};
use serenity::prelude::Context;
use std::collections::HashMap;
use std::time::Instant;

/// One player's credit at settlement. Wagers are debited when the session
/// starts, so payouts are non-negative returns, not balance swings.
#[derive(Debug, Clone)]
pub struct Payout {
    pub user_id: UserId,
    pub amount: i64,
}

pub enum SessionUpdate {
    ReRender,
    Settled {
        summary: String,
        payouts: Vec<Payout>,
    },
    NoOp,
}

#[async_trait]
pub trait Session: Send + Sync {
    /// Handles one button click. Clicks from uninvolved users return `NoOp`.
    async fn handle_component(&mut self, interaction: &ComponentInteraction) -> SessionUpdate;

    /// Applies the forced terminal move when the response window lapses.
    fn force_settle(&mut self) -> SessionUpdate;

    /// Instant after which the session is forcibly settled.
    fn deadline(&self) -> Instant;

    fn render(&self) -> (CreateEmbed, Vec<CreateActionRow>);
}

struct Entry {
    session: Box<dyn Session>,
    channel_id: ChannelId,
}

#[derive(Default)]
pub struct SessionManager {
    active: HashMap<MessageId, Entry>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_session(
        &mut self,
        message_id: MessageId,
        channel_id: ChannelId,
        session: Box<dyn Session>,
    ) {
        self.active.insert(message_id, Entry { session, channel_id });
    }

    pub fn is_active(&self, message_id: &MessageId) -> bool {
        self.active.contains_key(message_id)
    }

    /// Routes one component interaction to its session, if any.
    pub async fn on_component(
        &mut self,
        ctx: &Context,
        interaction: &ComponentInteraction,
        db: &DbPool,
    ) {
        let message_id = interaction.message.id;
        let Some(entry) = self.active.get_mut(&message_id) else {
            return;
        };

        match entry.session.handle_component(interaction).await {
            SessionUpdate::ReRender => {
                let (embed, components) = entry.session.render();
                let builder = EditMessage::new().embed(embed).components(components);
                if let Err(e) = interaction.message.clone().edit(&ctx.http, builder).await {
                    tracing::warn!(error = ?e, "failed to edit session message");
                }
            }
            SessionUpdate::Settled { summary, payouts } => {
                // Remove first so a concurrent sweep can never settle twice.
                let entry = match self.active.remove(&message_id) {
                    Some(entry) => entry,
                    None => return,
                };
                tracing::info!(%message_id, %summary, "session settled");
                apply_payouts(db, &payouts).await;
                let (embed, _) = entry.session.render();
                let builder = EditMessage::new().embed(embed).components(vec![]);
                if let Err(e) = interaction.message.clone().edit(&ctx.http, builder).await {
                    tracing::warn!(error = ?e, "failed to edit settled session message");
                }
            }
            SessionUpdate::NoOp => {}
        }
    }

    /// Forces every session past its deadline through its terminal move.
    pub async fn sweep_expired(&mut self, ctx: &Context, db: &DbPool) {
        let now = Instant::now();
        let expired: Vec<MessageId> = self
            .active
            .iter()
            .filter(|(_, entry)| entry.session.deadline() <= now)
            .map(|(id, _)| *id)
            .collect();

        for message_id in expired {
            let Some(mut entry) = self.active.remove(&message_id) else {
                continue;
            };
            match entry.session.force_settle() {
                SessionUpdate::Settled { summary, payouts } => {
                    tracing::info!(%message_id, %summary, "session timed out");
                    apply_payouts(db, &payouts).await;
                }
                // Forced moves must terminate; anything else is a session bug.
                _ => tracing::error!(%message_id, "forced settle did not settle"),
            }
            let (embed, _) = entry.session.render();
            let builder = EditMessage::new().embed(embed).components(vec![]);
            if let Err(e) = entry
                .channel_id
                .edit_message(&ctx.http, message_id, builder)
                .await
            {
                tracing::warn!(error = ?e, "failed to edit timed-out session message");
            }
        }
    }
}

/// Applies all payouts of one settlement in a single transaction.
async fn apply_payouts(db: &DbPool, payouts: &[Payout]) {
    let nonzero: Vec<&Payout> = payouts.iter().filter(|p| p.amount != 0).collect();
    if nonzero.is_empty() {
        return;
    }
    let mut tx = match db.begin().await {
        Ok(tx) => tx,
        Err(e) => {
            tracing::error!(error = ?e, "failed to begin payout transaction");
            return;
        }
    };
    for payout in nonzero {
        if let Err(e) = ledger::apply_delta_tx(
            &mut tx,
            payout.user_id.get() as i64,
            AccountDelta::cash(payout.amount),
        )
        .await
        {
            tracing::error!(error = ?e, user_id = %payout.user_id, "payout failed, rolling back");
            tx.rollback().await.ok();
            return;
        }
    }
    if let Err(e) = tx.commit().await {
        tracing::error!(error = ?e, "failed to commit payouts");
    }
}
