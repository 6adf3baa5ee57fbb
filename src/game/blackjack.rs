//! Single-player blackjack (xì dách) against the house: cards, the round
//! state machine, and its interactive session wrapper.
//!
//! The wager is debited before the round starts. A natural pays 2.5× the
//! stake, a regular win 2×, a push refunds, and a timeout is treated as a
//! stand so the round always settles.

use super::session::{Payout, Session, SessionUpdate};
use crate::constants::SESSION_MOVE_SECS;
use rand::seq::SliceRandom;
use serenity::async_trait;
use serenity::builder::{
    CreateActionRow, CreateButton, CreateEmbed, CreateEmbedFooter,
};
use serenity::model::application::{ButtonStyle, ComponentInteraction};
use serenity::model::id::UserId;
use std::fmt;
use std::time::{Duration, Instant};

pub const HIT_ID: &str = "bj_hit";
pub const STAND_ID: &str = "bj_stand";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub suit: Suit,
    /// 1 = ace, 11..=13 = face cards.
    pub rank: u8,
}

impl Card {
    /// Hard value; aces count 1 here and are promoted in [`hand_value`].
    fn value(&self) -> u8 {
        self.rank.min(10)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        };
        let suit = match self.suit {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        };
        write!(f, "{}{}", rank, suit)
    }
}

pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn shuffled() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades] {
            for rank in 1..=13 {
                cards.push(Card { suit, rank });
            }
        }
        cards.shuffle(&mut rand::rng());
        Deck { cards }
    }

    /// A rigged deck dealing from the front of `cards`. Test hook.
    pub fn stacked(cards: Vec<Card>) -> Self {
        let mut cards = cards;
        cards.reverse();
        Deck { cards }
    }

    fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

/// Best blackjack value of a hand: aces are 1, and a single ace is promoted
/// to 11 when that does not bust.
pub fn hand_value(cards: &[Card]) -> u8 {
    let hard: u8 = cards.iter().map(Card::value).sum();
    let has_ace = cards.iter().any(|c| c.rank == 1);
    if has_ace && hard + 10 <= 21 { hard + 10 } else { hard }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Natural,
    PlayerWin,
    DealerWin,
    Push,
}

impl RoundOutcome {
    /// Amount returned to the player for a given stake.
    pub fn payout(&self, wager: i64) -> i64 {
        match self {
            RoundOutcome::Natural => wager * 5 / 2,
            RoundOutcome::PlayerWin => wager * 2,
            RoundOutcome::Push => wager,
            RoundOutcome::DealerWin => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    PlayerTurn,
    Settled(RoundOutcome),
}

pub struct BlackjackRound {
    deck: Deck,
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
    pub state: RoundState,
}

impl BlackjackRound {
    pub fn new() -> Self {
        Self::deal_from(Deck::shuffled())
    }

    /// Deals the opening hands; a natural 21 settles immediately.
    pub fn deal_from(mut deck: Deck) -> Self {
        let player = vec![forced_draw(&mut deck), forced_draw(&mut deck)];
        let dealer = vec![forced_draw(&mut deck), forced_draw(&mut deck)];
        let state = if hand_value(&player) == 21 {
            RoundState::Settled(RoundOutcome::Natural)
        } else {
            RoundState::PlayerTurn
        };
        BlackjackRound { deck, player, dealer, state }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self.state, RoundState::Settled(_))
    }

    pub fn hit(&mut self) {
        if self.state != RoundState::PlayerTurn {
            return;
        }
        self.player.push(forced_draw(&mut self.deck));
        if hand_value(&self.player) > 21 {
            self.state = RoundState::Settled(RoundOutcome::DealerWin);
        }
    }

    /// Stands: the dealer draws to 17, then the hands are compared.
    pub fn stand(&mut self) {
        if self.state != RoundState::PlayerTurn {
            return;
        }
        while hand_value(&self.dealer) < 17 {
            self.dealer.push(forced_draw(&mut self.deck));
        }
        let player = hand_value(&self.player);
        let dealer = hand_value(&self.dealer);
        let outcome = if dealer > 21 || player > dealer {
            RoundOutcome::PlayerWin
        } else if player < dealer {
            RoundOutcome::DealerWin
        } else {
            RoundOutcome::Push
        };
        self.state = RoundState::Settled(outcome);
    }
}

impl Default for BlackjackRound {
    fn default() -> Self {
        Self::new()
    }
}

/// A 52-card deck cannot run dry inside one round, but the state machine
/// still refuses to panic: an exhausted deck deals a neutral-value card.
fn forced_draw(deck: &mut Deck) -> Card {
    deck.draw().unwrap_or(Card { suit: Suit::Spades, rank: 7 })
}

fn hand_line(cards: &[Card]) -> String {
    let shown: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
    format!("{} (**{}**)", shown.join(" "), hand_value(cards))
}

pub struct BlackjackSession {
    round: BlackjackRound,
    player_id: UserId,
    wager: i64,
    deadline: Instant,
}

impl BlackjackSession {
    pub fn new(player_id: UserId, wager: i64) -> Self {
        Self::with_round(BlackjackRound::new(), player_id, wager)
    }

    pub fn with_round(round: BlackjackRound, player_id: UserId, wager: i64) -> Self {
        BlackjackSession {
            round,
            player_id,
            wager,
            deadline: Instant::now() + Duration::from_secs(SESSION_MOVE_SECS),
        }
    }

    pub fn is_settled(&self) -> bool {
        self.round.is_settled()
    }

    fn settle_update(&self) -> SessionUpdate {
        let RoundState::Settled(outcome) = self.round.state else {
            return SessionUpdate::NoOp;
        };
        let payout = outcome.payout(self.wager);
        let summary = match outcome {
            RoundOutcome::Natural => "blackjack: natural",
            RoundOutcome::PlayerWin => "blackjack: player win",
            RoundOutcome::DealerWin => "blackjack: house win",
            RoundOutcome::Push => "blackjack: push",
        };
        SessionUpdate::Settled {
            summary: summary.to_string(),
            payouts: vec![Payout { user_id: self.player_id, amount: payout }],
        }
    }
}

#[async_trait]
impl Session for BlackjackSession {
    async fn handle_component(&mut self, interaction: &ComponentInteraction) -> SessionUpdate {
        if interaction.user.id != self.player_id {
            return SessionUpdate::NoOp;
        }
        match interaction.data.custom_id.as_str() {
            HIT_ID => self.round.hit(),
            STAND_ID => self.round.stand(),
            _ => return SessionUpdate::NoOp,
        }
        if self.round.is_settled() {
            self.settle_update()
        } else {
            self.deadline = Instant::now() + Duration::from_secs(SESSION_MOVE_SECS);
            SessionUpdate::ReRender
        }
    }

    fn force_settle(&mut self) -> SessionUpdate {
        self.round.stand();
        self.settle_update()
    }

    fn deadline(&self) -> Instant {
        self.deadline
    }

    fn render(&self) -> (CreateEmbed, Vec<CreateActionRow>) {
        let settled = self.round.is_settled();
        let dealer_line = if settled {
            hand_line(&self.round.dealer)
        } else {
            format!("{} 🂠", self.round.dealer[0])
        };
        let title = match self.round.state {
            RoundState::PlayerTurn => "🃏 Xì Dách".to_string(),
            RoundState::Settled(outcome) => {
                let payout = outcome.payout(self.wager);
                match outcome {
                    RoundOutcome::Natural => format!("🃏 Xì Dách — Blackjack! +{payout}"),
                    RoundOutcome::PlayerWin => format!("🃏 Xì Dách — Thắng! +{payout}"),
                    RoundOutcome::DealerWin => "🃏 Xì Dách — Thua".to_string(),
                    RoundOutcome::Push => format!("🃏 Xì Dách — Hòa, hoàn {payout}"),
                }
            }
        };
        let embed = CreateEmbed::new()
            .title(title)
            .field("Bài của bạn", hand_line(&self.round.player), false)
            .field("Nhà cái", dealer_line, false)
            .footer(CreateEmbedFooter::new(format!("Cược: {}", self.wager)));

        let components = if settled {
            vec![]
        } else {
            vec![CreateActionRow::Buttons(vec![
                CreateButton::new(HIT_ID)
                    .label("Rút")
                    .style(ButtonStyle::Primary),
                CreateButton::new(STAND_ID)
                    .label("Dằn")
                    .style(ButtonStyle::Secondary),
            ])]
        };
        (embed, components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rank: u8) -> Card {
        Card { suit: Suit::Clubs, rank }
    }

    #[test]
    fn hand_value_promotes_one_ace() {
        assert_eq!(hand_value(&[card(1), card(9)]), 20);
        assert_eq!(hand_value(&[card(1), card(1), card(9)]), 21);
        assert_eq!(hand_value(&[card(1), card(13), card(9)]), 20);
        assert_eq!(hand_value(&[card(1), card(10)]), 21);
    }

    #[test]
    fn natural_settles_on_the_deal() {
        // Player: A + K. Dealer: whatever.
        let deck = Deck::stacked(vec![card(1), card(13), card(5), card(9)]);
        let round = BlackjackRound::deal_from(deck);
        assert_eq!(round.state, RoundState::Settled(RoundOutcome::Natural));
        assert_eq!(RoundOutcome::Natural.payout(100), 250);
    }

    #[test]
    fn busting_loses_the_wager() {
        // Player: 10 + 9, hits into a king.
        let deck = Deck::stacked(vec![card(10), card(9), card(5), card(9), card(13)]);
        let mut round = BlackjackRound::deal_from(deck);
        round.hit();
        assert_eq!(round.state, RoundState::Settled(RoundOutcome::DealerWin));
        assert_eq!(RoundOutcome::DealerWin.payout(100), 0);
    }

    #[test]
    fn dealer_draws_to_seventeen_then_compares() {
        // Player 20; dealer 6+9 draws a 2 to reach 17 and loses.
        let deck = Deck::stacked(vec![card(10), card(10), card(6), card(9), card(2)]);
        let mut round = BlackjackRound::deal_from(deck);
        round.stand();
        assert_eq!(round.state, RoundState::Settled(RoundOutcome::PlayerWin));
        assert_eq!(hand_value(&round.dealer), 17);
        assert_eq!(RoundOutcome::PlayerWin.payout(100), 200);
    }

    #[test]
    fn push_refunds_the_stake() {
        // Player 19 vs dealer 19.
        let deck = Deck::stacked(vec![card(10), card(9), card(10), card(9)]);
        let mut round = BlackjackRound::deal_from(deck);
        round.stand();
        assert_eq!(round.state, RoundState::Settled(RoundOutcome::Push));
        assert_eq!(RoundOutcome::Push.payout(100), 100);
    }

    #[test]
    fn settled_round_ignores_further_moves() {
        let deck = Deck::stacked(vec![card(10), card(9), card(10), card(9), card(5)]);
        let mut round = BlackjackRound::deal_from(deck);
        round.stand();
        let final_state = round.state;
        round.hit();
        round.stand();
        assert_eq!(round.state, final_state);
    }
}
