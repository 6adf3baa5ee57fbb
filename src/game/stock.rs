//! The stock mini-game (chứng khoán): call the direction of a short random
//! walk. The price starts at 100.0 and moves up to ±5% per tick; a correct
//! call pays 2×, and a walk that ends where it started refunds the stake.

use crate::constants::STOCK_TICKS;
use std::str::FromStr;

/// Ending moves smaller than this count as flat and refund the wager.
const FLAT_EPSILON: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockGuess {
    Up,
    Down,
}

impl FromStr for StockGuess {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "up" | "tang" | "len" => Ok(StockGuess::Up),
            "down" | "giam" | "xuong" => Ok(StockGuess::Down),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    Win,
    Lose,
    /// Price ended where it started; the stake comes back.
    Flat,
}

#[derive(Debug, Clone)]
pub struct StockRound {
    pub start_price: f64,
    pub price: f64,
    pub history: Vec<f64>,
}

impl StockRound {
    pub fn new() -> Self {
        StockRound {
            start_price: 100.0,
            price: 100.0,
            history: vec![100.0],
        }
    }

    pub fn is_done(&self) -> bool {
        self.history.len() > STOCK_TICKS as usize
    }

    /// Applies one tick from a uniform draw in `[0, 1)`: the price moves by
    /// a factor in `[0.95, 1.05)`.
    pub fn tick(&mut self, draw: f64) {
        if self.is_done() {
            return;
        }
        self.price *= 0.95 + draw * 0.10;
        self.history.push(self.price);
    }

    /// Drives a partial walk to its close without rendering, so an
    /// interrupted round still settles on a full price history.
    pub fn run_to_close(&mut self, mut draw: impl FnMut() -> f64) {
        while !self.is_done() {
            self.tick(draw());
        }
    }

    pub fn change(&self) -> f64 {
        self.price - self.start_price
    }

    pub fn outcome(&self, guess: StockGuess) -> StockOutcome {
        let change = self.change();
        if change.abs() < FLAT_EPSILON {
            StockOutcome::Flat
        } else if (change > 0.0) == (guess == StockGuess::Up) {
            StockOutcome::Win
        } else {
            StockOutcome::Lose
        }
    }

    /// Amount returned for the stake once the walk is over.
    pub fn payout(&self, guess: StockGuess, wager: i64) -> i64 {
        match self.outcome(guess) {
            StockOutcome::Win => wager * 2,
            StockOutcome::Flat => wager,
            StockOutcome::Lose => 0,
        }
    }

    /// Sparkline-style rendering of the walk so far.
    pub fn render_chart(&self) -> String {
        self.history
            .iter()
            .map(|p| {
                let delta = p - self.start_price;
                if delta > FLAT_EPSILON {
                    '📈'
                } else if delta < -FLAT_EPSILON {
                    '📉'
                } else {
                    '➖'
                }
            })
            .collect()
    }
}

impl Default for StockRound {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upward_walk_rewards_an_up_call() {
        let mut round = StockRound::new();
        for _ in 0..STOCK_TICKS {
            round.tick(0.9); // +4% each tick
        }
        assert!(round.is_done());
        assert_eq!(round.outcome(StockGuess::Up), StockOutcome::Win);
        assert_eq!(round.payout(StockGuess::Up, 100), 200);
        assert_eq!(round.payout(StockGuess::Down, 100), 0);
    }

    #[test]
    fn flat_walk_refunds() {
        let round = StockRound::new();
        // No ticks applied; price is exactly the start.
        assert_eq!(round.outcome(StockGuess::Up), StockOutcome::Flat);
        assert_eq!(round.payout(StockGuess::Down, 100), 100);
    }

    #[test]
    fn walk_stops_after_its_tick_budget() {
        let mut round = StockRound::new();
        for _ in 0..STOCK_TICKS + 3 {
            round.tick(0.0);
        }
        assert_eq!(round.history.len(), STOCK_TICKS as usize + 1);
    }

    #[test]
    fn an_abandoned_partial_walk_runs_to_the_close_before_settling() {
        let mut round = StockRound::new();
        round.tick(0.9);
        assert!(!round.is_done());
        round.run_to_close(|| 0.9);
        assert!(round.is_done());
        assert_eq!(round.history.len(), STOCK_TICKS as usize + 1);
        assert_eq!(round.outcome(StockGuess::Up), StockOutcome::Win);
        assert_eq!(round.payout(StockGuess::Up, 100), 200);
    }

    #[test]
    fn tick_factor_stays_within_five_percent() {
        let mut down = StockRound::new();
        down.tick(0.0);
        assert!((down.price - 95.0).abs() < 1e-9);
        let mut up = StockRound::new();
        up.tick(0.999_999);
        assert!(up.price < 105.0 && up.price > 104.9);
    }
}
