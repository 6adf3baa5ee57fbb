//! The horse race (đua ngựa) tick state machine. Five horses on a 20-step
//! track; each tick every horse advances 1–4 steps, and the first across the
//! line wins. A tie on the same tick is broken uniformly.

use crate::constants::{RACE_HORSES, RACE_TRACK_LEN, RACE_WIN_MULTIPLIER};
use crate::game::rules::draw_range;

pub static HORSE_EMOJIS: &[&str] = &["🐎", "🐴", "🦄", "🐪", "🦓"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RaceState {
    Running,
    /// Zero-based index of the winning horse.
    Finished { winner: usize },
}

#[derive(Debug, Clone)]
pub struct Race {
    pub positions: [usize; RACE_HORSES],
    pub state: RaceState,
}

impl Race {
    pub fn new() -> Self {
        Race {
            positions: [0; RACE_HORSES],
            state: RaceState::Running,
        }
    }

    /// Advances one tick. `step_draws` are uniform in `[0, 1)` per horse and
    /// map to 1..=4 steps; `tie_draw` picks among horses that cross together.
    pub fn tick(&mut self, step_draws: [f64; RACE_HORSES], tie_draw: f64) {
        if self.state != RaceState::Running {
            return;
        }
        for (pos, draw) in self.positions.iter_mut().zip(step_draws) {
            *pos += draw_range(draw, 1, 4) as usize;
        }
        let crossed: Vec<usize> = (0..RACE_HORSES)
            .filter(|&i| self.positions[i] >= RACE_TRACK_LEN)
            .collect();
        if !crossed.is_empty() {
            let pick = draw_range(tie_draw, 0, crossed.len() as i64 - 1) as usize;
            self.state = RaceState::Finished { winner: crossed[pick] };
        }
    }

    /// Drives a running race to its finish without rendering, pulling
    /// uniform draws from `draw`. Used when the live view can no longer be
    /// updated but the stake still has to settle on a real result.
    pub fn run_to_finish(&mut self, mut draw: impl FnMut() -> f64) {
        while self.state == RaceState::Running {
            let steps: [f64; RACE_HORSES] = std::array::from_fn(|_| draw());
            let tie = draw();
            self.tick(steps, tie);
        }
    }

    /// Amount returned for a stake on `horse` once the race is finished.
    pub fn payout(&self, horse: usize, wager: i64) -> i64 {
        match self.state {
            RaceState::Finished { winner } if winner == horse => wager * RACE_WIN_MULTIPLIER,
            _ => 0,
        }
    }

    /// Track rendering, one lane per horse.
    pub fn render_track(&self) -> String {
        let mut lanes = String::new();
        for (i, &pos) in self.positions.iter().enumerate() {
            let run = pos.min(RACE_TRACK_LEN);
            lanes.push_str(&format!(
                "`{}` {}{}{}\n",
                i + 1,
                "–".repeat(RACE_TRACK_LEN - run),
                HORSE_EMOJIS[i],
                "·".repeat(run),
            ));
        }
        lanes
    }
}

impl Default for Race {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horses_advance_one_to_four_steps() {
        let mut race = Race::new();
        race.tick([0.0, 0.999, 0.5, 0.0, 0.0], 0.0);
        assert_eq!(race.positions[0], 1);
        assert_eq!(race.positions[1], 4);
        assert_eq!(race.positions[2], 3);
        assert_eq!(race.state, RaceState::Running);
    }

    #[test]
    fn first_across_the_line_wins() {
        let mut race = Race::new();
        race.positions = [17, 0, 0, 0, 0];
        race.tick([0.999, 0.0, 0.0, 0.0, 0.0], 0.0);
        assert_eq!(race.state, RaceState::Finished { winner: 0 });
        assert_eq!(race.payout(0, 100), 1000);
        assert_eq!(race.payout(1, 100), 0);
    }

    #[test]
    fn simultaneous_finish_uses_the_tie_draw() {
        let mut race = Race::new();
        race.positions = [19, 19, 0, 0, 0];
        let mut tied = race.clone();
        race.tick([0.999, 0.999, 0.0, 0.0, 0.0], 0.0);
        tied.tick([0.999, 0.999, 0.0, 0.0, 0.0], 0.999);
        assert_eq!(race.state, RaceState::Finished { winner: 0 });
        assert_eq!(tied.state, RaceState::Finished { winner: 1 });
    }

    #[test]
    fn an_abandoned_running_race_still_settles_on_a_real_winner() {
        let mut race = Race::new();
        race.tick([0.5; RACE_HORSES], 0.0);
        assert_eq!(race.state, RaceState::Running);
        // Mid-race, nobody watching: the stake must never settle off a
        // running state.
        race.run_to_finish(|| rand::random());
        let RaceState::Finished { winner } = race.state else {
            panic!("race left running");
        };
        assert_eq!(race.payout(winner, 100), 100 * RACE_WIN_MULTIPLIER);
    }

    #[test]
    fn finished_race_ignores_further_ticks() {
        let mut race = Race::new();
        race.positions = [20, 0, 0, 0, 0];
        race.tick([0.0; 5], 0.0);
        let positions = race.positions;
        race.tick([0.999; 5], 0.0);
        assert_eq!(race.positions, positions);
    }
}
