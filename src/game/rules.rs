//! Pure resolution rules for every non-gambling action. Each function takes
//! the random draws it needs as plain arguments, so tests can force any
//! outcome; the command layer samples the draws and persists the results.

use super::beasts::Beast;
use super::realms;
use crate::constants::ROB_SUCCESS_CHANCE;

/// Maps a uniform draw in `[0, 1)` onto the inclusive integer range
/// `lo..=hi`. Draw 0.0 hits `lo`; draws just under 1.0 hit `hi`.
pub fn draw_range(draw: f64, lo: i64, hi: i64) -> i64 {
    let width = (hi - lo + 1) as f64;
    lo + ((draw * width) as i64).clamp(0, hi - lo)
}

/// Applies the realm reward multiplier, flooring the result.
fn scaled(base: i64, realm: i64) -> i64 {
    (base as f64 * realms::multiplier(realm)).floor() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineOutcome {
    Nothing,
    Found { amount: i64, lucky: bool },
}

/// Mining: 30% nothing, 50% a normal find (base 10..=59), 20% a lucky find
/// (base 50..=149); payout scaled by realm.
pub fn resolve_mine(realm: i64, roll: f64, base_draw: f64) -> MineOutcome {
    if roll < 0.30 {
        MineOutcome::Nothing
    } else if roll < 0.80 {
        MineOutcome::Found {
            amount: scaled(draw_range(base_draw, 10, 59), realm),
            lucky: false,
        }
    } else {
        MineOutcome::Found {
            amount: scaled(draw_range(base_draw, 50, 149), realm),
            lucky: true,
        }
    }
}

pub static FISH_KINDS: &[&str] = &[
    "Cá Chép", "Cá Rô", "Cá Trê", "Cá Lóc", "Cá Vàng", "Cá Koi", "Lươn Điện",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FishOutcome {
    Escaped,
    Caught { amount: i64, kind: &'static str },
}

/// Fishing: 40% the fish gets away; otherwise a catch worth base 5..=34
/// scaled by realm, with a flavor species.
pub fn resolve_fish(realm: i64, roll: f64, base_draw: f64, kind_draw: f64) -> FishOutcome {
    if roll < 0.40 {
        FishOutcome::Escaped
    } else {
        let kind_idx = draw_range(kind_draw, 0, FISH_KINDS.len() as i64 - 1) as usize;
        FishOutcome::Caught {
            amount: scaled(draw_range(base_draw, 5, 34), realm),
            kind: FISH_KINDS[kind_idx],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreOutcome {
    /// Ambushed; loses exp.
    BeastAttack { exp_loss: i64 },
    /// Waylaid by bandits; loses money under drain semantics.
    Robbed { money_loss: i64 },
    Nothing,
    FoundMoney { amount: i64 },
    FoundExp { amount: i64 },
    Treasure { money: i64, exp: i64 },
}

/// Exploration: one uniform roll walks cumulative buckets
/// 15% / 15% / 15% / 30% / 20% / 5%, all payouts scaled by realm.
pub fn resolve_explore(realm: i64, roll: f64, base_draw: f64) -> ExploreOutcome {
    if roll < 0.15 {
        ExploreOutcome::BeastAttack {
            exp_loss: scaled(draw_range(base_draw, 10, 59), realm),
        }
    } else if roll < 0.30 {
        ExploreOutcome::Robbed {
            money_loss: scaled(draw_range(base_draw, 20, 119), realm),
        }
    } else if roll < 0.45 {
        ExploreOutcome::Nothing
    } else if roll < 0.75 {
        ExploreOutcome::FoundMoney {
            amount: scaled(draw_range(base_draw, 50, 249), realm),
        }
    } else if roll < 0.95 {
        ExploreOutcome::FoundExp {
            amount: scaled(draw_range(base_draw, 30, 129), realm),
        }
    } else {
        ExploreOutcome::Treasure {
            money: scaled(draw_range(base_draw, 200, 699), realm),
            exp: scaled(draw_range(base_draw, 100, 299), realm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobOutcome {
    /// Steals a 1..=20 percent cut of the victim's cash.
    Success { stolen: i64 },
    /// Caught; pays 10% of own cash to the victim.
    Caught { fine: i64 },
}

pub fn resolve_rob(
    robber_cash: i64,
    victim_cash: i64,
    roll: f64,
    percent_draw: f64,
) -> RobOutcome {
    if roll < ROB_SUCCESS_CHANCE {
        let percent = draw_range(percent_draw, 1, 20);
        RobOutcome::Success {
            stolen: victim_cash * percent / 100,
        }
    } else {
        RobOutcome::Caught {
            fine: robber_cash / 10,
        }
    }
}

/// Quiet cultivation: a flat 10..=30 exp, deliberately not realm-scaled.
pub fn resolve_cultivate(base_draw: f64) -> i64 {
    draw_range(base_draw, 10, 30)
}

/// Win chance against a beast: 0.4 plus 0.15 per realm tier above its
/// habitat, clamped to [0.1, 0.9].
pub fn hunt_win_chance(realm: i64, beast: &Beast) -> f64 {
    (0.4 + 0.15 * (realm - beast.min_realm) as f64).clamp(0.1, 0.9)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntOutcome {
    Victory { exp: i64, money: i64 },
    Defeat,
}

pub fn resolve_hunt(realm: i64, beast: &Beast, roll: f64) -> HuntOutcome {
    if roll < hunt_win_chance(realm, beast) {
        HuntOutcome::Victory {
            exp: beast.strength * 2,
            money: beast.strength * 5,
        }
    } else {
        HuntOutcome::Defeat
    }
}

/// Final breakthrough success chance: the realm's base rate plus the pill
/// bonus expressed as a fraction of that base rate.
pub fn breakthrough_chance(base_rate: f64, pill_bonus: Option<f64>) -> f64 {
    base_rate + pill_bonus.map_or(0.0, |b| base_rate * b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakthroughFailure {
    pub exp_loss: i64,
    pub money_loss: i64,
}

/// The tribulation penalty on a failed attempt: 10% of current exp and 10%
/// of total wealth, the latter drained cash-first by the ledger.
pub fn breakthrough_penalty(exp: i64, wealth: i64) -> BreakthroughFailure {
    BreakthroughFailure {
        exp_loss: exp / 10,
        money_loss: wealth / 10,
    }
}

/// Challenger's win chance in a duel: 0.5 plus 0.1 per realm tier of
/// advantage, clamped to [0.1, 0.9].
pub fn pvp_win_chance(challenger_realm: i64, target_realm: i64) -> f64 {
    (0.5 + 0.1 * (challenger_realm - target_realm) as f64).clamp(0.1, 0.9)
}

/// Winner's exp bonus on a settled duel.
pub fn pvp_exp_reward(draw: f64) -> i64 {
    draw_range(draw, 10, 59)
}

/// Loser's exp penalty on a settled duel (floored at zero by the ledger).
pub fn pvp_exp_penalty(draw: f64) -> i64 {
    draw_range(draw, 5, 34)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::beasts::BEASTS;

    #[test]
    fn draw_range_covers_both_endpoints() {
        assert_eq!(draw_range(0.0, 10, 59), 10);
        assert_eq!(draw_range(0.999_999, 10, 59), 59);
        assert_eq!(draw_range(0.5, 0, 9), 5);
    }

    #[test]
    fn mine_buckets_split_at_30_and_80_percent() {
        assert_eq!(resolve_mine(0, 0.29, 0.0), MineOutcome::Nothing);
        assert_eq!(
            resolve_mine(0, 0.30, 0.0),
            MineOutcome::Found { amount: 10, lucky: false }
        );
        assert_eq!(
            resolve_mine(0, 0.80, 0.0),
            MineOutcome::Found { amount: 50, lucky: true }
        );
    }

    #[test]
    fn mine_payout_doubles_at_realm_two() {
        // Multiplier 1 + 0.5*2 = 2, base 20 -> 40.
        let draw = 10.0 / 50.0; // base 10 + 10 = 20
        match resolve_mine(2, 0.5, draw) {
            MineOutcome::Found { amount, lucky: false } => assert_eq!(amount, 40),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn fish_escapes_below_forty_percent() {
        assert_eq!(resolve_fish(0, 0.39, 0.0, 0.0), FishOutcome::Escaped);
        assert_eq!(
            resolve_fish(0, 0.40, 0.0, 0.0),
            FishOutcome::Caught { amount: 5, kind: FISH_KINDS[0] }
        );
    }

    #[test]
    fn explore_buckets_match_the_cumulative_table() {
        assert!(matches!(
            resolve_explore(0, 0.0, 0.0),
            ExploreOutcome::BeastAttack { .. }
        ));
        assert!(matches!(
            resolve_explore(0, 0.15, 0.0),
            ExploreOutcome::Robbed { .. }
        ));
        assert_eq!(resolve_explore(0, 0.30, 0.0), ExploreOutcome::Nothing);
        assert!(matches!(
            resolve_explore(0, 0.45, 0.0),
            ExploreOutcome::FoundMoney { .. }
        ));
        assert!(matches!(
            resolve_explore(0, 0.75, 0.0),
            ExploreOutcome::FoundExp { .. }
        ));
        assert!(matches!(
            resolve_explore(0, 0.95, 0.0),
            ExploreOutcome::Treasure { .. }
        ));
    }

    #[test]
    fn rob_steals_the_drawn_percent_of_victim_cash() {
        // Forced success with the 10% cut of a 1000-cash victim.
        let outcome = resolve_rob(500, 1000, 0.0, 9.0 / 20.0 + 0.001);
        assert_eq!(outcome, RobOutcome::Success { stolen: 100 });
    }

    #[test]
    fn rob_failure_fines_ten_percent_of_own_cash() {
        assert_eq!(resolve_rob(250, 1000, 0.99, 0.0), RobOutcome::Caught { fine: 25 });
    }

    #[test]
    fn hunt_chance_is_clamped() {
        let weakest = &BEASTS[0];
        let strongest = &BEASTS[BEASTS.len() - 1];
        assert_eq!(hunt_win_chance(50, weakest), 0.9);
        assert_eq!(hunt_win_chance(0, strongest), 0.1);
        assert!((hunt_win_chance(1, weakest) - 0.55).abs() < 1e-9);
    }

    #[test]
    fn hunt_victory_pays_strength_multiples() {
        let beast = &BEASTS[2]; // strength 80
        assert_eq!(
            resolve_hunt(5, beast, 0.0),
            HuntOutcome::Victory { exp: 160, money: 400 }
        );
        assert_eq!(resolve_hunt(0, beast, 0.999), HuntOutcome::Defeat);
    }

    #[test]
    fn breakthrough_bonus_scales_the_base_rate() {
        assert!((breakthrough_chance(0.5, Some(0.2)) - 0.6).abs() < 1e-9);
        assert!((breakthrough_chance(0.5, None) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn breakthrough_penalty_is_ten_percent_each() {
        let penalty = breakthrough_penalty(1234, 5678);
        assert_eq!(penalty.exp_loss, 123);
        assert_eq!(penalty.money_loss, 567);
    }

    #[test]
    fn pvp_chance_is_clamped_to_the_band() {
        assert_eq!(pvp_win_chance(0, 10), 0.1);
        assert_eq!(pvp_win_chance(10, 0), 0.9);
        assert!((pvp_win_chance(3, 1) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn cultivate_stays_in_its_band() {
        assert_eq!(resolve_cultivate(0.0), 10);
        assert_eq!(resolve_cultivate(0.999_999), 30);
    }
}
