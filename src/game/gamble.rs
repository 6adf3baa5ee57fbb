//! Pure resolutions for the instant gambling games: tài xỉu, bầu cua and
//! the slot machine. Dice are rolled by the command layer; everything here
//! is deterministic on its inputs.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaiXiuBet {
    /// Tài: sum 11..=17.
    Big,
    /// Xỉu: sum 3..=10.
    Small,
}

impl FromStr for TaiXiuBet {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tai" | "big" => Ok(TaiXiuBet::Big),
            "xiu" | "small" => Ok(TaiXiuBet::Small),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaiXiuOutcome {
    /// A triple always belongs to the house, whatever was bet.
    HouseTriple,
    Win { sum: u32 },
    Lose { sum: u32 },
}

/// Three six-sided dice: a triple pays the house, otherwise 11+ is big.
/// A correct call pays 1:1 (the command returns 2x the stake).
pub fn resolve_taixiu(dice: [u32; 3], bet: TaiXiuBet) -> TaiXiuOutcome {
    let sum = dice.iter().sum();
    if dice[0] == dice[1] && dice[1] == dice[2] {
        return TaiXiuOutcome::HouseTriple;
    }
    let big = sum >= 11;
    let called_it = matches!(bet, TaiXiuBet::Big) == big;
    if called_it {
        TaiXiuOutcome::Win { sum }
    } else {
        TaiXiuOutcome::Lose { sum }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BauCuaSymbol {
    Bau,
    Cua,
    Tom,
    Ca,
    Ga,
    Nai,
}

impl BauCuaSymbol {
    pub const ALL: [BauCuaSymbol; 6] = [
        BauCuaSymbol::Bau,
        BauCuaSymbol::Cua,
        BauCuaSymbol::Tom,
        BauCuaSymbol::Ca,
        BauCuaSymbol::Ga,
        BauCuaSymbol::Nai,
    ];

    pub fn emoji(&self) -> &'static str {
        match self {
            BauCuaSymbol::Bau => "🍐",
            BauCuaSymbol::Cua => "🦀",
            BauCuaSymbol::Tom => "🦐",
            BauCuaSymbol::Ca => "🐟",
            BauCuaSymbol::Ga => "🐓",
            BauCuaSymbol::Nai => "🦌",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BauCuaSymbol::Bau => "Bầu",
            BauCuaSymbol::Cua => "Cua",
            BauCuaSymbol::Tom => "Tôm",
            BauCuaSymbol::Ca => "Cá",
            BauCuaSymbol::Ga => "Gà",
            BauCuaSymbol::Nai => "Nai",
        }
    }
}

impl FromStr for BauCuaSymbol {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bau" => Ok(BauCuaSymbol::Bau),
            "cua" => Ok(BauCuaSymbol::Cua),
            "tom" => Ok(BauCuaSymbol::Tom),
            "ca" => Ok(BauCuaSymbol::Ca),
            "ga" => Ok(BauCuaSymbol::Ga),
            "nai" => Ok(BauCuaSymbol::Nai),
            _ => Err(()),
        }
    }
}

impl fmt::Display for BauCuaSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Total returned to the player for a bầu cua round: for each bet whose
/// symbol appears, the stake comes back plus stake × matches. The whole
/// wager was debited up front, so losing bets simply return nothing.
pub fn resolve_baucua(dice: [BauCuaSymbol; 3], bets: &[(BauCuaSymbol, i64)]) -> i64 {
    bets.iter()
        .map(|&(symbol, stake)| {
            let matches = dice.iter().filter(|&&d| d == symbol).count() as i64;
            if matches > 0 { stake + stake * matches } else { 0 }
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSymbol {
    pub emoji: &'static str,
    pub weight: u32,
}

/// The reel, weighted out of 100.
pub static SLOT_REEL: &[SlotSymbol] = &[
    SlotSymbol { emoji: "🍒", weight: 20 },
    SlotSymbol { emoji: "🍋", weight: 20 },
    SlotSymbol { emoji: "🍇", weight: 20 },
    SlotSymbol { emoji: "🍉", weight: 20 },
    SlotSymbol { emoji: "🔔", weight: 10 },
    SlotSymbol { emoji: "💎", weight: 8 },
    SlotSymbol { emoji: "7️⃣", weight: 2 },
];

/// Picks one reel symbol from a uniform draw in `[0, 1)` by walking the
/// cumulative weights.
pub fn spin_reel(draw: f64) -> &'static SlotSymbol {
    let total: u32 = SLOT_REEL.iter().map(|s| s.weight).sum();
    let mut ticket = (draw * total as f64) as u32;
    for symbol in SLOT_REEL {
        if ticket < symbol.weight {
            return symbol;
        }
        ticket -= symbol.weight;
    }
    &SLOT_REEL[SLOT_REEL.len() - 1]
}

/// Payout multiplier for three reels: triple sevens ×100, triple diamonds
/// ×50, triple bells ×20, any other triple ×10, any pair ×2, else nothing.
pub fn slots_multiplier(reels: [&SlotSymbol; 3]) -> i64 {
    let [a, b, c] = reels;
    if a.emoji == b.emoji && b.emoji == c.emoji {
        match a.emoji {
            "7️⃣" => 100,
            "💎" => 50,
            "🔔" => 20,
            _ => 10,
        }
    } else if a.emoji == b.emoji || b.emoji == c.emoji || a.emoji == c.emoji {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BauCuaSymbol::*;

    #[test]
    fn taixiu_triple_beats_both_bets() {
        assert_eq!(resolve_taixiu([4, 4, 4], TaiXiuBet::Big), TaiXiuOutcome::HouseTriple);
        assert_eq!(resolve_taixiu([2, 2, 2], TaiXiuBet::Small), TaiXiuOutcome::HouseTriple);
    }

    #[test]
    fn taixiu_splits_at_eleven() {
        assert_eq!(resolve_taixiu([6, 4, 1], TaiXiuBet::Big), TaiXiuOutcome::Win { sum: 11 });
        assert_eq!(resolve_taixiu([5, 4, 1], TaiXiuBet::Big), TaiXiuOutcome::Lose { sum: 10 });
        assert_eq!(resolve_taixiu([5, 4, 1], TaiXiuBet::Small), TaiXiuOutcome::Win { sum: 10 });
    }

    #[test]
    fn baucua_pays_per_match_plus_stake() {
        // Two crabs and a fish: 100 on cua returns 100 + 200, 50 on ca
        // returns 50 + 50, 30 on nai returns nothing.
        let returned = resolve_baucua([Cua, Ca, Cua], &[(Cua, 100), (Ca, 50), (Nai, 30)]);
        assert_eq!(returned, 400);
    }

    #[test]
    fn baucua_total_loss_returns_zero() {
        assert_eq!(resolve_baucua([Bau, Bau, Bau], &[(Ga, 500)]), 0);
    }

    #[test]
    fn reel_weights_sum_to_one_hundred() {
        let total: u32 = SLOT_REEL.iter().map(|s| s.weight).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn spin_reel_maps_draws_to_weight_bands() {
        assert_eq!(spin_reel(0.0).emoji, "🍒");
        assert_eq!(spin_reel(0.199).emoji, "🍒");
        assert_eq!(spin_reel(0.20).emoji, "🍋");
        assert_eq!(spin_reel(0.98).emoji, "7️⃣");
        assert_eq!(spin_reel(0.999).emoji, "7️⃣");
    }

    #[test]
    fn slots_paytable() {
        let sym = |emoji: &str| SLOT_REEL.iter().find(|s| s.emoji == emoji).unwrap();
        assert_eq!(slots_multiplier([sym("7️⃣"), sym("7️⃣"), sym("7️⃣")]), 100);
        assert_eq!(slots_multiplier([sym("💎"), sym("💎"), sym("💎")]), 50);
        assert_eq!(slots_multiplier([sym("🔔"), sym("🔔"), sym("🔔")]), 20);
        assert_eq!(slots_multiplier([sym("🍒"), sym("🍒"), sym("🍒")]), 10);
        assert_eq!(slots_multiplier([sym("🍒"), sym("🍋"), sym("🍒")]), 2);
        assert_eq!(slots_multiplier([sym("🍒"), sym("🍋"), sym("🍇")]), 0);
    }
}
