//! The hunt bestiary. Strength drives both the win-chance penalty and the
//! victory rewards, so one column keeps the table balanced.

pub struct Beast {
    pub name: &'static str,
    /// Lowest realm the beast naturally appears for.
    pub min_realm: i64,
    pub strength: i64,
}

pub static BEASTS: &[Beast] = &[
    Beast { name: "Thỏ Tinh", min_realm: 0, strength: 10 },
    Beast { name: "Sói Hoang", min_realm: 0, strength: 30 },
    Beast { name: "Hổ Yêu", min_realm: 1, strength: 80 },
    Beast { name: "Gấu Trúc Khổng Lồ", min_realm: 2, strength: 150 },
    Beast { name: "Xà Tinh", min_realm: 3, strength: 300 },
    Beast { name: "Huyết Lang", min_realm: 4, strength: 600 },
    Beast { name: "Hắc Điểu", min_realm: 5, strength: 1000 },
    Beast { name: "Kỳ Lân Con", min_realm: 6, strength: 2000 },
    Beast { name: "Rồng Đất", min_realm: 7, strength: 5000 },
    Beast { name: "Phượng Hoàng Lửa", min_realm: 8, strength: 10000 },
];

/// Beasts a player of the given realm can encounter: anything whose
/// `min_realm` is at most one tier above them.
pub fn encounter_pool(realm: i64) -> Vec<&'static Beast> {
    BEASTS.iter().filter(|b| b.min_realm <= realm + 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mortals_always_have_something_to_hunt() {
        let pool = encounter_pool(0);
        assert!(!pool.is_empty());
        assert!(pool.iter().all(|b| b.min_realm <= 1));
    }

    #[test]
    fn high_realms_see_the_whole_bestiary() {
        assert_eq!(encounter_pool(10).len(), BEASTS.len());
    }
}
