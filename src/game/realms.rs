//! The cultivation progression table. A player's `realm` column indexes into
//! this list; the first entry is the mortal starting point and has no
//! breakthrough of its own.

/// One tier of the progression table.
pub struct Realm {
    pub name: &'static str,
    /// Exp required to attempt the breakthrough INTO this realm.
    pub req_exp: i64,
    /// Base success chance of that breakthrough, before pill bonuses.
    pub base_rate: f64,
}

/// Ordered from mortal to the current cap. `req_exp`/`base_rate` of index 0
/// are unused; nobody breaks through into being mortal.
pub static REALMS: &[Realm] = &[
    Realm { name: "Phàm Nhân", req_exp: 0, base_rate: 1.0 },
    Realm { name: "Luyện Khí", req_exp: 1_000, base_rate: 0.95 },
    Realm { name: "Trúc Cơ", req_exp: 10_000, base_rate: 0.85 },
    Realm { name: "Kim Đan", req_exp: 50_000, base_rate: 0.75 },
    Realm { name: "Nguyên Anh", req_exp: 200_000, base_rate: 0.65 },
    Realm { name: "Hóa Thần", req_exp: 1_000_000, base_rate: 0.55 },
    Realm { name: "Luyện Hư", req_exp: 5_000_000, base_rate: 0.45 },
    Realm { name: "Hợp Thể", req_exp: 20_000_000, base_rate: 0.35 },
    Realm { name: "Đại Thừa", req_exp: 100_000_000, base_rate: 0.25 },
    Realm { name: "Độ Kiếp", req_exp: 500_000_000, base_rate: 0.15 },
    Realm { name: "Tiên Nhân", req_exp: 2_000_000_000, base_rate: 0.10 },
];

/// The realm at an index, clamped so a corrupt row can never panic a lookup.
pub fn get(index: i64) -> &'static Realm {
    let idx = index.clamp(0, REALMS.len() as i64 - 1) as usize;
    &REALMS[idx]
}

/// The next tier up, or `None` at the cap.
pub fn next(index: i64) -> Option<(i64, &'static Realm)> {
    let next_idx = index + 1;
    if next_idx >= 0 && (next_idx as usize) < REALMS.len() {
        Some((next_idx, &REALMS[next_idx as usize]))
    } else {
        None
    }
}

/// Reward scaling applied to activity payouts: `1 + 0.5 × realm`.
pub fn multiplier(realm: i64) -> f64 {
    1.0 + 0.5 * realm.max(0) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_strictly_ascending() {
        for pair in REALMS.windows(2) {
            assert!(pair[0].req_exp < pair[1].req_exp);
            assert!(pair[0].base_rate >= pair[1].base_rate);
        }
    }

    #[test]
    fn next_stops_at_the_cap() {
        let cap = REALMS.len() as i64 - 1;
        assert!(next(cap).is_none());
        let (idx, realm) = next(0).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(realm.name, "Luyện Khí");
    }

    #[test]
    fn lookup_clamps_out_of_range_indices() {
        assert_eq!(get(-5).name, REALMS[0].name);
        assert_eq!(get(999).name, REALMS[REALMS.len() - 1].name);
    }

    #[test]
    fn multiplier_scales_linearly() {
        assert_eq!(multiplier(0), 1.0);
        assert_eq!(multiplier(2), 2.0);
        assert_eq!(multiplier(-3), 1.0);
    }
}
