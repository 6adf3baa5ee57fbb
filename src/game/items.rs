//! Defines all items, their properties, and master lists for the economy.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemCategory {
    /// Consumable exp pill; grants `exp_value` when used.
    ExpPill,
    /// Passive breakthrough catalyst; consumed automatically by `dotpha`.
    BreakthroughPill,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::ExpPill => "exp-pill",
            ItemCategory::BreakthroughPill => "breakthrough-pill",
        }
    }
}

pub struct ItemProperties {
    pub display_name: &'static str,
    pub emoji: &'static str,
    pub category: ItemCategory,
    pub buy_price: Option<i64>,
    /// Exp granted per unit when consumed with the `use` command.
    pub exp_value: Option<i64>,
    /// Breakthrough bonus as a fraction of the attempt's base rate.
    pub breakthrough_bonus: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum Item {
    BreakthroughPillBasic = 1,
    BreakthroughPillMid = 2,
    BreakthroughPillHigh = 3,
    GatherPill1 = 11,
    GatherPill2 = 12,
    GatherPill3 = 13,
    GatherPill4 = 14,
    GatherPill5 = 15,
    GatherPill6 = 16,
    GatherPill7 = 17,
    GatherPill8 = 18,
    GatherPill9 = 19,
}

/// Breakthrough pills in the order the attempt consults them. Only the first
/// owned entry applies; the order is fixed priority, not bonus magnitude.
pub static BONUS_PILLS: &[Item] = &[
    Item::BreakthroughPillHigh,
    Item::BreakthroughPillMid,
    Item::BreakthroughPillBasic,
];

impl Item {
    pub fn properties(&self) -> ItemProperties {
        match self {
            Item::BreakthroughPillBasic => ItemProperties {
                display_name: "Trúc Cơ Đan",
                emoji: "💊",
                category: ItemCategory::BreakthroughPill,
                buy_price: Some(5_000),
                exp_value: None,
                breakthrough_bonus: Some(0.2),
            },
            Item::BreakthroughPillMid => ItemProperties {
                display_name: "Hộ Tâm Đan",
                emoji: "💊",
                category: ItemCategory::BreakthroughPill,
                buy_price: Some(20_000),
                exp_value: None,
                breakthrough_bonus: Some(0.3),
            },
            Item::BreakthroughPillHigh => ItemProperties {
                display_name: "Phá Cảnh Đan",
                emoji: "💊",
                category: ItemCategory::BreakthroughPill,
                buy_price: Some(100_000),
                exp_value: None,
                breakthrough_bonus: Some(0.5),
            },
            Item::GatherPill1 => ItemProperties {
                display_name: "Tụ Khí Đan (Nhất Phẩm)",
                emoji: "🟢",
                category: ItemCategory::ExpPill,
                buy_price: Some(1_000),
                exp_value: Some(1_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill2 => ItemProperties {
                display_name: "Tụ Khí Đan (Nhị Phẩm)",
                emoji: "🟢",
                category: ItemCategory::ExpPill,
                buy_price: Some(5_000),
                exp_value: Some(5_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill3 => ItemProperties {
                display_name: "Tụ Khí Đan (Tam Phẩm)",
                emoji: "🟢",
                category: ItemCategory::ExpPill,
                buy_price: Some(20_000),
                exp_value: Some(20_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill4 => ItemProperties {
                display_name: "Tụ Khí Đan (Tứ Phẩm)",
                emoji: "🔵",
                category: ItemCategory::ExpPill,
                buy_price: Some(50_000),
                exp_value: Some(50_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill5 => ItemProperties {
                display_name: "Tụ Khí Đan (Ngũ Phẩm)",
                emoji: "🔵",
                category: ItemCategory::ExpPill,
                buy_price: Some(100_000),
                exp_value: Some(100_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill6 => ItemProperties {
                display_name: "Tụ Khí Đan (Lục Phẩm)",
                emoji: "🔵",
                category: ItemCategory::ExpPill,
                buy_price: Some(500_000),
                exp_value: Some(500_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill7 => ItemProperties {
                display_name: "Tụ Khí Đan (Thất Phẩm)",
                emoji: "🟣",
                category: ItemCategory::ExpPill,
                buy_price: Some(2_000_000),
                exp_value: Some(2_000_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill8 => ItemProperties {
                display_name: "Tụ Khí Đan (Bát Phẩm)",
                emoji: "🟣",
                category: ItemCategory::ExpPill,
                buy_price: Some(10_000_000),
                exp_value: Some(10_000_000),
                breakthrough_bonus: None,
            },
            Item::GatherPill9 => ItemProperties {
                display_name: "Tụ Khí Đan (Cửu Phẩm)",
                emoji: "🟣",
                category: ItemCategory::ExpPill,
                buy_price: Some(50_000_000),
                exp_value: Some(50_000_000),
                breakthrough_bonus: None,
            },
        }
    }

    pub fn all() -> Vec<Item> {
        vec![
            Item::BreakthroughPillBasic,
            Item::BreakthroughPillMid,
            Item::BreakthroughPillHigh,
            Item::GatherPill1,
            Item::GatherPill2,
            Item::GatherPill3,
            Item::GatherPill4,
            Item::GatherPill5,
            Item::GatherPill6,
            Item::GatherPill7,
            Item::GatherPill8,
            Item::GatherPill9,
        ]
    }

    pub fn from_i64(id: i64) -> Option<Self> {
        Item::all().into_iter().find(|item| *item as i64 == id)
    }

    pub fn display_name(&self) -> &'static str {
        self.properties().display_name
    }

    pub fn emoji(&self) -> &'static str {
        self.properties().emoji
    }
}

impl FromStr for Item {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trucco" | "truccodan" | "basic" => Ok(Item::BreakthroughPillBasic),
            "hotam" | "hotamdan" | "mid" => Ok(Item::BreakthroughPillMid),
            "phacanh" | "phacanhdan" | "high" => Ok(Item::BreakthroughPillHigh),
            "tukhi1" => Ok(Item::GatherPill1),
            "tukhi2" => Ok(Item::GatherPill2),
            "tukhi3" => Ok(Item::GatherPill3),
            "tukhi4" => Ok(Item::GatherPill4),
            "tukhi5" => Ok(Item::GatherPill5),
            "tukhi6" => Ok(Item::GatherPill6),
            "tukhi7" => Ok(Item::GatherPill7),
            "tukhi8" => Ok(Item::GatherPill8),
            "tukhi9" => Ok(Item::GatherPill9),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Item::BreakthroughPillBasic => "trucco",
                Item::BreakthroughPillMid => "hotam",
                Item::BreakthroughPillHigh => "phacanh",
                Item::GatherPill1 => "tukhi1",
                Item::GatherPill2 => "tukhi2",
                Item::GatherPill3 => "tukhi3",
                Item::GatherPill4 => "tukhi4",
                Item::GatherPill5 => "tukhi5",
                Item::GatherPill6 => "tukhi6",
                Item::GatherPill7 => "tukhi7",
                Item::GatherPill8 => "tukhi8",
                Item::GatherPill9 => "tukhi9",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for item in Item::all() {
            assert_eq!(Item::from_i64(item as i64), Some(item));
            assert_eq!(item.to_string().parse::<Item>(), Ok(item));
        }
        assert_eq!(Item::from_i64(0), None);
    }

    #[test]
    fn bonus_pills_are_priority_ordered_not_magnitude_ordered() {
        let bonuses: Vec<f64> = BONUS_PILLS
            .iter()
            .map(|p| p.properties().breakthrough_bonus.unwrap())
            .collect();
        assert_eq!(bonuses, vec![0.5, 0.3, 0.2]);
    }

    #[test]
    fn every_exp_pill_has_a_value_and_price() {
        for item in Item::all() {
            let props = item.properties();
            match props.category {
                ItemCategory::ExpPill => {
                    assert!(props.exp_value.is_some());
                    assert!(props.breakthrough_bonus.is_none());
                }
                ItemCategory::BreakthroughPill => {
                    assert!(props.breakthrough_bonus.is_some());
                    assert!(props.exp_value.is_none());
                }
            }
            assert!(props.buy_price.is_some());
        }
    }
}
