//! Shared database row types and the pure settlement arithmetic applied to
//! every account mutation. Keeping the clamp logic here, in one place, is
//! what guarantees the `cash >= 0 && bank >= 0 && exp >= 0` invariant.

use sqlx::FromRow;

/// One player's persisted economy state. Created lazily with all zeroes on
/// first interaction, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub user_id: i64,
    /// Liquid currency, at risk in robbery/pvp/gambling.
    pub cash: i64,
    /// Sheltered currency; only drained once cash is exhausted.
    pub bank: i64,
    pub exp: i64,
    /// Index into the progression table.
    pub realm: i64,
    /// Unix seconds; 0 = not jailed.
    pub jailed_until: i64,
}

impl Account {
    pub fn wealth(&self) -> i64 {
        self.cash + self.bank
    }
}

/// A requested mutation of one account. Negative `cash` values are treated as
/// a drain: taken from cash first, overflow from bank, both floored at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountDelta {
    pub cash: i64,
    pub bank: i64,
    pub exp: i64,
    pub realm: Option<i64>,
    pub jailed_until: Option<i64>,
}

impl AccountDelta {
    pub fn cash(amount: i64) -> Self {
        Self {
            cash: amount,
            ..Self::default()
        }
    }

    pub fn exp(amount: i64) -> Self {
        Self {
            exp: amount,
            ..Self::default()
        }
    }
}

/// Applies a delta to an account, enforcing the non-negativity invariant.
/// A debit larger than total wealth is capped at total wealth; this is the
/// "penalty capped at what the player owns" rule, never an error.
pub fn settle(account: &Account, delta: &AccountDelta) -> Account {
    let mut cash = account.cash;
    let mut bank = account.bank;

    if delta.cash >= 0 {
        cash += delta.cash;
    } else {
        let mut debit = -delta.cash;
        if cash >= debit {
            cash -= debit;
        } else {
            debit -= cash;
            cash = 0;
            bank = (bank - debit).max(0);
        }
    }

    if delta.bank >= 0 {
        bank += delta.bank;
    } else {
        bank = (bank + delta.bank).max(0);
    }

    Account {
        user_id: account.user_id,
        cash,
        bank,
        exp: (account.exp + delta.exp).max(0),
        realm: delta.realm.unwrap_or(account.realm),
        jailed_until: delta.jailed_until.unwrap_or(account.jailed_until),
    }
}

/// One inventory row joined with its display name.
#[derive(Debug, Clone, FromRow)]
pub struct InventoryEntry {
    pub item_id: i64,
    pub quantity: i64,
}

/// One shop row. Reference data for price/name lookups.
#[derive(Debug, Clone, FromRow)]
pub struct ShopListing {
    pub item_id: i64,
    pub name: String,
    pub price: i64,
    pub category: String,
}
