//! End-to-end checks of the persistence layer against a real in-memory
//! SQLite database: money conservation under transfers, the cash-first
//! drain, checked wagers and bank moves, and shop purchase atomicity.

use sqlx::sqlite::SqlitePoolOptions;
use tutien_bot::database::init::{self, DbPool};
use tutien_bot::database::models::AccountDelta;
use tutien_bot::cooldown::ActionKind;
use tutien_bot::database::{config, inventory, ledger, shop};
use tutien_bot::game::error::GameError;
use tutien_bot::game::items::Item;

const ALICE: i64 = 1001;
const BOB: i64 = 1002;

async fn fresh_pool() -> DbPool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    init::create_schema(&pool).await.unwrap();
    pool
}

#[tokio::test]
async fn accounts_are_created_lazily_with_zeroes() {
    let pool = fresh_pool().await;
    assert!(ledger::get_account(&pool, ALICE).await.unwrap().is_none());
    let account = ledger::get_or_create_account(&pool, ALICE).await.unwrap();
    assert_eq!(account.cash, 0);
    assert_eq!(account.bank, 0);
    assert_eq!(account.exp, 0);
    assert_eq!(account.realm, 0);
    assert!(ledger::get_account(&pool, ALICE).await.unwrap().is_some());
}

#[tokio::test]
async fn transfer_conserves_total_money() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(500)).await.unwrap();
    ledger::transfer_cash(&pool, ALICE, BOB, 200).await.unwrap();

    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    let bob = ledger::get_account(&pool, BOB).await.unwrap().unwrap();
    assert_eq!(alice.cash, 300);
    assert_eq!(bob.cash, 200);
    assert_eq!(alice.wealth() + bob.wealth(), 500);
}

#[tokio::test]
async fn short_transfer_fails_with_no_mutation() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(100)).await.unwrap();

    let err = ledger::transfer_cash(&pool, ALICE, BOB, 150).await.unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientFunds { needed: 150, available: 100 }
    ));
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.cash, 100);
    let bob = ledger::get_or_create_account(&pool, BOB).await.unwrap();
    assert_eq!(bob.cash, 0);
}

#[tokio::test]
async fn transfer_up_to_caps_at_the_payers_cash() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(80)).await.unwrap();

    let moved = ledger::transfer_up_to(&pool, ALICE, BOB, 999).await.unwrap();
    assert_eq!(moved, 80);
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    let bob = ledger::get_account(&pool, BOB).await.unwrap().unwrap();
    assert_eq!(alice.cash, 0);
    assert_eq!(bob.cash, 80);
}

#[tokio::test]
async fn debits_drain_cash_first_then_bank_floored_at_zero() {
    let pool = fresh_pool().await;
    ledger::apply_delta(
        &pool,
        ALICE,
        AccountDelta {
            cash: 100,
            bank: 50,
            ..AccountDelta::default()
        },
    )
    .await
    .unwrap();

    let after = ledger::apply_delta(&pool, ALICE, AccountDelta::cash(-120)).await.unwrap();
    assert_eq!(after.cash, 0);
    assert_eq!(after.bank, 30);

    // Debit beyond everything the account holds is capped, not an error.
    let after = ledger::apply_delta(&pool, ALICE, AccountDelta::cash(-1_000)).await.unwrap();
    assert_eq!(after.cash, 0);
    assert_eq!(after.bank, 0);
}

#[tokio::test]
async fn debit_wager_is_hard_checked() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(99)).await.unwrap();

    let err = ledger::debit_wager(&pool, ALICE, 100).await.unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds { .. }));
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.cash, 99);

    let after = ledger::debit_wager(&pool, ALICE, 99).await.unwrap();
    assert_eq!(after.cash, 0);
}

#[tokio::test]
async fn bank_moves_are_checked_and_never_drain() {
    let pool = fresh_pool().await;
    ledger::apply_delta(
        &pool,
        ALICE,
        AccountDelta {
            cash: 40,
            bank: 10,
            ..AccountDelta::default()
        },
    )
    .await
    .unwrap();

    // A deposit bigger than cash must not be pulled out of the bank.
    let err = ledger::bank_deposit(&pool, ALICE, 45).await.unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds { .. }));
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!((alice.cash, alice.bank), (40, 10));

    let after = ledger::bank_deposit(&pool, ALICE, 40).await.unwrap();
    assert_eq!((after.cash, after.bank), (0, 50));

    let err = ledger::bank_withdraw(&pool, ALICE, 51).await.unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds { .. }));
    let after = ledger::bank_withdraw(&pool, ALICE, 50).await.unwrap();
    assert_eq!((after.cash, after.bank), (50, 0));
}

#[tokio::test]
async fn duel_settlement_rechecks_both_wallets() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(300)).await.unwrap();
    ledger::apply_delta(&pool, BOB, AccountDelta::cash(100)).await.unwrap();
    ledger::apply_delta(&pool, ALICE, AccountDelta::exp(50)).await.unwrap();
    ledger::apply_delta(&pool, BOB, AccountDelta::exp(5)).await.unwrap();

    // The loser no longer covers the wager: no mutation at all.
    let settled = ledger::settle_duel(&pool, ALICE, BOB, 200, 30, 10).await.unwrap();
    assert!(!settled);
    let bob = ledger::get_account(&pool, BOB).await.unwrap().unwrap();
    assert_eq!((bob.cash, bob.exp), (100, 5));

    let settled = ledger::settle_duel(&pool, ALICE, BOB, 100, 30, 10).await.unwrap();
    assert!(settled);
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    let bob = ledger::get_account(&pool, BOB).await.unwrap().unwrap();
    assert_eq!((alice.cash, alice.exp), (400, 80));
    assert_eq!(bob.cash, 0);
    // The exp penalty is floored at zero, never negative.
    assert_eq!(bob.exp, 0);
}

#[tokio::test]
async fn jail_flag_round_trips() {
    let pool = fresh_pool().await;
    let jailed = ledger::set_jail(&pool, ALICE, 9_999_999_999).await.unwrap();
    assert_eq!(jailed.jailed_until, 9_999_999_999);
    let freed = ledger::set_jail(&pool, ALICE, 0).await.unwrap();
    assert_eq!(freed.jailed_until, 0);
}

#[tokio::test]
async fn leaderboard_orders_by_total_wealth() {
    let pool = fresh_pool().await;
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(100)).await.unwrap();
    ledger::apply_delta(
        &pool,
        BOB,
        AccountDelta {
            cash: 10,
            bank: 500,
            ..AccountDelta::default()
        },
    )
    .await
    .unwrap();

    let top = ledger::top_accounts(&pool, 10).await.unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].user_id, BOB);
    assert_eq!(top[1].user_id, ALICE);
}

#[tokio::test]
async fn inventory_consume_never_overdraws() {
    let pool = fresh_pool().await;
    inventory::add_item(&pool, ALICE, Item::GatherPill1, 3).await.unwrap();

    let err = inventory::consume_item(&pool, ALICE, Item::GatherPill1, 4).await.unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientInventory { needed: 4, owned: 3 }
    ));
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 3);

    inventory::consume_item(&pool, ALICE, Item::GatherPill1, 3).await.unwrap();
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 0);
    assert!(inventory::get_inventory(&pool, ALICE).await.unwrap().is_empty());
}

#[tokio::test]
async fn pill_consume_and_exp_credit_land_together() {
    let pool = fresh_pool().await;
    inventory::add_item(&pool, ALICE, Item::GatherPill1, 5).await.unwrap();

    let account = inventory::consume_for_exp(&pool, ALICE, Item::GatherPill1, 2, 2_000)
        .await
        .unwrap();
    assert_eq!(account.exp, 2_000);
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 3);

    // A short stack rolls everything back: no pills burned, no exp granted.
    let err = inventory::consume_for_exp(&pool, ALICE, Item::GatherPill1, 4, 4_000)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientInventory { needed: 4, owned: 3 }
    ));
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.exp, 2_000);
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 3);
}

#[tokio::test]
async fn shop_is_seeded_and_purchases_are_atomic() {
    let pool = fresh_pool().await;
    let listings = shop::all_listings(&pool).await.unwrap();
    assert_eq!(listings.len(), Item::all().len());

    let listing = shop::get_listing(&pool, Item::GatherPill1 as i64)
        .await
        .unwrap()
        .unwrap();
    ledger::apply_delta(&pool, ALICE, AccountDelta::cash(listing.price * 2)).await.unwrap();

    // Three are too expensive: the debit and the item credit both roll back.
    let err = shop::purchase(&pool, ALICE, Item::GatherPill1 as i64, 3, listing.price)
        .await
        .unwrap_err();
    assert!(matches!(err, GameError::InsufficientFunds { .. }));
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.cash, listing.price * 2);
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 0);

    shop::purchase(&pool, ALICE, Item::GatherPill1 as i64, 2, listing.price)
        .await
        .unwrap();
    let alice = ledger::get_account(&pool, ALICE).await.unwrap().unwrap();
    assert_eq!(alice.cash, 0);
    assert_eq!(inventory::item_count(&pool, ALICE, Item::GatherPill1).await.unwrap(), 2);
}

#[tokio::test]
async fn cooldown_overrides_fall_back_to_defaults_when_unset_or_garbage() {
    let pool = fresh_pool().await;
    assert_eq!(
        config::cooldown_secs(&pool, ActionKind::Rob).await.unwrap(),
        ActionKind::Rob.default_secs()
    );

    config::set(&pool, ActionKind::Rob.config_key(), "42").await.unwrap();
    assert_eq!(config::cooldown_secs(&pool, ActionKind::Rob).await.unwrap(), 42);

    config::set(&pool, ActionKind::Rob.config_key(), "not-a-number").await.unwrap();
    assert_eq!(
        config::cooldown_secs(&pool, ActionKind::Rob).await.unwrap(),
        ActionKind::Rob.default_secs()
    );
}

#[tokio::test]
async fn currency_display_is_configurable() {
    let pool = fresh_pool().await;
    let (name, emoji) = config::currency(&pool).await.unwrap();
    assert_eq!(name, "Xu");
    assert_eq!(emoji, "🪙");

    config::set(&pool, "currency_name", "Linh Thạch").await.unwrap();
    config::set(&pool, "currency_emoji", "💎").await.unwrap();
    let (name, emoji) = config::currency(&pool).await.unwrap();
    assert_eq!(name, "Linh Thạch");
    assert_eq!(emoji, "💎");
}

#[tokio::test]
async fn delisted_items_disappear_from_the_catalog() {
    let pool = fresh_pool().await;
    assert!(shop::delist(&pool, Item::GatherPill9 as i64).await.unwrap());
    assert!(!shop::delist(&pool, Item::GatherPill9 as i64).await.unwrap());
    assert!(shop::get_listing(&pool, Item::GatherPill9 as i64).await.unwrap().is_none());

    shop::upsert_listing(&pool, Item::GatherPill9 as i64, "Tụ Khí Đan (Cửu Phẩm)", 123, "exp-pill")
        .await
        .unwrap();
    let listing = shop::get_listing(&pool, Item::GatherPill9 as i64).await.unwrap().unwrap();
    assert_eq!(listing.price, 123);
}
