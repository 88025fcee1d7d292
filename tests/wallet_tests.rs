// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use florin::error::LedgerError;
use florin::ledger::rates;
use florin::ledger::wallets::{self, Networth, NetworthMode, WalletOrder};
use florin::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn add_wallet_normalizes_currency() {
    let conn = setup();
    let id = wallets::add_wallet(&conn, " Cash ", Decimal::from(100), "eur").unwrap();
    let w = wallets::get_wallet_by_id(&conn, id).unwrap();
    assert_eq!(w.name, "Cash");
    assert_eq!(w.amount, Decimal::from(100));
    assert_eq!(w.currency, "EUR");
}

#[test]
fn add_wallet_rejects_bad_input() {
    let conn = setup();
    let err = wallets::add_wallet(&conn, "  ", Decimal::ZERO, "EUR").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    let err = wallets::add_wallet(&conn, "Cash", Decimal::from(-1), "EUR").unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn rename_wallet_updates_row() {
    let conn = setup();
    let id = wallets::add_wallet(&conn, "Old", Decimal::ZERO, "EUR").unwrap();
    wallets::rename_wallet(&conn, id, "New").unwrap();
    assert_eq!(wallets::get_wallet_by_id(&conn, id).unwrap().name, "New");

    let err = wallets::rename_wallet(&conn, 99, "Ghost").unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn transfer_moves_money_between_wallets() {
    let mut conn = setup();
    let a = wallets::add_wallet(&conn, "A", Decimal::from(100), "EUR").unwrap();
    let b = wallets::add_wallet(&conn, "B", Decimal::ZERO, "EUR").unwrap();

    wallets::transfer_money(&mut conn, a, b, Decimal::from(60)).unwrap();

    assert_eq!(
        wallets::get_wallet_by_id(&conn, a).unwrap().amount,
        Decimal::from(40)
    );
    assert_eq!(
        wallets::get_wallet_by_id(&conn, b).unwrap().amount,
        Decimal::from(60)
    );
}

#[test]
fn transfer_rejects_insufficient_funds_and_rolls_back() {
    let mut conn = setup();
    let a = wallets::add_wallet(&conn, "A", Decimal::from(100), "EUR").unwrap();
    let b = wallets::add_wallet(&conn, "B", Decimal::ZERO, "EUR").unwrap();

    let err = wallets::transfer_money(&mut conn, a, b, Decimal::from(500)).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    assert_eq!(
        wallets::get_wallet_by_id(&conn, a).unwrap().amount,
        Decimal::from(100)
    );
    assert_eq!(
        wallets::get_wallet_by_id(&conn, b).unwrap().amount,
        Decimal::ZERO
    );
}

#[test]
fn transfer_rejects_currency_mismatch() {
    let mut conn = setup();
    let a = wallets::add_wallet(&conn, "A", Decimal::from(100), "EUR").unwrap();
    let b = wallets::add_wallet(&conn, "B", Decimal::ZERO, "USD").unwrap();

    let err = wallets::transfer_money(&mut conn, a, b, Decimal::from(10)).unwrap_err();
    assert!(matches!(err, LedgerError::CurrencyMismatch(_, _)));
}

#[test]
fn transfer_rejects_degenerate_input() {
    let mut conn = setup();
    let a = wallets::add_wallet(&conn, "A", Decimal::from(100), "EUR").unwrap();

    let err = wallets::transfer_money(&mut conn, a, a, Decimal::from(10)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    let err = wallets::transfer_money(&mut conn, a, 2, Decimal::ZERO).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    let err = wallets::transfer_money(&mut conn, a, 99, Decimal::from(10)).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn networth_groups_by_currency() {
    let conn = setup();
    wallets::add_wallet(&conn, "Cash", Decimal::from(150), "EUR").unwrap();
    wallets::add_wallet(&conn, "Bank", Decimal::from(50), "EUR").unwrap();
    wallets::add_wallet(&conn, "Travel", Decimal::from(50), "USD").unwrap();

    match wallets::calc_networth(&conn, NetworthMode::ByCurrency).unwrap() {
        Networth::ByCurrency(totals) => {
            assert_eq!(totals.len(), 2);
            assert_eq!(totals.get("EUR").copied(), Some(Decimal::from(200)));
            assert_eq!(totals.get("USD").copied(), Some(Decimal::from(50)));
        }
        Networth::Converted { .. } => panic!("expected by-currency breakdown"),
    }
}

#[test]
fn networth_converts_through_stored_rates() {
    let conn = setup();
    wallets::add_wallet(&conn, "Cash", Decimal::from(200), "EUR").unwrap();
    wallets::add_wallet(&conn, "Travel", Decimal::from(50), "USD").unwrap();
    // EUR->USD = 2, so 50 USD folds back to 25 EUR.
    rates::store_rate(
        &conn,
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        "EUR",
        "USD",
        Decimal::from(2),
    )
    .unwrap();

    match wallets::calc_networth(
        &conn,
        NetworthMode::Converted {
            target: "eur".into(),
        },
    )
    .unwrap()
    {
        Networth::Converted { currency, total } => {
            assert_eq!(currency, "EUR");
            assert_eq!(total, Decimal::from(225));
        }
        Networth::ByCurrency(_) => panic!("expected converted total"),
    }
}

#[test]
fn networth_conversion_gap_is_an_error() {
    let conn = setup();
    wallets::add_wallet(&conn, "Offshore", Decimal::from(10), "GBP").unwrap();

    let err = wallets::calc_networth(
        &conn,
        NetworthMode::Converted {
            target: "EUR".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::ConversionUnavailable { .. }));
}

#[test]
fn listing_orders_are_applied() {
    let conn = setup();
    wallets::add_wallet(&conn, "bravo", Decimal::from(10), "EUR").unwrap();
    wallets::add_wallet(&conn, "Alpha", Decimal::from(30), "EUR").unwrap();
    wallets::add_wallet(&conn, "charlie", Decimal::from(20), "EUR").unwrap();

    let by_name = wallets::get_all_wallets(&conn, WalletOrder::Name).unwrap();
    let names: Vec<&str> = by_name.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, ["Alpha", "bravo", "charlie"]);

    let by_balance = wallets::get_all_wallets(&conn, WalletOrder::Balance).unwrap();
    let amounts: Vec<Decimal> = by_balance.iter().map(|w| w.amount).collect();
    assert_eq!(
        amounts,
        [Decimal::from(30), Decimal::from(20), Decimal::from(10)]
    );
}

#[test]
fn cli_add_and_transfer_round_trip() {
    let mut conn = setup();

    for args in [
        ["florin", "wallet", "add", "--name", "Cash", "--opening", "25.50", "--currency", "eur"],
        ["florin", "wallet", "add", "--name", "Bank", "--opening", "10.00", "--currency", "EUR"],
    ] {
        let matches = cli::build_cli().get_matches_from(args);
        if let Some(("wallet", wm)) = matches.subcommand() {
            commands::wallets::handle(&mut conn, wm).unwrap();
        } else {
            panic!("no wallet subcommand");
        }
    }

    let matches = cli::build_cli().get_matches_from([
        "florin", "wallet", "transfer", "--from", "Cash", "--to", "Bank", "--amount", "5.50",
    ]);
    if let Some(("wallet", wm)) = matches.subcommand() {
        commands::wallets::handle(&mut conn, wm).unwrap();
    } else {
        panic!("no wallet subcommand");
    }

    let cash = wallets::get_wallet_by_id(&conn, 1).unwrap();
    let bank = wallets::get_wallet_by_id(&conn, 2).unwrap();
    assert_eq!(cash.amount, Decimal::new(2000, 2));
    assert_eq!(bank.amount, Decimal::new(1550, 2));
    assert_eq!(cash.currency, "EUR");
}
