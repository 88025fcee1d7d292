// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use florin::error::LedgerError;
use florin::ledger::categories;
use florin::ledger::expenses::{self, ExpenseOrder, NewExpense};
use florin::ledger::wallets;
use florin::models::CategoryKind;
use florin::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(name: &str, cost: i64, date: &str, wallet_id: Option<i64>) -> NewExpense {
    NewExpense {
        name: name.into(),
        cost: Decimal::from(cost),
        date: day(date),
        category_id: None,
        wallet_id,
        description: None,
    }
}

#[test]
fn recording_debits_the_paying_wallet() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();

    let id = expenses::record_expense(&mut conn, &expense("Groceries", 30, "2025-08-01", Some(w)))
        .unwrap();

    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(70)
    );
    let e = expenses::get_expense_by_id(&conn, id).unwrap();
    assert_eq!(e.cost, Decimal::from(30));
    assert!(!e.reversed);
}

#[test]
fn recording_without_a_wallet_touches_no_balance() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();

    expenses::record_expense(&mut conn, &expense("Book", 12, "2025-08-01", None)).unwrap();

    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(100)
    );
}

#[test]
fn recording_rejects_bad_input() {
    let mut conn = setup();
    let err =
        expenses::record_expense(&mut conn, &expense("Free", 0, "2025-08-01", None)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    let err =
        expenses::record_expense(&mut conn, &expense("  ", 5, "2025-08-01", None)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn recording_against_missing_references_inserts_nothing() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();

    let mut e = expense("Ghost", 5, "2025-08-01", Some(w));
    e.category_id = Some(99);
    let err = expenses::record_expense(&mut conn, &e).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    let err =
        expenses::record_expense(&mut conn, &expense("Ghost", 5, "2025-08-01", Some(99)))
            .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(100)
    );
}

#[test]
fn overspending_drives_the_balance_negative() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(10), "EUR").unwrap();

    expenses::record_expense(&mut conn, &expense("Repair", 25, "2025-08-01", Some(w))).unwrap();

    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(-15)
    );
}

#[test]
fn undo_restores_the_balance_and_voids_the_row() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();
    let id = expenses::record_expense(&mut conn, &expense("Groceries", 30, "2025-08-01", Some(w)))
        .unwrap();

    expenses::redo_expense(&mut conn, id).unwrap();

    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(100)
    );
    // The row survives for audit but drops out of listings.
    assert!(expenses::get_expense_by_id(&conn, id).unwrap().reversed);
    assert!(expenses::get_all_expenses(&conn).unwrap().is_empty());
    let all = expenses::list_expenses(&conn, ExpenseOrder::Id, true).unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].reversed);
}

#[test]
fn undo_twice_is_refused() {
    let mut conn = setup();
    let w = wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();
    let id = expenses::record_expense(&mut conn, &expense("Groceries", 30, "2025-08-01", Some(w)))
        .unwrap();

    expenses::redo_expense(&mut conn, id).unwrap();
    let err = expenses::redo_expense(&mut conn, id).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyReversed(_)));

    // The second attempt must not credit the wallet again.
    assert_eq!(
        wallets::get_wallet_by_id(&conn, w).unwrap().amount,
        Decimal::from(100)
    );
}

#[test]
fn undo_missing_expense_is_not_found() {
    let mut conn = setup();
    let err = expenses::redo_expense(&mut conn, 42).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn range_query_validates_and_sorts() {
    let mut conn = setup();
    expenses::record_expense(&mut conn, &expense("c", 3, "2025-08-10", None)).unwrap();
    expenses::record_expense(&mut conn, &expense("a", 1, "2025-08-01", None)).unwrap();
    expenses::record_expense(&mut conn, &expense("b", 2, "2025-08-05", None)).unwrap();
    expenses::record_expense(&mut conn, &expense("d", 4, "2025-09-01", None)).unwrap();

    let rows = expenses::expenses_between(&conn, day("2025-08-01"), day("2025-08-31")).unwrap();
    let names: Vec<&str> = rows.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b", "c"]);

    let err =
        expenses::expenses_between(&conn, day("2025-09-01"), day("2025-08-01")).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
}

#[test]
fn by_category_requires_the_category() {
    let mut conn = setup();
    let food = categories::add_category(&conn, "Food", None, CategoryKind::Normal, "EUR").unwrap();
    let mut e = expense("Groceries", 5, "2025-08-01", None);
    e.category_id = Some(food);
    expenses::record_expense(&mut conn, &e).unwrap();
    expenses::record_expense(&mut conn, &expense("Bus", 2, "2025-08-01", None)).unwrap();

    let rows = expenses::expenses_by_category(&conn, food).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Groceries");

    let err = expenses::expenses_by_category(&conn, 99).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { .. }));
}

#[test]
fn listing_orders_are_applied() {
    let mut conn = setup();
    expenses::record_expense(&mut conn, &expense("a", 10, "2025-08-01", None)).unwrap();
    expenses::record_expense(&mut conn, &expense("b", 50, "2025-08-03", None)).unwrap();
    expenses::record_expense(&mut conn, &expense("c", 20, "2025-08-02", None)).unwrap();

    let rows = expenses::list_expenses(&conn, ExpenseOrder::CostDesc, false).unwrap();
    let costs: Vec<Decimal> = rows.iter().map(|e| e.cost).collect();
    assert_eq!(
        costs,
        [Decimal::from(50), Decimal::from(20), Decimal::from(10)]
    );

    let rows = expenses::list_expenses(&conn, ExpenseOrder::DateDesc, false).unwrap();
    let names: Vec<&str> = rows.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["b", "c", "a"]);
}

#[test]
fn cli_add_and_undo_round_trip() {
    let mut conn = setup();
    wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();
    categories::add_category(&conn, "Food", None, CategoryKind::Normal, "EUR").unwrap();

    let matches = cli::build_cli().get_matches_from([
        "florin", "expense", "add", "--name", "Groceries", "--cost", "12.50", "--date",
        "2025-08-01", "--category", "Food", "--wallet", "Cash", "--note", "weekly run",
    ]);
    if let Some(("expense", em)) = matches.subcommand() {
        commands::expenses::handle(&mut conn, em).unwrap();
    } else {
        panic!("no expense subcommand");
    }

    assert_eq!(
        wallets::get_wallet_by_id(&conn, 1).unwrap().amount,
        Decimal::new(8750, 2)
    );
    let e = expenses::get_expense_by_id(&conn, 1).unwrap();
    assert_eq!(e.description.as_deref(), Some("weekly run"));
    assert_eq!(e.category_id, Some(1));

    let matches =
        cli::build_cli().get_matches_from(["florin", "expense", "undo", "--id", "1"]);
    if let Some(("expense", em)) = matches.subcommand() {
        commands::expenses::handle(&mut conn, em).unwrap();
    } else {
        panic!("no expense subcommand");
    }

    assert_eq!(
        wallets::get_wallet_by_id(&conn, 1).unwrap().amount,
        Decimal::from(100)
    );
}
