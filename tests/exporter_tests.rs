// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use florin::ledger::expenses::{self, NewExpense};
use florin::ledger::{categories, goals, wallets};
use florin::models::CategoryKind;
use florin::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use tempfile::tempdir;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn seed_expenses(conn: &mut Connection) {
    wallets::add_wallet(conn, "Cash", Decimal::from(100), "EUR").unwrap();
    categories::add_category(conn, "Food", None, CategoryKind::Normal, "EUR").unwrap();
    for (name, cost, date) in [("Groceries", "12.50", "2025-08-01"), ("Bus", "7.50", "2025-08-02")]
    {
        expenses::record_expense(
            conn,
            &NewExpense {
                name: name.into(),
                cost: cost.parse().unwrap(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                category_id: Some(1),
                wallet_id: Some(1),
                description: None,
            },
        )
        .unwrap();
    }
}

fn run(conn: &mut Connection, args: &[&str]) {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("export", m)) => commands::exporter::handle(conn, m).unwrap(),
        Some(("import", m)) => commands::importer::handle(conn, m).unwrap(),
        _ => panic!("unexpected subcommand"),
    }
}

#[test]
fn exported_csv_can_be_imported_back() {
    let mut conn = setup();
    seed_expenses(&mut conn);

    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    let out_str = out.to_string_lossy().to_string();
    run(
        &mut conn,
        &["florin", "export", "expenses", "--format", "csv", "--out", &out_str],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(contents.starts_with("name,cost,date,category,wallet,description"));

    // A fresh ledger with the same names accepts the file as-is.
    let mut fresh = setup();
    wallets::add_wallet(&fresh, "Cash", Decimal::from(50), "EUR").unwrap();
    categories::add_category(&fresh, "Food", None, CategoryKind::Normal, "EUR").unwrap();
    run(&mut fresh, &["florin", "import", "expenses", "--path", &out_str]);

    let count: i64 = fresh
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
    assert_eq!(
        wallets::get_wallet_by_id(&fresh, 1).unwrap().amount,
        Decimal::from(30)
    );
}

#[test]
fn exported_json_carries_resolved_names() {
    let mut conn = setup();
    seed_expenses(&mut conn);

    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.json");
    let out_str = out.to_string_lossy().to_string();
    run(
        &mut conn,
        &["florin", "export", "expenses", "--format", "json", "--out", &out_str],
    );

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Groceries");
    assert_eq!(rows[0]["cost"], "12.50");
    assert_eq!(rows[0]["category"], "Food");
    assert_eq!(rows[0]["wallet"], "Cash");
    assert_eq!(rows[0]["reversed"], false);
}

#[test]
fn reversed_expenses_stay_out_of_exports() {
    let mut conn = setup();
    seed_expenses(&mut conn);
    expenses::redo_expense(&mut conn, 1).unwrap();

    let dir = tempdir().unwrap();
    let out = dir.path().join("expenses.csv");
    let out_str = out.to_string_lossy().to_string();
    run(
        &mut conn,
        &["florin", "export", "expenses", "--format", "csv", "--out", &out_str],
    );

    let contents = std::fs::read_to_string(&out).unwrap();
    assert!(!contents.contains("Groceries"));
    assert!(contents.contains("Bus"));
}

#[test]
fn wallet_and_goal_exports_write_their_headers() {
    let mut conn = setup();
    wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();
    goals::add_goal(
        &conn,
        &goals::NewGoal {
            name: "Laptop".into(),
            target: Decimal::from(800),
            category_id: None,
            currency: "EUR".into(),
            start_date: None,
        },
    )
    .unwrap();

    let dir = tempdir().unwrap();
    let wallets_out = dir.path().join("wallets.csv");
    let goals_out = dir.path().join("goals.csv");
    let wallets_str = wallets_out.to_string_lossy().to_string();
    let goals_str = goals_out.to_string_lossy().to_string();
    run(
        &mut conn,
        &["florin", "export", "wallets", "--out", &wallets_str],
    );
    run(&mut conn, &["florin", "export", "goals", "--out", &goals_str]);

    let w = std::fs::read_to_string(&wallets_out).unwrap();
    assert!(w.starts_with("name,balance,currency,created_at"));
    assert!(w.contains("Cash,100,EUR"));

    let g = std::fs::read_to_string(&goals_out).unwrap();
    assert!(g.starts_with("name,target,reached,currency,completed,start_date,end_date"));
    assert!(g.contains("Laptop,800,0,EUR,no"));
}
