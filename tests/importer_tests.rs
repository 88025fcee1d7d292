// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use florin::ledger::{categories, wallets};
use florin::models::CategoryKind;
use florin::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use tempfile::NamedTempFile;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    wallets::add_wallet(&conn, "Cash", Decimal::from(100), "EUR").unwrap();
    categories::add_category(&conn, "Food", None, CategoryKind::Normal, "EUR").unwrap();
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let matches =
        cli::build_cli().get_matches_from(["florin", "import", "expenses", "--path", path]);
    if let Some(("import", im)) = matches.subcommand() {
        commands::importer::handle(conn, im)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_goes_through_the_expense_engine() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,cost,date,category,wallet,description\n\
         Groceries,12.50,2025-08-01,Food,Cash,weekly run\n\
         Bus,7.50,2025-08-02,,Cash,"
    )
    .unwrap();
    file.flush().unwrap();

    run_import(&mut conn, file.path().to_str().unwrap()).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 2);
    // Both rows debited the wallet just like `expense add` would.
    assert_eq!(
        wallets::get_wallet_by_id(&conn, 1).unwrap().amount,
        Decimal::from(80)
    );
    let (category_id, description): (Option<i64>, Option<String>) = conn
        .query_row(
            "SELECT category_id, description FROM expense WHERE name='Groceries'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(category_id, Some(1));
    assert_eq!(description.as_deref(), Some("weekly run"));
}

#[test]
fn import_stops_at_the_first_bad_row_keeping_earlier_ones() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,cost,date,category,wallet,description\n\
         Groceries,5.00,2025-08-01,Food,Cash,\n\
         Broken,abc,2025-08-02,,Cash,\n\
         Never,7.00,2025-08-03,,Cash,"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Invalid cost 'abc' on line 3"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(
        wallets::get_wallet_by_id(&conn, 1).unwrap().amount,
        Decimal::from(95)
    );
}

#[test]
fn import_points_at_the_unresolvable_line() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,cost,date,category,wallet,description\n\
         Groceries,5.00,2025-08-01,Ghost,Cash,"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("Line 2"));
    assert!(chain.contains("Category 'Ghost' not found"));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn import_trims_the_cli_path_argument() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,cost,date,category,wallet,description\nCoffee,2.00,2025-08-01,,,"
    )
    .unwrap();
    file.flush().unwrap();

    let padded = format!("  {}  ", file.path().to_str().unwrap());
    run_import(&mut conn, &padded).unwrap();

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn import_rejects_an_invalid_date() {
    let mut conn = setup();

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "name,cost,date,category,wallet,description\nCoffee,2.00,2025-13-01,,,"
    )
    .unwrap();
    file.flush().unwrap();

    let err = run_import(&mut conn, file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Invalid date '2025-13-01' on line 2"));
}
