// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use florin::db;
use florin::error::LedgerError;
use florin::ledger::rates;
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

#[test]
fn direct_rate_applies() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::new(125, 2)).unwrap();

    let res =
        rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(8), "EUR", "USD").unwrap();
    assert_eq!(res, Decimal::from(10));
}

#[test]
fn lookup_takes_the_closest_rate_on_or_before() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::new(125, 2)).unwrap();
    rates::store_rate(&conn, day("2025-08-10"), "EUR", "USD", Decimal::new(110, 2)).unwrap();

    let early =
        rates::convert_amount(&conn, day("2025-08-05"), Decimal::from(8), "EUR", "USD").unwrap();
    assert_eq!(early, Decimal::from(10));

    let late =
        rates::convert_amount(&conn, day("2025-08-12"), Decimal::from(8), "EUR", "USD").unwrap();
    assert_eq!(late, Decimal::new(880, 2));
}

#[test]
fn reciprocal_covers_the_reverse_pair() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::new(125, 2)).unwrap();

    let res =
        rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(10), "USD", "EUR").unwrap();
    assert_eq!(res, Decimal::from(8));
}

#[test]
fn triangulation_bridges_through_a_common_base() {
    let conn = setup();
    // Both pairs quoted against USD; EUR->INR has no direct or reverse rate.
    rates::store_rate(&conn, day("2025-08-01"), "USD", "INR", Decimal::from(80)).unwrap();
    rates::store_rate(&conn, day("2025-08-01"), "USD", "EUR", Decimal::new(80, 2)).unwrap();

    let res =
        rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(8), "EUR", "INR").unwrap();
    // 8 EUR -> 10 USD -> 800 INR.
    assert_eq!(res, Decimal::from(800));
}

#[test]
fn missing_pair_is_a_typed_error() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::new(125, 2)).unwrap();

    let err = rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(5), "GBP", "JPY")
        .unwrap_err();
    match err {
        LedgerError::ConversionUnavailable { from, to } => {
            assert_eq!(from, "GBP");
            assert_eq!(to, "JPY");
        }
        other => panic!("expected conversion gap, got {:?}", other),
    }
}

#[test]
fn rates_dated_after_the_lookup_do_not_apply() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-10"), "EUR", "USD", Decimal::new(125, 2)).unwrap();

    let err = rates::convert_amount(&conn, day("2025-08-05"), Decimal::from(8), "EUR", "USD")
        .unwrap_err();
    assert!(matches!(err, LedgerError::ConversionUnavailable { .. }));
}

#[test]
fn same_currency_is_the_identity() {
    let conn = setup();
    let res =
        rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(5), "usd", "USD").unwrap();
    assert_eq!(res, Decimal::from(5));
}

#[test]
fn store_rate_validates_and_normalizes() {
    let conn = setup();
    let err = rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::ZERO).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    let err =
        rates::store_rate(&conn, day("2025-08-01"), "EUR", "eur", Decimal::from(1)).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));

    // Lower-case input lands upper-cased and converts both ways.
    rates::store_rate(&conn, day("2025-08-01"), "eur", "usd", Decimal::from(2)).unwrap();
    let res =
        rates::convert_amount(&conn, day("2025-08-15"), Decimal::from(3), "EUR", "USD").unwrap();
    assert_eq!(res, Decimal::from(6));
}

#[test]
fn restoring_the_same_day_replaces_the_rate() {
    let conn = setup();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::from(2)).unwrap();
    rates::store_rate(&conn, day("2025-08-01"), "EUR", "USD", Decimal::from(3)).unwrap();

    let res =
        rates::convert_amount(&conn, day("2025-08-01"), Decimal::from(4), "EUR", "USD").unwrap();
    assert_eq!(res, Decimal::from(12));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM rate", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
