// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Stored exchange rates. Conversion uses the closest on-or-before rate,
//! trying the direct pair, the reciprocal, then triangulation through a
//! common base. A gap is a typed failure, never a silent identity.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::parse_amount;

pub fn store_rate(
    conn: &Connection,
    date: NaiveDate,
    base: &str,
    quote: &str,
    rate: Decimal,
) -> LedgerResult<()> {
    if rate <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "rate {} must be positive",
            rate
        )));
    }
    let base = base.trim().to_uppercase();
    let quote = quote.trim().to_uppercase();
    if base.is_empty() || quote.is_empty() {
        return Err(LedgerError::InvalidInput(
            "rate currencies must not be empty".into(),
        ));
    }
    if base == quote {
        return Err(LedgerError::InvalidInput(format!(
            "base and quote are both {}",
            base
        )));
    }
    conn.execute(
        "INSERT OR REPLACE INTO rate(date, base, quote, rate) VALUES (?1, ?2, ?3, ?4)",
        params![date.to_string(), base, quote, rate.to_string()],
    )?;
    Ok(())
}

/// Convert `amount` from one currency to another using rates stored on or
/// before `date`.
pub fn convert_amount(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    from: &str,
    to: &str,
) -> LedgerResult<Decimal> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    if from == to {
        return Ok(amount);
    }
    if let Some(r) = find_rate(conn, date, &from, &to)? {
        return Ok(amount * r);
    }
    if let Some(r) = find_rate(conn, date, &to, &from)? {
        if !r.is_zero() {
            return Ok(amount / r);
        }
    }
    // Any base quoting both sides bridges the pair (fetched series are all
    // quoted against one base, so cross pairs land here).
    let mut stmt = conn.prepare(
        "SELECT base FROM rate WHERE quote=?1 AND date<=?3
         INTERSECT
         SELECT base FROM rate WHERE quote=?2 AND date<=?3
         ORDER BY base",
    )?;
    let hubs = stmt
        .query_map(params![&from, &to, date.to_string()], |r| {
            r.get::<_, String>(0)
        })?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    for hub in hubs {
        let to_from = find_rate(conn, date, &hub, &from)?;
        let to_to = find_rate(conn, date, &hub, &to)?;
        if let (Some(rf), Some(rt)) = (to_from, to_to) {
            if !rf.is_zero() {
                return Ok(amount / rf * rt);
            }
        }
    }
    Err(LedgerError::ConversionUnavailable { from, to })
}

fn find_rate(
    conn: &Connection,
    date: NaiveDate,
    base: &str,
    quote: &str,
) -> LedgerResult<Option<Decimal>> {
    let mut stmt = conn.prepare(
        "SELECT rate FROM rate WHERE base=?1 AND quote=?2 AND date<=?3 ORDER BY date DESC LIMIT 1",
    )?;
    let r: Option<String> = stmt
        .query_row(params![base, quote, date.to_string()], |r| r.get(0))
        .optional()?;
    match r {
        Some(s) => Ok(Some(parse_amount(&s)?)),
        None => Ok(None),
    }
}
