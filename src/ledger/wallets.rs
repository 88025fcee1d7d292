// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wallet Ledger. A wallet's `amount` is the authoritative running balance,
//! mutated only by expense recording/reversal, transfers, and goal payouts.

use std::collections::BTreeMap;

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Direction, parse_amount, rates, sort_rows};
use crate::models::Wallet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletOrder {
    Name,
    /// Highest balance first.
    Balance,
    Created,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworthMode {
    ByCurrency,
    Converted { target: String },
}

#[derive(Debug, Clone, Serialize)]
pub enum Networth {
    ByCurrency(BTreeMap<String, Decimal>),
    Converted { currency: String, total: Decimal },
}

pub fn add_wallet(
    conn: &Connection,
    name: &str,
    opening: Decimal,
    currency: &str,
) -> LedgerResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "wallet name must not be empty".into(),
        ));
    }
    if opening < Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "opening balance {} must not be negative",
            opening
        )));
    }
    let currency = currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(LedgerError::InvalidInput(
            "wallet currency must not be empty".into(),
        ));
    }
    conn.execute(
        "INSERT INTO wallet(name, amount, currency) VALUES (?1, ?2, ?3)",
        params![name, opening.to_string(), currency],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_wallet_by_id(conn: &Connection, id: i64) -> LedgerResult<Wallet> {
    let row = conn
        .query_row(
            "SELECT id, name, amount, currency, created_at FROM wallet WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    match row {
        Some(parts) => wallet_from_parts(parts),
        None => Err(LedgerError::NotFound {
            entity: "wallet",
            id,
        }),
    }
}

pub fn get_all_wallets(conn: &Connection, order: WalletOrder) -> LedgerResult<Vec<Wallet>> {
    let mut stmt =
        conn.prepare("SELECT id, name, amount, currency, created_at FROM wallet ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(wallet_from_parts(row?)?);
    }
    match order {
        WalletOrder::Name => sort_rows(&mut out, |w| w.name.to_lowercase(), Direction::Asc),
        WalletOrder::Balance => sort_rows(&mut out, |w| w.amount, Direction::Desc),
        WalletOrder::Created => sort_rows(&mut out, |w| w.created_at.clone(), Direction::Asc),
    }
    Ok(out)
}

pub fn rename_wallet(conn: &Connection, id: i64, new_name: &str) -> LedgerResult<()> {
    let new_name = new_name.trim();
    if new_name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "wallet name must not be empty".into(),
        ));
    }
    let n = conn.execute(
        "UPDATE wallet SET name=?1 WHERE id=?2",
        params![new_name, id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            entity: "wallet",
            id,
        });
    }
    Ok(())
}

/// Move `amount` between two wallets of the same currency. Both balance
/// updates land in one transaction; any failure rolls the whole move back.
pub fn transfer_money(
    conn: &mut Connection,
    source_id: i64,
    dest_id: i64,
    amount: Decimal,
) -> LedgerResult<()> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "transfer amount {} must be positive",
            amount
        )));
    }
    if source_id == dest_id {
        return Err(LedgerError::InvalidInput(
            "source and destination wallets are the same".into(),
        ));
    }
    let tx = conn.transaction()?;
    let source = get_wallet_by_id(&tx, source_id)?;
    let dest = get_wallet_by_id(&tx, dest_id)?;
    if source.currency != dest.currency {
        return Err(LedgerError::CurrencyMismatch(source.currency, dest.currency));
    }
    if source.amount < amount {
        return Err(LedgerError::InsufficientFunds {
            wallet: source_id,
            available: source.amount,
            required: amount,
        });
    }
    tx.execute(
        "UPDATE wallet SET amount=?1 WHERE id=?2",
        params![(source.amount - amount).to_string(), source_id],
    )?;
    tx.execute(
        "UPDATE wallet SET amount=?1 WHERE id=?2",
        params![(dest.amount + amount).to_string(), dest_id],
    )?;
    tx.commit()?;
    Ok(())
}

/// Net worth across all wallets. `Converted` uses stored rates as of today
/// and fails with `ConversionUnavailable` on any gap rather than mixing
/// unconverted balances into the total.
pub fn calc_networth(conn: &Connection, mode: NetworthMode) -> LedgerResult<Networth> {
    let wallets = get_all_wallets(conn, WalletOrder::Name)?;
    match mode {
        NetworthMode::ByCurrency => {
            let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
            for w in wallets {
                *totals.entry(w.currency).or_insert(Decimal::ZERO) += w.amount;
            }
            Ok(Networth::ByCurrency(totals))
        }
        NetworthMode::Converted { target } => {
            let target = target.trim().to_uppercase();
            if target.is_empty() {
                return Err(LedgerError::InvalidInput(
                    "target currency must not be empty".into(),
                ));
            }
            let today = Local::now().date_naive();
            let mut total = Decimal::ZERO;
            for w in &wallets {
                total += rates::convert_amount(conn, today, w.amount, &w.currency, &target)?;
            }
            Ok(Networth::Converted {
                currency: target,
                total,
            })
        }
    }
}

fn wallet_from_parts(
    (id, name, amount, currency, created_at): (i64, String, String, String, String),
) -> LedgerResult<Wallet> {
    Ok(Wallet {
        id,
        name,
        amount: parse_amount(&amount)?,
        currency,
        created_at,
    })
}
