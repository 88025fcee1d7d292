// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The consistency engine: wallets, categories, expenses, goals, and stored
//! exchange rates over a single SQLite connection. Every mutation validates
//! its inputs before touching a row; anything that moves two rows together
//! runs inside one transaction.

pub mod categories;
pub mod expenses;
pub mod goals;
pub mod rates;
pub mod wallets;

use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// The one sort utility behind every listing order. Entity-specific order
/// enums reduce to a key selector plus a direction over this.
pub fn sort_rows<T, K, F>(rows: &mut [T], key: F, dir: Direction)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    rows.sort_by(|a, b| {
        let ord = key(a).cmp(&key(b));
        match dir {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}

/// Amounts are stored as TEXT and parsed on read.
pub(crate) fn parse_amount(s: &str) -> LedgerResult<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::InvalidInput(format!("unreadable amount '{}'", s)))
}
