// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the ledger engine and the analytics layer.
//!
//! Validation failures are raised before any row is touched; failures inside
//! a compound mutation abort the enclosing transaction, so callers never see
//! a half-applied transfer, expense, or goal payout.

use rust_decimal::Decimal;
use thiserror::Error;

/// The typed failure surface of the core. Command handlers bubble these up
/// through `anyhow`, which preserves the message for the user.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A referenced wallet, category, expense, or goal does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A debit would need more money than the wallet holds.
    #[error("wallet {wallet} holds {available} but {required} is required")]
    InsufficientFunds {
        wallet: i64,
        available: Decimal,
        required: Decimal,
    },

    /// Rejected before any mutation: non-positive amount, malformed month
    /// label, out-of-range ordering option, and the like.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The goal already went through its one-time payout.
    #[error("goal {0} is already completed")]
    AlreadyCompleted(i64),

    /// The expense was already reversed; reversing again would double-credit.
    #[error("expense {0} is already reversed")]
    AlreadyReversed(i64),

    /// A statistic was requested over an empty set. Rendered as a "no data"
    /// state by the presentation layer, never as a crash.
    #[error("no data: {0}")]
    NoData(String),

    /// No stored exchange rate covers the requested pair on or before the
    /// requested date.
    #[error("no exchange rate available for {from}->{to}")]
    ConversionUnavailable { from: String, to: String },

    /// Money cannot move between two currencies without an explicit
    /// conversion step.
    #[error("cannot mix {0} and {1} without conversion")]
    CurrencyMismatch(String, String),

    #[error(transparent)]
    Db(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
