// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: i64,
    pub name: String,
    /// Authoritative running balance: every credit and debit goes through
    /// the ledger, never through a direct field edit.
    pub amount: Decimal,
    pub currency: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Normal,
    /// Fixed recurring cost (rent, memberships); analytics can exclude these.
    Fixed,
}

impl CategoryKind {
    pub fn as_i64(self) -> i64 {
        match self {
            CategoryKind::Normal => 0,
            CategoryKind::Fixed => 1,
        }
    }

    pub fn from_i64(v: i64) -> Self {
        if v == 1 {
            CategoryKind::Fixed
        } else {
            CategoryKind::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Optional monthly spending limit in the category's currency.
    pub limit_amount: Option<Decimal>,
    pub kind: CategoryKind,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub name: String,
    pub category_id: Option<i64>,
    pub cost: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub wallet_id: Option<i64>,
    /// Voided by `redo_expense`; kept for audit, excluded from listings and
    /// analytics.
    pub reversed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub amount_to_reach: Decimal,
    pub amount_reached: Decimal,
    pub category_id: Option<i64>,
    pub currency: String,
    pub completed: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub photo_path: Option<String>,
    pub monthly_budget: Decimal,
    pub main_wallet_id: Option<i64>,
    /// `YYYY-MM` keys excluded from analytics aggregation windows.
    pub skip_months: Vec<String>,
    pub theme: String,
    /// Stored verbatim; hashing and checking belong to the auth collaborator.
    pub password_hash: Option<String>,
    pub created_at: String,
    pub last_login: Option<String>,
}
