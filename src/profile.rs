// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The single local profile row (lowest id wins if several exist). Updates
//! are partial: fields left `None` keep their stored value. Password hashes
//! are stored opaquely for an external auth layer; nothing here hashes.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::analytics::valid_month_key;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{parse_amount, wallets};
use crate::models::Profile;

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_path: Option<String>,
    pub monthly_budget: Option<Decimal>,
    pub main_wallet_id: Option<i64>,
    pub theme: Option<String>,
    pub password_hash: Option<String>,
}

pub fn get_profile(conn: &Connection) -> LedgerResult<Option<Profile>> {
    let row = conn
        .query_row(
            "SELECT id, name, photo_path, monthly_budget, main_wallet_id, skip_months,
                    theme, password_hash, created_at, last_login
             FROM profile ORDER BY id LIMIT 1",
            [],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, Option<i64>>(4)?,
                    r.get::<_, String>(5)?,
                    r.get::<_, String>(6)?,
                    r.get::<_, Option<String>>(7)?,
                    r.get::<_, String>(8)?,
                    r.get::<_, Option<String>>(9)?,
                ))
            },
        )
        .optional()?;
    let Some((
        id,
        name,
        photo_path,
        monthly_budget,
        main_wallet_id,
        skip_months,
        theme,
        password_hash,
        created_at,
        last_login,
    )) = row
    else {
        return Ok(None);
    };
    let skip_months: Vec<String> = serde_json::from_str(&skip_months).map_err(|_| {
        LedgerError::InvalidInput(format!("unreadable skip months '{}'", skip_months))
    })?;
    Ok(Some(Profile {
        id,
        name,
        photo_path,
        monthly_budget: parse_amount(&monthly_budget)?,
        main_wallet_id,
        skip_months,
        theme,
        password_hash,
        created_at,
        last_login,
    }))
}

/// Apply a partial update, creating the row on first use. Runs as a single
/// statement so a failure leaves the profile as it was.
pub fn upsert_profile(conn: &Connection, u: &ProfileUpdate) -> LedgerResult<Profile> {
    if let Some(name) = &u.name {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                "profile name must not be empty".into(),
            ));
        }
    }
    if let Some(budget) = u.monthly_budget {
        if budget < Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "monthly budget {} must not be negative",
                budget
            )));
        }
    }
    if let Some(wallet_id) = u.main_wallet_id {
        wallets::get_wallet_by_id(conn, wallet_id)?;
    }

    match get_profile(conn)? {
        Some(p) => {
            let name = match &u.name {
                Some(n) => n.trim().to_string(),
                None => p.name,
            };
            conn.execute(
                "UPDATE profile SET name=?1, photo_path=?2, monthly_budget=?3,
                        main_wallet_id=?4, theme=?5, password_hash=?6
                 WHERE id=?7",
                params![
                    name,
                    u.photo_path.clone().or(p.photo_path),
                    u.monthly_budget.unwrap_or(p.monthly_budget).to_string(),
                    u.main_wallet_id.or(p.main_wallet_id),
                    u.theme.clone().unwrap_or(p.theme),
                    u.password_hash.clone().or(p.password_hash),
                    p.id
                ],
            )?;
        }
        None => {
            conn.execute(
                "INSERT INTO profile(name, photo_path, monthly_budget, main_wallet_id,
                        theme, password_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    u.name.as_deref().map(str::trim).unwrap_or("me"),
                    u.photo_path,
                    u.monthly_budget.unwrap_or(Decimal::ZERO).to_string(),
                    u.main_wallet_id,
                    u.theme.as_deref().unwrap_or("dark"),
                    u.password_hash
                ],
            )?;
        }
    }
    get_profile(conn)?.ok_or_else(|| LedgerError::NotFound {
        entity: "profile",
        id: 0,
    })
}

pub fn add_skip_month(conn: &Connection, month: &str) -> LedgerResult<Vec<String>> {
    if !valid_month_key(month) {
        return Err(LedgerError::InvalidInput(format!(
            "invalid month '{}', expected YYYY-MM",
            month
        )));
    }
    let profile = upsert_profile(conn, &ProfileUpdate::default())?;
    let mut months = profile.skip_months;
    if !months.iter().any(|m| m == month) {
        months.push(month.to_string());
        months.sort();
        save_skip_months(conn, profile.id, &months)?;
    }
    Ok(months)
}

pub fn remove_skip_month(conn: &Connection, month: &str) -> LedgerResult<Vec<String>> {
    if !valid_month_key(month) {
        return Err(LedgerError::InvalidInput(format!(
            "invalid month '{}', expected YYYY-MM",
            month
        )));
    }
    let profile = upsert_profile(conn, &ProfileUpdate::default())?;
    let mut months = profile.skip_months;
    let before = months.len();
    months.retain(|m| m != month);
    if months.len() == before {
        return Err(LedgerError::InvalidInput(format!(
            "{} is not in the skip list",
            month
        )));
    }
    save_skip_months(conn, profile.id, &months)?;
    Ok(months)
}

pub fn touch_last_login(conn: &Connection) -> LedgerResult<()> {
    let profile = upsert_profile(conn, &ProfileUpdate::default())?;
    conn.execute(
        "UPDATE profile SET last_login=datetime('now') WHERE id=?1",
        params![profile.id],
    )?;
    Ok(())
}

fn save_skip_months(conn: &Connection, id: i64, months: &[String]) -> LedgerResult<()> {
    let encoded = serde_json::to_string(months)
        .map_err(|_| LedgerError::InvalidInput("unencodable skip months".into()))?;
    conn.execute(
        "UPDATE profile SET skip_months=?1 WHERE id=?2",
        params![encoded, id],
    )?;
    Ok(())
}
