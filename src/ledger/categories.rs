// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::parse_amount;
use crate::models::{Category, CategoryKind};

pub fn add_category(
    conn: &Connection,
    name: &str,
    limit_amount: Option<Decimal>,
    kind: CategoryKind,
    currency: &str,
) -> LedgerResult<i64> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "category name must not be empty".into(),
        ));
    }
    if let Some(limit) = limit_amount {
        if limit <= Decimal::ZERO {
            return Err(LedgerError::InvalidInput(format!(
                "monthly limit {} must be positive",
                limit
            )));
        }
    }
    let currency = currency.trim().to_uppercase();
    conn.execute(
        "INSERT INTO category(name, limit_amount, kind, currency) VALUES (?1, ?2, ?3, ?4)",
        params![
            name,
            limit_amount.map(|l| l.to_string()),
            kind.as_i64(),
            currency
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_category_by_id(conn: &Connection, id: i64) -> LedgerResult<Category> {
    let row = conn
        .query_row(
            "SELECT id, name, limit_amount, kind, currency FROM category WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, i64>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, Option<String>>(2)?,
                    r.get::<_, i64>(3)?,
                    r.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    match row {
        Some(parts) => category_from_parts(parts),
        None => Err(LedgerError::NotFound {
            entity: "category",
            id,
        }),
    }
}

pub fn get_all_categories(conn: &Connection) -> LedgerResult<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, limit_amount, kind, currency FROM category ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(category_from_parts(row?)?);
    }
    Ok(out)
}

/// Deleting a category detaches its expenses and goals (schema says
/// ON DELETE SET NULL) rather than leaving dangling references.
pub fn remove_category(conn: &Connection, id: i64) -> LedgerResult<()> {
    let n = conn.execute("DELETE FROM category WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::NotFound {
            entity: "category",
            id,
        });
    }
    Ok(())
}

/// Existence check shared by every writer that takes a `category_id`.
pub(crate) fn ensure_exists(conn: &Connection, id: i64) -> LedgerResult<()> {
    let found: Option<i64> = conn
        .query_row("SELECT id FROM category WHERE id=?1", params![id], |r| {
            r.get(0)
        })
        .optional()?;
    if found.is_none() {
        return Err(LedgerError::NotFound {
            entity: "category",
            id,
        });
    }
    Ok(())
}

fn category_from_parts(
    (id, name, limit_amount, kind, currency): (i64, String, Option<String>, i64, String),
) -> LedgerResult<Category> {
    let limit_amount = match limit_amount {
        Some(s) => Some(parse_amount(&s)?),
        None => None,
    };
    Ok(Category {
        id,
        name,
        limit_amount,
        kind: CategoryKind::from_i64(kind),
        currency,
    })
}
