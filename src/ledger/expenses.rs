// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expense Engine. Recording debits the paying wallet and inserting the row
//! happen in one transaction; reversal credits the wallet back and marks the
//! row void instead of deleting it, so a second reversal can be refused.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Direction, categories, parse_amount, sort_rows, wallets};
use crate::models::Expense;

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub name: String,
    pub cost: Decimal,
    pub date: NaiveDate,
    pub category_id: Option<i64>,
    pub wallet_id: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseOrder {
    Id,
    Category,
    CostDesc,
    CostAsc,
    DateDesc,
}

/// Joined listing row (category and wallet resolved to names).
#[derive(Debug, Clone, Serialize)]
pub struct ExpenseRow {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub cost: Decimal,
    pub date: NaiveDate,
    pub wallet: Option<String>,
    pub description: Option<String>,
    pub reversed: bool,
}

pub fn record_expense(conn: &mut Connection, e: &NewExpense) -> LedgerResult<i64> {
    let name = e.name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "expense name must not be empty".into(),
        ));
    }
    if e.cost <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "cost {} must be positive",
            e.cost
        )));
    }
    let tx = conn.transaction()?;
    if let Some(cat_id) = e.category_id {
        categories::ensure_exists(&tx, cat_id)?;
    }
    if let Some(wallet_id) = e.wallet_id {
        let wallet = wallets::get_wallet_by_id(&tx, wallet_id)?;
        // Overspending is representable: the balance may go negative.
        tx.execute(
            "UPDATE wallet SET amount=?1 WHERE id=?2",
            params![(wallet.amount - e.cost).to_string(), wallet_id],
        )?;
    }
    tx.execute(
        "INSERT INTO expense(name, category_id, cost, date, description, wallet_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            name,
            e.category_id,
            e.cost.to_string(),
            e.date.to_string(),
            e.description.as_deref(),
            e.wallet_id
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok(id)
}

/// Reverse a recorded expense: credit the stored cost back to the paying
/// wallet and mark the row void. Voided rows stay queryable by id but drop
/// out of listings and analytics.
pub fn redo_expense(conn: &mut Connection, id: i64) -> LedgerResult<()> {
    let tx = conn.transaction()?;
    let row = tx
        .query_row(
            "SELECT cost, wallet_id, reversed FROM expense WHERE id=?1",
            params![id],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, Option<i64>>(1)?,
                    r.get::<_, bool>(2)?,
                ))
            },
        )
        .optional()?;
    let (cost, wallet_id, reversed) = match row {
        Some(parts) => parts,
        None => {
            return Err(LedgerError::NotFound {
                entity: "expense",
                id,
            });
        }
    };
    if reversed {
        return Err(LedgerError::AlreadyReversed(id));
    }
    let cost = parse_amount(&cost)?;
    if let Some(wallet_id) = wallet_id {
        let wallet = wallets::get_wallet_by_id(&tx, wallet_id)?;
        tx.execute(
            "UPDATE wallet SET amount=?1 WHERE id=?2",
            params![(wallet.amount + cost).to_string(), wallet_id],
        )?;
    }
    tx.execute("UPDATE expense SET reversed=1 WHERE id=?1", params![id])?;
    tx.commit()?;
    Ok(())
}

/// Lookup by id sees voided rows too.
pub fn get_expense_by_id(conn: &Connection, id: i64) -> LedgerResult<Expense> {
    let row = conn
        .query_row(
            "SELECT id, name, category_id, cost, date, description, wallet_id, reversed
             FROM expense WHERE id=?1",
            params![id],
            map_expense,
        )
        .optional()?;
    match row {
        Some(parts) => expense_from_parts(parts),
        None => Err(LedgerError::NotFound {
            entity: "expense",
            id,
        }),
    }
}

pub fn get_all_expenses(conn: &Connection) -> LedgerResult<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, cost, date, description, wallet_id, reversed
         FROM expense WHERE reversed=0 ORDER BY id",
    )?;
    let rows = stmt.query_map([], map_expense)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_parts(row?)?);
    }
    Ok(out)
}

pub fn expenses_by_category(conn: &Connection, category_id: i64) -> LedgerResult<Vec<Expense>> {
    categories::ensure_exists(conn, category_id)?;
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, cost, date, description, wallet_id, reversed
         FROM expense WHERE reversed=0 AND category_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![category_id], map_expense)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_parts(row?)?);
    }
    Ok(out)
}

pub fn expenses_between(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> LedgerResult<Vec<Expense>> {
    if from > to {
        return Err(LedgerError::InvalidInput(format!(
            "range start {} is after end {}",
            from, to
        )));
    }
    let mut stmt = conn.prepare(
        "SELECT id, name, category_id, cost, date, description, wallet_id, reversed
         FROM expense WHERE reversed=0 AND date BETWEEN ?1 AND ?2 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![from.to_string(), to.to_string()], map_expense)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(expense_from_parts(row?)?);
    }
    Ok(out)
}

pub fn list_expenses(
    conn: &Connection,
    order: ExpenseOrder,
    include_reversed: bool,
) -> LedgerResult<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.name, c.name, e.cost, e.date, w.name, e.description, e.reversed
         FROM expense e
         LEFT JOIN category c ON e.category_id=c.id
         LEFT JOIN wallet w ON e.wallet_id=w.id",
    );
    if !include_reversed {
        sql.push_str(" WHERE e.reversed=0");
    }
    sql.push_str(" ORDER BY e.id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, NaiveDate>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, bool>(7)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, category, cost, date, wallet, description, reversed) = row?;
        out.push(ExpenseRow {
            id,
            name,
            category,
            cost: parse_amount(&cost)?,
            date,
            wallet,
            description,
            reversed,
        });
    }
    match order {
        ExpenseOrder::Id => {}
        ExpenseOrder::Category => sort_rows(
            &mut out,
            |e| e.category.clone().unwrap_or_default().to_lowercase(),
            Direction::Asc,
        ),
        ExpenseOrder::CostDesc => sort_rows(&mut out, |e| e.cost, Direction::Desc),
        ExpenseOrder::CostAsc => sort_rows(&mut out, |e| e.cost, Direction::Asc),
        ExpenseOrder::DateDesc => sort_rows(&mut out, |e| e.date, Direction::Desc),
    }
    Ok(out)
}

type RawExpense = (
    i64,
    String,
    Option<i64>,
    String,
    NaiveDate,
    Option<String>,
    Option<i64>,
    bool,
);

fn map_expense(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawExpense> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
    ))
}

fn expense_from_parts(
    (id, name, category_id, cost, date, description, wallet_id, reversed): RawExpense,
) -> LedgerResult<Expense> {
    Ok(Expense {
        id,
        name,
        category_id,
        cost: parse_amount(&cost)?,
        date,
        description,
        wallet_id,
        reversed,
    })
}
