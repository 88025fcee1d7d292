// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Goal Engine. A goal accumulates contributions up to its target; completing
//! it pays the target out of a wallet and leaves an expense row behind as the
//! audit trail. Completion keeps the goal row with `completed` set.

use chrono::{Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Direction, categories, parse_amount, sort_rows, wallets};
use crate::models::Goal;

#[derive(Debug, Clone)]
pub struct NewGoal {
    pub name: String,
    pub target: Decimal,
    pub category_id: Option<i64>,
    pub currency: String,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOrder {
    Id,
    TargetDesc,
    ReachedDesc,
    Name,
}

pub fn add_goal(conn: &Connection, g: &NewGoal) -> LedgerResult<i64> {
    let name = g.name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidInput(
            "goal name must not be empty".into(),
        ));
    }
    if g.target <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "target amount {} must be positive",
            g.target
        )));
    }
    if let Some(cat_id) = g.category_id {
        categories::ensure_exists(conn, cat_id)?;
    }
    let currency = g.currency.trim().to_uppercase();
    if currency.is_empty() {
        return Err(LedgerError::InvalidInput(
            "goal currency must not be empty".into(),
        ));
    }
    conn.execute(
        "INSERT INTO goal(name, amount_to_reach, category_id, currency, start_date)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            name,
            g.target.to_string(),
            g.category_id,
            currency,
            g.start_date.map(|d| d.to_string())
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_goal_by_id(conn: &Connection, id: i64) -> LedgerResult<Goal> {
    let row = conn
        .query_row(
            "SELECT id, name, amount_to_reach, amount_reached, category_id, currency,
                    completed, start_date, end_date
             FROM goal WHERE id=?1",
            params![id],
            map_goal,
        )
        .optional()?;
    match row {
        Some(parts) => goal_from_parts(parts),
        None => Err(LedgerError::NotFound { entity: "goal", id }),
    }
}

pub fn get_all_goals(conn: &Connection, order: GoalOrder) -> LedgerResult<Vec<Goal>> {
    let mut out = query_goals(conn, false)?;
    match order {
        GoalOrder::Id => {}
        GoalOrder::TargetDesc => sort_rows(&mut out, |g| g.amount_to_reach, Direction::Desc),
        GoalOrder::ReachedDesc => sort_rows(&mut out, |g| g.amount_reached, Direction::Desc),
        GoalOrder::Name => sort_rows(&mut out, |g| g.name.to_lowercase(), Direction::Asc),
    }
    Ok(out)
}

pub fn active_goals(conn: &Connection) -> LedgerResult<Vec<Goal>> {
    query_goals(conn, true)
}

/// Add `amount` toward the goal's target. The running total may never pass
/// the target, so an overshooting contribution is refused whole rather than
/// clamped. Returns the new amount reached.
pub fn contribute(conn: &Connection, goal_id: i64, amount: Decimal) -> LedgerResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidInput(format!(
            "contribution {} must be positive",
            amount
        )));
    }
    let goal = get_goal_by_id(conn, goal_id)?;
    if goal.completed {
        return Err(LedgerError::AlreadyCompleted(goal_id));
    }
    let reached = goal.amount_reached + amount;
    if reached > goal.amount_to_reach {
        return Err(LedgerError::InvalidInput(format!(
            "contribution {} would push {} past the target {}",
            amount, goal.amount_reached, goal.amount_to_reach
        )));
    }
    conn.execute(
        "UPDATE goal SET amount_reached=?1 WHERE id=?2",
        params![reached.to_string(), goal_id],
    )?;
    Ok(reached)
}

/// Pay the goal out of `wallet_id`: debit the full target, record the payout
/// as an expense, and mark the goal completed, all in one transaction. The
/// wallet is the caller's choice since goal rows carry no wallet reference.
/// Returns the id of the payout expense.
pub fn complete_goal(conn: &mut Connection, goal_id: i64, wallet_id: i64) -> LedgerResult<i64> {
    complete_goal_as_of(conn, goal_id, wallet_id, Local::now().date_naive())
}

pub fn complete_goal_as_of(
    conn: &mut Connection,
    goal_id: i64,
    wallet_id: i64,
    today: NaiveDate,
) -> LedgerResult<i64> {
    let tx = conn.transaction()?;
    let goal = get_goal_by_id(&tx, goal_id)?;
    if goal.completed {
        return Err(LedgerError::AlreadyCompleted(goal_id));
    }
    let wallet = wallets::get_wallet_by_id(&tx, wallet_id)?;
    if goal.currency != wallet.currency {
        return Err(LedgerError::CurrencyMismatch(goal.currency, wallet.currency));
    }
    if wallet.amount < goal.amount_to_reach {
        return Err(LedgerError::InsufficientFunds {
            wallet: wallet_id,
            available: wallet.amount,
            required: goal.amount_to_reach,
        });
    }
    tx.execute(
        "UPDATE wallet SET amount=?1 WHERE id=?2",
        params![
            (wallet.amount - goal.amount_to_reach).to_string(),
            wallet_id
        ],
    )?;
    tx.execute(
        "INSERT INTO expense(name, category_id, cost, date, description, wallet_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            goal.name,
            goal.category_id,
            goal.amount_to_reach.to_string(),
            today.to_string(),
            "goal completed",
            wallet_id
        ],
    )?;
    let expense_id = tx.last_insert_rowid();
    tx.execute(
        "UPDATE goal SET completed=1, amount_reached=?1, end_date=?2 WHERE id=?3",
        params![goal.amount_to_reach.to_string(), today.to_string(), goal_id],
    )?;
    tx.commit()?;
    Ok(expense_id)
}

/// Numbered listing kept for callers of the old interface: 1 by id, 2 active
/// goals only, 3 by target descending, 4 by amount reached descending, 5 by
/// name. The misspelling is the name those callers know.
#[deprecated(note = "use get_all_goals/active_goals with an explicit GoalOrder")]
pub fn orde_by(conn: &Connection, option: u8) -> LedgerResult<Vec<Goal>> {
    match option {
        1 => get_all_goals(conn, GoalOrder::Id),
        2 => active_goals(conn),
        3 => get_all_goals(conn, GoalOrder::TargetDesc),
        4 => get_all_goals(conn, GoalOrder::ReachedDesc),
        5 => get_all_goals(conn, GoalOrder::Name),
        n => Err(LedgerError::InvalidInput(format!(
            "unknown goal ordering option {}",
            n
        ))),
    }
}

fn query_goals(conn: &Connection, active_only: bool) -> LedgerResult<Vec<Goal>> {
    let mut sql = String::from(
        "SELECT id, name, amount_to_reach, amount_reached, category_id, currency,
                completed, start_date, end_date
         FROM goal",
    );
    if active_only {
        sql.push_str(" WHERE completed=0");
    }
    sql.push_str(" ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_goal)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(goal_from_parts(row?)?);
    }
    Ok(out)
}

type RawGoal = (
    i64,
    String,
    String,
    String,
    Option<i64>,
    String,
    bool,
    Option<NaiveDate>,
    Option<NaiveDate>,
);

fn map_goal(r: &rusqlite::Row<'_>) -> rusqlite::Result<RawGoal> {
    Ok((
        r.get(0)?,
        r.get(1)?,
        r.get(2)?,
        r.get(3)?,
        r.get(4)?,
        r.get(5)?,
        r.get(6)?,
        r.get(7)?,
        r.get(8)?,
    ))
}

fn goal_from_parts(
    (id, name, to_reach, reached, category_id, currency, completed, start_date, end_date): RawGoal,
) -> LedgerResult<Goal> {
    Ok(Goal {
        id,
        name,
        amount_to_reach: parse_amount(&to_reach)?,
        amount_reached: parse_amount(&reached)?,
        category_id,
        currency,
        completed,
        start_date,
        end_date,
    })
}
