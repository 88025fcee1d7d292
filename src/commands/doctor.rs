// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Read-only sweep for rows the engine would never write itself but a hand
/// edit or an old database could carry.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Expenses pointing at categories or wallets that no longer exist
    let mut stmt = conn.prepare(
        "SELECT e.id, e.category_id FROM expense e
         LEFT JOIN category c ON e.category_id=c.id
         WHERE e.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, cat): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "dangling_category".into(),
            format!("expense {} -> category {}", id, cat),
        ]);
    }
    let mut stmt = conn.prepare(
        "SELECT e.id, e.wallet_id FROM expense e
         LEFT JOIN wallet w ON e.wallet_id=w.id
         WHERE e.wallet_id IS NOT NULL AND w.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, wallet): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "dangling_wallet".into(),
            format!("expense {} -> wallet {}", id, wallet),
        ]);
    }

    // 2) Goals pointing at missing categories
    let mut stmt = conn.prepare(
        "SELECT g.id, g.category_id FROM goal g
         LEFT JOIN category c ON g.category_id=c.id
         WHERE g.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, cat): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "dangling_category".into(),
            format!("goal {} -> category {}", id, cat),
        ]);
    }

    // 3) Profile pointing at a missing main wallet
    let mut stmt = conn.prepare(
        "SELECT p.id, p.main_wallet_id FROM profile p
         LEFT JOIN wallet w ON p.main_wallet_id=w.id
         WHERE p.main_wallet_id IS NOT NULL AND w.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, wallet): (i64, i64) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "dangling_wallet".into(),
            format!("profile {} -> wallet {}", id, wallet),
        ]);
    }

    // 4) Stored costs the engine would have refused
    let mut stmt =
        conn.prepare("SELECT id, cost FROM expense WHERE CAST(cost AS REAL) <= 0")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, cost): (i64, String) = (r.get(0)?, r.get(1)?);
        rows.push(vec![
            "non_positive_cost".into(),
            format!("expense {} cost {}", id, cost),
        ]);
    }

    // 5) Active goals past their own target
    let mut stmt = conn.prepare(
        "SELECT id, amount_reached, amount_to_reach FROM goal
         WHERE completed=0 AND CAST(amount_reached AS REAL) > CAST(amount_to_reach AS REAL)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let (id, reached, target): (i64, String, String) = (r.get(0)?, r.get(1)?, r.get(2)?);
        rows.push(vec![
            "goal_past_target".into(),
            format!("goal {} reached {} of {}", id, reached, target),
        ]);
    }

    // 6) Completed goals with no completion date
    let mut stmt =
        conn.prepare("SELECT id FROM goal WHERE completed=1 AND end_date IS NULL")?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "missing_end_date".into(),
            format!("goal {} completed without an end date", id),
        ]);
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
