// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::expenses::{self, ExpenseOrder, NewExpense};
use crate::utils::{
    id_for_category, id_for_wallet, maybe_print_json, parse_date, parse_decimal, pretty_table,
};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("undo", sub)) => undo(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let cost = parse_decimal(sub.get_one::<String>("cost").unwrap().trim())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => Local::now().date_naive(),
    };
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, c.trim()))
        .transpose()?;
    let wallet_id = sub
        .get_one::<String>("wallet")
        .map(|w| id_for_wallet(conn, w.trim()))
        .transpose()?;
    let description = sub.get_one::<String>("note").map(|s| s.trim().to_string());

    let e = NewExpense {
        name: name.clone(),
        cost,
        date,
        category_id,
        wallet_id,
        description,
    };
    let id = expenses::record_expense(conn, &e)?;
    println!("Recorded expense {} '{}' ({} on {})", id, name, cost, date);
    Ok(())
}

fn undo(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    expenses::redo_expense(conn, id)?;
    println!("Reversed expense {}; the wallet was credited back", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let include_reversed = sub.get_flag("all");
    let order = match sub.get_one::<String>("sort").unwrap().as_str() {
        "category" => ExpenseOrder::Category,
        "cost-desc" => ExpenseOrder::CostDesc,
        "cost-asc" => ExpenseOrder::CostAsc,
        "date-desc" => ExpenseOrder::DateDesc,
        _ => ExpenseOrder::Id,
    };
    let data = expenses::list_expenses(conn, order, include_reversed)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = Vec::new();
    for e in &data {
        let mut row = vec![
            e.id.to_string(),
            e.date.to_string(),
            e.name.clone(),
            e.category.clone().unwrap_or("(uncategorized)".into()),
            e.cost.to_string(),
            e.wallet.clone().unwrap_or_default(),
            e.description.clone().unwrap_or_default(),
        ];
        if include_reversed {
            row.push(if e.reversed { "yes".into() } else { String::new() });
        }
        rows.push(row);
    }
    let table = if include_reversed {
        pretty_table(
            &["Id", "Date", "Name", "Category", "Cost", "Wallet", "Note", "Reversed"],
            rows,
        )
    } else {
        pretty_table(&["Id", "Date", "Name", "Category", "Cost", "Wallet", "Note"], rows)
    };
    println!("{}", table);
    Ok(())
}
