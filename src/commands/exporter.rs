// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::expenses::{self, ExpenseOrder};
use crate::ledger::goals::{self, GoalOrder};
use crate::ledger::wallets::{self, WalletOrder};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, sub),
        Some(("wallets", sub)) => export_wallets(conn, sub),
        Some(("goals", sub)) => export_goals(conn, sub),
        _ => Ok(()),
    }
}

/// CSV columns match the import header, so an export can be re-imported.
fn export_expenses(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap();
    let out = sub.get_one::<String>("out").unwrap();
    let data = expenses::list_expenses(conn, ExpenseOrder::Id, false)?;

    if fmt == "json" {
        std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
    } else {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["name", "cost", "date", "category", "wallet", "description"])?;
        for e in &data {
            wtr.write_record([
                e.name.clone(),
                e.cost.to_string(),
                e.date.to_string(),
                e.category.clone().unwrap_or_default(),
                e.wallet.clone().unwrap_or_default(),
                e.description.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    }
    println!("Exported {} expenses to {}", data.len(), out);
    Ok(())
}

fn export_wallets(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap();
    let out = sub.get_one::<String>("out").unwrap();
    let data = wallets::get_all_wallets(conn, WalletOrder::Name)?;

    if fmt == "json" {
        std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
    } else {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["name", "balance", "currency", "created_at"])?;
        for w in &data {
            wtr.write_record([
                w.name.clone(),
                w.amount.to_string(),
                w.currency.clone(),
                w.created_at.clone(),
            ])?;
        }
        wtr.flush()?;
    }
    println!("Exported {} wallets to {}", data.len(), out);
    Ok(())
}

fn export_goals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap();
    let out = sub.get_one::<String>("out").unwrap();
    let data = goals::get_all_goals(conn, GoalOrder::Id)?;

    if fmt == "json" {
        std::fs::write(out, serde_json::to_string_pretty(&data)?)?;
    } else {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "name",
            "target",
            "reached",
            "currency",
            "completed",
            "start_date",
            "end_date",
        ])?;
        for g in &data {
            wtr.write_record([
                g.name.clone(),
                g.amount_to_reach.to_string(),
                g.amount_reached.to_string(),
                g.currency.clone(),
                if g.completed { "yes" } else { "no" }.to_string(),
                g.start_date.map(|d| d.to_string()).unwrap_or_default(),
                g.end_date.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    }
    println!("Exported {} goals to {}", data.len(), out);
    Ok(())
}
