// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::wallets::{self, WalletOrder};
use crate::utils::{fmt_money, id_for_wallet, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rename", sub)) => rename(conn, sub)?,
        Some(("transfer", sub)) => transfer(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let opening = parse_decimal(sub.get_one::<String>("opening").unwrap().trim())?;
    let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
    let id = wallets::add_wallet(conn, &name, opening, &ccy)?;
    println!("Added wallet '{}' (id {}, {})", name, id, fmt_money(&opening, &ccy));
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let order = match sub.get_one::<String>("sort").unwrap().as_str() {
        "balance" => WalletOrder::Balance,
        "created" => WalletOrder::Created,
        _ => WalletOrder::Name,
    };
    let data = wallets::get_all_wallets(conn, order)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|w| {
                vec![
                    w.id.to_string(),
                    w.name.clone(),
                    fmt_money(&w.amount, &w.currency),
                    w.created_at.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Id", "Name", "Balance", "Created"], rows));
    }
    Ok(())
}

fn rename(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let wallet = sub.get_one::<String>("wallet").unwrap().trim();
    let new_name = sub.get_one::<String>("name").unwrap().trim();
    let id = id_for_wallet(conn, wallet)?;
    wallets::rename_wallet(conn, id, new_name)?;
    println!("Renamed wallet '{}' to '{}'", wallet, new_name);
    Ok(())
}

fn transfer(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = sub.get_one::<String>("from").unwrap().trim();
    let to = sub.get_one::<String>("to").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let from_id = id_for_wallet(conn, from)?;
    let to_id = id_for_wallet(conn, to)?;
    wallets::transfer_money(conn, from_id, to_id, amount)
        .with_context(|| format!("Transfer {} from '{}' to '{}'", amount, from, to))?;
    println!("Moved {} from '{}' to '{}'", amount, from, to);
    Ok(())
}
