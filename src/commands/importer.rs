// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! CSV import. Every row goes through the expense engine so wallet debits
//! and validation hold exactly as they would for `expense add`; the file is
//! processed in order and stops at the first bad row, keeping the rows
//! already recorded.

use crate::ledger::expenses::{self, NewExpense};
use crate::utils::{id_for_category, id_for_wallet, parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => import_expenses(conn, sub),
        _ => Ok(()),
    }
}

fn import_expenses(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut category_cache: HashMap<String, i64> = HashMap::new();
    let mut wallet_cache: HashMap<String, i64> = HashMap::new();
    let mut imported = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let line = i + 2; // line 1 is the header
        let rec = result.with_context(|| format!("Read CSV line {}", line))?;
        let name = rec.get(0).context("name missing")?.trim().to_string();
        let cost_raw = rec.get(1).context("cost missing")?.trim().to_string();
        let date_raw = rec.get(2).context("date missing")?.trim().to_string();
        let category = rec.get(3).unwrap_or("").trim().to_string();
        let wallet = rec.get(4).unwrap_or("").trim().to_string();
        let description = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let cost = parse_decimal(&cost_raw)
            .with_context(|| format!("Invalid cost '{}' on line {}", cost_raw, line))?;
        let date = parse_date(&date_raw)
            .with_context(|| format!("Invalid date '{}' on line {}", date_raw, line))?;

        let category_id = if category.is_empty() {
            None
        } else {
            let id = match category_cache.entry(category.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched = id_for_category(conn, &category)
                        .with_context(|| format!("Line {}", line))?;
                    *entry.insert(fetched)
                }
            };
            Some(id)
        };
        let wallet_id = if wallet.is_empty() {
            None
        } else {
            let id = match wallet_cache.entry(wallet.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let fetched =
                        id_for_wallet(conn, &wallet).with_context(|| format!("Line {}", line))?;
                    *entry.insert(fetched)
                }
            };
            Some(id)
        };

        let e = NewExpense {
            name,
            cost,
            date,
            category_id,
            wallet_id,
            description,
        };
        expenses::record_expense(conn, &e).with_context(|| format!("Import line {}", line))?;
        imported += 1;
    }
    println!("Imported {} expenses from {}", imported, path);
    Ok(())
}
