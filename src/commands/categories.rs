// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::categories;
use crate::models::CategoryKind;
use crate::utils::{id_for_category, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let limit = sub
                .get_one::<String>("limit")
                .map(|s| parse_decimal(s.trim()))
                .transpose()?;
            let kind = if sub.get_flag("fixed") {
                CategoryKind::Fixed
            } else {
                CategoryKind::Normal
            };
            let ccy = sub.get_one::<String>("currency").unwrap();
            categories::add_category(conn, &name, limit, kind, ccy)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let data = categories::get_all_categories(conn)?;
            if !maybe_print_json(json_flag, jsonl_flag, &data)? {
                let rows: Vec<Vec<String>> = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            match c.kind {
                                CategoryKind::Fixed => "fixed".into(),
                                CategoryKind::Normal => "normal".into(),
                            },
                            c.limit_amount
                                .map(|l| l.to_string())
                                .unwrap_or_default(),
                            c.currency.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Kind", "Monthly limit", "CCY"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id = id_for_category(conn, name)?;
            categories::remove_category(conn, id)?;
            println!("Removed category '{}' (its expenses and goals were detached)", name);
        }
        _ => {}
    }
    Ok(())
}
