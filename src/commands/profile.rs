// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::profile::{self, ProfileUpdate};
use crate::utils::{id_for_wallet, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        Some(("skip-month", sub)) => skip_month(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let Some(p) = profile::get_profile(conn)? else {
        println!("No profile yet; create one with 'profile set --name ...'");
        return Ok(());
    };
    if !maybe_print_json(json_flag, jsonl_flag, &p)? {
        let rows = vec![
            vec!["Name".to_string(), p.name.clone()],
            vec!["Monthly budget".to_string(), p.monthly_budget.to_string()],
            vec![
                "Main wallet".to_string(),
                p.main_wallet_id.map(|id| format!("#{}", id)).unwrap_or_default(),
            ],
            vec!["Theme".to_string(), p.theme.clone()],
            vec!["Skipped months".to_string(), p.skip_months.join(", ")],
            vec!["Created".to_string(), p.created_at.clone()],
            vec![
                "Last login".to_string(),
                p.last_login.clone().unwrap_or_default(),
            ],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let main_wallet_id = sub
        .get_one::<String>("main-wallet")
        .map(|w| id_for_wallet(conn, w.trim()))
        .transpose()?;
    let monthly_budget = sub
        .get_one::<String>("budget")
        .map(|b| parse_decimal(b.trim()))
        .transpose()?;
    let u = ProfileUpdate {
        name: sub.get_one::<String>("name").map(|s| s.trim().to_string()),
        photo_path: sub.get_one::<String>("photo").map(|s| s.to_string()),
        monthly_budget,
        main_wallet_id,
        theme: sub.get_one::<String>("theme").map(|s| s.to_string()),
        password_hash: None,
    };
    let p = profile::upsert_profile(conn, &u)?;
    println!("Profile '{}' updated", p.name);
    Ok(())
}

fn skip_month(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let month = sub.get_one::<String>("month").unwrap().trim();
            let months = profile::add_skip_month(conn, month)?;
            println!("Skipping {} (now skipping: {})", month, months.join(", "));
        }
        Some(("rm", sub)) => {
            let month = sub.get_one::<String>("month").unwrap().trim();
            let months = profile::remove_skip_month(conn, month)?;
            if months.is_empty() {
                println!("No months skipped anymore");
            } else {
                println!("Stopped skipping {} (still skipping: {})", month, months.join(", "));
            }
        }
        Some(("list", _)) => {
            let months = profile::get_profile(conn)?
                .map(|p| p.skip_months)
                .unwrap_or_default();
            if months.is_empty() {
                println!("No months are skipped");
            } else {
                let rows: Vec<Vec<String>> = months.into_iter().map(|m| vec![m]).collect();
                println!("{}", pretty_table(&["Skipped month"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
