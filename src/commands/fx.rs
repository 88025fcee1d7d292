// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::rates;
use crate::utils::{http_client, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("fetch", sub)) => {
            let base = sub.get_one::<String>("base").unwrap().to_uppercase();
            let days: usize = *sub.get_one::<usize>("days").unwrap();
            fetch_rates(conn, &base, days)?;
        }
        Some(("list", sub)) => list_rates(conn, sub)?,
        Some(("convert", sub)) => convert(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Every currency a wallet or goal is denominated in.
fn distinct_currencies(conn: &Connection) -> Result<Vec<String>> {
    let mut out = Vec::<String>::new();
    for sql in [
        "SELECT DISTINCT currency FROM wallet",
        "SELECT DISTINCT currency FROM goal",
    ] {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        for row in rows {
            let c: String = row?;
            if !c.is_empty() && !out.contains(&c) {
                out.push(c);
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Deserialize)]
struct Series {
    rates: std::collections::HashMap<String, std::collections::HashMap<String, f64>>,
    #[serde(rename = "base")]
    _base: String,
}

fn fetch_rates(conn: &Connection, base: &str, days: usize) -> Result<()> {
    let today = Utc::now().date_naive();
    let start = today - chrono::Duration::days(days as i64);
    let ccy_list = distinct_currencies(conn)?;
    let targets: Vec<String> = ccy_list.into_iter().filter(|c| c != base).collect();
    if targets.is_empty() {
        println!("No foreign currencies found; nothing to fetch.");
        return Ok(());
    }
    let to_param = targets.join(",");
    let url = format!("https://api.frankfurter.dev/{start}..{today}?from={base}&to={to_param}");
    let client = http_client()?;
    let resp = client.get(url).send()?.error_for_status()?;
    let s: Series = resp.json()?;
    let mut stored = 0usize;
    for (date, mp) in s.rates {
        for (quote, rate) in mp {
            stored += conn.execute(
                "INSERT OR IGNORE INTO rate(date, base, quote, rate) VALUES (?1, ?2, ?3, ?4)",
                params![date, base, quote, rate.to_string()],
            )?;
        }
    }
    println!("Stored {} rates from Frankfurter (ECB).", stored);
    Ok(())
}

#[derive(Serialize)]
struct RateRow {
    date: String,
    base: String,
    quote: String,
    rate: String,
}

fn list_rates(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT date, base, quote, rate FROM rate ORDER BY date DESC, base, quote LIMIT 50",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(RateRow {
            date: r.get(0)?,
            base: r.get(1)?,
            quote: r.get(2)?,
            rate: r.get(3)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let table_rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.base.clone(),
                    r.quote.clone(),
                    r.rate.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Base", "Quote", "Rate"], table_rows)
        );
    }
    Ok(())
}

fn convert(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s.trim())?,
        None => Utc::now().date_naive(),
    };
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let from = sub.get_one::<String>("from").unwrap().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().to_uppercase();
    let res = rates::convert_amount(conn, date, amount, &from, &to)?;
    println!("{} {} -> {} {}", amount, from, res.round_dp(4), to);
    Ok(())
}
