// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{self, AnalyticsConfig};
use crate::error::LedgerError;
use crate::ledger::wallets::{self, Networth, NetworthMode};
use crate::profile;
use crate::utils::{fmt_money, id_for_category, id_for_wallet, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("networth", sub)) => networth(conn, sub)?,
        Some(("weekly", sub)) => weekly(conn, sub)?,
        Some(("months", sub)) => months(conn, sub)?,
        Some(("stats", sub)) => stats(conn, sub)?,
        Some(("average", sub)) => average(conn, sub)?,
        Some(("budget", sub)) => budget(conn, sub)?,
        Some(("drift", sub)) => drift(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Skip-months come from the profile unless --with-skipped clears them;
/// the fixed/wallet filters are per-invocation flags.
fn config_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<AnalyticsConfig> {
    let mut cfg = match profile::get_profile(conn)? {
        Some(p) => AnalyticsConfig::from_profile(&p),
        None => AnalyticsConfig::default(),
    };
    if sub.get_flag("with-skipped") {
        cfg.skip_months.clear();
    }
    cfg.exclude_fixed = sub.get_flag("exclude-fixed");
    if let Some(w) = sub.get_one::<String>("wallet") {
        cfg.wallet_id = Some(id_for_wallet(conn, w.trim())?);
    }
    Ok(cfg)
}

fn networth(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mode = match sub.get_one::<String>("currency") {
        Some(ccy) => NetworthMode::Converted {
            target: ccy.clone(),
        },
        None => NetworthMode::ByCurrency,
    };
    match wallets::calc_networth(conn, mode)? {
        Networth::ByCurrency(totals) => {
            if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
                let rows: Vec<Vec<String>> = totals
                    .iter()
                    .map(|(ccy, total)| vec![ccy.clone(), total.round_dp(2).to_string()])
                    .collect();
                println!("{}", pretty_table(&["Currency", "Net worth"], rows));
            }
        }
        Networth::Converted { currency, total } => {
            let payload = json!({ "currency": currency, "total": total });
            if !maybe_print_json(json_flag, jsonl_flag, &payload)? {
                println!("Net worth: {}", fmt_money(&total, &currency));
            }
        }
    }
    Ok(())
}

fn weekly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let n = *sub.get_one::<usize>("weeks").unwrap();
    let cfg = config_from(conn, sub)?;
    let weeks = analytics::weekly_expenses(conn, &cfg, n)?;
    if !maybe_print_json(json_flag, jsonl_flag, &weeks)? {
        let rows: Vec<Vec<String>> = weeks
            .iter()
            .map(|(week, total)| vec![week.clone(), total.round_dp(2).to_string()])
            .collect();
        println!("{}", pretty_table(&["Week", "Spent"], rows));
    }
    Ok(())
}

fn months(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cfg = config_from(conn, sub)?;
    let cmp = analytics::month_comparison(conn, &cfg)?;
    if !maybe_print_json(json_flag, jsonl_flag, &cmp)? {
        let rows = vec![
            vec![cmp.current_month.clone(), cmp.current.round_dp(2).to_string()],
            vec![cmp.previous_month.clone(), cmp.previous.round_dp(2).to_string()],
        ];
        println!("{}", pretty_table(&["Month", "Spent"], rows));
        println!("Difference: {}", cmp.difference.round_dp(2));
    }
    Ok(())
}

fn stats(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").unwrap().trim();
    let cfg = config_from(conn, sub)?;
    match analytics::descriptive_stats(conn, &cfg, month) {
        Ok(s) => {
            if !maybe_print_json(json_flag, jsonl_flag, &s)? {
                let rows = vec![
                    vec!["Mean".to_string(), s.mean.to_string()],
                    vec!["Median".to_string(), s.median.to_string()],
                    vec![
                        "Mode".to_string(),
                        s.mode.clone().unwrap_or("(nothing repeats)".into()),
                    ],
                ];
                println!("{}", pretty_table(&[month, "Value"], rows));
            }
        }
        Err(LedgerError::NoData(msg)) => println!("No data: {}", msg),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn average(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cfg = config_from(conn, sub)?;
    let avg = analytics::avg_monthly_expense(conn, &cfg)?;
    let payload = json!({ "average_monthly": avg });
    if !maybe_print_json(json_flag, jsonl_flag, &payload)? {
        println!("Average monthly spend: {}", avg);
    }
    Ok(())
}

fn budget(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").unwrap().trim();
    let cfg = config_from(conn, sub)?;
    let lines = analytics::budget_report(conn, &cfg, month)?;
    if lines.is_empty() {
        println!("No categories carry a monthly limit.");
        return Ok(());
    }
    if !maybe_print_json(json_flag, jsonl_flag, &lines)? {
        let rows: Vec<Vec<String>> = lines
            .iter()
            .map(|l| {
                vec![
                    l.category.clone(),
                    l.limit.to_string(),
                    l.spent.round_dp(2).to_string(),
                    l.remaining.round_dp(2).to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Remaining"], rows)
        );
    }
    Ok(())
}

fn drift(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let category = sub.get_one::<String>("category").unwrap().trim();
    let baseline = *sub.get_one::<usize>("baseline").unwrap();
    let current = *sub.get_one::<usize>("current").unwrap();
    let category_id = id_for_category(conn, category)?;
    let cfg = config_from(conn, sub)?;
    match analytics::category_drift(conn, &cfg, category_id, baseline, current) {
        Ok(r) => {
            if !maybe_print_json(json_flag, jsonl_flag, &r)? {
                let rows = vec![
                    vec!["Baseline mean / week".to_string(), format!("{:.2}", r.baseline_mean)],
                    vec!["Baseline stddev".to_string(), format!("{:.2}", r.baseline_stddev)],
                    vec!["Current rate / week".to_string(), format!("{:.2}", r.current_rate)],
                    vec!["Deviation (z)".to_string(), format!("{:.2}", r.deviation)],
                ];
                println!("{}", pretty_table(&[category, "Value"], rows));
                if r.is_drifting {
                    println!("Spending in '{}' is drifting from its baseline.", category);
                } else {
                    println!("No drift detected for '{}'.", category);
                }
            }
        }
        Err(LedgerError::NoData(msg)) => println!("No data: {}", msg),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
