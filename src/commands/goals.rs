// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::goals::{self, GoalOrder, NewGoal};
use crate::utils::{
    id_for_category, id_for_goal, id_for_wallet, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => contribute(conn, sub)?,
        Some(("complete", sub)) => complete(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap().trim())?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, c.trim()))
        .transpose()?;
    let currency = sub.get_one::<String>("currency").unwrap().to_uppercase();
    let start_date = sub
        .get_one::<String>("start")
        .map(|s| parse_date(s.trim()))
        .transpose()?;

    let g = NewGoal {
        name: name.clone(),
        target,
        category_id,
        currency: currency.clone(),
        start_date,
    };
    let id = goals::add_goal(conn, &g)?;
    println!("Added goal '{}' (id {}, target {} {})", name, id, target, currency);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let order = match sub.get_one::<String>("sort").unwrap().as_str() {
        "target" => GoalOrder::TargetDesc,
        "reached" => GoalOrder::ReachedDesc,
        "name" => GoalOrder::Name,
        _ => GoalOrder::Id,
    };
    let mut data = goals::get_all_goals(conn, order)?;
    if sub.get_flag("active") {
        data.retain(|g| !g.completed);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.id.to_string(),
                    g.name.clone(),
                    g.amount_to_reach.to_string(),
                    g.amount_reached.to_string(),
                    g.currency.clone(),
                    if g.completed { "completed".into() } else { "active".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Name", "Target", "Reached", "CCY", "Status"], rows)
        );
    }
    Ok(())
}

fn contribute(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let goal = sub.get_one::<String>("goal").unwrap().trim();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let goal_id = id_for_goal(conn, goal)?;
    let reached = goals::contribute(conn, goal_id, amount)?;
    let g = goals::get_goal_by_id(conn, goal_id)?;
    println!(
        "Contributed {} to '{}' ({} of {} reached)",
        amount, g.name, reached, g.amount_to_reach
    );
    Ok(())
}

fn complete(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let goal = sub.get_one::<String>("goal").unwrap().trim();
    let wallet = sub.get_one::<String>("wallet").unwrap().trim();
    let goal_id = id_for_goal(conn, goal)?;
    let wallet_id = id_for_wallet(conn, wallet)?;
    let expense_id = goals::complete_goal(conn, goal_id, wallet_id)?;
    println!(
        "Completed goal '{}'; the payout was recorded as expense {}",
        goal, expense_id
    );
    Ok(())
}
