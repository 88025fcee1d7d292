// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

pub fn build_cli() -> Command {
    Command::new("florin")
        .about("Wallets, categorized expenses, savings goals, and spending analytics")
        .version(crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .value_name("PATH")
                .global(true)
                .help("Use this database file instead of the platform default"),
        )
        .subcommand(Command::new("init").about("Create the database and schema"))
        .subcommand(wallet_cmd())
        .subcommand(category_cmd())
        .subcommand(expense_cmd())
        .subcommand(goal_cmd())
        .subcommand(report_cmd())
        .subcommand(profile_cmd())
        .subcommand(fx_cmd())
        .subcommand(import_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}

fn wallet_cmd() -> Command {
    Command::new("wallet")
        .about("Manage wallets")
        .subcommand(
            Command::new("add")
                .about("Add a wallet")
                .arg(req_str("name", "Wallet name"))
                .arg(
                    Arg::new("opening")
                        .long("opening")
                        .value_name("AMOUNT")
                        .default_value("0")
                        .help("Opening balance"),
                )
                .arg(currency_arg()),
        )
        .subcommand(json_args(
            Command::new("list").about("List wallets").arg(
                Arg::new("sort")
                    .long("sort")
                    .value_name("ORDER")
                    .value_parser(["name", "balance", "created"])
                    .default_value("name")
                    .help("Listing order"),
            ),
        ))
        .subcommand(
            Command::new("rename")
                .about("Rename a wallet")
                .arg(req_str("wallet", "Wallet name or id"))
                .arg(req_str("name", "New name")),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between two wallets of the same currency")
                .arg(req_str("from", "Source wallet name or id"))
                .arg(req_str("to", "Destination wallet name or id"))
                .arg(req_str("amount", "Amount to move")),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage expense categories")
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(req_str("name", "Category name"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_name("AMOUNT")
                        .help("Monthly spending limit"),
                )
                .arg(
                    Arg::new("fixed")
                        .long("fixed")
                        .action(ArgAction::SetTrue)
                        .help("Mark as fixed-recurring (rent, subscriptions)"),
                )
                .arg(currency_arg()),
        )
        .subcommand(json_args(Command::new("list").about("List categories")))
        .subcommand(
            Command::new("rm")
                .about("Remove a category, detaching its expenses and goals")
                .arg(req_str("name", "Category name")),
        )
}

fn expense_cmd() -> Command {
    Command::new("expense")
        .about("Record and inspect expenses")
        .subcommand(
            Command::new("add")
                .about("Record an expense, debiting the paying wallet")
                .arg(req_str("name", "What the money went to"))
                .arg(req_str("cost", "Amount spent"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Date of the expense (default today)"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("NAME")
                        .help("Category name"),
                )
                .arg(
                    Arg::new("wallet")
                        .long("wallet")
                        .value_name("WALLET")
                        .help("Paying wallet name or id"),
                )
                .arg(
                    Arg::new("note")
                        .long("note")
                        .value_name("TEXT")
                        .help("Free-form description"),
                ),
        )
        .subcommand(
            Command::new("undo")
                .about("Reverse an expense, crediting the wallet back")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .value_name("ID")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Expense id"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List expenses")
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .value_name("ORDER")
                        .value_parser(["id", "category", "cost-desc", "cost-asc", "date-desc"])
                        .default_value("id")
                        .help("Listing order"),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Include reversed expenses"),
                ),
        ))
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Manage savings goals")
        .subcommand(
            Command::new("add")
                .about("Add a savings goal")
                .arg(req_str("name", "Goal name"))
                .arg(req_str("target", "Amount to reach"))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("NAME")
                        .help("Category name"),
                )
                .arg(currency_arg())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .help("Start date"),
                ),
        )
        .subcommand(json_args(
            Command::new("list")
                .about("List goals")
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .value_name("ORDER")
                        .value_parser(["id", "target", "reached", "name"])
                        .default_value("id")
                        .help("Listing order"),
                )
                .arg(
                    Arg::new("active")
                        .long("active")
                        .action(ArgAction::SetTrue)
                        .help("Only goals not yet completed"),
                ),
        ))
        .subcommand(
            Command::new("contribute")
                .about("Add progress toward a goal")
                .arg(req_str("goal", "Goal name or id"))
                .arg(req_str("amount", "Contribution amount")),
        )
        .subcommand(
            Command::new("complete")
                .about("Pay the goal's target out of a wallet and close it")
                .arg(req_str("goal", "Goal name or id"))
                .arg(req_str("wallet", "Paying wallet name or id")),
        )
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Analytics over recorded expenses")
        .subcommand(json_args(
            Command::new("networth")
                .about("Wallet totals by currency, or converted into one")
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .value_name("CCY")
                        .help("Convert everything into this currency"),
                ),
        ))
        .subcommand(filter_args(json_args(
            Command::new("weekly").about("Totals per ISO week").arg(
                Arg::new("weeks")
                    .long("weeks")
                    .value_name("N")
                    .value_parser(value_parser!(usize))
                    .default_value("4")
                    .help("How many recent weeks"),
            ),
        )))
        .subcommand(filter_args(json_args(
            Command::new("months").about("This month against the previous one"),
        )))
        .subcommand(filter_args(json_args(
            Command::new("stats")
                .about("Mean, median, and mode for one month")
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_name("MM-YYYY")
                        .required(true)
                        .help("Month to describe"),
                ),
        )))
        .subcommand(filter_args(json_args(
            Command::new("average").about("Average monthly spend across months with data"),
        )))
        .subcommand(filter_args(json_args(
            Command::new("budget")
                .about("Limit vs spend per category for one month")
                .arg(
                    Arg::new("month")
                        .long("month")
                        .value_name("YYYY-MM")
                        .required(true)
                        .help("Month to check"),
                ),
        )))
        .subcommand(filter_args(json_args(
            Command::new("drift")
                .about("Is a category's weekly spend drifting from its history?")
                .arg(req_str("category", "Category name"))
                .arg(
                    Arg::new("baseline")
                        .long("baseline")
                        .value_name("WEEKS")
                        .value_parser(value_parser!(usize))
                        .default_value("8")
                        .help("Baseline window in weeks"),
                )
                .arg(
                    Arg::new("current")
                        .long("current")
                        .value_name("WEEKS")
                        .value_parser(value_parser!(usize))
                        .default_value("1")
                        .help("Current window in weeks"),
                ),
        )))
}

fn profile_cmd() -> Command {
    Command::new("profile")
        .about("The local profile: name, budget, skipped months")
        .subcommand(json_args(Command::new("show").about("Show the profile")))
        .subcommand(
            Command::new("set")
                .about("Update profile fields; omitted fields keep their value")
                .arg(Arg::new("name").long("name").value_name("NAME"))
                .arg(
                    Arg::new("budget")
                        .long("budget")
                        .value_name("AMOUNT")
                        .help("Monthly budget"),
                )
                .arg(
                    Arg::new("main-wallet")
                        .long("main-wallet")
                        .value_name("WALLET")
                        .help("Default wallet name or id"),
                )
                .arg(Arg::new("theme").long("theme").value_name("THEME"))
                .arg(
                    Arg::new("photo")
                        .long("photo")
                        .value_name("PATH")
                        .help("Profile photo path"),
                ),
        )
        .subcommand(
            Command::new("skip-month")
                .about("Months left out of analytics")
                .subcommand(
                    Command::new("add")
                        .about("Skip a month")
                        .arg(req_str("month", "Month as YYYY-MM")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Stop skipping a month")
                        .arg(req_str("month", "Month as YYYY-MM")),
                )
                .subcommand(Command::new("list").about("List skipped months")),
        )
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("Exchange rates for multi-currency reports")
        .subcommand(
            Command::new("fetch")
                .about("Download daily rates covering every wallet and goal currency")
                .arg(
                    Arg::new("base")
                        .long("base")
                        .value_name("CCY")
                        .default_value("EUR")
                        .help("Base currency of the fetched series"),
                )
                .arg(
                    Arg::new("days")
                        .long("days")
                        .value_name("N")
                        .value_parser(value_parser!(usize))
                        .default_value("120")
                        .help("How many days back"),
                ),
        )
        .subcommand(json_args(Command::new("list").about("Show stored rates")))
        .subcommand(
            Command::new("convert")
                .about("Convert an amount using stored rates")
                .arg(
                    Arg::new("date")
                        .long("date")
                        .value_name("YYYY-MM-DD")
                        .help("Rate date (default today)"),
                )
                .arg(req_str("amount", "Amount to convert"))
                .arg(req_str("from", "Source currency"))
                .arg(req_str("to", "Target currency")),
        )
}

fn import_cmd() -> Command {
    Command::new("import").about("Import from CSV").subcommand(
        Command::new("expenses")
            .about("Import expenses; each row is recorded like 'expense add'")
            .arg(req_str("path", "CSV file path")),
    )
}

fn export_cmd() -> Command {
    let fmt = || {
        Arg::new("format")
            .long("format")
            .value_name("FORMAT")
            .value_parser(["csv", "json"])
            .default_value("csv")
            .help("Output format")
    };
    let out = || req_str("out", "Output file path");
    Command::new("export")
        .about("Export to CSV or JSON")
        .subcommand(
            Command::new("expenses")
                .about("Export expenses")
                .arg(fmt())
                .arg(out()),
        )
        .subcommand(
            Command::new("wallets")
                .about("Export wallets")
                .arg(fmt())
                .arg(out()),
        )
        .subcommand(
            Command::new("goals")
                .about("Export goals")
                .arg(fmt())
                .arg(out()),
        )
}

fn req_str(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name(name.to_uppercase())
        .required(true)
        .help(help)
}

fn currency_arg() -> Arg {
    Arg::new("currency")
        .long("currency")
        .value_name("CCY")
        .default_value("EUR")
        .help("ISO currency code")
}

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("exclude-fixed")
            .long("exclude-fixed")
            .action(ArgAction::SetTrue)
            .help("Leave out fixed-recurring categories"),
    )
    .arg(
        Arg::new("wallet")
            .long("wallet")
            .value_name("WALLET")
            .help("Only expenses paid from this wallet"),
    )
    .arg(
        Arg::new("with-skipped")
            .long("with-skipped")
            .action(ArgAction::SetTrue)
            .help("Count months the profile normally skips"),
    )
}
