// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use florin::{cli, commands, db};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    let db_override = matches
        .get_one::<String>("db")
        .map(std::path::PathBuf::from);
    let mut conn = db::open_or_init(db_override.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => {
            let path = match db_override {
                Some(p) => p,
                None => db::db_path()?,
            };
            println!("Database ready at {}", path.display());
        }
        Some(("wallet", m)) => commands::wallets::handle(&mut conn, m)?,
        Some(("category", m)) => commands::categories::handle(&conn, m)?,
        Some(("expense", m)) => commands::expenses::handle(&mut conn, m)?,
        Some(("goal", m)) => commands::goals::handle(&mut conn, m)?,
        Some(("report", m)) => commands::reports::handle(&conn, m)?,
        Some(("profile", m)) => commands::profile::handle(&conn, m)?,
        Some(("fx", m)) => commands::fx::handle(&conn, m)?,
        Some(("import", m)) => commands::importer::handle(&mut conn, m)?,
        Some(("export", m)) => commands::exporter::handle(&conn, m)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
