// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("app.florin", "Florin", "florin"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("florin.sqlite"))
}

/// Open the ledger database, creating the schema on first use. `path`
/// overrides the platform default (the CLI's global `--db` flag).
pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => db_path()?,
    };
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Idempotent schema setup. Public so tests can run the real schema against
/// an in-memory connection.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS category(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        limit_amount TEXT,
        kind INTEGER NOT NULL DEFAULT 0 CHECK(kind IN (0,1)),
        currency TEXT NOT NULL DEFAULT 'EUR'
    );

    CREATE TABLE IF NOT EXISTS wallet(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS expense(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER,
        cost TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT,
        wallet_id INTEGER,
        reversed INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL,
        FOREIGN KEY(wallet_id) REFERENCES wallet(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);

    CREATE TABLE IF NOT EXISTS goal(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        amount_to_reach TEXT NOT NULL,
        amount_reached TEXT NOT NULL DEFAULT '0',
        category_id INTEGER,
        currency TEXT NOT NULL DEFAULT 'EUR',
        completed INTEGER NOT NULL DEFAULT 0,
        start_date TEXT,
        end_date TEXT,
        FOREIGN KEY(category_id) REFERENCES category(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS profile(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        photo_path TEXT,
        monthly_budget TEXT NOT NULL DEFAULT '0',
        main_wallet_id INTEGER,
        skip_months TEXT NOT NULL DEFAULT '[]',
        theme TEXT NOT NULL DEFAULT 'dark',
        password_hash TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        last_login TEXT,
        FOREIGN KEY(main_wallet_id) REFERENCES wallet(id) ON DELETE SET NULL
    );

    -- Exchange rates: 1 base = rate quote on a given day, closest
    -- on-or-before lookup at conversion time.
    CREATE TABLE IF NOT EXISTS rate(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        base TEXT NOT NULL,
        quote TEXT NOT NULL,
        rate TEXT NOT NULL,
        UNIQUE(date, base, quote)
    );
    "#,
    )?;
    Ok(())
}
