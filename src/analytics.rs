// Copyright (c) 2025 Florin Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Analytics over recorded expenses. Everything here is read-only, ignores
//! reversed rows, and filters through an explicit [`AnalyticsConfig`] instead
//! of reading toggles from the profile behind the caller's back. Functions
//! that depend on the clock have an `_as_of` variant taking the date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, Local, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{categories, parse_amount};
use crate::models::Profile;

/// Two-sided 95% normal critical value used by drift detection.
const DRIFT_Z: f64 = 1.96;

#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    /// `YYYY-MM` keys whose expenses are left out of every aggregate.
    pub skip_months: BTreeSet<String>,
    /// Leave out expenses whose category is fixed-recurring. Uncategorized
    /// expenses are not fixed and always stay in.
    pub exclude_fixed: bool,
    /// Only count expenses paid from this wallet.
    pub wallet_id: Option<i64>,
}

impl AnalyticsConfig {
    /// Seed the skip-month set from the stored profile; toggles and wallet
    /// filters stay with the caller.
    pub fn from_profile(profile: &Profile) -> Self {
        AnalyticsConfig {
            skip_months: profile.skip_months.iter().cloned().collect(),
            ..AnalyticsConfig::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthComparison {
    pub current_month: String,
    pub current: Decimal,
    pub previous_month: String,
    pub previous: Decimal,
    /// Absolute gap between the two totals.
    pub difference: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStats {
    pub month: String,
    pub mean: Decimal,
    pub median: Decimal,
    /// Most frequent expense name; `None` when nothing repeats. Ties go to
    /// the name recorded first.
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub category_id: i64,
    pub baseline_mean: f64,
    pub baseline_stddev: f64,
    pub current_rate: f64,
    /// Signed z-score of the current rate against the baseline. Infinite
    /// when the baseline shows no variance but the rate moved.
    pub deviation: f64,
    pub is_drifting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    /// Negative when the month ran over the limit.
    pub remaining: Decimal,
}

struct Entry {
    name: String,
    category_id: Option<i64>,
    cost: Decimal,
    date: NaiveDate,
}

/// Totals per ISO week (`YYYY-Www`) over the `n` most recent weeks. Weeks
/// without expenses are omitted; when the window straddles a week boundary
/// the oldest label is dropped so at most `n` keys come back.
pub fn weekly_expenses(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    n: usize,
) -> LedgerResult<BTreeMap<String, Decimal>> {
    weekly_expenses_as_of(conn, cfg, n, Local::now().date_naive())
}

pub fn weekly_expenses_as_of(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    n: usize,
    today: NaiveDate,
) -> LedgerResult<BTreeMap<String, Decimal>> {
    if n == 0 {
        return Err(LedgerError::InvalidInput(
            "week count must be positive".into(),
        ));
    }
    let cutoff = today - Duration::weeks(n as i64);
    let mut weeks: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in load_entries(conn, cfg)? {
        if e.date < cutoff || e.date > today {
            continue;
        }
        let w = e.date.iso_week();
        let label = format!("{}-W{:02}", w.year(), w.week());
        *weeks.entry(label).or_insert(Decimal::ZERO) += e.cost;
    }
    while weeks.len() > n {
        weeks.pop_first();
    }
    Ok(weeks)
}

/// Current calendar month's total against the previous month's.
pub fn month_comparison(conn: &Connection, cfg: &AnalyticsConfig) -> LedgerResult<MonthComparison> {
    month_comparison_as_of(conn, cfg, Local::now().date_naive())
}

pub fn month_comparison_as_of(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    today: NaiveDate,
) -> LedgerResult<MonthComparison> {
    let current_month = format!("{:04}-{:02}", today.year(), today.month());
    let (py, pm) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    let previous_month = format!("{:04}-{:02}", py, pm);

    let mut current = Decimal::ZERO;
    let mut previous = Decimal::ZERO;
    for e in load_entries(conn, cfg)? {
        let key = month_key(e.date);
        if key == current_month {
            current += e.cost;
        } else if key == previous_month {
            previous += e.cost;
        }
    }
    let difference = (current - previous).abs();
    Ok(MonthComparison {
        current_month,
        current,
        previous_month,
        previous,
        difference,
    })
}

/// Spelling kept for callers of the old interface.
#[deprecated(note = "use month_comparison")]
pub fn month_comparasion(conn: &Connection, cfg: &AnalyticsConfig) -> LedgerResult<MonthComparison> {
    month_comparison(conn, cfg)
}

/// Mean, median, and mode of one month's expenses. The month is addressed
/// the way the old interface spelled it: `MM-YYYY`.
pub fn descriptive_stats(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    month: &str,
) -> LedgerResult<MonthlyStats> {
    let key = month_key_from_legacy(month)?;
    let entries: Vec<Entry> = load_entries(conn, cfg)?
        .into_iter()
        .filter(|e| month_key(e.date) == key)
        .collect();
    if entries.is_empty() {
        return Err(LedgerError::NoData(format!("no expenses in {}", month)));
    }

    let mut costs: Vec<Decimal> = entries.iter().map(|e| e.cost).collect();
    costs.sort();
    let n = costs.len();
    let total: Decimal = costs.iter().sum();
    let mean = (total / Decimal::from(n as u64)).round_dp(2);
    let median = if n % 2 == 1 {
        costs[n / 2]
    } else {
        ((costs[n / 2 - 1] + costs[n / 2]) / Decimal::TWO).round_dp(2)
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for e in &entries {
        match counts.iter_mut().find(|(name, _)| *name == e.name) {
            Some((_, c)) => *c += 1,
            None => counts.push((e.name.clone(), 1)),
        }
    }
    let mut mode: Option<(&str, usize)> = None;
    for (name, c) in &counts {
        // Strict comparison keeps the first-recorded name on ties.
        if *c > 1 && mode.map_or(true, |(_, best)| *c > best) {
            mode = Some((name.as_str(), *c));
        }
    }

    Ok(MonthlyStats {
        month: month.to_string(),
        mean,
        median,
        mode: mode.map(|(name, _)| name.to_string()),
    })
}

/// Mean of per-month totals over the months that have expenses.
pub fn avg_monthly_expense(conn: &Connection, cfg: &AnalyticsConfig) -> LedgerResult<Decimal> {
    let mut months: BTreeMap<String, Decimal> = BTreeMap::new();
    for e in load_entries(conn, cfg)? {
        *months.entry(month_key(e.date)).or_insert(Decimal::ZERO) += e.cost;
    }
    if months.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let total: Decimal = months.values().copied().sum();
    Ok((total / Decimal::from(months.len() as u64)).round_dp(2))
}

/// Is one category's weekly spend drifting from its own recent history?
/// Seven-day buckets ending today, zero-filled: `baseline_weeks` buckets form
/// the history, the `current_weeks` after them the present. The current mean
/// is z-scored against the baseline; beyond the 95% band counts as drift.
pub fn category_drift(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    category_id: i64,
    baseline_weeks: usize,
    current_weeks: usize,
) -> LedgerResult<DriftReport> {
    category_drift_as_of(
        conn,
        cfg,
        category_id,
        baseline_weeks,
        current_weeks,
        Local::now().date_naive(),
    )
}

pub fn category_drift_as_of(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    category_id: i64,
    baseline_weeks: usize,
    current_weeks: usize,
    today: NaiveDate,
) -> LedgerResult<DriftReport> {
    if baseline_weeks < 2 {
        return Err(LedgerError::InvalidInput(
            "baseline must span at least 2 weeks".into(),
        ));
    }
    if current_weeks < 1 {
        return Err(LedgerError::InvalidInput(
            "current window must span at least 1 week".into(),
        ));
    }
    categories::ensure_exists(conn, category_id)?;

    let total = baseline_weeks + current_weeks;
    let mut buckets = vec![0f64; total];
    let mut any = false;
    for e in load_entries(conn, cfg)? {
        if e.category_id != Some(category_id) {
            continue;
        }
        let days_ago = (today - e.date).num_days();
        if days_ago < 0 || days_ago >= (7 * total) as i64 {
            continue;
        }
        // Index 0 is the most recent seven days.
        let idx = (days_ago / 7) as usize;
        buckets[idx] += e.cost.to_f64().unwrap_or_default();
        any = true;
    }
    if !any {
        return Err(LedgerError::NoData(format!(
            "no expenses for category {} in the last {} weeks",
            category_id, total
        )));
    }

    let current = &buckets[..current_weeks];
    let baseline = &buckets[current_weeks..];
    let baseline_mean = baseline.iter().sum::<f64>() / baseline.len() as f64;
    let variance = baseline
        .iter()
        .map(|x| (x - baseline_mean).powi(2))
        .sum::<f64>()
        / (baseline.len() - 1) as f64;
    let baseline_stddev = variance.sqrt();
    let current_rate = current.iter().sum::<f64>() / current.len() as f64;

    let (deviation, is_drifting) = if baseline_stddev == 0.0 {
        if current_rate == baseline_mean {
            (0.0, false)
        } else {
            ((current_rate - baseline_mean).signum() * f64::INFINITY, true)
        }
    } else {
        let z = (current_rate - baseline_mean) / (baseline_stddev / (current_weeks as f64).sqrt());
        (z, z.abs() > DRIFT_Z)
    };

    Ok(DriftReport {
        category_id,
        baseline_mean,
        baseline_stddev,
        current_rate,
        deviation,
        is_drifting,
    })
}

/// Per-category limit vs spend for one `YYYY-MM` month. Categories without
/// a monthly limit are left out.
pub fn budget_report(
    conn: &Connection,
    cfg: &AnalyticsConfig,
    month: &str,
) -> LedgerResult<Vec<BudgetLine>> {
    if !valid_month_key(month) {
        return Err(LedgerError::InvalidInput(format!(
            "invalid month '{}', expected YYYY-MM",
            month
        )));
    }
    let mut spent: BTreeMap<i64, Decimal> = BTreeMap::new();
    for e in load_entries(conn, cfg)? {
        if month_key(e.date) != month {
            continue;
        }
        if let Some(cat_id) = e.category_id {
            *spent.entry(cat_id).or_insert(Decimal::ZERO) += e.cost;
        }
    }
    let mut out = Vec::new();
    for cat in categories::get_all_categories(conn)? {
        let Some(limit) = cat.limit_amount else {
            continue;
        };
        let used = spent.get(&cat.id).copied().unwrap_or(Decimal::ZERO);
        out.push(BudgetLine {
            category: cat.name,
            limit,
            spent: used,
            remaining: limit - used,
        });
    }
    Ok(out)
}

pub(crate) fn valid_month_key(s: &str) -> bool {
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_ok() && s.len() == 7
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn month_key_from_legacy(s: &str) -> LedgerResult<String> {
    let invalid = || {
        LedgerError::InvalidInput(format!("invalid month '{}', expected MM-YYYY", s))
    };
    let (mm, yyyy) = s.split_once('-').ok_or_else(invalid)?;
    if yyyy.len() != 4 {
        return Err(invalid());
    }
    let m: u32 = mm.parse().map_err(|_| invalid())?;
    let y: i32 = yyyy.parse().map_err(|_| invalid())?;
    if NaiveDate::from_ymd_opt(y, m, 1).is_none() {
        return Err(invalid());
    }
    Ok(format!("{:04}-{:02}", y, m))
}

fn load_entries(conn: &Connection, cfg: &AnalyticsConfig) -> LedgerResult<Vec<Entry>> {
    let mut stmt = conn.prepare(
        "SELECT e.name, e.category_id, e.cost, e.date, e.wallet_id, IFNULL(c.kind, 0)
         FROM expense e LEFT JOIN category c ON e.category_id=c.id
         WHERE e.reversed=0 ORDER BY e.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, Option<i64>>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, NaiveDate>(3)?,
            r.get::<_, Option<i64>>(4)?,
            r.get::<_, i64>(5)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (name, category_id, cost, date, wallet_id, kind) = row?;
        if cfg.exclude_fixed && kind == 1 {
            continue;
        }
        if let Some(w) = cfg.wallet_id {
            if wallet_id != Some(w) {
                continue;
            }
        }
        if cfg.skip_months.contains(&month_key(date)) {
            continue;
        }
        out.push(Entry {
            name,
            category_id,
            cost: parse_amount(&cost)?,
            date,
        });
    }
    Ok(out)
}
