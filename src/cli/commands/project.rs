use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use common::LedgerEntryDto;
use compute::horizon::HorizonPolicy;
use compute::ledger::{BalanceSheet, Projector};
use model::transaction::{OneOffTransaction, RecurringRule};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info, trace};

use crate::helpers::converters::entry_to_dto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Offline input for the projector.
///
/// ```yaml
/// starting_balance: "1000"
/// one_offs:
///   - { date: 2024-02-14, amount: "-80", name: Flowers }
/// recurring:
///   - { start_date: 2024-01-25, amount: "2500", base_period: monthly, is_salary: true }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub starting_balance: Decimal,
    #[serde(default)]
    pub one_offs: Vec<OneOffTransaction>,
    #[serde(default)]
    pub recurring: Vec<RecurringRule>,
}

impl ScenarioFile {
    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

pub async fn project(
    file: &Path,
    today: Option<NaiveDate>,
    horizon: HorizonPolicy,
    format: OutputFormat,
    salary_only: bool,
) -> Result<()> {
    trace!("Entering project function");
    let contents = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read scenario file {}", file.display()))?;
    let scenario = ScenarioFile::from_yaml(&contents)
        .with_context(|| format!("Failed to parse scenario file {}", file.display()))?;
    debug!(
        "Loaded {} one-offs and {} recurring rules",
        scenario.one_offs.len(),
        scenario.recurring.len()
    );

    let today = today.unwrap_or_else(|| Utc::now().date_naive());
    let sheet = Projector::new(today, horizon).project(
        scenario.starting_balance,
        &scenario.one_offs,
        &scenario.recurring,
    )?;
    info!(
        "Projected {} entries up to {:?}",
        sheet.len(),
        sheet.horizon_end
    );

    println!("{}", render(&sheet, format, salary_only)?);
    Ok(())
}

/// Renders the sheet, or only its salary entries when `salary_only` is set.
pub fn render(sheet: &BalanceSheet, format: OutputFormat, salary_only: bool) -> Result<String> {
    let entries: Vec<LedgerEntryDto> = if salary_only {
        sheet.salary_entries().map(entry_to_dto).collect()
    } else {
        sheet.entries.iter().map(entry_to_dto).collect()
    };

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
        OutputFormat::Table => Ok(render_table(sheet, &entries)),
    }
}

fn render_table(sheet: &BalanceSheet, entries: &[LedgerEntryDto]) -> String {
    let mut out = String::new();
    let horizon = sheet
        .horizon_end
        .map(|date| date.to_string())
        .unwrap_or_else(|| "unbounded".to_string());

    let _ = writeln!(
        out,
        "Projection from {} to {}, opening balance {}",
        sheet.today, horizon, sheet.opening_balance
    );
    let _ = writeln!(
        out,
        "{:<12}{:>14}{:>14}{:>14}  {}",
        "date", "amount", "balance", "unallocated", "name"
    );
    for entry in entries {
        let unallocated = entry
            .unallocated
            .map(|amount| amount.to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<12}{:>14}{:>14}{:>14}  {}",
            entry.date.to_string(),
            entry.amount.to_string(),
            entry.balance.to_string(),
            unallocated,
            entry.name.as_deref().unwrap_or("")
        );
    }
    let _ = write!(out, "Closing balance {}", sheet.closing_balance());
    out
}
