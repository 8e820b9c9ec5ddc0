use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::entry::ProjectedEntry;

/// The result of one projection run: the ledger plus the parameters it was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSheet {
    /// The date past entries were cut off at.
    pub today: NaiveDate,
    /// Last date occurrences were materialized for; `None` if unbounded.
    pub horizon_end: Option<NaiveDate>,
    /// Balance before the first entry.
    pub opening_balance: Decimal,
    /// Chronologically sorted entries with running balances.
    pub entries: Vec<ProjectedEntry>,
}

impl BalanceSheet {
    /// Balance after the last entry, or the opening balance of an empty ledger.
    pub fn closing_balance(&self) -> Decimal {
        self.entries
            .last()
            .map_or(self.opening_balance, ProjectedEntry::balance)
    }

    /// Salary-flagged entries in ledger order, as shown by the planner view.
    pub fn salary_entries(&self) -> impl Iterator<Item = &ProjectedEntry> {
        self.entries.iter().filter(|entry| entry.is_salary())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
