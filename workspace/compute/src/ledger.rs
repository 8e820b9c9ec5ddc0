pub mod entry;
pub mod sheet;

pub use entry::{EntrySource, ProjectedEntry};
pub use sheet::BalanceSheet;

use chrono::NaiveDate;
use model::repository::TransactionRepository;
use model::transaction::{OneOffTransaction, OwnerId, RecurringRule};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::horizon::HorizonPolicy;
use crate::recurrence::evaluate;

/// Builds the projected ledger for one owner's transactions.
///
/// Past one-offs, ended rules and past occurrences are dropped relative to `today`.
/// Everything left is sorted by (date, amount), annotated with the running balance
/// starting at `starting_balance`, and salary entries get their unallocated amount.
pub fn project(
    starting_balance: Decimal,
    one_offs: &[OneOffTransaction],
    recurring_rules: &[RecurringRule],
    horizon_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Vec<ProjectedEntry>> {
    build_entries(starting_balance, one_offs, recurring_rules, horizon_end, today, true)
}

fn build_entries(
    starting_balance: Decimal,
    one_offs: &[OneOffTransaction],
    recurring_rules: &[RecurringRule],
    horizon_end: Option<NaiveDate>,
    today: NaiveDate,
    with_unallocated: bool,
) -> Result<Vec<ProjectedEntry>> {
    let mut entries = expand(one_offs, recurring_rules, horizon_end, today)?;
    sort_entries(&mut entries);
    fold_balance(&mut entries, starting_balance);
    if with_unallocated {
        annotate_unallocated(&mut entries);
    }
    Ok(entries)
}

/// Merges upcoming one-offs with the upcoming occurrences of every active rule.
fn expand(
    one_offs: &[OneOffTransaction],
    recurring_rules: &[RecurringRule],
    horizon_end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Vec<ProjectedEntry>> {
    let mut entries: Vec<ProjectedEntry> = one_offs
        .iter()
        .filter(|transaction| transaction.date() >= today)
        .map(ProjectedEntry::from_one_off)
        .collect();
    trace!("Kept {} of {} one-off transactions", entries.len(), one_offs.len());

    for rule in recurring_rules.iter().filter(|rule| rule.is_active_on(today)) {
        let before = entries.len();
        entries.extend(
            evaluate(rule, horizon_end)?
                .skip_while(|date| *date < today)
                .map(|date| ProjectedEntry::from_rule(rule, date)),
        );
        trace!(
            "Recurring rule {:?} produced {} upcoming occurrences",
            rule.id(),
            entries.len() - before
        );
    }

    Ok(entries)
}

/// Orders entries by date, breaking ties by ascending amount.
///
/// Two stable passes: entries equal on both keys keep their input order
/// (one-offs before rule occurrences, rules in the order given).
fn sort_entries(entries: &mut [ProjectedEntry]) {
    entries.sort_by(|a, b| a.amount.cmp(&b.amount));
    entries.sort_by_key(|entry| entry.date);
}

fn fold_balance(entries: &mut [ProjectedEntry], starting_balance: Decimal) {
    let mut balance = starting_balance;
    for entry in entries.iter_mut() {
        balance += entry.amount;
        entry.balance = balance;
    }
}

/// Sets `unallocated` on every salary entry that follows another salary entry
/// to the balance accrued since that previous salary.
pub fn annotate_unallocated(entries: &mut [ProjectedEntry]) {
    let mut previous: Option<Decimal> = None;
    for entry in entries.iter_mut().filter(|entry| entry.is_salary) {
        entry.unallocated = previous.map(|previous| entry.balance - previous);
        previous = Some(entry.balance);
    }
}

/// Runs projections for a fixed "today" and horizon policy.
#[derive(Debug, Clone)]
pub struct Projector {
    today: NaiveDate,
    horizon: HorizonPolicy,
    annotate_unallocated: bool,
}

impl Projector {
    /// Creates a projector with the unallocated pass enabled.
    pub fn new(today: NaiveDate, horizon: HorizonPolicy) -> Self {
        Self {
            today,
            horizon,
            annotate_unallocated: true,
        }
    }

    /// Enables or disables the salary unallocated pass.
    pub fn with_unallocated(mut self, enabled: bool) -> Self {
        self.annotate_unallocated = enabled;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn horizon(&self) -> HorizonPolicy {
        self.horizon
    }

    /// The horizon policy resolved against `today`.
    pub fn horizon_end(&self) -> Option<NaiveDate> {
        self.horizon.resolve(self.today)
    }

    /// Projects an in-memory snapshot.
    #[instrument(
        skip(self, one_offs, recurring_rules),
        fields(today = %self.today, one_offs = one_offs.len(), rules = recurring_rules.len())
    )]
    pub fn project(
        &self,
        starting_balance: Decimal,
        one_offs: &[OneOffTransaction],
        recurring_rules: &[RecurringRule],
    ) -> Result<BalanceSheet> {
        let horizon_end = self.horizon_end();
        debug!("Projecting up to {:?} using policy {}", horizon_end, self.horizon);

        let entries = build_entries(
            starting_balance,
            one_offs,
            recurring_rules,
            horizon_end,
            self.today,
            self.annotate_unallocated,
        )?;

        let sheet = BalanceSheet {
            today: self.today,
            horizon_end,
            opening_balance: starting_balance,
            entries,
        };
        debug!(
            "Projection produced {} entries, closing balance {}",
            sheet.len(),
            sheet.closing_balance()
        );
        Ok(sheet)
    }

    /// Loads the owner's snapshot from `repository` and projects it.
    #[instrument(skip(self, repository), fields(today = %self.today))]
    pub async fn project_for_owner<R>(
        &self,
        repository: &R,
        owner: OwnerId,
        starting_balance: Decimal,
    ) -> Result<BalanceSheet>
    where
        R: TransactionRepository + ?Sized,
    {
        let one_offs = repository.one_offs_from(owner, self.today).await?;
        let recurring_rules = repository.active_rules(owner, self.today).await?;
        info!(
            "Projecting {} one-offs and {} recurring rules for owner {}",
            one_offs.len(),
            recurring_rules.len(),
            owner
        );

        self.project(starting_balance, &one_offs, &recurring_rules)
    }
}
