use chrono::NaiveDate;
use model::transaction::{OneOffTransaction, OwnerId, RecurringRule};
use rust_decimal::Decimal;

/// Where a projected entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// A one-off transaction, with its storage id if it has one.
    OneOff(Option<i32>),
    /// An occurrence of a recurring rule, with the rule's storage id if it has one.
    Recurring(Option<i32>),
}

/// A single line of the projected ledger.
///
/// Entries are created fresh for every projection and carry the running
/// balance after their own amount has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedEntry {
    pub(crate) date: NaiveDate,
    pub(crate) amount: Decimal,
    pub(crate) name: Option<String>,
    pub(crate) owner: OwnerId,
    pub(crate) is_salary: bool,
    pub(crate) source: EntrySource,
    pub(crate) balance: Decimal,
    pub(crate) unallocated: Option<Decimal>,
}

impl ProjectedEntry {
    /// Projects a one-off transaction as is.
    pub fn from_one_off(transaction: &OneOffTransaction) -> Self {
        Self {
            date: transaction.date(),
            amount: transaction.amount(),
            name: transaction.name().map(str::to_owned),
            owner: transaction.owner(),
            is_salary: transaction.is_salary(),
            source: EntrySource::OneOff(transaction.id()),
            balance: Decimal::ZERO,
            unallocated: None,
        }
    }

    /// Materializes the occurrence of `rule` on `date`.
    pub fn from_rule(rule: &RecurringRule, date: NaiveDate) -> Self {
        Self {
            date,
            amount: rule.amount(),
            name: rule.name().map(str::to_owned),
            owner: rule.owner(),
            is_salary: rule.is_salary(),
            source: EntrySource::Recurring(rule.id()),
            balance: Decimal::ZERO,
            unallocated: None,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn is_salary(&self) -> bool {
        self.is_salary
    }

    pub fn source(&self) -> EntrySource {
        self.source
    }

    /// Running balance after this entry.
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Funds accrued since the previous salary entry; only set on salary entries
    /// that have a predecessor.
    pub fn unallocated(&self) -> Option<Decimal> {
        self.unallocated
    }
}
