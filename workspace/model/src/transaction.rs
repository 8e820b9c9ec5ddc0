use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::{one_off_transaction, recurring_transaction};

pub use crate::entities::recurring_transaction::BasePeriod;

/// Identifier of the user owning a transaction or rule.
pub type OwnerId = i32;

/// Represents a single dated amount owned by one user.
///
/// Positive amounts are credits, negative amounts are debits.
/// Stored one-offs carry their database id, ad-hoc ones (scenario files, tests) do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneOffTransaction {
    #[serde(default)]
    id: Option<i32>,
    amount: Decimal,
    date: NaiveDate,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    owner: OwnerId,
    #[serde(default)]
    is_salary: bool,
}

impl OneOffTransaction {
    /// Creates a new one-off transaction.
    pub fn new(date: NaiveDate, amount: Decimal, owner: OwnerId) -> Self {
        Self {
            id: None,
            amount,
            date,
            name: None,
            owner,
            is_salary: false,
        }
    }

    /// Sets the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Flags the transaction as a salary payment.
    pub fn as_salary(mut self) -> Self {
        self.is_salary = true;
        self
    }

    /// Attaches the storage id.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
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
}

impl From<one_off_transaction::Model> for OneOffTransaction {
    fn from(model: one_off_transaction::Model) -> Self {
        Self {
            id: Some(model.id),
            amount: model.amount,
            date: model.date,
            name: model.name,
            owner: model.owner_id,
            is_salary: model.is_salary,
        }
    }
}

/// Why a recurring rule has a shape the evaluator cannot work with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleShapeError {
    #[error("frequency must be at least 1, got {0}")]
    NonPositiveFrequency(i32),

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

/// A template generating the same amount at a fixed interval.
///
/// The rule fires on `start_date` and then every `frequency` x `base_period`
/// until `end_date` (inclusive) if one is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    #[serde(default)]
    id: Option<i32>,
    amount: Decimal,
    start_date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    base_period: BasePeriod,
    #[serde(default = "default_frequency")]
    frequency: i32,
    #[serde(default)]
    is_salary: bool,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    owner: OwnerId,
}

fn default_frequency() -> i32 {
    1
}

impl RecurringRule {
    /// Creates a new open-ended rule.
    pub fn new(
        start_date: NaiveDate,
        amount: Decimal,
        base_period: BasePeriod,
        frequency: i32,
        owner: OwnerId,
    ) -> Self {
        Self {
            id: None,
            amount,
            start_date,
            end_date: None,
            base_period,
            frequency,
            is_salary: false,
            name: None,
            owner,
        }
    }

    /// Sets the last date the rule may fire on.
    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Sets the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Flags every occurrence as a salary payment.
    pub fn as_salary(mut self) -> Self {
        self.is_salary = true;
        self
    }

    /// Attaches the storage id.
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn base_period(&self) -> BasePeriod {
        self.base_period
    }

    pub fn frequency(&self) -> i32 {
        self.frequency
    }

    pub fn is_salary(&self) -> bool {
        self.is_salary
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// A rule is active on `date` while it has no end date or has not ended yet.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| end >= date)
    }

    /// Checks the shape invariants of the rule.
    pub fn validate(&self) -> Result<(), RuleShapeError> {
        if self.frequency < 1 {
            return Err(RuleShapeError::NonPositiveFrequency(self.frequency));
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RuleShapeError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }
        Ok(())
    }
}

impl From<recurring_transaction::Model> for RecurringRule {
    fn from(model: recurring_transaction::Model) -> Self {
        Self {
            id: Some(model.id),
            amount: model.amount,
            start_date: model.start_date,
            end_date: model.end_date,
            base_period: model.base_period,
            frequency: model.frequency,
            is_salary: model.is_salary,
            name: model.name,
            owner: model.owner_id,
        }
    }
}
