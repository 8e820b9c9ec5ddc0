//! Expansion of recurring rules into concrete occurrence dates.

use std::iter::FusedIterator;

use chrono::{Days, Months, NaiveDate};
use model::transaction::{BasePeriod, RecurringRule, RuleShapeError};
use tracing::trace;

use crate::error::{ComputeError, Result};

/// Distance between two consecutive occurrences of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Days(u64),
    Months(u64),
}

impl Step {
    /// Date of the `index`-th occurrence counted from `start`.
    ///
    /// Month arithmetic is anchored on `start`, so a rule starting on the 31st
    /// lands on the last day of short months without drifting afterwards.
    /// Returns `None` once the result is not representable.
    pub fn nth_from(&self, start: NaiveDate, index: u64) -> Option<NaiveDate> {
        match *self {
            Step::Days(days) => start.checked_add_days(Days::new(days.checked_mul(index)?)),
            Step::Months(months) => {
                let total = u32::try_from(months.checked_mul(index)?).ok()?;
                start.checked_add_months(Months::new(total))
            }
        }
    }
}

/// Extension trait mapping a base period onto its calendar step.
pub trait PeriodStep {
    /// The step for a rule repeating every `frequency` periods.
    fn step(&self, frequency: u32) -> Step;
}

impl PeriodStep for BasePeriod {
    fn step(&self, frequency: u32) -> Step {
        let frequency = u64::from(frequency);
        match self {
            BasePeriod::Daily => Step::Days(frequency),
            BasePeriod::Weekly => Step::Days(7 * frequency),
            BasePeriod::Monthly => Step::Months(frequency),
            BasePeriod::Quarterly => Step::Months(3 * frequency),
            BasePeriod::Annually => Step::Months(12 * frequency),
        }
    }
}

/// Lazy, ordered sequence of occurrence dates produced by [`evaluate`].
///
/// Cloning yields an independent cursor at the same position.
#[derive(Debug, Clone)]
pub struct Occurrences {
    start: NaiveDate,
    end: NaiveDate,
    step: Step,
    index: u64,
    exhausted: bool,
}

impl Occurrences {
    /// Last date this sequence may produce.
    pub fn effective_end(&self) -> NaiveDate {
        self.end
    }
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.exhausted {
            return None;
        }

        match self.step.nth_from(self.start, self.index) {
            Some(date) if date <= self.end => {
                match self.index.checked_add(1) {
                    Some(next) => self.index = next,
                    None => self.exhausted = true,
                }
                Some(date)
            }
            _ => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl FusedIterator for Occurrences {}

/// Last date a rule may fire on given an optional horizon.
///
/// Without a horizon and without an end date the rule is bounded only by the
/// calendar itself.
pub fn effective_end(rule: &RecurringRule, horizon_end: Option<NaiveDate>) -> NaiveDate {
    match (rule.end_date(), horizon_end) {
        (Some(end), Some(horizon)) => end.min(horizon),
        (Some(end), None) => end,
        (None, Some(horizon)) => horizon,
        (None, None) => NaiveDate::MAX,
    }
}

/// Expands `rule` into the dates it fires on, from its start date up to and
/// including `min(end_date, horizon_end)`.
///
/// A start date past the effective end yields an empty sequence. Running off
/// the representable calendar ends the sequence. A frequency below one is
/// rejected with [`ComputeError::InvalidRule`].
pub fn evaluate(rule: &RecurringRule, horizon_end: Option<NaiveDate>) -> Result<Occurrences> {
    let frequency = u32::try_from(rule.frequency())
        .ok()
        .filter(|frequency| *frequency >= 1)
        .ok_or_else(|| {
            ComputeError::invalid_rule(
                rule.id(),
                RuleShapeError::NonPositiveFrequency(rule.frequency()),
            )
        })?;

    let step = rule.base_period().step(frequency);
    let end = effective_end(rule, horizon_end);
    trace!(
        rule = ?rule.id(),
        start = %rule.start_date(),
        end = %end,
        ?step,
        "Evaluating recurring rule"
    );

    Ok(Occurrences {
        start: rule.start_date(),
        end,
        step,
        index: 0,
        exhausted: false,
    })
}
