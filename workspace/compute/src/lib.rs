pub mod error;
pub mod horizon;
pub mod ledger;
pub mod recurrence;

#[cfg(test)]
pub mod testing;

use chrono::{NaiveDate, Utc};
use horizon::HorizonPolicy;
use ledger::Projector;

/// Returns a default pre-configured projector that will be used most of the time.
///
/// This function uses the provided date as "today" or the current date if none is provided.
/// Projections reach one year ahead and annotate salary entries with their unallocated amount.
pub fn default_projector(today: Option<NaiveDate>) -> Projector {
    let today = today.unwrap_or_else(|| Utc::now().date_naive());

    Projector::new(today, HorizonPolicy::default())
}
