use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use crate::error::ComputeError;

/// How far into the future a projection materializes occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonPolicy {
    /// `n` years after today, clamped to the month end (Feb 29 + 1y = Feb 28).
    YearsAhead(u32),
    /// December 31st of the current year.
    EndOfYear,
    /// A fixed calendar date.
    Until(NaiveDate),
}

impl Default for HorizonPolicy {
    fn default() -> Self {
        HorizonPolicy::YearsAhead(1)
    }
}

impl HorizonPolicy {
    /// The last date included in a projection run on `today`.
    ///
    /// `None` means the arithmetic left the calendar; callers treat it as unbounded.
    pub fn resolve(&self, today: NaiveDate) -> Option<NaiveDate> {
        match *self {
            HorizonPolicy::YearsAhead(years) => {
                today.checked_add_months(Months::new(years.checked_mul(12)?))
            }
            HorizonPolicy::EndOfYear => NaiveDate::from_ymd_opt(today.year(), 12, 31),
            HorizonPolicy::Until(date) => Some(date),
        }
    }
}

impl fmt::Display for HorizonPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HorizonPolicy::YearsAhead(years) => write!(f, "{}y", years),
            HorizonPolicy::EndOfYear => write!(f, "end-of-year"),
            HorizonPolicy::Until(date) => write!(f, "{}", date),
        }
    }
}

/// Largest `<n>y` horizon accepted from configuration.
pub const MAX_YEARS_AHEAD: u32 = 100;

/// Parses `"<n>y"`, `"end-of-year"` or an ISO date (`"2025-12-31"`).
/// Year counts above [`MAX_YEARS_AHEAD`] are rejected.
impl FromStr for HorizonPolicy {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("end-of-year") {
            return Ok(HorizonPolicy::EndOfYear);
        }
        if let Some(years) = s.strip_suffix('y').or_else(|| s.strip_suffix('Y')) {
            let years = years
                .parse::<u32>()
                .map_err(|e| ComputeError::Date(format!("Invalid horizon '{}': {}", s, e)))?;
            if years > MAX_YEARS_AHEAD {
                return Err(ComputeError::Date(format!(
                    "Invalid horizon '{}': at most {} years ahead",
                    s, MAX_YEARS_AHEAD
                )));
            }
            return Ok(HorizonPolicy::YearsAhead(years));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(HorizonPolicy::Until)
            .map_err(|e| ComputeError::Date(format!("Invalid horizon '{}': {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::helpers::date;

    #[test]
    fn test_default_is_one_year_ahead() {
        let policy = HorizonPolicy::default();
        assert_eq!(policy, HorizonPolicy::YearsAhead(1));
        assert_eq!(policy.resolve(date(2023, 6, 15)), Some(date(2024, 6, 15)));
        assert_eq!(policy.resolve(date(2024, 2, 29)), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_end_of_year_and_fixed() {
        assert_eq!(HorizonPolicy::EndOfYear.resolve(date(2023, 1, 1)), Some(date(2023, 12, 31)));
        assert_eq!(
            HorizonPolicy::Until(date(2030, 5, 5)).resolve(date(2023, 1, 1)),
            Some(date(2030, 5, 5))
        );
    }

    #[test]
    fn test_overflow_resolves_to_unbounded() {
        assert_eq!(HorizonPolicy::YearsAhead(u32::MAX).resolve(date(2023, 1, 1)), None);
        assert_eq!(HorizonPolicy::YearsAhead(1).resolve(NaiveDate::MAX), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("2y".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::YearsAhead(2));
        assert_eq!("end-of-year".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::EndOfYear);
        assert_eq!(
            " 2025-12-31 ".parse::<HorizonPolicy>().unwrap(),
            HorizonPolicy::Until(date(2025, 12, 31))
        );
        assert!("soon".parse::<HorizonPolicy>().is_err());
        assert!("-1y".parse::<HorizonPolicy>().is_err());

        assert_eq!("100y".parse::<HorizonPolicy>().unwrap(), HorizonPolicy::YearsAhead(100));
        assert!("101y".parse::<HorizonPolicy>().is_err());
        assert!("100000y".parse::<HorizonPolicy>().is_err());

        for policy in [HorizonPolicy::YearsAhead(3), HorizonPolicy::EndOfYear] {
            assert_eq!(policy.to_string().parse::<HorizonPolicy>().unwrap(), policy);
        }
    }
}
