use common::{BalanceSheetDto, EntryKind, FinancialPlannerDto, LedgerEntryDto};
use compute::ledger::{BalanceSheet, EntrySource, ProjectedEntry};

/// Converts a projected entry into its transport shape
pub fn entry_to_dto(entry: &ProjectedEntry) -> LedgerEntryDto {
    let (kind, source_id) = match entry.source() {
        EntrySource::OneOff(id) => (EntryKind::OneOff, id),
        EntrySource::Recurring(id) => (EntryKind::Recurring, id),
    };

    LedgerEntryDto {
        date: entry.date(),
        amount: entry.amount(),
        name: entry.name().map(str::to_owned),
        is_salary: entry.is_salary(),
        kind,
        source_id,
        balance: entry.balance(),
        unallocated: entry.unallocated(),
    }
}

pub fn sheet_to_dto(user_id: i32, sheet: &BalanceSheet) -> BalanceSheetDto {
    BalanceSheetDto {
        user_id,
        today: sheet.today,
        horizon_end: sheet.horizon_end,
        opening_balance: sheet.opening_balance,
        closing_balance: sheet.closing_balance(),
        entries: sheet.entries.iter().map(entry_to_dto).collect(),
    }
}

/// Keeps only the salary entries of `sheet`
pub fn sheet_to_planner_dto(user_id: i32, sheet: &BalanceSheet) -> FinancialPlannerDto {
    FinancialPlannerDto {
        user_id,
        today: sheet.today,
        horizon_end: sheet.horizon_end,
        salaries: sheet.salary_entries().map(entry_to_dto).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use compute::horizon::HorizonPolicy;
    use compute::ledger::Projector;
    use model::transaction::{BasePeriod, OneOffTransaction, RecurringRule};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_sheet() -> BalanceSheet {
        let projector = Projector::new(date(2024, 1, 1), HorizonPolicy::Until(date(2024, 2, 28)));
        let one_offs = vec![OneOffTransaction::new(date(2024, 1, 5), Decimal::new(-40, 0), 1).with_id(9)];
        let rules = vec![
            RecurringRule::new(date(2024, 1, 25), Decimal::new(1000, 0), BasePeriod::Monthly, 1, 1)
                .named("Salary")
                .as_salary()
                .with_id(4),
        ];

        projector.project(Decimal::new(100, 0), &one_offs, &rules).unwrap()
    }

    #[test]
    fn test_sheet_to_dto() {
        let dto = sheet_to_dto(1, &sample_sheet());

        assert_eq!(dto.user_id, 1);
        assert_eq!(dto.horizon_end, Some(date(2024, 2, 28)));
        assert_eq!(dto.opening_balance, Decimal::new(100, 0));
        assert_eq!(dto.closing_balance, Decimal::new(2060, 0));
        assert_eq!(dto.entries.len(), 3);

        assert_eq!(dto.entries[0].kind, EntryKind::OneOff);
        assert_eq!(dto.entries[0].source_id, Some(9));
        assert_eq!(dto.entries[1].kind, EntryKind::Recurring);
        assert_eq!(dto.entries[1].source_id, Some(4));
        assert_eq!(dto.entries[1].name.as_deref(), Some("Salary"));
        assert_eq!(dto.entries[2].unallocated, Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn test_planner_keeps_salaries_only() {
        let dto = sheet_to_planner_dto(1, &sample_sheet());

        assert_eq!(dto.salaries.len(), 2);
        assert!(dto.salaries.iter().all(|entry| entry.is_salary));
        assert_eq!(dto.salaries[0].unallocated, None);
    }
}
