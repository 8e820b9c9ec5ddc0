use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of record a ledger entry was produced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    OneOff,
    Recurring,
}

/// One line of a projected ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LedgerEntryDto {
    pub date: NaiveDate,
    /// Signed amount, positive for credits
    pub amount: Decimal,
    pub name: Option<String>,
    pub is_salary: bool,
    pub kind: EntryKind,
    /// Id of the stored one-off or recurring rule this entry came from
    pub source_id: Option<i32>,
    /// Running balance after this entry
    pub balance: Decimal,
    /// Balance accrued since the previous salary entry, salary entries only
    pub unallocated: Option<Decimal>,
}

/// Full projected ledger of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BalanceSheetDto {
    pub user_id: i32,
    pub today: NaiveDate,
    /// Last date occurrences were materialized for, `None` when unbounded
    pub horizon_end: Option<NaiveDate>,
    pub opening_balance: Decimal,
    pub closing_balance: Decimal,
    pub entries: Vec<LedgerEntryDto>,
}

/// Salary entries of a projection started from a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FinancialPlannerDto {
    pub user_id: i32,
    pub today: NaiveDate,
    pub horizon_end: Option<NaiveDate>,
    pub salaries: Vec<LedgerEntryDto>,
}

/// Starting balance the balance sheet is projected from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BalanceDto {
    pub user_id: i32,
    pub balance: Decimal,
}
