//! Common transport-layer types shared between the API, the CLI and their tests.
//! These structs mirror the handlers' request/response payloads so consumers can
//! deserialize API responses without duplicating shapes.

mod ledger;

pub use ledger::{BalanceDto, BalanceSheetDto, EntryKind, FinancialPlannerDto, LedgerEntryDto};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}
