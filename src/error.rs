//! Error taxonomy for contract validation and ledger imports
//!
//! Two families, matching how failures surface to the user:
//! - [`ValidationError`]: a user-correctable input problem. Blocks the
//!   analysis until the input is fixed.
//! - [`LedgerError`]: fatal for the ledger import only. The derivative-side
//!   analysis keeps working without the ledger comparison.

use crate::calendar::MonthKey;
use thiserror::Error;

/// User-correctable input errors that block a recompute pass
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("contract amount (USD) must be greater than zero")]
    NonPositiveAmount,

    #[error("contract rate must be greater than zero")]
    NonPositiveContractRate,

    #[error("{field} must be greater than zero")]
    NonPositiveRate { field: &'static str },

    #[error("tenor must be at least one day")]
    ZeroTenor,

    #[error("contract dates fall outside the supported calendar range")]
    DateOutOfRange,

    #[error("settlement month {month} is outside the contract period")]
    MonthOutOfRange { month: MonthKey },

    #[error(
        "contract rate {contract_rate:.2} exceeds the start spot rate {start_spot_rate:.2}; \
         a sell-forward on this pair is quoted below spot"
    )]
    ContractRateAboveSpot {
        contract_rate: f64,
        start_spot_rate: f64,
    },

    #[error("the expiry month {month} settles at the realized spot rate and cannot take a hypothetical rate")]
    ExpiryMonthRateEdit { month: MonthKey },
}

/// Errors that abort a ledger import
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("no header row found in the first {scanned} rows; expected the ledger column labels")]
    HeaderNotFound { scanned: usize },

    #[error("unparseable accounting date {value:?} at row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("failed to read ledger data: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read ledger stream: {0}")]
    Io(#[from] std::io::Error),
}
