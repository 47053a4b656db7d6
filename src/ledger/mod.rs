//! General-ledger import: header detection, row extraction, FX P&L aggregation

mod parser;
mod summary;

pub use parser::{parse_ledger, LedgerRow, LedgerSchema, HEADER_SCAN_ROWS};
pub use summary::LedgerSummary;
