//! FX Hedge Analyzer - P&L engine for USD/KRW forward contracts
//!
//! This library provides:
//! - Tenor-based contract milestone derivation and settlement calendars
//! - Per-month valuation/expiry P&L scenarios over hypothetical rate curves
//! - Heuristic general-ledger import with FX translation P&L aggregation
//! - Chart-ready series shaping with explicit chronological sort orders

pub mod calendar;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod present;
pub mod rates;
pub mod scenario;
pub mod session;

// Re-export commonly used types
pub use calendar::{MonthKey, SettlementCalendar};
pub use contract::{ContractInputs, ContractTerms, RatePolicy, Tenor, TransactionType};
pub use error::{LedgerError, ValidationError};
pub use ledger::{LedgerSchema, LedgerSummary};
pub use present::AnalysisOutput;
pub use rates::RateCurve;
pub use scenario::{ScenarioEngine, ScenarioResult};
pub use session::AnalysisSession;
