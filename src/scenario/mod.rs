//! Per-month P&L scenario computation across the settlement calendar

mod engine;
mod series;

pub use engine::ScenarioEngine;
pub use series::{MonthPl, ScenarioResult, ScenarioRow, ScenarioSummary};
