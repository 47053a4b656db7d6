//! Scenario output structures

use serde::{Deserialize, Serialize};

use crate::calendar::MonthKey;

/// P&L outcome for a single settlement month
///
/// Exactly one of the two computed variants applies per month: the expiry
/// month settles at the realized spot rate (`Transaction`), every other
/// month marks to a hypothetical forward rate (`Valuation`). A non-expiry
/// month with no positive hypothetical rate is `Unresolved` — the caller
/// must warn rather than substitute a zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MonthPl {
    /// Mark-to-market P&L at an interim settlement month
    Valuation(f64),
    /// Realized P&L at contract maturity
    Transaction(f64),
    /// No hypothetical rate set for an interim month
    Unresolved,
}

impl MonthPl {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, MonthPl::Unresolved)
    }

    /// The P&L value, when the month resolved
    pub fn value(&self) -> Option<f64> {
        match self {
            MonthPl::Valuation(v) | MonthPl::Transaction(v) => Some(*v),
            MonthPl::Unresolved => None,
        }
    }
}

/// One row of the scenario series
///
/// For resolved months exactly one of `valuation_pl` / `transaction_pl` is
/// nonzero and `total_pl` equals it. Unresolved months keep both at zero
/// with `resolved = false`; consumers must treat them as unset, not as zero
/// P&L.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub month: MonthKey,
    pub total_pl: f64,
    pub valuation_pl: f64,
    pub transaction_pl: f64,
    pub resolved: bool,
}

impl ScenarioRow {
    pub fn from_month_pl(month: MonthKey, pl: MonthPl) -> Self {
        match pl {
            MonthPl::Valuation(v) => Self {
                month,
                total_pl: v,
                valuation_pl: v,
                transaction_pl: 0.0,
                resolved: true,
            },
            MonthPl::Transaction(v) => Self {
                month,
                total_pl: v,
                valuation_pl: 0.0,
                transaction_pl: v,
                resolved: true,
            },
            MonthPl::Unresolved => Self {
                month,
                total_pl: 0.0,
                valuation_pl: 0.0,
                transaction_pl: 0.0,
                resolved: false,
            },
        }
    }
}

/// Full scenario series in settlement-calendar order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub rows: Vec<ScenarioRow>,
}

impl ScenarioResult {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, row: ScenarioRow) {
        self.rows.push(row);
    }

    pub fn row(&self, month: MonthKey) -> Option<&ScenarioRow> {
        self.rows.iter().find(|r| r.month == month)
    }

    /// Interim months still waiting on a hypothetical rate
    pub fn unresolved_months(&self) -> Vec<MonthKey> {
        self.rows
            .iter()
            .filter(|r| !r.resolved)
            .map(|r| r.month)
            .collect()
    }

    pub fn summary(&self) -> ScenarioSummary {
        let resolved: Vec<&ScenarioRow> = self.rows.iter().filter(|r| r.resolved).collect();
        ScenarioSummary {
            total_months: self.rows.len() as u32,
            resolved_months: resolved.len() as u32,
            unresolved_months: (self.rows.len() - resolved.len()) as u32,
            total_pl: resolved.iter().map(|r| r.total_pl).sum(),
            total_valuation_pl: resolved.iter().map(|r| r.valuation_pl).sum(),
            total_transaction_pl: resolved.iter().map(|r| r.transaction_pl).sum(),
        }
    }
}

impl Default for ScenarioResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary statistics over the resolved part of a scenario series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub total_months: u32,
    pub resolved_months: u32,
    pub unresolved_months: u32,
    pub total_pl: f64,
    pub total_valuation_pl: f64,
    pub total_transaction_pl: f64,
}
