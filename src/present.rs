//! Chart-ready output shaping
//!
//! The engine hands the rendering layer plain series plus an explicit
//! chronological sort order. Chart libraries sort categorical axes
//! lexicographically by default, which breaks Korean month labels across
//! year boundaries ("2025년 9월" vs "2025년 10월"), so the sort order is
//! part of the output contract rather than a rendering concern.

use serde::{Deserialize, Serialize};

use crate::calendar::SettlementCalendar;
use crate::contract::ContractInputs;
use crate::ledger::LedgerSummary;
use crate::scenario::ScenarioResult;

/// Whether a headline P&L reads as profit or loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlSign {
    Profit,
    Loss,
}

impl PlSign {
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            PlSign::Loss
        } else {
            PlSign::Profit
        }
    }
}

/// Headline metric for the selected settlement month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadlineMetric {
    pub label: String,
    pub value: f64,
    pub sign: PlSign,
}

/// One charted point of the scenario P&L series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPoint {
    pub month_label: String,
    pub total_pl: f64,
    pub valuation_pl: f64,
    pub transaction_pl: f64,
}

/// Which series a rate point belongs to on the rate-trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateKind {
    /// The fixed contract rate, drawn flat across the contract period
    Contract,
    /// A month-end valuation rate observed in the uploaded ledger
    Realized,
}

/// One charted point of the rate-comparison series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatePoint {
    pub month_label: String,
    pub rate: f64,
    pub kind: RateKind,
}

/// One charted point of the ledger FX P&L comparison series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerPoint {
    pub month_label: String,
    pub fx_pl: f64,
}

/// Everything one recompute pass hands to the rendering layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    /// Withheld (with a warning) when the selected month is unresolved
    pub headline: Option<HeadlineMetric>,
    /// User-facing, non-blocking warnings accumulated during the pass
    pub warnings: Vec<String>,
    /// Resolved months only; unresolved months are excluded from the
    /// charted series rather than plotted as zero P&L
    pub scenario_series: Vec<ScenarioPoint>,
    /// Every calendar month label in chronological order, for categorical
    /// axis sorting
    pub sort_order: Vec<String>,
    pub rate_series: Vec<RatePoint>,
    /// Present only when a ledger upload contributed in-window months
    pub ledger_series: Vec<LedgerPoint>,
}

/// Shape scenario and ledger results into the chart contract
pub fn build_output(
    inputs: &ContractInputs,
    calendar: &SettlementCalendar,
    scenario: &ScenarioResult,
    ledger: Option<&LedgerSummary>,
) -> AnalysisOutput {
    let mut warnings = Vec::new();

    let headline = match scenario.row(inputs.selected_month) {
        Some(row) if row.resolved => Some(HeadlineMetric {
            label: row.month.label(),
            value: row.total_pl,
            sign: PlSign::of(row.total_pl),
        }),
        _ => {
            warnings.push(format!(
                "{}의 예상 결산 환율이 입력되지 않아 평가손익을 계산할 수 없습니다.",
                inputs.selected_month.label()
            ));
            None
        }
    };

    let unresolved = scenario.unresolved_months();
    if !unresolved.is_empty() {
        let labels: Vec<String> = unresolved.iter().map(|m| m.label()).collect();
        warnings.push(format!(
            "예상 결산 환율이 없는 월은 차트에서 제외됩니다: {}",
            labels.join(", ")
        ));
    }

    let scenario_series = scenario
        .rows
        .iter()
        .filter(|row| row.resolved)
        .map(|row| ScenarioPoint {
            month_label: row.month.label(),
            total_pl: row.total_pl,
            valuation_pl: row.valuation_pl,
            transaction_pl: row.transaction_pl,
        })
        .collect();

    let mut rate_series: Vec<RatePoint> = calendar
        .months()
        .iter()
        .map(|month| RatePoint {
            month_label: month.label(),
            rate: inputs.terms.contract_rate,
            kind: RateKind::Contract,
        })
        .collect();

    let mut ledger_series = Vec::new();
    if let Some(summary) = ledger {
        let mut realized = 0usize;
        for &month in calendar.months() {
            if let Some(rate) = summary.rate_for(month) {
                rate_series.push(RatePoint {
                    month_label: month.label(),
                    rate,
                    kind: RateKind::Realized,
                });
                realized += 1;
            }
            if let Some(fx_pl) = summary.fx_pl_for(month) {
                ledger_series.push(LedgerPoint {
                    month_label: month.label(),
                    fx_pl,
                });
            }
        }
        if realized == 0 {
            warnings.push(
                "업로드된 원장에서 계약기간 내 유효한 외화평가 환율을 찾지 못했습니다."
                    .to_string(),
            );
        }
    }

    AnalysisOutput {
        headline,
        warnings,
        scenario_series,
        sort_order: calendar.labels(),
        rate_series,
        ledger_series,
    }
}
