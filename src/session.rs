//! Session state and the recompute entry point
//!
//! The host application owns one [`AnalysisSession`] per user session and
//! calls [`AnalysisSession::recompute`] on every input delta. The session
//! carries the only mutable state — the rate curve and the latest ledger
//! summary; the recompute pass itself is pure with respect to its inputs
//! plus that state, so identical inputs always produce identical output.

use log::{info, warn};
use std::io::Read;

use crate::calendar::{MonthKey, SettlementCalendar};
use crate::contract::ContractInputs;
use crate::error::{LedgerError, ValidationError};
use crate::ledger::{parse_ledger, LedgerSchema, LedgerSummary};
use crate::present::{build_output, AnalysisOutput};
use crate::rates::RateCurve;
use crate::scenario::ScenarioEngine;

/// Mutable state scoped to one user session
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    curve: RateCurve,
    schema: LedgerSchema,
    /// Restricts monthly-rate selection to one transaction currency
    currency_filter: Option<String>,
    ledger: Option<LedgerSummary>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::with_curve(RateCurve::new())
    }

    /// Session whose rate curve starts from a configured seed
    pub fn with_curve(curve: RateCurve) -> Self {
        Self {
            curve,
            schema: LedgerSchema::default(),
            currency_filter: None,
            ledger: None,
        }
    }

    pub fn with_schema(mut self, schema: LedgerSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_currency_filter(mut self, code: impl Into<String>) -> Self {
        self.currency_filter = Some(code.into());
        self
    }

    pub fn rate_curve(&self) -> &RateCurve {
        &self.curve
    }

    pub fn ledger(&self) -> Option<&LedgerSummary> {
        self.ledger.as_ref()
    }

    /// Record a hypothetical forward rate edit; `None` resets to the seed
    ///
    /// The expiry month settles at the realized spot rate and never takes a
    /// hypothetical rate, so edits to it are rejected against the current
    /// calendar. Curve entries for months outside the calendar (left over
    /// from a prior contract) stay in place but are never read.
    pub fn set_rate(
        &mut self,
        calendar: &SettlementCalendar,
        month: MonthKey,
        rate: Option<f64>,
    ) -> Result<(), ValidationError> {
        if calendar.is_expiry_month(month) {
            return Err(ValidationError::ExpiryMonthRateEdit { month });
        }
        self.curve.set(month, rate);
        Ok(())
    }

    /// Parse and aggregate a freshly uploaded ledger stream
    ///
    /// On failure the previous summary is dropped (the import is fatal for
    /// the ledger comparison only) and the error propagates for display.
    pub fn upload_ledger<R: Read>(&mut self, reader: R) -> Result<(), LedgerError> {
        self.ledger = None;
        let rows = parse_ledger(reader, &self.schema)?;
        let summary = LedgerSummary::from_rows(&rows, &self.schema, self.currency_filter.as_deref());
        self.ledger = Some(summary);
        Ok(())
    }

    pub fn clear_ledger(&mut self) {
        self.ledger = None;
    }

    /// One full analysis pass: validate, rebuild the calendar, run the
    /// scenario engine, shape the output
    ///
    /// The settlement calendar is rebuilt from scratch every time — the
    /// computation is O(months in the contract), so there is nothing worth
    /// invalidating selectively.
    pub fn recompute(&self, inputs: &ContractInputs) -> Result<AnalysisOutput, ValidationError> {
        inputs.validate()?;
        let calendar = inputs.terms.settlement_calendar()?;
        if !calendar.contains(inputs.selected_month) {
            return Err(ValidationError::MonthOutOfRange {
                month: inputs.selected_month,
            });
        }

        let engine =
            ScenarioEngine::new(&inputs.terms, &calendar, &self.curve, inputs.end_spot_rate);
        let scenario = engine.run();

        let unresolved = scenario.unresolved_months();
        if !unresolved.is_empty() {
            warn!(
                "{} of {} settlement months have no hypothetical rate",
                unresolved.len(),
                calendar.len()
            );
        }
        info!(
            "recomputed {} settlement months ({} resolved)",
            calendar.len(),
            calendar.len() - unresolved.len()
        );

        Ok(build_output(inputs, &calendar, &scenario, self.ledger.as_ref()))
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}
