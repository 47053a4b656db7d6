//! Per-month P&L computation over the settlement calendar

use crate::calendar::{MonthKey, SettlementCalendar};
use crate::contract::ContractTerms;
use crate::error::ValidationError;
use crate::rates::RateCurve;

use super::series::{MonthPl, ScenarioResult, ScenarioRow};

/// Computes valuation/expiry P&L for settlement months of one contract
///
/// Borrows the contract terms, the calendar built for them, and the
/// session's rate curve; a new engine is constructed on every recompute
/// pass (construction is free, the inputs are all borrowed).
pub struct ScenarioEngine<'a> {
    terms: &'a ContractTerms,
    calendar: &'a SettlementCalendar,
    curve: &'a RateCurve,
    end_spot_rate: f64,
}

impl<'a> ScenarioEngine<'a> {
    pub fn new(
        terms: &'a ContractTerms,
        calendar: &'a SettlementCalendar,
        curve: &'a RateCurve,
        end_spot_rate: f64,
    ) -> Self {
        Self {
            terms,
            calendar,
            curve,
            end_spot_rate,
        }
    }

    /// P&L for one settlement month
    ///
    /// The expiry month always settles at the realized end spot rate,
    /// regardless of what the rate curve holds for that key. Interim months
    /// mark to the curve's hypothetical rate when one is set, and come back
    /// `Unresolved` otherwise. A month outside the calendar is a validation
    /// error, never clamped.
    pub fn month_pl(&self, month: MonthKey) -> Result<MonthPl, ValidationError> {
        if !self.calendar.contains(month) {
            return Err(ValidationError::MonthOutOfRange { month });
        }
        Ok(self.month_pl_in_calendar(month))
    }

    fn month_pl_in_calendar(&self, month: MonthKey) -> MonthPl {
        if self.calendar.is_expiry_month(month) {
            MonthPl::Transaction(self.terms.transaction_type.signed_pl(
                self.terms.contract_rate,
                self.end_spot_rate,
                self.terms.amount_usd,
            ))
        } else if self.curve.is_resolved(month) {
            MonthPl::Valuation(self.terms.transaction_type.signed_pl(
                self.terms.contract_rate,
                self.curve.get(month),
                self.terms.amount_usd,
            ))
        } else {
            MonthPl::Unresolved
        }
    }

    /// Scenario series across the whole calendar, in calendar order
    pub fn run(&self) -> ScenarioResult {
        let mut result = ScenarioResult::new();
        for &month in self.calendar.months() {
            result.add_row(ScenarioRow::from_month_pl(
                month,
                self.month_pl_in_calendar(month),
            ));
        }
        result
    }
}
