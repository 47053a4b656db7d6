//! Contract terms, tenor selection, and input validation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_tenor, MonthKey, SettlementCalendar};
use crate::error::ValidationError;

/// Direction of the forward contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    /// Short forward: committed to sell USD at the contract rate at maturity
    SellForward,
    /// Long forward: committed to buy USD at the contract rate at maturity
    BuyForward,
}

impl TransactionType {
    /// The single sign rule shared by valuation and expiry P&L
    ///
    /// `other_rate` is the comparison rate: the hypothetical settlement
    /// forward rate for valuation, the realized end spot rate at expiry.
    /// Both paths go through here so the two can never disagree on sign.
    pub fn signed_pl(self, contract_rate: f64, other_rate: f64, amount_usd: f64) -> f64 {
        match self {
            TransactionType::SellForward => (contract_rate - other_rate) * amount_usd,
            TransactionType::BuyForward => (other_rate - contract_rate) * amount_usd,
        }
    }
}

/// Contracted duration of the forward
///
/// Month tenors and day tenors carry different date arithmetic (see
/// [`add_tenor`](crate::calendar::add_tenor)), so the distinction is kept in
/// the type rather than flattened to a day count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tenor {
    Days(u32),
    Months(u32),
}

impl Tenor {
    pub const ONE_WEEK: Tenor = Tenor::Days(7);

    pub fn years(n: u32) -> Tenor {
        Tenor::Months(n * 12)
    }

    /// The tenor choices offered by the input form, with display labels
    pub fn presets() -> [(&'static str, Tenor); 9] {
        [
            ("1주일", Tenor::ONE_WEEK),
            ("1개월", Tenor::Months(1)),
            ("2개월", Tenor::Months(2)),
            ("3개월", Tenor::Months(3)),
            ("6개월", Tenor::Months(6)),
            ("9개월", Tenor::Months(9)),
            ("1년", Tenor::years(1)),
            ("2년", Tenor::years(2)),
            ("3년", Tenor::years(3)),
        ]
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, Tenor::Days(0) | Tenor::Months(0))
    }
}

/// Terms of one forward contract, immutable per analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractTerms {
    pub transaction_type: TransactionType,
    pub amount_usd: f64,
    pub contract_rate: f64,
    pub start_date: NaiveDate,
    pub tenor: Tenor,
}

impl ContractTerms {
    /// Maturity date derived from start date + tenor
    pub fn end_date(&self) -> Result<NaiveDate, ValidationError> {
        add_tenor(self.start_date, self.tenor)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount_usd <= 0.0 {
            return Err(ValidationError::NonPositiveAmount);
        }
        if self.contract_rate <= 0.0 {
            return Err(ValidationError::NonPositiveContractRate);
        }
        if self.tenor.is_zero() {
            return Err(ValidationError::ZeroTenor);
        }
        Ok(())
    }

    /// Settlement months spanning the contract period
    pub fn settlement_calendar(&self) -> Result<SettlementCalendar, ValidationError> {
        let end_date = self.end_date()?;
        Ok(SettlementCalendar::build(self.start_date, end_date))
    }
}

/// Policy flags gating domain-assumption checks
///
/// The sell-forward rejection encodes the USD/KRW regime where forward
/// points are negative (contract rate below spot). A different pair or rate
/// regime may invert this, so it is a flag rather than a hard rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePolicy {
    pub reject_sell_contract_above_spot: bool,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            reject_sell_contract_above_spot: true,
        }
    }
}

/// Everything the form layer supplies for one recompute pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractInputs {
    pub terms: ContractTerms,
    pub start_spot_rate: f64,
    pub end_spot_rate: f64,
    /// Settlement month for the headline metric
    pub selected_month: MonthKey,
    #[serde(default)]
    pub policy: RatePolicy,
}

impl ContractInputs {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.terms.validate()?;
        if self.start_spot_rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate {
                field: "start spot rate",
            });
        }
        if self.end_spot_rate <= 0.0 {
            return Err(ValidationError::NonPositiveRate {
                field: "end spot rate",
            });
        }
        if self.policy.reject_sell_contract_above_spot
            && self.terms.transaction_type == TransactionType::SellForward
            && self.terms.contract_rate > self.start_spot_rate
        {
            return Err(ValidationError::ContractRateAboveSpot {
                contract_rate: self.terms.contract_rate,
                start_spot_rate: self.start_spot_rate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sell_terms() -> ContractTerms {
        ContractTerms {
            transaction_type: TransactionType::SellForward,
            amount_usd: 1_000_000.0,
            contract_rate: 1300.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            tenor: Tenor::Months(6),
        }
    }

    #[test]
    fn test_signed_pl_sign_symmetry() {
        let sell = TransactionType::SellForward.signed_pl(1300.0, 1280.0, 1_000_000.0);
        let buy = TransactionType::BuyForward.signed_pl(1300.0, 1280.0, 1_000_000.0);
        assert_relative_eq!(sell, -buy);
        assert_relative_eq!(sell, 20_000_000.0);
    }

    #[test]
    fn test_end_date_from_tenor() {
        let terms = sell_terms();
        assert_eq!(
            terms.end_date().unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
        );
    }

    #[test]
    fn test_validate_rejects_non_positive_inputs() {
        let mut terms = sell_terms();
        terms.amount_usd = 0.0;
        assert_eq!(terms.validate(), Err(ValidationError::NonPositiveAmount));

        let mut terms = sell_terms();
        terms.contract_rate = -1.0;
        assert_eq!(terms.validate(), Err(ValidationError::NonPositiveContractRate));

        let mut terms = sell_terms();
        terms.tenor = Tenor::Months(0);
        assert_eq!(terms.validate(), Err(ValidationError::ZeroTenor));
    }

    #[test]
    fn test_sell_forward_rate_policy() {
        let inputs = ContractInputs {
            terms: sell_terms(),
            start_spot_rate: 1290.0, // below the 1300 contract rate
            end_spot_rate: 1320.0,
            selected_month: MonthKey::new(2025, 7),
            policy: RatePolicy::default(),
        };
        assert!(matches!(
            inputs.validate(),
            Err(ValidationError::ContractRateAboveSpot { .. })
        ));

        // Same inputs pass once the policy flag is off
        let relaxed = ContractInputs {
            policy: RatePolicy {
                reject_sell_contract_above_spot: false,
            },
            ..inputs
        };
        assert!(relaxed.validate().is_ok());
    }

    #[test]
    fn test_buy_forward_ignores_sell_policy() {
        let mut terms = sell_terms();
        terms.transaction_type = TransactionType::BuyForward;
        let inputs = ContractInputs {
            terms,
            start_spot_rate: 1290.0,
            end_spot_rate: 1320.0,
            selected_month: MonthKey::new(2025, 7),
            policy: RatePolicy::default(),
        };
        assert!(inputs.validate().is_ok());
    }

    #[test]
    fn test_tenor_presets_cover_form_choices() {
        let presets = Tenor::presets();
        assert_eq!(presets.len(), 9);
        assert_eq!(presets[0].1, Tenor::Days(7));
        assert_eq!(presets[8].1, Tenor::Months(36));
        assert!(presets.iter().all(|(_, t)| !t.is_zero()));
    }
}
