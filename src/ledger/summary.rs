//! Monthly aggregation of parsed ledger rows

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::calendar::MonthKey;

use super::parser::{LedgerRow, LedgerSchema};

/// Per-month FX P&L and realized valuation rates from one ledger upload
///
/// Computed once per upload and immutable for the session. Keys are
/// [`MonthKey`]s, so iteration order is chronological without relying on
/// label formatting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Sum of FX translation gains/losses per accounting month
    pub monthly_fx_pl: BTreeMap<MonthKey, f64>,
    /// Chronologically last positive rate per accounting month
    pub monthly_rates: BTreeMap<MonthKey, f64>,
}

impl LedgerSummary {
    /// Aggregate parsed rows (noise rows already excluded by the parser)
    ///
    /// `currency_filter` restricts the monthly-rate selection to rows of one
    /// transaction currency; rows without a currency code are excluded when
    /// a filter is active. The FX P&L aggregation is never filtered.
    pub fn from_rows(
        rows: &[LedgerRow],
        schema: &LedgerSchema,
        currency_filter: Option<&str>,
    ) -> Self {
        let mut monthly_fx_pl: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for row in rows {
            let key = MonthKey::from_date(row.accounting_date);
            *monthly_fx_pl.entry(key).or_insert(0.0) += row.fx_pl(schema);
        }

        // Rows with non-positive rates carry no usable valuation rate and
        // are excluded from consideration, not treated as zero.
        let mut last_rates: BTreeMap<MonthKey, (NaiveDate, f64)> = BTreeMap::new();
        for row in rows {
            if row.rate <= 0.0 {
                continue;
            }
            if let Some(filter) = currency_filter {
                let matches = row
                    .currency_code
                    .as_deref()
                    .is_some_and(|code| code.trim().eq_ignore_ascii_case(filter.trim()));
                if !matches {
                    continue;
                }
            }
            let key = MonthKey::from_date(row.accounting_date);
            let entry = last_rates.entry(key).or_insert((row.accounting_date, row.rate));
            if row.accounting_date >= entry.0 {
                *entry = (row.accounting_date, row.rate);
            }
        }
        let monthly_rates = last_rates
            .into_iter()
            .map(|(key, (_, rate))| (key, rate))
            .collect();

        let summary = Self {
            monthly_fx_pl,
            monthly_rates,
        };
        info!(
            "ledger summary: {} months with FX P&L, {} months with valuation rates",
            summary.monthly_fx_pl.len(),
            summary.monthly_rates.len()
        );
        summary
    }

    pub fn fx_pl_for(&self, key: MonthKey) -> Option<f64> {
        self.monthly_fx_pl.get(&key).copied()
    }

    pub fn rate_for(&self, key: MonthKey) -> Option<f64> {
        self.monthly_rates.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::parse_ledger;
    use approx::assert_relative_eq;

    fn row(date: (i32, u32, u32), name: &str, debit: f64, credit: f64, rate: f64) -> LedgerRow {
        LedgerRow {
            accounting_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            account_name: name.to_string(),
            debit,
            credit,
            rate,
            currency_code: None,
        }
    }

    #[test]
    fn test_monthly_fx_pl_sums_gains_and_losses() {
        let schema = LedgerSchema::default();
        let rows = vec![
            row((2025, 3, 5), "외화환산이익", 0.0, 500_000.0, 1305.2),
            row((2025, 3, 20), "외화환산손실", 200_000.0, 0.0, 1310.0),
            row((2025, 3, 22), "보통예금", 100_000.0, 0.0, 1306.0),
            row((2025, 4, 2), "외화환산이익", 0.0, 80_000.0, 1298.5),
        ];
        let summary = LedgerSummary::from_rows(&rows, &schema, None);
        assert_relative_eq!(
            summary.fx_pl_for(MonthKey::new(2025, 3)).unwrap(),
            300_000.0
        );
        assert_relative_eq!(
            summary.fx_pl_for(MonthKey::new(2025, 4)).unwrap(),
            80_000.0
        );
        assert_eq!(summary.fx_pl_for(MonthKey::new(2025, 5)), None);
    }

    #[test]
    fn test_monthly_rate_takes_last_positive() {
        let schema = LedgerSchema::default();
        let rows = vec![
            row((2025, 3, 5), "외화예금", 0.0, 0.0, 1305.2),
            row((2025, 3, 28), "외화예금", 0.0, 0.0, 1311.4),
            row((2025, 3, 31), "외화예금", 0.0, 0.0, 0.0), // non-positive, ignored
        ];
        let summary = LedgerSummary::from_rows(&rows, &schema, None);
        assert_relative_eq!(summary.rate_for(MonthKey::new(2025, 3)).unwrap(), 1311.4);
    }

    #[test]
    fn test_monthly_rate_currency_filter() {
        let schema = LedgerSchema::default();
        let mut usd = row((2025, 3, 10), "외화예금", 0.0, 0.0, 1305.0);
        usd.currency_code = Some("USD".to_string());
        let mut jpy = row((2025, 3, 20), "외화예금", 0.0, 0.0, 9.1);
        jpy.currency_code = Some("JPY".to_string());
        let uncoded = row((2025, 3, 25), "외화예금", 0.0, 0.0, 1312.0);

        let rows = vec![usd, jpy, uncoded];
        let summary = LedgerSummary::from_rows(&rows, &schema, Some("usd"));
        // Later JPY and uncoded rows do not displace the USD rate
        assert_relative_eq!(summary.rate_for(MonthKey::new(2025, 3)).unwrap(), 1305.0);

        let unfiltered = LedgerSummary::from_rows(&rows, &schema, None);
        assert_relative_eq!(unfiltered.rate_for(MonthKey::new(2025, 3)).unwrap(), 1312.0);
    }

    #[test]
    fn test_cumulative_row_excluded_end_to_end() {
        // The 누계 subtotal never reaches aggregation even though its
        // account name also matches the gain pattern
        let schema = LedgerSchema::default();
        let data = "회계일,계정과목,차변,대변,환율\n\
                    2025-03-05,외화환산이익,0,500000,1305.20\n\
                    2025-03-31,외화환산이익 누계,0,9999999,0\n";
        let rows = parse_ledger(data.as_bytes(), &schema).unwrap();
        let summary = LedgerSummary::from_rows(&rows, &schema, None);
        assert_relative_eq!(
            summary.fx_pl_for(MonthKey::new(2025, 3)).unwrap(),
            500_000.0
        );
    }
}
