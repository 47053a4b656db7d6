//! Heuristic ledger parsing
//!
//! Ledger exports rarely put the column labels on the first row: title
//! banners, company names, and print headers come first. The parser scans a
//! fixed window for the first row containing every required label, then
//! reads the remaining rows against that header. Numeric columns coerce
//! leniently (blank or text cells become zero); dates do not (a bad date
//! aborts the whole import).

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::Read;

use crate::error::LedgerError;

/// How many leading rows are searched for the header row
pub const HEADER_SCAN_ROWS: usize = 50;

/// Column labels and account-name patterns expected in the export
///
/// Defaults match the Korean-labeled ledger export of the reference
/// deployment. Labels are compared case-insensitively with surrounding
/// whitespace trimmed; account-name patterns match as substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSchema {
    pub date_label: String,
    pub account_label: String,
    pub debit_label: String,
    pub credit_label: String,
    pub rate_label: String,
    /// Optional transaction-currency column; absent in some export variants
    pub currency_label: String,
    /// Account names containing this are FX translation gains (take credit)
    pub gain_pattern: String,
    /// Account names containing this are FX translation losses (take -debit)
    pub loss_pattern: String,
    /// Subtotal rows injected by the export tool, excluded before aggregation
    pub noise_patterns: Vec<String>,
}

impl Default for LedgerSchema {
    fn default() -> Self {
        Self {
            date_label: "회계일".to_string(),
            account_label: "계정과목".to_string(),
            debit_label: "차변".to_string(),
            credit_label: "대변".to_string(),
            rate_label: "환율".to_string(),
            currency_label: "통화".to_string(),
            gain_pattern: "외화환산이익".to_string(),
            loss_pattern: "외화환산손실".to_string(),
            noise_patterns: vec!["월계".to_string(), "누계".to_string()],
        }
    }
}

/// One transaction row extracted from the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRow {
    pub accounting_date: NaiveDate,
    pub account_name: String,
    pub debit: f64,
    pub credit: f64,
    pub rate: f64,
    pub currency_code: Option<String>,
}

impl LedgerRow {
    /// FX translation P&L contributed by this row
    ///
    /// Gains book on the credit side, losses on the debit side. Rows
    /// matching neither pattern contribute nothing.
    pub fn fx_pl(&self, schema: &LedgerSchema) -> f64 {
        let name = self.account_name.to_lowercase();
        if name.contains(&schema.gain_pattern.to_lowercase()) {
            self.credit
        } else if name.contains(&schema.loss_pattern.to_lowercase()) {
            -self.debit
        } else {
            0.0
        }
    }

    fn is_noise(&self, schema: &LedgerSchema) -> bool {
        let name = self.account_name.to_lowercase();
        schema
            .noise_patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
    }
}

/// Column positions resolved from the located header row
struct HeaderColumns {
    date: usize,
    account: usize,
    debit: usize,
    credit: usize,
    rate: usize,
    currency: Option<usize>,
}

fn cell_matches(cell: &str, label: &str) -> bool {
    cell.trim().to_lowercase() == label.trim().to_lowercase()
}

fn find_column(record: &StringRecord, label: &str) -> Option<usize> {
    record.iter().position(|cell| cell_matches(cell, label))
}

/// Scan the leading rows for the first one carrying every required label
///
/// Column order within the header row does not matter; each label is
/// located independently.
fn locate_header(
    records: &[StringRecord],
    schema: &LedgerSchema,
) -> Result<(usize, HeaderColumns), LedgerError> {
    for (idx, record) in records.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let date = find_column(record, &schema.date_label);
        let account = find_column(record, &schema.account_label);
        let debit = find_column(record, &schema.debit_label);
        let credit = find_column(record, &schema.credit_label);
        let rate = find_column(record, &schema.rate_label);
        if let (Some(date), Some(account), Some(debit), Some(credit), Some(rate)) =
            (date, account, debit, credit, rate)
        {
            let currency = find_column(record, &schema.currency_label);
            debug!("ledger header located at row {}", idx + 1);
            return Ok((
                idx,
                HeaderColumns {
                    date,
                    account,
                    debit,
                    credit,
                    rate,
                    currency,
                },
            ));
        }
    }
    Err(LedgerError::HeaderNotFound {
        scanned: records.len().min(HEADER_SCAN_ROWS),
    })
}

/// Lenient numeric coercion: thousands separators stripped, anything that
/// still fails to parse reads as zero (ledger exports pad numeric columns
/// with blanks and text)
fn coerce_number(cell: &str) -> f64 {
    cell.trim().replace(',', "").parse().unwrap_or(0.0)
}

/// Accepted accounting-date formats; datetime cells are truncated to the
/// date part
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let token = cell.split_whitespace().next()?;
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(token, format) {
            return Some(date);
        }
    }
    None
}

/// Extract transaction rows from a ledger byte stream
///
/// Noise rows (subtotals per [`LedgerSchema::noise_patterns`]) are excluded
/// here so every downstream aggregation sees transactions only. A
/// non-parseable accounting date on a non-empty row is fatal for the whole
/// import; fully empty rows and rows with a blank date cell are export
/// padding and are skipped.
pub fn parse_ledger<R: Read>(
    reader: R,
    schema: &LedgerSchema,
) -> Result<Vec<LedgerRow>, LedgerError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let records: Vec<StringRecord> = csv_reader.records().collect::<Result<_, _>>()?;

    let (header_idx, columns) = locate_header(&records, schema)?;

    let mut rows = Vec::new();
    let mut noise_count = 0usize;
    for (idx, record) in records.iter().enumerate().skip(header_idx + 1) {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let date_cell = record.get(columns.date).unwrap_or("").trim();
        if date_cell.is_empty() {
            continue;
        }
        let accounting_date =
            parse_date(date_cell).ok_or_else(|| LedgerError::InvalidDate {
                row: idx + 1,
                value: date_cell.to_string(),
            })?;

        let row = LedgerRow {
            accounting_date,
            account_name: record
                .get(columns.account)
                .unwrap_or("")
                .trim()
                .to_string(),
            debit: coerce_number(record.get(columns.debit).unwrap_or("")),
            credit: coerce_number(record.get(columns.credit).unwrap_or("")),
            rate: coerce_number(record.get(columns.rate).unwrap_or("")),
            currency_code: columns
                .currency
                .and_then(|c| record.get(c))
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        };

        if row.is_noise(schema) {
            noise_count += 1;
            continue;
        }
        rows.push(row);
    }

    info!(
        "parsed {} ledger rows ({} subtotal rows excluded)",
        rows.len(),
        noise_count
    );
    Ok(rows)
}
