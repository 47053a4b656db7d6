//! FX Hedge Analyzer demo driver
//!
//! Runs a sample sell-forward analysis end to end and writes the scenario
//! series to CSV

use anyhow::Context;
use chrono::NaiveDate;
use fx_hedge_analyzer::{
    AnalysisSession, ContractInputs, ContractTerms, MonthKey, RatePolicy, Tenor, TransactionType,
};
use std::fs::File;
use std::io::Write;

const SAMPLE_LEDGER: &str = "\
계정별원장,,,,
회계일,계정과목,차변,대변,환율
2025-02-28,외화환산이익,0,3500000,1322.40
2025-02-28,계정A 월계,0,3500000,0
2025-03-31,외화환산손실,1200000,0,1318.90
2025-04-30,외화환산이익,0,800000,1321.10
";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("FX Hedge Analyzer v0.1.0");
    println!("========================\n");

    let inputs = ContractInputs {
        terms: ContractTerms {
            transaction_type: TransactionType::SellForward,
            amount_usd: 1_000_000.0,
            contract_rate: 1300.0,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 15)
                .context("invalid sample start date")?,
            tenor: Tenor::Months(6),
        },
        start_spot_rate: 1330.0,
        end_spot_rate: 1320.0,
        selected_month: MonthKey::new(2025, 7),
        policy: RatePolicy::default(),
    };

    println!("Contract: {:?}", inputs.terms.transaction_type);
    println!("  Amount: ${:.2}", inputs.terms.amount_usd);
    println!("  Contract rate: {:.2}", inputs.terms.contract_rate);
    println!("  Start: {}", inputs.terms.start_date);
    println!("  Maturity: {}", inputs.terms.end_date()?);
    println!();

    let mut session = AnalysisSession::new();
    let calendar = inputs.terms.settlement_calendar()?;

    // Hypothetical month-end forward rates for the interim months
    for (month, rate) in [
        (MonthKey::new(2025, 2), 1295.0),
        (MonthKey::new(2025, 3), 1288.5),
        (MonthKey::new(2025, 4), 1292.0),
        (MonthKey::new(2025, 5), 1301.5),
    ] {
        session.set_rate(&calendar, month, Some(rate))?;
    }

    session
        .upload_ledger(SAMPLE_LEDGER.as_bytes())
        .context("sample ledger import failed")?;

    let output = session.recompute(&inputs)?;

    match &output.headline {
        Some(headline) => println!(
            "Headline ({}): {:+.0} KRW [{:?}]",
            headline.label, headline.value, headline.sign
        ),
        None => println!("Headline withheld (selected month unresolved)"),
    }
    for warning in &output.warnings {
        println!("  warning: {}", warning);
    }
    println!();

    println!("{:>14} {:>16} {:>16} {:>16}", "Month", "Total P&L", "Valuation", "Transaction");
    println!("{}", "-".repeat(66));
    for point in &output.scenario_series {
        println!(
            "{:>14} {:>16.0} {:>16.0} {:>16.0}",
            point.month_label, point.total_pl, point.valuation_pl, point.transaction_pl
        );
    }
    println!();

    println!("Rate trend:");
    for point in &output.rate_series {
        println!("  {:>14} {:>10.2} [{:?}]", point.month_label, point.rate, point.kind);
    }
    println!();

    if !output.ledger_series.is_empty() {
        println!("Ledger FX P&L by month:");
        for point in &output.ledger_series {
            println!("  {:>14} {:>16.0}", point.month_label, point.fx_pl);
        }
        println!();
    }

    // Write the scenario series to CSV for spreadsheet comparison
    let csv_path = "scenario_output.csv";
    let mut file = File::create(csv_path).context("unable to create CSV file")?;
    writeln!(file, "Month,TotalPL,ValuationPL,TransactionPL")?;
    for point in &output.scenario_series {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2}",
            point.month_label, point.total_pl, point.valuation_pl, point.transaction_pl
        )?;
    }
    println!("Scenario series written to: {}", csv_path);

    Ok(())
}
