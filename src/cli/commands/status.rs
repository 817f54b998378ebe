//! `dxb status` command - data source health

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{print_structured, SAMPLE_ROWS};
use crate::cli::GlobalOpts;
use crate::core::store::DateRange;
use crate::core::{Config, DataSource, TransactionStore};

#[derive(clap::Args, Debug)]
pub struct StatusArgs {}

/// What `dxb` would read from, and whether the store answers
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub database_path: PathBuf,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub sample_fallback: bool,
    /// Source other commands would use with the current options
    pub source: Option<DataSource>,
}

pub fn collect(global: &GlobalOpts, config: &Config) -> StatusReport {
    let database_path = global.db.clone().unwrap_or_else(|| config.database_path());
    let sample_fallback = !global.no_fallback && config.sample_fallback();

    let probe = TransactionStore::open(&database_path).and_then(|store| {
        let rows = store.row_count()?;
        let market = store.market_stats()?;
        Ok((rows, market.date_range))
    });

    let (available, error, row_count, date_range) = match probe {
        Ok((rows, range)) => (true, None, Some(rows), Some(range)),
        Err(e) => (false, Some(e.to_string()), None, None),
    };

    let source = if global.sample {
        Some(DataSource::Sample)
    } else if available {
        Some(DataSource::Sqlite)
    } else if sample_fallback {
        Some(DataSource::Sample)
    } else {
        None
    };

    StatusReport {
        database_path,
        available,
        error,
        row_count,
        date_range,
        sample_fallback,
        source,
    }
}

pub fn run(_args: StatusArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let report = collect(global, config);
    let format = global.output_format(config.default_format.as_deref());

    if format.is_structured() {
        return print_structured(&report, format);
    }

    println!("{}", style("DXB Status").bold().underlined());
    println!("Store:     {}", report.database_path.display());
    if report.available {
        println!("State:     {}", style("available").green());
    } else {
        println!("State:     {}", style("unavailable").red());
    }
    if let Some(error) = &report.error {
        println!("Reason:    {}", style(error).dim());
    }
    if let Some(rows) = report.row_count {
        println!("Rows:      {}", crate::core::units::format_number(rows));
    }
    if let Some(DateRange {
        min: Some(min),
        max: Some(max),
    }) = &report.date_range
    {
        println!("Coverage:  {} to {}", min, max);
    }
    println!(
        "Fallback:  {}",
        if report.sample_fallback { "sample data" } else { "disabled" }
    );
    match report.source {
        Some(DataSource::Sample) => println!(
            "Serving:   {} ({} generated rows)",
            style("sample data").yellow(),
            SAMPLE_ROWS
        ),
        Some(DataSource::Sqlite) => println!("Serving:   {}", style("sqlite").cyan()),
        None => println!("Serving:   {}", style("nothing (commands will fail)").red()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        global: GlobalOpts,
    }

    #[test]
    fn test_missing_store_reports_fallback() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.db");
        let harness = Harness::parse_from(["dxb", "--db", missing.to_str().unwrap()]);

        let report = collect(&harness.global, &Config::default());
        assert!(!report.available);
        assert!(report.error.is_some());
        assert_eq!(report.source, Some(DataSource::Sample));
    }

    #[test]
    fn test_no_fallback_serves_nothing() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.db");
        let harness = Harness::parse_from(["dxb", "--no-fallback", "--db", missing.to_str().unwrap()]);

        let report = collect(&harness.global, &Config::default());
        assert!(!report.sample_fallback);
        assert_eq!(report.source, None);
    }
}
