//! `dxb tx` command - filtered transaction listing

use chrono::NaiveDate;
use console::style;
use miette::{bail, Result};

use crate::cli::helpers::{open_source, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::aliases::area_filter_text;
use crate::core::store::{
    PropertyUsage, QueryResult, RegType, SortColumn, SortOrder, TransGroup, Transaction,
};
use crate::core::units::format_number;
use crate::core::{Config, DataSource, TransactionFilter};

#[derive(clap::Args, Debug)]
pub struct TxArgs {
    /// Match area, building, project or master project (overrides --area/--building)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Area name or alias (jvc, jlt, downtown, ...)
    #[arg(long, short = 'a')]
    pub area: Option<String>,

    /// Building name substring
    #[arg(long, short = 'b')]
    pub building: Option<String>,

    /// Transaction group
    #[arg(long, value_enum)]
    pub group: Option<TransGroup>,

    /// Property type (Unit, Villa, Land, Building)
    #[arg(long = "type")]
    pub property_type: Option<String>,

    /// Property sub-type substring (Flat, Villa, Office, ...)
    #[arg(long)]
    pub sub_type: Option<String>,

    /// Property usage
    #[arg(long, value_enum)]
    pub usage: Option<PropertyUsage>,

    /// Registration type
    #[arg(long, value_enum)]
    pub reg: Option<RegType>,

    /// Earliest transaction date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Latest transaction date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Minimum price in AED
    #[arg(long, value_name = "AED")]
    pub min_price: Option<i64>,

    /// Maximum price in AED
    #[arg(long, value_name = "AED")]
    pub max_price: Option<i64>,

    /// Minimum size in square feet
    #[arg(long, value_name = "SQFT")]
    pub min_size: Option<f64>,

    /// Maximum size in square feet
    #[arg(long, value_name = "SQFT")]
    pub max_size: Option<f64>,

    /// Developer, matched against project and master project names
    #[arg(long)]
    pub developer: Option<String>,

    /// Rows per page (default: 20 or config default_limit)
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Rows to skip
    #[arg(long, default_value_t = 0, conflicts_with = "page")]
    pub offset: usize,

    /// 1-based page number (sets the offset from --limit)
    #[arg(long)]
    pub page: Option<usize>,

    /// Sort column
    #[arg(long, value_enum, default_value_t = SortColumn::InstanceDate)]
    pub sort: SortColumn,

    /// Sort direction
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Print only the number of matching transactions
    #[arg(long)]
    pub count: bool,
}

impl TxArgs {
    /// Build the engine filter; area inputs go through alias resolution
    pub fn to_filter(&self, default_limit: usize) -> Result<TransactionFilter> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 {
            bail!("--limit must be at least 1");
        }
        let offset = match self.page {
            Some(0) => bail!("--page starts at 1"),
            Some(page) => match (page - 1).checked_mul(limit) {
                Some(offset) => offset,
                None => bail!("--page {} is out of range for --limit {}", page, limit),
            },
            None => self.offset,
        };

        Ok(TransactionFilter {
            search: self.search.clone(),
            area: self.area.as_deref().map(area_filter_text),
            building: self.building.clone(),
            trans_group: self.group,
            property_type: self.property_type.clone(),
            property_sub_type: self.sub_type.clone(),
            property_usage: self.usage,
            reg_type: self.reg,
            from_date: self.from,
            to_date: self.to,
            min_price: self.min_price,
            max_price: self.max_price,
            min_size_sqft: self.min_size,
            max_size_sqft: self.max_size,
            developer: self.developer.clone(),
            limit,
            offset,
            sort_by: self.sort,
            sort_order: self.order,
        })
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("date", "DATE", 10),
    ColumnDef::new("transaction_id", "ID", 20),
    ColumnDef::new("area", "AREA", 24),
    ColumnDef::new("building", "BUILDING", 24),
    ColumnDef::new("sub_type", "TYPE", 12),
    ColumnDef::new("rooms", "ROOMS", 8),
    ColumnDef::new("size_sqft", "SQFT", 8),
    ColumnDef::new("price", "PRICE", 12),
    ColumnDef::new("price_sqft", "AED/SQFT", 9),
    ColumnDef::new("group", "GROUP", 8),
    ColumnDef::new("reg", "REG", 8),
];

pub(crate) fn transaction_row(tx: &Transaction) -> TableRow {
    TableRow::new()
        .cell("date", CellValue::Date(tx.instance_date))
        .cell("transaction_id", CellValue::Id(tx.transaction_id.clone()))
        .cell("area", CellValue::opt_text(tx.area_name.as_deref()))
        .cell("building", CellValue::opt_text(tx.building_name.as_deref()))
        .cell("sub_type", CellValue::opt_text(tx.property_sub_type.as_deref()))
        .cell("rooms", CellValue::opt_text(tx.rooms.as_deref()))
        .cell("size_sqft", CellValue::Number(tx.area_sqft.round() as i64))
        .cell("price", CellValue::Price(tx.actual_worth))
        .cell("price_sqft", CellValue::Number(tx.price_per_sqft.round() as i64))
        .cell("group", CellValue::opt_text(tx.trans_group.as_deref()))
        .cell("reg", CellValue::opt_text(tx.reg_type.as_deref()))
}

/// One-line description of where a page sits in the full result
pub(crate) fn page_summary(result: &QueryResult, offset: usize) -> String {
    if result.rows.is_empty() {
        return format!("No transactions on this page ({} total)", format_number(result.total as i64));
    }
    format!(
        "Showing {}-{} of {} (page {}/{})",
        format_number((offset + 1) as i64),
        format_number((offset + result.rows.len()) as i64),
        format_number(result.total as i64),
        result.page.page,
        result.page.total_pages.max(1)
    )
}

pub fn run(args: TxArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let filter = args.to_filter(config.default_limit())?;
    let source = open_source(global, config)?;
    let result = source.query_transactions(&filter)?;

    if args.count {
        println!("{}", result.total);
        return Ok(());
    }

    let format = global.output_format(config.default_format.as_deref());
    if format.is_structured() {
        return print_structured(&result, format);
    }

    let rows: Vec<TableRow> = result.rows.iter().map(transaction_row).collect();
    let formatter = TableFormatter::new(COLUMNS, "transaction").without_summary();
    formatter.output(&rows, format)?;

    if format == OutputFormat::Table && !global.quiet {
        let source_label = match result.source {
            DataSource::Sample => style("sample data").yellow().to_string(),
            DataSource::Sqlite => style(result.source.as_str()).dim().to_string(),
        };
        println!("{} · source: {}", page_summary(&result, filter.offset), source_label);
        if result.truncated {
            println!(
                "{}",
                style(format!("Next page: --page {}", result.page.page + 1)).dim()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: TxArgs,
    }

    fn parse(argv: &[&str]) -> TxArgs {
        let mut full = vec!["tx"];
        full.extend_from_slice(argv);
        Harness::parse_from(full).args
    }

    #[test]
    fn test_area_alias_resolved() {
        let filter = parse(&["--area", "jvc"]).to_filter(20).unwrap();
        assert_eq!(filter.area.as_deref(), Some("Jumeirah Village Circle"));
    }

    #[test]
    fn test_canonical_area_kept_verbatim() {
        let filter = parse(&["--area", "Jumeriah Beach Residence  - JBR"]).to_filter(20).unwrap();
        assert_eq!(filter.area.as_deref(), Some("Jumeriah Beach Residence  - JBR"));
    }

    #[test]
    fn test_page_sets_offset() {
        let filter = parse(&["--page", "3", "--limit", "25"]).to_filter(20).unwrap();
        assert_eq!(filter.offset, 50);
        assert_eq!(filter.limit, 25);
    }

    #[test]
    fn test_config_limit_used_by_default() {
        let filter = parse(&[]).to_filter(40).unwrap();
        assert_eq!(filter.limit, 40);
        assert_eq!(filter.sort_by, SortColumn::InstanceDate);
        assert_eq!(filter.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_zero_page_and_limit_rejected() {
        assert!(parse(&["--page", "0"]).to_filter(20).is_err());
        assert!(parse(&["--limit", "0"]).to_filter(20).is_err());
    }

    #[test]
    fn test_huge_page_rejected() {
        let args = parse(&["--page", "18446744073709551615", "--limit", "20"]);
        assert!(args.to_filter(20).is_err());
    }

    #[test]
    fn test_typed_flags_parse() {
        let filter = parse(&[
            "--reg",
            "off-plan",
            "--group",
            "sales",
            "--from",
            "2024-01-01",
            "--sort",
            "price",
            "--order",
            "asc",
        ])
        .to_filter(20)
        .unwrap();
        assert_eq!(filter.reg_type, Some(RegType::OffPlan));
        assert_eq!(filter.trans_group, Some(TransGroup::Sales));
        assert_eq!(filter.from_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.sort_by, SortColumn::ActualWorth);
        assert_eq!(filter.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_malformed_number_rejected_by_parser() {
        assert!(Harness::try_parse_from(["tx", "--min-price", "lots"]).is_err());
        assert!(Harness::try_parse_from(["tx", "--from", "31-12-2024"]).is_err());
    }
}
