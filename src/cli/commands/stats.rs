//! `dxb stats` command - area, building and market rollups

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{open_source, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::aliases::area_filter_text;
use crate::core::store::{AreaStats, BuildingStats, MarketStats, Sourced};
use crate::core::units::{format_number, format_price};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// Sales count, averages and total value per area
    Areas {
        /// Only areas matching this name or alias
        #[arg(long, short = 'a')]
        area: Option<String>,
    },

    /// Busiest buildings in an area
    Buildings {
        /// Area name or alias
        area: String,
    },

    /// Market-wide totals and date coverage
    Market,
}

#[derive(Debug, Serialize)]
struct AreaList {
    areas: Vec<AreaStats>,
}

#[derive(Debug, Serialize)]
struct BuildingList {
    area: String,
    buildings: Vec<BuildingStats>,
}

const AREA_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("area", "AREA", 32),
    ColumnDef::new("transactions", "SALES", 10),
    ColumnDef::new("avg_price", "AVG PRICE", 12),
    ColumnDef::new("avg_price_sqft", "AED/SQFT", 10),
    ColumnDef::new("total_value", "TOTAL VALUE", 14),
];

const BUILDING_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("building", "BUILDING", 32),
    ColumnDef::new("transactions", "SALES", 10),
    ColumnDef::new("avg_price", "AVG PRICE", 12),
    ColumnDef::new("avg_price_sqft", "AED/SQFT", 10),
    ColumnDef::new("total_value", "TOTAL VALUE", 14),
];

fn rollup_row(
    key: &'static str,
    name: &str,
    count: i64,
    avg_price: f64,
    avg_price_sqft: f64,
    total_value: f64,
) -> TableRow {
    TableRow::new()
        .cell(key, CellValue::Text(name.to_string()))
        .cell("transactions", CellValue::Number(count))
        .cell("avg_price", CellValue::Price(avg_price as i64))
        .cell("avg_price_sqft", CellValue::Number(avg_price_sqft as i64))
        .cell("total_value", CellValue::Price(total_value as i64))
}

fn area_row(stats: &AreaStats) -> TableRow {
    rollup_row(
        "area",
        &stats.area_name,
        stats.transaction_count,
        stats.avg_price,
        stats.avg_price_sqft,
        stats.total_value,
    )
}

fn building_row(stats: &BuildingStats) -> TableRow {
    rollup_row(
        "building",
        &stats.building_name,
        stats.transaction_count,
        stats.avg_price,
        stats.avg_price_sqft,
        stats.total_value,
    )
}

fn print_market(market: &MarketStats) {
    println!("{}", style("Market overview").bold().underlined());
    println!(
        "Sales:          {}",
        style(format_number(market.total_transactions)).cyan()
    );
    println!("Total value:    {}", format_price(market.total_value));
    println!("Avg AED/sqft:   {}", format_number(market.avg_price_sqft as i64));
    println!("Areas:          {}", format_number(market.unique_areas));
    match (market.date_range.min, market.date_range.max) {
        (Some(min), Some(max)) => println!("Coverage:       {} to {}", min, max),
        _ => println!("Coverage:       {}", style("no sales").dim()),
    }
}

pub fn run(cmd: StatsCommands, global: &GlobalOpts, config: &Config) -> Result<()> {
    let source = open_source(global, config)?;
    let format = global.output_format(config.default_format.as_deref());

    match cmd {
        StatsCommands::Areas { area } => {
            let area = area.as_deref().map(area_filter_text);
            let areas = source.area_stats(area.as_deref())?;
            if format.is_structured() {
                let response = Sourced {
                    source: source.data_source(),
                    data: AreaList { areas },
                };
                return print_structured(&response, format);
            }
            let rows: Vec<TableRow> = areas.iter().map(area_row).collect();
            TableFormatter::new(AREA_COLUMNS, "area").output(&rows, format)
        }
        StatsCommands::Buildings { area } => {
            let area = area_filter_text(&area);
            let buildings = source.building_stats(&area)?;
            if format.is_structured() {
                let response = Sourced {
                    source: source.data_source(),
                    data: BuildingList { area, buildings },
                };
                return print_structured(&response, format);
            }
            if format == OutputFormat::Table {
                println!("{}", style(format!("Top buildings in {}", area)).bold());
            }
            let rows: Vec<TableRow> = buildings.iter().map(building_row).collect();
            TableFormatter::new(BUILDING_COLUMNS, "building").output(&rows, format)
        }
        StatsCommands::Market => {
            let market = source.market_stats()?;
            if format.is_structured() {
                let response = Sourced {
                    source: source.data_source(),
                    data: market,
                };
                return print_structured(&response, format);
            }
            if format == OutputFormat::Table {
                print_market(&market);
                return Ok(());
            }
            let row = TableRow::new()
                .cell("total_transactions", CellValue::Number(market.total_transactions))
                .cell("total_value", CellValue::Number(market.total_value as i64))
                .cell("avg_price_sqft", CellValue::Number(market.avg_price_sqft as i64))
                .cell("unique_areas", CellValue::Number(market.unique_areas))
                .cell(
                    "min_date",
                    market.date_range.min.map_or(CellValue::Empty, CellValue::Date),
                )
                .cell(
                    "max_date",
                    market.date_range.max.map_or(CellValue::Empty, CellValue::Date),
                );
            TableFormatter::new(MARKET_COLUMNS, "row").output(&[row], format)
        }
    }
}

const MARKET_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("total_transactions", "SALES", 12),
    ColumnDef::new("total_value", "TOTAL VALUE", 16),
    ColumnDef::new("avg_price_sqft", "AED/SQFT", 10),
    ColumnDef::new("unique_areas", "AREAS", 6),
    ColumnDef::new("min_date", "FROM", 10),
    ColumnDef::new("max_date", "TO", 10),
];
