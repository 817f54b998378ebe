//! `dxb property` command - resale history of a single unit

use console::style;
use miette::{miette, Result};

use crate::cli::helpers::{open_source, or_dash, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::history::{FlipEntry, PropertyFingerprint, PropertyHistory};
use crate::core::store::Sourced;
use crate::core::units::{format_price, format_sqft};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct PropertyArgs {
    /// Exact building name
    #[arg(long, short = 'b')]
    pub building: String,

    /// Unit size in square feet (matched within 2%)
    #[arg(long, value_name = "SQFT")]
    pub size: Option<f64>,

    /// Room label, e.g. "2 B/R" or "Studio"
    #[arg(long, short = 'r')]
    pub rooms: Option<String>,

    /// Property sub-type, e.g. Flat or Villa
    #[arg(long = "type")]
    pub property_type: Option<String>,
}

impl PropertyArgs {
    pub fn fingerprint(&self) -> PropertyFingerprint {
        PropertyFingerprint {
            building: self.building.trim().to_string(),
            size_sqft: self.size,
            rooms: self.rooms.clone(),
            property_type: self.property_type.clone(),
        }
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("flip", "#", 3),
    ColumnDef::new("date", "DATE", 10),
    ColumnDef::new("transaction_id", "ID", 20),
    ColumnDef::new("price", "PRICE", 12),
    ColumnDef::new("previous_price", "PREVIOUS", 12),
    ColumnDef::new("gain", "GAIN", 12),
    ColumnDef::new("gain_pct", "GAIN %", 8),
    ColumnDef::new("group", "GROUP", 8),
    ColumnDef::new("reg", "REG", 8),
];

fn flip_row(entry: &FlipEntry) -> TableRow {
    let tx = &entry.transaction;
    TableRow::new()
        .cell("flip", CellValue::Number(entry.flip_number as i64))
        .cell("date", CellValue::Date(tx.instance_date))
        .cell("transaction_id", CellValue::Id(tx.transaction_id.clone()))
        .cell("price", CellValue::Price(tx.actual_worth))
        .cell(
            "previous_price",
            entry.previous_price.map_or(CellValue::Empty, CellValue::Price),
        )
        .cell("gain", entry.gain.map_or(CellValue::Empty, CellValue::Price))
        .cell("gain_pct", CellValue::Change(entry.gain_pct))
        .cell("group", CellValue::opt_text(tx.trans_group.as_deref()))
        .cell("reg", CellValue::opt_text(tx.reg_type.as_deref()))
}

fn print_summary(history: &PropertyHistory) {
    let info = &history.property;
    let stats = &history.stats;

    println!("{}", style(&info.building).bold().underlined());
    println!(
        "{} · {} · {}",
        or_dash(info.area.as_deref()),
        or_dash(info.property_type.as_deref()),
        or_dash(info.rooms.as_deref())
    );
    println!(
        "Size:       {} ({:.2} sqm)",
        format_sqft(info.size_sqft),
        info.size_sqm
    );
    println!("Project:    {}", or_dash(info.project.as_deref()));
    println!(
        "Developer:  {}",
        info.developer.as_deref().unwrap_or("unknown")
    );
    println!();

    let appreciation = format!("{:+.1}%", stats.total_appreciation_pct);
    let appreciation = if stats.total_appreciation_pct >= 0.0 {
        style(appreciation).green()
    } else {
        style(appreciation).red()
    };
    println!(
        "{} sale(s) from {} ({}) to {} ({}), {}",
        style(stats.total_sales).cyan(),
        stats.first_sale.instance_date,
        format_price(stats.first_sale.actual_worth as f64),
        stats.last_sale.instance_date,
        format_price(stats.last_sale.actual_worth as f64),
        appreciation
    );
    if stats.developer_sale {
        println!("{}", style("First sale was a ready-unit sale").dim());
    }
    println!();
}

pub fn run(args: PropertyArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let fingerprint = args.fingerprint();
    let source = open_source(global, config)?;

    let history = source.property_history(&fingerprint)?.ok_or_else(|| {
        miette!(
            help = "building names must match exactly; try `dxb search` to find the spelling",
            "no sales found for a unit in '{}'",
            fingerprint.building
        )
    })?;

    let format = global.output_format(config.default_format.as_deref());
    if format.is_structured() {
        let response = Sourced {
            source: source.data_source(),
            data: history,
        };
        return print_structured(&response, format);
    }

    if format == OutputFormat::Table {
        print_summary(&history);
    }
    let rows: Vec<TableRow> = history.transactions.iter().map(flip_row).collect();
    TableFormatter::new(COLUMNS, "sale")
        .without_summary()
        .output(&rows, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::history::reconstruct;
    use crate::core::store::Transaction;
    use chrono::NaiveDate;

    fn sale(id: &str, y: i32, price: i64) -> Transaction {
        Transaction {
            transaction_id: id.into(),
            instance_date: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            area_name: Some("Business Bay".into()),
            building_name: Some("Bay Square".into()),
            project_name: None,
            master_project: None,
            property_type: Some("Unit".into()),
            property_sub_type: Some("Flat".into()),
            property_usage: Some("Residential".into()),
            reg_type: Some("Ready".into()),
            trans_group: Some("Sales".into()),
            procedure_name: None,
            rooms: Some("1 B/R".into()),
            has_parking: false,
            procedure_area: 70.0,
            actual_worth: price,
            meter_sale_price: price as f64 / 70.0,
            nearest_metro: None,
            nearest_mall: None,
            area_sqft: 0.0,
            price_per_sqft: 0.0,
        }
        .with_derived()
    }

    #[test]
    fn test_fingerprint_trims_building() {
        let args = PropertyArgs {
            building: "  Bay Square ".into(),
            size: Some(753.0),
            rooms: Some("1 B/R".into()),
            property_type: None,
        };
        let fp = args.fingerprint();
        assert_eq!(fp.building, "Bay Square");
        assert_eq!(fp.size_sqft, Some(753.0));
    }

    #[test]
    fn test_flip_rows_render_gains() {
        let history = reconstruct(
            &PropertyFingerprint::new("Bay Square"),
            &[sale("a", 2019, 800_000), sale("b", 2023, 1_000_000)],
        )
        .unwrap();
        let rows: Vec<TableRow> = history.transactions.iter().map(flip_row).collect();

        let csv = TableFormatter::new(COLUMNS, "sale")
            .render(&rows, OutputFormat::Csv)
            .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "2,2023-01-01,b,1000000,800000,200000,25.0,Sales,Ready");
        assert_eq!(lines[2], "1,2019-01-01,a,800000,,,,Sales,Ready");
    }

    #[test]
    fn test_structured_history_carries_source() {
        let history = reconstruct(&PropertyFingerprint::new("Bay Square"), &[sale("a", 2019, 800_000)])
            .unwrap();
        let json = serde_json::to_value(Sourced {
            source: crate::core::DataSource::Sample,
            data: history,
        })
        .unwrap();
        assert_eq!(json["source"], "sample");
        assert_eq!(json["property"]["developer"], "unknown");
        assert_eq!(json["transactions"][0]["flip_number"], 1);
        assert!(json["transactions"][0]["gain"].is_null());
    }
}
