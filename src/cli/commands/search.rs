//! `dxb search` command - find areas and buildings by name

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{open_source, print_structured};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{SearchKind, SearchResult, Sourced};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Name fragment (at least two characters)
    pub query: String,

    /// Limit number of results
    #[arg(long, short = 'n', default_value = "10")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct SearchList {
    query: String,
    results: Vec<SearchResult>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("name", "NAME", 40),
    ColumnDef::new("type", "TYPE", 8),
    ColumnDef::new("count", "TRANSACTIONS", 12),
];

fn result_row(result: &SearchResult) -> TableRow {
    let kind = match result.kind {
        SearchKind::Area => "area",
        SearchKind::Building => "building",
    };
    TableRow::new()
        .cell("name", CellValue::Text(result.name.clone()))
        .cell("type", CellValue::Kind(kind.to_string()))
        .cell("count", CellValue::Number(result.count))
}

/// Run the search command
pub fn run(args: SearchArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let source = open_source(global, config)?;
    let results = source.search_all(&args.query, args.limit)?;
    let format = global.output_format(config.default_format.as_deref());

    if format.is_structured() {
        let response = Sourced {
            source: source.data_source(),
            data: SearchList {
                query: args.query,
                results,
            },
        };
        return print_structured(&response, format);
    }

    if results.is_empty() && format == OutputFormat::Table {
        println!("No areas or buildings match '{}'.", style(&args.query).yellow());
        return Ok(());
    }

    let rows: Vec<TableRow> = results.iter().map(result_row).collect();
    TableFormatter::new(COLUMNS, "match").output(&rows, format)
}
