//! Table formatting utilities for CLI list commands
//!
//! Commands describe their columns once and build rows of typed cells; the
//! formatter renders them as a boxed table, TSV, CSV or Markdown.

use chrono::NaiveDate;
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;
use crate::core::units::{format_number, format_price};

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Transaction id (cyan)
    Id(String),
    /// Plain text, truncated to the column width in tables
    Text(String),
    /// Category label such as area/building or a transaction group
    Kind(String),
    /// Calendar date as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Price in AED, compact in tables and raw in machine formats
    Price(i64),
    /// Whole number, grouped with commas in tables
    Number(i64),
    /// Float value with precision
    Float(f64, usize),
    /// Signed percentage change (green up, red down)
    Change(Option<f64>),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Text value or `Empty` when missing
    pub fn opt_text(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => CellValue::Text(s.to_string()),
            _ => CellValue::Empty,
        }
    }

    /// Human display for tables, colored when the terminal supports it
    pub fn format_display(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => style(id).cyan().to_string(),
            CellValue::Text(s) => truncate_str(s, width),
            CellValue::Kind(s) => match s.as_str() {
                "area" => style(s).blue().to_string(),
                "building" => style(s).yellow().to_string(),
                _ => s.clone(),
            },
            CellValue::Price(p) => format_price(*p as f64),
            CellValue::Number(n) => format_number(*n),
            CellValue::Change(Some(pct)) => {
                let text = format!("{:+.1}%", pct);
                if *pct > 0.0 {
                    style(text).green().to_string()
                } else if *pct < 0.0 {
                    style(text).red().to_string()
                } else {
                    style(text).dim().to_string()
                }
            }
            CellValue::Change(None) | CellValue::Empty => style("-").dim().to_string(),
            other => other.raw(),
        }
    }

    /// Unstyled, unabbreviated value for TSV and CSV
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Kind(s) => s.clone(),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Price(n) | CellValue::Number(n) => n.to_string(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Change(Some(pct)) => format!("{:.1}", pct),
            CellValue::Change(None) | CellValue::Empty => String::new(),
        }
    }

    /// Markdown cell with pipes escaped
    pub fn format_md(&self) -> String {
        match self {
            CellValue::Change(None) | CellValue::Empty => "-".to_string(),
            CellValue::Price(p) => format_price(*p as f64),
            CellValue::Number(n) => format_number(*n),
            CellValue::Change(Some(pct)) => format!("{:+.1}%", pct),
            other => other.raw().replace('|', "\\|"),
        }
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Column definition with header label and maximum display width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that outputs rows in various formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    noun: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], noun: &'static str) -> Self {
        Self {
            columns,
            noun,
            show_summary: true,
        }
    }

    /// Suppress the "N row(s)" line under human tables
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Render rows in the requested format
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Tsv => Ok(self.render_tsv(rows)),
            OutputFormat::Md => Ok(self.render_md(rows)),
            _ => Ok(self.render_table(rows)),
        }
    }

    /// Render and print to stdout
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        print!("{}", self.render(rows, format)?);
        Ok(())
    }

    fn cell<'r>(row: &'r TableRow, key: &str) -> &'r CellValue {
        row.get(key).unwrap_or(&EMPTY_CELL)
    }

    fn render_table(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| style(c.header).bold().to_string()));
        for row in rows {
            builder.push_record(
                self.columns
                    .iter()
                    .map(|c| Self::cell(row, c.key).format_display(c.width)),
            );
        }

        let mut output = builder.build().with(Style::rounded()).to_string();
        output.push('\n');
        if self.show_summary {
            output.push_str(&format!("{} {}(s)\n", style(rows.len()).cyan(), self.noun));
        }
        output
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let mut output = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        output.push_str(&headers.join("\t"));
        output.push('\n');
        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|c| Self::cell(row, c.key).raw().replace(['\t', '\n'], " "))
                .collect();
            output.push_str(&values.join("\t"));
            output.push('\n');
        }
        output
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer
                .write_record(self.columns.iter().map(|c| Self::cell(row, c.key).raw()))
                .into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("{}", e.error()))?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header));
        for row in rows {
            builder.push_record(self.columns.iter().map(|c| Self::cell(row, c.key).format_md()));
        }
        let mut output = builder.build().with(Style::markdown()).to_string();
        output.push('\n');
        output
    }
}
