//! Store type definitions
//!
//! Transaction rows, the filter specification and query result shapes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::units::{price_per_sqm_to_sqft, round_to, sqm_to_sqft};

// =========================================================================
// Categorical values
// =========================================================================

/// Transaction group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum TransGroup {
    Sales,
    Mortgage,
    Gift,
}

impl TransGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransGroup::Sales => "Sales",
            TransGroup::Mortgage => "Mortgage",
            TransGroup::Gift => "Gift",
        }
    }
}

/// Property usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum PropertyUsage {
    Residential,
    Commercial,
}

impl PropertyUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyUsage::Residential => "Residential",
            PropertyUsage::Commercial => "Commercial",
        }
    }
}

/// Registration type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum RegType {
    Ready,
    #[value(name = "off-plan")]
    OffPlan,
}

impl RegType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegType::Ready => "Ready",
            RegType::OffPlan => "Off-plan",
        }
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum SortColumn {
    #[default]
    #[value(name = "date")]
    InstanceDate,
    #[value(name = "price")]
    ActualWorth,
    #[value(name = "size")]
    ProcedureArea,
    #[value(name = "price-per-area")]
    MeterSalePrice,
    #[value(name = "area")]
    AreaName,
    #[value(name = "building")]
    BuildingName,
    #[value(name = "id")]
    TransactionId,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum SortOrder {
    #[value(name = "asc")]
    Asc,
    #[default]
    #[value(name = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The SQLite transaction store
    Sqlite,
    /// Deterministic synthetic data
    Sample,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Sqlite => "sqlite",
            DataSource::Sample => "sample",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================================
// Transaction
// =========================================================================

/// A transaction record with its derived square-feet fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub instance_date: NaiveDate,
    pub area_name: Option<String>,
    pub building_name: Option<String>,
    pub project_name: Option<String>,
    pub master_project: Option<String>,
    pub property_type: Option<String>,
    pub property_sub_type: Option<String>,
    pub property_usage: Option<String>,
    pub reg_type: Option<String>,
    pub trans_group: Option<String>,
    pub procedure_name: Option<String>,
    /// Room label such as "2 B/R" or "Studio"; never parsed as a number
    pub rooms: Option<String>,
    pub has_parking: bool,
    /// Floor area in square meters
    pub procedure_area: f64,
    pub actual_worth: i64,
    /// Price per square meter
    pub meter_sale_price: f64,
    pub nearest_metro: Option<String>,
    pub nearest_mall: Option<String>,
    pub area_sqft: f64,
    pub price_per_sqft: f64,
}

impl Transaction {
    /// Recompute the square-feet fields from the stored square-meter values
    pub fn with_derived(mut self) -> Self {
        self.area_sqft = round_to(sqm_to_sqft(self.procedure_area), 2);
        self.price_per_sqft = round_to(price_per_sqm_to_sqft(self.meter_sale_price), 2);
        self
    }

    /// First sale heuristic: a ready unit sold as a plain sale
    pub fn is_ready_sale(&self) -> bool {
        self.trans_group.as_deref() == Some("Sales") && self.reg_type.as_deref() == Some("Ready")
    }
}

// =========================================================================
// Filter specification
// =========================================================================

/// Transaction filter; every field is optional and `None` means no constraint
///
/// `search` takes precedence over `area` and `building`: when `search` is
/// set, the other two are ignored (see [`TransactionFilter::location`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Substring of area, building, project or master project name
    pub search: Option<String>,
    /// Substring of area, building, project or master project name
    pub area: Option<String>,
    /// Substring of building name
    pub building: Option<String>,
    pub trans_group: Option<TransGroup>,
    /// Exact property type (Unit, Villa, Land, Building)
    pub property_type: Option<String>,
    /// Substring of property sub-type
    pub property_sub_type: Option<String>,
    pub property_usage: Option<PropertyUsage>,
    pub reg_type: Option<RegType>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Minimum size in square feet
    pub min_size_sqft: Option<f64>,
    /// Maximum size in square feet
    pub max_size_sqft: Option<f64>,
    /// Substring of project or master project name
    pub developer: Option<String>,
    pub limit: usize,
    pub offset: usize,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            search: None,
            area: None,
            building: None,
            trans_group: None,
            property_type: None,
            property_sub_type: None,
            property_usage: None,
            reg_type: None,
            from_date: None,
            to_date: None,
            min_price: None,
            max_price: None,
            min_size_sqft: None,
            max_size_sqft: None,
            developer: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_by: SortColumn::default(),
            sort_order: SortOrder::default(),
        }
    }
}

/// Default page size
pub const DEFAULT_LIMIT: usize = 20;

/// The location predicate actually applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFilter<'a> {
    /// `search` was given; `area` and `building` are ignored
    Search(&'a str),
    /// No `search`; either of these may be present
    AreaBuilding {
        area: Option<&'a str>,
        building: Option<&'a str>,
    },
}

impl TransactionFilter {
    /// Resolve the `search` over `area`/`building` precedence
    pub fn location(&self) -> LocationFilter<'_> {
        match non_empty(&self.search) {
            Some(search) => LocationFilter::Search(search),
            None => LocationFilter::AreaBuilding {
                area: non_empty(&self.area),
                building: non_empty(&self.building),
            },
        }
    }

    /// Builder-style page selection
    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// Treat empty strings like absent ones
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// =========================================================================
// Results
// =========================================================================

/// Page arithmetic for a query result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn new(limit: usize, offset: usize, total: usize) -> Self {
        let limit = limit.max(1);
        Self {
            page: offset / limit + 1,
            page_size: limit,
            total_pages: total.div_ceil(limit),
        }
    }
}

/// One page of transactions plus the size of the full filtered set
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub rows: Vec<Transaction>,
    /// Rows matching the filter across the whole store
    pub total: usize,
    /// More matching rows exist beyond this page
    pub truncated: bool,
    pub source: DataSource,
    #[serde(flatten)]
    pub page: PageInfo,
}

/// Per-area rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStats {
    pub area_name: String,
    pub transaction_count: i64,
    pub avg_price: f64,
    pub avg_price_sqft: f64,
    pub total_value: f64,
}

/// Per-building rollup within one area
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingStats {
    pub building_name: String,
    pub transaction_count: i64,
    pub avg_price: f64,
    pub avg_price_sqft: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

/// Market-wide rollup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketStats {
    pub total_transactions: i64,
    pub total_value: f64,
    pub avg_price_sqft: f64,
    pub unique_areas: i64,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Area,
    Building,
}

/// Combined area/building name match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub count: i64,
}

/// Any answer tagged with where it came from
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub source: DataSource,
    #[serde(flatten)]
    pub data: T,
}
