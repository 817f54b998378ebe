//! Filtered, sorted and paginated transaction queries

use std::time::Instant;

use chrono::NaiveDate;
use rusqlite::{Row, ToSql};

use super::types::non_empty;
use super::{
    like_pattern, DataSource, LocationFilter, PageInfo, QueryResult, SortColumn,
    StoreError, Transaction, TransactionFilter, TransactionStore,
};
use crate::core::history::PropertyFingerprint;
use crate::core::units::sqft_to_sqm;

/// `instance_date` rewritten to `YYYY-MM-DD` whether stored ISO or `DD-MM-YYYY`
const SORTABLE_DATE: &str = "(CASE WHEN substr(instance_date, 5, 1) = '-' \
     THEN substr(instance_date, 1, 10) \
     ELSE substr(instance_date, 7, 4) || '-' || substr(instance_date, 4, 2) || '-' || substr(instance_date, 1, 2) END)";

/// True when every stored date already sorts as text (`YYYY-MM-DD...`)
pub(super) const ISO_DATES_PROBE: &str =
    "SELECT NOT EXISTS (SELECT 1 FROM transactions WHERE substr(instance_date, 5, 1) != '-')";

/// Records without an area name are incomplete and never returned
pub(super) const BASE_PREDICATE: &str = "area_name_en IS NOT NULL AND area_name_en != ''";

/// Relative tolerance for matching a unit by size
pub const SIZE_TOLERANCE: f64 = 0.02;

const TRANSACTION_COLUMNS: &str = r#"CAST(transaction_id AS TEXT), instance_date, area_name_en, building_name_en,
       project_name_en, master_project_en, property_type_en, property_sub_type_en,
       property_usage_en, reg_type_en, trans_group_en, procedure_name_en,
       rooms_en, COALESCE(has_parking, 0),
       COALESCE(procedure_area, 0.0),
       CAST(ROUND(COALESCE(actual_worth, 0)) AS INTEGER),
       COALESCE(meter_sale_price, 0.0),
       nearest_metro_en, nearest_mall_en"#;

/// SQL conditions plus their bound values
struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
}

impl WhereClause {
    fn new() -> Self {
        Self {
            conditions: Vec::new(),
            params: Vec::new(),
        }
    }

    fn push(&mut self, condition: impl Into<String>, value: impl ToSql + 'static) {
        self.conditions.push(condition.into());
        self.params.push(Box::new(value));
    }

    /// OR-group of substring matches over several columns, one bound pattern each
    fn push_any_like(&mut self, columns: &[&str], text: &str) {
        let group = columns
            .iter()
            .map(|c| format!("{} LIKE ? ESCAPE '\\'", c))
            .collect::<Vec<_>>()
            .join(" OR ");
        self.conditions.push(format!("({})", group));
        for _ in columns {
            self.params.push(Box::new(like_pattern(text)));
        }
    }

    fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    fn param_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

const LOCATION_COLUMNS: &[&str] = &[
    "area_name_en",
    "building_name_en",
    "project_name_en",
    "master_project_en",
];

fn build_where(filter: &TransactionFilter, date: &str) -> WhereClause {
    let mut clause = WhereClause::new();

    match filter.location() {
        LocationFilter::Search(search) => clause.push_any_like(LOCATION_COLUMNS, search),
        LocationFilter::AreaBuilding { area, building } => {
            if let Some(area) = area {
                clause.push_any_like(LOCATION_COLUMNS, area);
            }
            if let Some(building) = building {
                clause.push_any_like(&["building_name_en"], building);
            }
        }
    }

    if let Some(group) = filter.trans_group {
        clause.push("trans_group_en = ?", group.as_str());
    }
    if let Some(property_type) = non_empty(&filter.property_type) {
        clause.push("property_type_en = ?", property_type.to_string());
    }
    if let Some(sub_type) = non_empty(&filter.property_sub_type) {
        clause.push_any_like(&["property_sub_type_en"], sub_type);
    }
    if let Some(usage) = filter.property_usage {
        clause.push("property_usage_en = ?", usage.as_str());
    }
    if let Some(reg_type) = filter.reg_type {
        clause.push("reg_type_en = ?", reg_type.as_str());
    }
    if let Some(from) = filter.from_date {
        clause.push(format!("{} >= ?", date), iso(from));
    }
    // Upper bound is exclusive on the next day so time suffixes stay in range
    if let Some(next) = filter.to_date.and_then(|to| to.succ_opt()) {
        clause.push(format!("{} < ?", date), iso(next));
    }
    if let Some(min) = filter.min_price {
        clause.push("actual_worth >= ?", min);
    }
    if let Some(max) = filter.max_price {
        clause.push("actual_worth <= ?", max);
    }
    // Sizes arrive in square feet; the store holds square meters
    if let Some(min) = filter.min_size_sqft {
        clause.push("procedure_area >= ?", sqft_to_sqm(min));
    }
    if let Some(max) = filter.max_size_sqft {
        clause.push("procedure_area <= ?", sqft_to_sqm(max));
    }
    if let Some(developer) = non_empty(&filter.developer) {
        clause.push_any_like(&["project_name_en", "master_project_en"], developer);
    }

    clause.conditions.push(BASE_PREDICATE.to_string());
    clause
}

fn order_by(filter: &TransactionFilter, date: &str) -> String {
    let column = match filter.sort_by {
        SortColumn::InstanceDate => date,
        SortColumn::ActualWorth => "actual_worth",
        SortColumn::ProcedureArea => "procedure_area",
        SortColumn::MeterSalePrice => "meter_sale_price",
        SortColumn::AreaName => "area_name_en",
        SortColumn::BuildingName => "building_name_en",
        SortColumn::TransactionId => "transaction_id",
    };
    let order = filter.sort_order.as_sql();
    if filter.sort_by == SortColumn::TransactionId {
        format!("ORDER BY {} {}", column, order)
    } else {
        // Tie-break on the key so pages never overlap or skip rows
        format!("ORDER BY {} {}, transaction_id {}", column, order, order)
    }
}

impl TransactionStore {
    /// Whether date filters and ordering can use the raw, indexed column
    pub fn has_iso_dates(&self) -> bool {
        self.iso_dates
    }

    /// Date expression for comparisons and `ORDER BY`
    ///
    /// `SORTABLE_DATE` cannot use `idx_transactions_date`, so it is only used
    /// when some stored dates are `DD-MM-YYYY`.
    pub(super) fn date_expr(&self) -> &'static str {
        if self.iso_dates {
            "instance_date"
        } else {
            SORTABLE_DATE
        }
    }

    /// Run a filtered query: count the full match set, then fetch one page
    pub fn query_transactions(&self, filter: &TransactionFilter) -> Result<QueryResult, StoreError> {
        if filter.limit == 0 {
            return Err(StoreError::InvalidFilter("limit must be at least 1".to_string()));
        }
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price) {
            if min > max {
                return Err(StoreError::InvalidFilter(format!(
                    "min price {} is above max price {}",
                    min, max
                )));
            }
        }

        let (limit, offset) = match (i64::try_from(filter.limit), i64::try_from(filter.offset)) {
            (Ok(limit), Ok(offset)) => (limit, offset),
            _ => {
                return Err(StoreError::InvalidFilter(format!(
                    "limit {} / offset {} out of range",
                    filter.limit, filter.offset
                )))
            }
        };

        let started = Instant::now();
        let clause = build_where(filter, self.date_expr());
        let where_sql = clause.sql();
        let params = clause.param_refs();

        let count_sql = format!("SELECT COUNT(*) FROM transactions {}", where_sql);
        let total: i64 = self
            .conn
            .query_row(&count_sql, params.as_slice(), |row| row.get(0))?;

        let data_sql = format!(
            "SELECT {} FROM transactions {} {} LIMIT ? OFFSET ?",
            TRANSACTION_COLUMNS,
            where_sql,
            order_by(filter, self.date_expr())
        );
        let mut page_params = params;
        page_params.push(&limit);
        page_params.push(&offset);

        let rows = self.fetch(&data_sql, page_params.as_slice())?;
        let total = total as usize;

        log::debug!(
            "query matched {} rows, returned {} in {}ms",
            total,
            rows.len(),
            started.elapsed().as_millis()
        );

        Ok(QueryResult {
            truncated: filter.offset.saturating_add(rows.len()) < total,
            page: PageInfo::new(filter.limit, filter.offset, total),
            rows,
            total,
            source: DataSource::Sqlite,
        })
    }

    /// All transactions for one unit fingerprint, oldest first
    ///
    /// Building and room label match exactly; the size matches when it is
    /// within [`SIZE_TOLERANCE`] of the stored area.
    pub fn unit_transactions(&self, fingerprint: &PropertyFingerprint) -> Result<Vec<Transaction>, StoreError> {
        let mut clause = WhereClause::new();
        clause.push("building_name_en = ?", fingerprint.building.clone());

        if let Some(size_sqft) = fingerprint.size_sqft {
            let size_sqm = sqft_to_sqm(size_sqft);
            clause.push(format!("procedure_area * {} <= ?", 1.0 - SIZE_TOLERANCE), size_sqm);
            clause.push(format!("procedure_area * {} >= ?", 1.0 + SIZE_TOLERANCE), size_sqm);
        }
        if let Some(rooms) = non_empty(&fingerprint.rooms) {
            clause.push("rooms_en = ?", rooms.to_string());
        }
        if let Some(sub_type) = non_empty(&fingerprint.property_type) {
            clause.push("property_sub_type_en = ?", sub_type.to_string());
        }

        let sql = format!(
            "SELECT {} FROM transactions {} ORDER BY {} ASC, transaction_id ASC",
            TRANSACTION_COLUMNS,
            clause.sql(),
            self.date_expr()
        );
        self.fetch(&sql, clause.param_refs().as_slice())
    }

    fn fetch(&self, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Transaction>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, read_transaction)?;

        let mut out = Vec::new();
        for row in rows {
            let (raw_date, mut tx) = row?;
            tx.instance_date = parse_instance_date(&raw_date).ok_or_else(|| StoreError::InvalidDate {
                transaction_id: tx.transaction_id.clone(),
                value: raw_date.clone(),
            })?;
            out.push(tx.with_derived());
        }
        Ok(out)
    }
}

/// Map a row selected with `TRANSACTION_COLUMNS`; the date is parsed by the caller
fn read_transaction(row: &Row<'_>) -> rusqlite::Result<(String, Transaction)> {
    let raw_date: String = row.get(1)?;
    let tx = Transaction {
        transaction_id: row.get(0)?,
        instance_date: NaiveDate::default(),
        area_name: row.get(2)?,
        building_name: row.get(3)?,
        project_name: row.get(4)?,
        master_project: row.get(5)?,
        property_type: row.get(6)?,
        property_sub_type: row.get(7)?,
        property_usage: row.get(8)?,
        reg_type: row.get(9)?,
        trans_group: row.get(10)?,
        procedure_name: row.get(11)?,
        rooms: row.get(12)?,
        has_parking: row.get::<_, i64>(13)? != 0,
        procedure_area: row.get(14)?,
        actual_worth: row.get(15)?,
        meter_sale_price: row.get(16)?,
        nearest_metro: row.get(17)?,
        nearest_mall: row.get(18)?,
        area_sqft: 0.0,
        price_per_sqft: 0.0,
    };
    Ok((raw_date, tx))
}

/// Parse a stored date: `YYYY-MM-DD[...]` or `DD-MM-YYYY` (`/` also accepted)
pub fn parse_instance_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10)?;
    if head.as_bytes().get(4) == Some(&b'-') {
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    } else {
        NaiveDate::parse_from_str(&head.replace('/', "-"), "%d-%m-%Y").ok()
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
