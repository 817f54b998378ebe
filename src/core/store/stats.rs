//! Grouped rollups over sales transactions

use std::cmp::Reverse;

use rusqlite::params;

use super::queries::{parse_instance_date, BASE_PREDICATE};
use super::{
    like_pattern, AreaStats, BuildingStats, DateRange, MarketStats, SearchKind, SearchResult,
    StoreError, TransactionStore,
};
use crate::core::units::SQM_TO_SQFT;

/// Rows returned by [`TransactionStore::area_stats`] without an area filter
pub const AREA_STATS_LIMIT: usize = 50;

/// Rows returned by [`TransactionStore::building_stats`]
pub const BUILDING_STATS_LIMIT: usize = 20;

/// Matches taken from each of areas and buildings in [`TransactionStore::search_all`]
pub const SEARCH_PER_KIND: usize = 5;

/// Shortest query `search_all` will run
pub const MIN_SEARCH_LEN: usize = 2;

/// Priced sales with a known area
fn sales_predicate() -> String {
    format!(
        "{} AND actual_worth > 0 AND trans_group_en = 'Sales'",
        BASE_PREDICATE
    )
}

impl TransactionStore {
    /// Per-area count, averages and total value, busiest areas first
    ///
    /// Without a filter only the top [`AREA_STATS_LIMIT`] areas are returned.
    pub fn area_stats(&self, area_filter: Option<&str>) -> Result<Vec<AreaStats>, StoreError> {
        let area_filter = area_filter.map(str::trim).filter(|s| !s.is_empty());

        let mut sql = format!(
            r#"SELECT area_name_en,
                      COUNT(*) AS transaction_count,
                      ROUND(AVG(actual_worth), 0),
                      ROUND(AVG(meter_sale_price / {sqft}), 0),
                      ROUND(SUM(actual_worth), 0)
               FROM transactions
               WHERE {predicate}"#,
            sqft = SQM_TO_SQFT,
            predicate = sales_predicate()
        );
        let mut values: Vec<String> = Vec::new();
        if let Some(area) = area_filter {
            sql.push_str(" AND area_name_en LIKE ? ESCAPE '\\'");
            values.push(like_pattern(area));
        }
        sql.push_str(" GROUP BY area_name_en ORDER BY transaction_count DESC, area_name_en ASC");
        if area_filter.is_none() {
            sql.push_str(&format!(" LIMIT {}", AREA_STATS_LIMIT));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(values.iter()), |row| {
            Ok(AreaStats {
                area_name: row.get(0)?,
                transaction_count: row.get(1)?,
                avg_price: row.get(2)?,
                avg_price_sqft: row.get(3)?,
                total_value: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Top [`BUILDING_STATS_LIMIT`] buildings by sales count within matching areas
    pub fn building_stats(&self, area_name: &str) -> Result<Vec<BuildingStats>, StoreError> {
        let sql = format!(
            r#"SELECT building_name_en,
                      COUNT(*) AS transaction_count,
                      ROUND(AVG(actual_worth), 0),
                      ROUND(AVG(meter_sale_price / {sqft}), 0),
                      ROUND(SUM(actual_worth), 0)
               FROM transactions
               WHERE {predicate}
                 AND area_name_en LIKE ?1 ESCAPE '\'
                 AND building_name_en IS NOT NULL
                 AND building_name_en != ''
               GROUP BY building_name_en
               ORDER BY transaction_count DESC, building_name_en ASC
               LIMIT {limit}"#,
            sqft = SQM_TO_SQFT,
            predicate = sales_predicate(),
            limit = BUILDING_STATS_LIMIT
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![like_pattern(area_name.trim())], |row| {
            Ok(BuildingStats {
                building_name: row.get(0)?,
                transaction_count: row.get(1)?,
                avg_price: row.get(2)?,
                avg_price_sqft: row.get(3)?,
                total_value: row.get(4)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Single-row rollup of all priced sales
    pub fn market_stats(&self) -> Result<MarketStats, StoreError> {
        let sql = format!(
            r#"SELECT COUNT(*),
                      COALESCE(ROUND(SUM(actual_worth), 0), 0),
                      COALESCE(ROUND(AVG(meter_sale_price / {sqft}), 0), 0),
                      COUNT(DISTINCT area_name_en),
                      MIN({date}),
                      MAX({date})
               FROM transactions
               WHERE {predicate}"#,
            sqft = SQM_TO_SQFT,
            date = self.date_expr(),
            predicate = sales_predicate()
        );

        let (stats, min, max) = self.conn.query_row(&sql, [], |row| {
            Ok((
                MarketStats {
                    total_transactions: row.get(0)?,
                    total_value: row.get(1)?,
                    avg_price_sqft: row.get(2)?,
                    unique_areas: row.get(3)?,
                    date_range: DateRange { min: None, max: None },
                },
                row.get::<_, Option<String>>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        Ok(MarketStats {
            date_range: DateRange {
                min: min.as_deref().and_then(parse_instance_date),
                max: max.as_deref().and_then(parse_instance_date),
            },
            ..stats
        })
    }

    /// Area and building names containing `query`, merged by count
    ///
    /// Takes the top [`SEARCH_PER_KIND`] of each kind, re-sorts by count and
    /// keeps at most `limit`. Queries shorter than [`MIN_SEARCH_LEN`] return
    /// nothing.
    pub fn search_all(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, StoreError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }
        let pattern = like_pattern(query);

        let mut results = self.top_names("area_name_en", SearchKind::Area, &pattern)?;
        results.extend(self.top_names("building_name_en", SearchKind::Building, &pattern)?);

        // Stable: equal counts keep areas ahead of buildings
        results.sort_by_key(|r| Reverse(r.count));
        results.truncate(limit);
        Ok(results)
    }

    fn top_names(&self, column: &str, kind: SearchKind, pattern: &str) -> Result<Vec<SearchResult>, StoreError> {
        let sql = format!(
            r#"SELECT {col}, COUNT(*) AS count
               FROM transactions
               WHERE {col} LIKE ?1 ESCAPE '\' AND {col} IS NOT NULL AND {col} != ''
               GROUP BY {col}
               ORDER BY count DESC, {col} ASC
               LIMIT {limit}"#,
            col = column,
            limit = SEARCH_PER_KIND
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![pattern], |row| {
            Ok(SearchResult {
                name: row.get(0)?,
                kind,
                count: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
