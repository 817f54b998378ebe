//! Transaction source abstraction
//!
//! Callers talk to a [`TransactionSource`] and never care whether rows come
//! from the SQLite store or from generated sample data. Every answer reports
//! which one through [`DataSource`].

use crate::core::history::{PropertyFingerprint, PropertyHistory};
use crate::core::sample::SampleSource;
use crate::core::store::{
    AreaStats, BuildingStats, DataSource, MarketStats, QueryResult, SearchResult, StoreError,
    TransactionFilter, TransactionStore,
};

/// Read operations shared by the real store and the synthetic provider
pub trait TransactionSource {
    /// Where answers from this source come from
    fn data_source(&self) -> DataSource;

    fn query_transactions(&self, filter: &TransactionFilter) -> Result<QueryResult, StoreError>;

    fn property_history(&self, fingerprint: &PropertyFingerprint) -> Result<Option<PropertyHistory>, StoreError>;

    fn area_stats(&self, area_filter: Option<&str>) -> Result<Vec<AreaStats>, StoreError>;

    fn building_stats(&self, area_name: &str) -> Result<Vec<BuildingStats>, StoreError>;

    fn market_stats(&self) -> Result<MarketStats, StoreError>;

    fn search_all(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, StoreError>;

    /// Human-readable description for status output
    fn describe(&self) -> String;
}

impl TransactionSource for TransactionStore {
    fn data_source(&self) -> DataSource {
        DataSource::Sqlite
    }

    fn query_transactions(&self, filter: &TransactionFilter) -> Result<QueryResult, StoreError> {
        TransactionStore::query_transactions(self, filter)
    }

    fn property_history(&self, fingerprint: &PropertyFingerprint) -> Result<Option<PropertyHistory>, StoreError> {
        TransactionStore::property_history(self, fingerprint)
    }

    fn area_stats(&self, area_filter: Option<&str>) -> Result<Vec<AreaStats>, StoreError> {
        TransactionStore::area_stats(self, area_filter)
    }

    fn building_stats(&self, area_name: &str) -> Result<Vec<BuildingStats>, StoreError> {
        TransactionStore::building_stats(self, area_name)
    }

    fn market_stats(&self) -> Result<MarketStats, StoreError> {
        TransactionStore::market_stats(self)
    }

    fn search_all(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, StoreError> {
        TransactionStore::search_all(self, query, limit)
    }

    fn describe(&self) -> String {
        format!("SQLite store at {}", self.path().display())
    }
}

impl TransactionSource for SampleSource {
    fn data_source(&self) -> DataSource {
        DataSource::Sample
    }

    fn query_transactions(&self, filter: &TransactionFilter) -> Result<QueryResult, StoreError> {
        let mut result = self.store().query_transactions(filter)?;
        result.source = DataSource::Sample;
        Ok(result)
    }

    fn property_history(&self, fingerprint: &PropertyFingerprint) -> Result<Option<PropertyHistory>, StoreError> {
        self.store().property_history(fingerprint)
    }

    fn area_stats(&self, area_filter: Option<&str>) -> Result<Vec<AreaStats>, StoreError> {
        self.store().area_stats(area_filter)
    }

    fn building_stats(&self, area_name: &str) -> Result<Vec<BuildingStats>, StoreError> {
        self.store().building_stats(area_name)
    }

    fn market_stats(&self) -> Result<MarketStats, StoreError> {
        self.store().market_stats()
    }

    fn search_all(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, StoreError> {
        self.store().search_all(query, limit)
    }

    fn describe(&self) -> String {
        format!("synthetic sample data (seed {})", self.seed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::schema::create_schema;
    use rusqlite::Connection;

    fn empty_store() -> TransactionStore {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        TransactionStore::from_connection(conn, ":memory:").unwrap()
    }

    #[test]
    fn test_store_reports_sqlite() {
        let source: Box<dyn TransactionSource> = Box::new(empty_store());
        assert_eq!(source.data_source(), DataSource::Sqlite);

        let result = source.query_transactions(&TransactionFilter::default()).unwrap();
        assert_eq!(result.source, DataSource::Sqlite);
        assert_eq!(result.total, 0);
        assert!(!result.truncated);
    }

    #[test]
    fn test_sample_reports_sample() {
        let source: Box<dyn TransactionSource> = Box::new(SampleSource::generate(1, 100).unwrap());
        assert_eq!(source.data_source(), DataSource::Sample);

        let result = source.query_transactions(&TransactionFilter::default()).unwrap();
        assert_eq!(result.source, DataSource::Sample);
        assert_eq!(result.total, 100);
    }

    #[test]
    fn test_sample_histories_resolve() {
        let source = SampleSource::generate(3, 300).unwrap();
        let first = source
            .query_transactions(&TransactionFilter::default())
            .unwrap()
            .rows
            .remove(0);

        let fingerprint = PropertyFingerprint {
            building: first.building_name.clone().unwrap(),
            size_sqft: Some(first.area_sqft),
            rooms: first.rooms.clone(),
            property_type: first.property_sub_type.clone(),
        };
        let history = source.property_history(&fingerprint).unwrap().unwrap();
        assert!(history
            .transactions
            .iter()
            .any(|e| e.transaction.transaction_id == first.transaction_id));
    }
}
