//! Deterministic synthetic transactions
//!
//! Used when no transaction store is available. The same seed and count
//! always produce the same rows, dates included, so output is reproducible.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rusqlite::Connection;

use crate::core::store::schema::{create_schema, insert_transaction};
use crate::core::store::{StoreError, Transaction, TransactionStore};

/// Default seed for generated data
pub const DEFAULT_SEED: u64 = 42;

/// Default number of generated transactions
pub const DEFAULT_COUNT: usize = 2_000;

/// Sample dates count back from this day
const ANCHOR_DATE: (i32, u32, u32) = (2024, 12, 31);

/// How far back sample dates reach
const SPAN_DAYS: i64 = 3 * 365;

/// (area, nearest metro, nearest mall)
const AREAS: &[(&str, &str, &str)] = &[
    ("Dubai Marina", "Dubai Marina Metro", "Dubai Marina Mall"),
    ("Downtown Dubai", "Burj Khalifa/Dubai Mall Metro", "Dubai Mall"),
    ("Palm Jumeirah", "Palm Jumeirah Monorail", "Nakheel Mall"),
    ("Business Bay", "Business Bay Metro", "Bay Avenue"),
    ("Dubai Hills Estate", "Equiti Metro", "Dubai Hills Mall"),
    ("Jumeirah Village Circle", "Dubai Internet City Metro", "Circle Mall"),
];

const BUILDINGS: &[&str] = &[
    "Marina Gate",
    "Cayan Tower",
    "Princess Tower",
    "The Address",
    "Damac Heights",
    "Burj Vista",
    "Opera Grand",
    "Boulevard Point",
    "Forte",
    "The Residences",
    "Park Heights",
    "Golf Vista",
    "Mulberry",
    "Collective",
    "Sidra Villas",
    "Marina Promenade",
    "Sparkle Towers",
    "Azure Residences",
    "Palm View",
];

/// (sub-type, property type)
const RESIDENTIAL_TYPES: &[(&str, &str)] = &[
    ("Flat", "Unit"),
    ("Penthouse", "Unit"),
    ("Duplex", "Unit"),
    ("Townhouse", "Villa"),
    ("Villa", "Villa"),
];

const COMMERCIAL_TYPES: &[(&str, &str)] = &[("Office", "Unit"), ("Shop", "Unit")];

const ROOMS: &[&str] = &["Studio", "1 B/R", "2 B/R", "3 B/R", "4 B/R", "5 B/R"];

const TRANS_GROUPS: &[&str] = &["Sales", "Mortgage", "Gift"];

/// A physical unit that may sell several times
struct SampleUnit {
    area: usize,
    building: &'static str,
    project: &'static str,
    sub_type: &'static str,
    property_type: &'static str,
    usage: &'static str,
    rooms: Option<&'static str>,
    size_sqm: f64,
    base_price_sqm: f64,
    has_parking: bool,
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

fn generate_unit(rng: &mut StdRng) -> SampleUnit {
    let commercial = !rng.random_bool(0.8);
    let &(sub_type, property_type) = if commercial {
        pick(rng, COMMERCIAL_TYPES)
    } else {
        pick(rng, RESIDENTIAL_TYPES)
    };

    SampleUnit {
        area: rng.random_range(0..AREAS.len()),
        building: *pick(rng, BUILDINGS),
        project: *pick(rng, BUILDINGS),
        sub_type,
        property_type,
        usage: if commercial { "Commercial" } else { "Residential" },
        rooms: if commercial { None } else { Some(*pick(rng, ROOMS)) },
        size_sqm: rng.random_range(50..400) as f64,
        base_price_sqm: rng.random_range(8_000..38_000) as f64,
        has_parking: rng.random_bool(0.7),
    }
}

/// Synthetic rows, oldest id first
pub fn generate_transactions(seed: u64, count: usize) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(seed);
    let anchor = NaiveDate::from_ymd_opt(ANCHOR_DATE.0, ANCHOR_DATE.1, ANCHOR_DATE.2)
        .unwrap_or_default();

    // Roughly three sales per unit so flip histories exist
    let units: Vec<SampleUnit> = (0..count.div_ceil(3).max(1))
        .map(|_| generate_unit(&mut rng))
        .collect();

    (0..count)
        .map(|idx| {
            let unit = &units[rng.random_range(0..units.len())];
            let (area, metro, mall) = AREAS[unit.area];
            let date = anchor - Duration::days(rng.random_range(0..SPAN_DAYS));
            let price_sqm = (unit.base_price_sqm * rng.random_range(0.85..1.25)).round();

            let trans_group = if rng.random_bool(0.7) {
                TRANS_GROUPS[0]
            } else {
                *pick(&mut rng, TRANS_GROUPS)
            };

            Transaction {
                transaction_id: format!("TX{}{:08}", date.format("%Y"), idx),
                instance_date: date,
                area_name: Some(area.to_string()),
                building_name: Some(unit.building.to_string()),
                project_name: Some(unit.project.to_string()),
                master_project: Some(area.to_string()),
                property_type: Some(unit.property_type.to_string()),
                property_sub_type: Some(unit.sub_type.to_string()),
                property_usage: Some(unit.usage.to_string()),
                reg_type: Some(if rng.random_bool(0.7) { "Ready" } else { "Off-plan" }.to_string()),
                trans_group: Some(trans_group.to_string()),
                procedure_name: Some("Sell".to_string()),
                rooms: unit.rooms.map(str::to_string),
                has_parking: unit.has_parking,
                procedure_area: unit.size_sqm,
                actual_worth: (unit.size_sqm * price_sqm) as i64,
                meter_sale_price: price_sqm,
                nearest_metro: Some(metro.to_string()),
                nearest_mall: Some(mall.to_string()),
                area_sqft: 0.0,
                price_per_sqft: 0.0,
            }
            .with_derived()
        })
        .collect()
}

/// Synthetic data behind the regular store query code
pub struct SampleSource {
    store: TransactionStore,
    seed: u64,
}

impl SampleSource {
    /// Build an in-memory store holding `count` synthetic transactions
    pub fn generate(seed: u64, count: usize) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;

        let rows = generate_transactions(seed, count);
        let tx = conn.unchecked_transaction()?;
        for row in &rows {
            insert_transaction(&tx, row)?;
        }
        tx.commit()?;

        log::debug!("generated {} sample transactions (seed {})", rows.len(), seed);
        let store = TransactionStore::from_connection(conn, ":sample:")?;
        Ok(Self { store, seed })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn store(&self) -> &TransactionStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::TransactionFilter;

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_transactions(7, 50);
        let b = generate_transactions(7, 50);
        assert_eq!(a, b);
        assert_ne!(a, generate_transactions(8, 50));
    }

    #[test]
    fn test_dates_within_span() {
        let anchor = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        for tx in generate_transactions(DEFAULT_SEED, 200) {
            assert!(tx.instance_date <= anchor);
            assert!(tx.instance_date > anchor - Duration::days(SPAN_DAYS + 1));
        }
    }

    #[test]
    fn test_rows_are_consistent() {
        for tx in generate_transactions(DEFAULT_SEED, 200) {
            assert!(tx.procedure_area >= 50.0 && tx.procedure_area < 400.0);
            assert!(tx.actual_worth > 0);
            assert!(tx.area_name.is_some());
            if tx.property_usage.as_deref() == Some("Commercial") {
                assert!(tx.rooms.is_none());
            }
        }
    }

    #[test]
    fn test_units_use_known_building_names() {
        for tx in generate_transactions(DEFAULT_SEED, 100) {
            let building = tx.building_name.as_deref().unwrap();
            let project = tx.project_name.as_deref().unwrap();
            assert!(BUILDINGS.contains(&building), "unexpected building {}", building);
            assert!(BUILDINGS.contains(&project), "unexpected project {}", project);
        }
    }

    #[test]
    fn test_sample_source_answers_queries() {
        let source = SampleSource::generate(DEFAULT_SEED, 300).unwrap();
        let result = source
            .store()
            .query_transactions(&TransactionFilter::default())
            .unwrap();
        assert_eq!(result.total, 300);
        assert_eq!(result.rows.len(), 20);
        assert_eq!(source.seed(), DEFAULT_SEED);
    }
}
