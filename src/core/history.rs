//! Property flip-history reconstruction
//!
//! A unit is identified by a fingerprint: building, approximate size, room
//! label and property sub-type. All sales matching the fingerprint are walked
//! oldest-first to compute the gain over the previous sale, then returned
//! newest-first.

use serde::{Serialize, Serializer};

use crate::core::developers::get_developer;
use crate::core::store::{StoreError, Transaction, TransactionStore};
use crate::core::units::{round_to, sqft_to_sqm, sqm_to_sqft};

/// What identifies "the same unit" across sales
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFingerprint {
    /// Exact building name (required)
    pub building: String,
    /// Size in square feet, matched with a tolerance
    pub size_sqft: Option<f64>,
    /// Exact room label
    pub rooms: Option<String>,
    /// Exact property sub-type
    pub property_type: Option<String>,
}

impl PropertyFingerprint {
    pub fn new(building: impl Into<String>) -> Self {
        Self {
            building: building.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size_sqft: f64) -> Self {
        self.size_sqft = Some(size_sqft);
        self
    }

    pub fn with_rooms(mut self, rooms: impl Into<String>) -> Self {
        self.rooms = Some(rooms.into());
        self
    }

    pub fn with_property_type(mut self, property_type: impl Into<String>) -> Self {
        self.property_type = Some(property_type.into());
        self
    }
}

/// One sale annotated with its gain over the sale before it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlipEntry {
    #[serde(flatten)]
    pub transaction: Transaction,
    /// 1 for the oldest sale
    pub flip_number: usize,
    pub previous_price: Option<i64>,
    pub gain: Option<i64>,
    /// Percent, one decimal
    pub gain_pct: Option<f64>,
}

/// Unit metadata, taken from the oldest matching sale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyInfo {
    pub building: String,
    pub area: Option<String>,
    pub project: Option<String>,
    pub master_project: Option<String>,
    #[serde(serialize_with = "developer_or_unknown")]
    pub developer: Option<String>,
    pub property_type: Option<String>,
    pub rooms: Option<String>,
    pub size_sqm: f64,
    pub size_sqft: f64,
}

fn developer_or_unknown<S: Serializer>(developer: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(developer.as_deref().unwrap_or("unknown"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub total_sales: usize,
    pub first_sale: Transaction,
    pub last_sale: Transaction,
    /// Percent change from first to last sale, one decimal; 0 when undefined
    pub total_appreciation_pct: f64,
    /// First sale was a ready-unit sale (heuristic, not ground truth)
    pub developer_sale: bool,
}

/// Full flip history for one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyHistory {
    pub property: PropertyInfo,
    pub stats: HistoryStats,
    /// Newest sale first
    pub transactions: Vec<FlipEntry>,
}

/// Annotate chronologically ordered sales, returning them newest-first
pub fn annotate_flips(chronological: &[Transaction]) -> Vec<FlipEntry> {
    let mut previous_price: Option<i64> = None;
    let mut entries = Vec::with_capacity(chronological.len());

    for (idx, tx) in chronological.iter().enumerate() {
        let (gain, gain_pct) = match previous_price {
            Some(prev) if prev != 0 => {
                let gain = tx.actual_worth - prev;
                (Some(gain), Some(round_to(gain as f64 / prev as f64 * 100.0, 1)))
            }
            _ => (None, None),
        };

        entries.push(FlipEntry {
            transaction: tx.clone(),
            flip_number: idx + 1,
            previous_price,
            gain,
            gain_pct,
        });
        previous_price = Some(tx.actual_worth);
    }

    entries.reverse();
    entries
}

/// Percent change between two prices, one decimal; 0 when `first` is 0
pub fn appreciation_pct(first: i64, last: i64) -> f64 {
    if first == 0 {
        return 0.0;
    }
    round_to((last - first) as f64 / first as f64 * 100.0, 1)
}

/// Build the history from oldest-first sales; `None` when there are none
pub fn reconstruct(fingerprint: &PropertyFingerprint, chronological: &[Transaction]) -> Option<PropertyHistory> {
    let first = chronological.first()?;
    let last = chronological.last()?;

    let developer = get_developer(first.master_project.as_deref(), first.project_name.as_deref());

    let size_sqm = if first.procedure_area > 0.0 {
        first.procedure_area
    } else {
        fingerprint.size_sqft.map(sqft_to_sqm).unwrap_or(0.0)
    };
    let size_sqft = fingerprint
        .size_sqft
        .unwrap_or_else(|| sqm_to_sqft(first.procedure_area).round());

    let property = PropertyInfo {
        building: fingerprint.building.clone(),
        area: first.area_name.clone(),
        project: first.project_name.clone(),
        master_project: first.master_project.clone(),
        developer: developer.map(str::to_string),
        property_type: fingerprint
            .property_type
            .clone()
            .or_else(|| first.property_sub_type.clone()),
        rooms: fingerprint.rooms.clone().or_else(|| first.rooms.clone()),
        size_sqm,
        size_sqft,
    };

    let stats = HistoryStats {
        total_sales: chronological.len(),
        first_sale: first.clone(),
        last_sale: last.clone(),
        total_appreciation_pct: appreciation_pct(first.actual_worth, last.actual_worth),
        developer_sale: first.is_ready_sale(),
    };

    Some(PropertyHistory {
        property,
        stats,
        transactions: annotate_flips(chronological),
    })
}

impl TransactionStore {
    /// Look up a unit's sales and reconstruct its flip history
    ///
    /// `Ok(None)` means no sale matched the fingerprint.
    pub fn property_history(&self, fingerprint: &PropertyFingerprint) -> Result<Option<PropertyHistory>, StoreError> {
        if fingerprint.building.trim().is_empty() {
            return Err(StoreError::InvalidFilter("building is required".to_string()));
        }
        let chronological = self.unit_transactions(fingerprint)?;
        log::debug!(
            "{} sale(s) matched unit in '{}'",
            chronological.len(),
            fingerprint.building
        );
        Ok(reconstruct(fingerprint, &chronological))
    }
}
