//! # Calculation Records
//!
//! A `CalculationRecord` wraps one [`CalculationItem`] with identity and
//! bookkeeping so front ends can store and reload it as JSON. The engine
//! itself never touches records; they only carry the input.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::calculations::{CalculationItem, DuoPitchInput};
//! use wind_core::environment::WindSite;
//! use wind_core::record::CalculationRecord;
//! use wind_core::terrain::TerrainCategory;
//!
//! let item = CalculationItem::DuoPitch(DuoPitchInput {
//!     label: "Hall".to_string(),
//!     site: WindSite::new(22.0, TerrainCategory::III),
//!     height_m: 7.5,
//!     width_m: 12.0,
//!     length_m: 30.0,
//!     pitch_deg: 15.0,
//!     structural_factor: 1.0,
//!     internal_pressure: wind_core::coefficients::InternalPressure::Specified { c_pi: -0.3 },
//!     member_spacing: None,
//! });
//!
//! let record = CalculationRecord::new(Some("Hall A".to_string()), item);
//! let json = record.to_json().unwrap();
//! let restored = CalculationRecord::from_json(&json).unwrap();
//! assert_eq!(restored.id, record.id);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, WindLoadResult};
use crate::errors::{CalcError, CalcResult};

/// Current schema version for stored records
pub const SCHEMA_VERSION: &str = "0.1.0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// One stored wind-load calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub id: Uuid,

    /// Display name, falls back to the item label when absent
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub notes: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,

    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    pub item: CalculationItem,
}

impl CalculationRecord {
    /// Create a record with a fresh v4 id and both timestamps set to now.
    pub fn new(name: Option<String>, item: CalculationItem) -> Self {
        let now = Utc::now();
        CalculationRecord {
            id: Uuid::new_v4(),
            name,
            notes: String::new(),
            created: now,
            modified: now,
            schema_version: SCHEMA_VERSION.to_string(),
            item,
        }
    }

    /// Name for display: the record name, or the item label.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.item.label())
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    /// Replace the item and mark the record modified.
    pub fn set_item(&mut self, item: CalculationItem) {
        self.item = item;
        self.touch();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
        self.touch();
    }

    /// Run the stored calculation.
    pub fn calculate(&self) -> CalcResult<WindLoadResult> {
        log::debug!("calculating record {} ({})", self.id, self.item.calc_type());
        self.item.calculate()
    }

    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record, rejecting a schema version other than [`SCHEMA_VERSION`].
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let record: CalculationRecord = serde_json::from_str(json)?;
        if record.schema_version != SCHEMA_VERSION {
            return Err(CalcError::VersionMismatch {
                found: record.schema_version,
                expected: SCHEMA_VERSION.to_string(),
            });
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::FlatRoofInput;
    use crate::coefficients::InternalPressure;
    use crate::environment::WindSite;
    use crate::terrain::TerrainCategory;

    fn flat_item() -> CalculationItem {
        CalculationItem::FlatRoof(FlatRoofInput {
            label: "Warehouse".to_string(),
            site: WindSite::new(24.0, TerrainCategory::II),
            height_m: 6.0,
            parapet_height_m: 0.0,
            crosswind_m: 20.0,
            depth_m: 15.0,
            structural_factor: 1.0,
            internal_pressure: InternalPressure::conservative(),
            member_spacing: None,
        })
    }

    #[test]
    fn test_record_creation() {
        let record = CalculationRecord::new(None, flat_item());
        assert_eq!(record.schema_version, SCHEMA_VERSION);
        assert_eq!(record.created, record.modified);
        assert_eq!(record.id.get_version_num(), 4);
        assert_eq!(record.display_name(), "Warehouse");
    }

    #[test]
    fn test_record_round_trip() {
        let mut record = CalculationRecord::new(Some("Roof".to_string()), flat_item());
        record.set_notes("checked against hand calc");
        let json = record.to_json().unwrap();
        assert!(json.contains("\"type\": \"FlatRoof\""));

        let restored = CalculationRecord::from_json(&json).unwrap();
        assert_eq!(restored, record);
        assert_eq!(restored.display_name(), "Roof");
    }

    #[test]
    fn test_touch_advances_modified() {
        let mut record = CalculationRecord::new(None, flat_item());
        let created = record.created;
        record.touch();
        assert!(record.modified >= created);
        assert_eq!(record.created, created);
    }

    #[test]
    fn test_version_mismatch() {
        let mut record = CalculationRecord::new(None, flat_item());
        record.schema_version = "9.9.9".to_string();
        let json = serde_json::to_string(&record).unwrap();
        let err = CalculationRecord::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_malformed_json() {
        let err = CalculationRecord::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_record_calculates_item() {
        let record = CalculationRecord::new(None, flat_item());
        let direct = record.item.calculate().unwrap();
        assert_eq!(record.calculate().unwrap(), direct);
    }
}
