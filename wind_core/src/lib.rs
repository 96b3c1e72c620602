//! # wind_core - EN 1991-1-4 Wind Load Engine
//!
//! `wind_core` computes wind actions on building envelopes: vertical walls
//! and flat, mono-pitch, duo-pitch and hipped roofs. All inputs and outputs
//! are JSON-serializable so front ends can drive the engine with plain data.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions from input to result
//! - **JSON-First**: every input, result and error implements Serialize/Deserialize
//! - **Traceable**: every formula can be recorded with its EN reference
//! - **Rich Errors**: structured error types, not strings
//!
//! ## Quick Start
//!
//! ```rust
//! use wind_core::calculations::CalculationItem;
//!
//! let item: CalculationItem = serde_json::from_str(r#"{
//!     "type": "DuoPitch",
//!     "label": "Hall",
//!     "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
//!     "height_m": 7.5,
//!     "width_m": 12.0,
//!     "length_m": 30.0,
//!     "pitch_deg": 15.0
//! }"#).unwrap();
//!
//! let result = item.calculate().unwrap();
//! assert!((result.site.q_b_kpa - 0.3025).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`environment`] - air density, basic velocity and velocity pressure
//! - [`terrain`] - terrain tables, roughness, orography, exposure
//! - [`zones`] - zone decomposition per shape
//! - [`coefficients`] - external coefficient tables and internal pressure policies
//! - [`combination`] - net pressures, forces and member load transfer
//! - [`calculations`] - per-shape inputs and the shared result
//! - [`equations`] - equation registry and audit trace
//! - [`record`] - stored calculation records
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod coefficients;
pub mod combination;
pub mod environment;
pub mod equations;
pub mod errors;
pub mod record;
pub mod terrain;
pub mod units;
pub mod zones;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, RoofShape, WindLoadResult};
pub use equations::EquationTracker;
pub use errors::{CalcError, CalcResult};
pub use record::{CalculationRecord, SCHEMA_VERSION};
