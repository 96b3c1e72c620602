//! # Unit Types
//!
//! Type-safe wrappers for the SI units used in wind load work. They stay
//! plain `f64` newtypes so JSON stays clean (just numbers).
//!
//! ## SI Units
//!
//! - Length: metres (m)
//! - Area: square metres (m²)
//! - Pressure: pascals (Pa = N/m²), kilopascals (kPa = kN/m²)
//! - Line load: kilonewtons per metre (kN/m)
//! - Force: kilonewtons (kN)
//!
//! Input and result structs carry bare `f64` fields with a unit suffix
//! (`height_m`, `q_p_kpa`); these wrappers are used where unit algebra
//! happens (pressure × spacing, line load × spacing, pressure × area).
//!
//! ## Example
//!
//! ```rust
//! use wind_core::units::{KiloPascals, Meters, Pascals};
//!
//! let q_b: KiloPascals = Pascals(302.5).into();
//! assert!((q_b.0 - 0.3025).abs() < 1e-12);
//!
//! let purlin = q_b * Meters(1.2);
//! assert!((purlin.0 - 0.363).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length and Area
// ============================================================================

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl Mul for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Pressure
// ============================================================================

/// Pressure in pascals (N/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Pressure in kilopascals (kN/m²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloPascals(pub f64);

impl From<Pascals> for KiloPascals {
    fn from(pa: Pascals) -> Self {
        KiloPascals(pa.0 * 1e-3)
    }
}

impl From<KiloPascals> for Pascals {
    fn from(kpa: KiloPascals) -> Self {
        Pascals(kpa.0 * 1e3)
    }
}

// ============================================================================
// Loads
// ============================================================================

/// Line load in kilonewtons per metre
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonsPerMeter(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

/// Pressure acting over a tributary width gives a line load.
impl Mul<Meters> for KiloPascals {
    type Output = KiloNewtonsPerMeter;
    fn mul(self, rhs: Meters) -> KiloNewtonsPerMeter {
        KiloNewtonsPerMeter(self.0 * rhs.0)
    }
}

/// Line load collected over a spacing gives a point load.
impl Mul<Meters> for KiloNewtonsPerMeter {
    type Output = KiloNewtons;
    fn mul(self, rhs: Meters) -> KiloNewtons {
        KiloNewtons(self.0 * rhs.0)
    }
}

impl Mul<SquareMeters> for KiloPascals {
    type Output = KiloNewtons;
    fn mul(self, rhs: SquareMeters) -> KiloNewtons {
        KiloNewtons(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(Pascals);
impl_arithmetic!(KiloPascals);
impl_arithmetic!(KiloNewtonsPerMeter);
impl_arithmetic!(KiloNewtons);
