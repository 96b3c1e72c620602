//! # Environmental Parameters
//!
//! First stage of every wind calculation: air density, basic wind velocity
//! and basic velocity pressure (EN 1991-1-4 §4.2, §4.5).
//!
//! ## Example
//!
//! ```rust
//! use wind_core::environment::{air_density, basic_velocity_pressure, basic_wind_velocity};
//!
//! let rho = air_density(500.0, 0.0).unwrap();
//! assert!((rho - 1.12).abs() < 1e-12);
//!
//! let v_b = basic_wind_velocity(22.0, 1.0, 1.0);
//! let q_b = basic_velocity_pressure(1.25, v_b);
//! assert!((q_b - 0.3025).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::units::{KiloPascals, Pascals};

/// Altitude (m) to air density (kg/m³) anchors.
pub const AIR_DENSITY_TABLE: [(f64, f64); 5] = [
    (0.0, 1.20),
    (500.0, 1.12),
    (1000.0, 1.06),
    (1500.0, 1.00),
    (2000.0, 0.94),
];

/// Sea-level density used by the linear decay model.
pub const SEA_LEVEL_DENSITY_LINEAR: f64 = 1.25;

/// Air density from the tabulated altitude profile.
///
/// The total elevation is `site_altitude_m + building_height_m`. Elevations
/// above the last anchor use the last density.
pub fn air_density(site_altitude_m: f64, building_height_m: f64) -> CalcResult<f64> {
    require_non_negative("site_altitude_m", site_altitude_m)?;
    require_non_negative("building_height_m", building_height_m)?;

    let elevation = site_altitude_m + building_height_m;
    let (last_alt, last_rho) = AIR_DENSITY_TABLE[AIR_DENSITY_TABLE.len() - 1];
    if elevation >= last_alt {
        if elevation > last_alt {
            log::debug!(
                "elevation {:.1} m above density table, clamped to {:.2} kg/m3",
                elevation,
                last_rho
            );
        }
        return Ok(last_rho);
    }

    for pair in AIR_DENSITY_TABLE.windows(2) {
        let (alt_lo, rho_lo) = pair[0];
        let (alt_hi, rho_hi) = pair[1];
        if elevation == alt_lo {
            return Ok(rho_lo);
        }
        if elevation == alt_hi {
            return Ok(rho_hi);
        }
        if elevation < alt_hi {
            let t = (elevation - alt_lo) / (alt_hi - alt_lo);
            return Ok(rho_lo + (rho_hi - rho_lo) * t);
        }
    }

    Err(CalcError::internal(format!(
        "air density table did not bracket elevation {}",
        elevation
    )))
}

/// Air density decaying linearly from 1.25 kg/m³ at sea level.
pub fn air_density_linear(site_altitude_m: f64) -> CalcResult<f64> {
    require_non_negative("site_altitude_m", site_altitude_m)?;
    let rho = SEA_LEVEL_DENSITY_LINEAR * (1.0 - 0.0001 * site_altitude_m);
    if rho <= 0.0 {
        return Err(CalcError::domain(
            "air density",
            format!("linear model gives rho = {:.4} at {} m", rho, site_altitude_m),
        ));
    }
    Ok(rho)
}

/// `v_b = c_dir · c_season · v_b0`
pub fn basic_wind_velocity(v_b0: f64, c_dir: f64, c_season: f64) -> f64 {
    c_dir * c_season * v_b0
}

/// Basic velocity pressure in kN/m²: `q_b = ½ · ρ · v_b²`
pub fn basic_velocity_pressure(rho: f64, v_b: f64) -> f64 {
    let q_b: KiloPascals = Pascals(0.5 * rho * v_b * v_b).into();
    q_b.value()
}

fn default_factor() -> f64 {
    1.0
}

// ============================================================================
// Air Density Policy
// ============================================================================

/// How the air density of a calculation is obtained.
///
/// ```json
/// { "method": "Tabulated", "site_altitude_m": 750.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum AirDensity {
    /// Density given directly
    Specified { rho_kg_m3: f64 },
    /// Interpolated from [`AIR_DENSITY_TABLE`] at site altitude plus building height
    Tabulated { site_altitude_m: f64 },
    /// `1.25 · (1 − 0.0001 · A)` at site altitude
    LinearDecay { site_altitude_m: f64 },
}

impl Default for AirDensity {
    fn default() -> Self {
        AirDensity::Specified { rho_kg_m3: 1.25 }
    }
}

impl AirDensity {
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            AirDensity::Specified { rho_kg_m3 } => require_positive("air_density.rho_kg_m3", rho_kg_m3),
            AirDensity::Tabulated { site_altitude_m } | AirDensity::LinearDecay { site_altitude_m } => {
                require_non_negative("air_density.site_altitude_m", site_altitude_m)
            }
        }
    }

    /// Resolve the density. `building_height_m` only matters for the tabulated model.
    pub fn resolve(&self, building_height_m: f64, tracker: &mut EquationTracker) -> CalcResult<f64> {
        match *self {
            AirDensity::Specified { rho_kg_m3 } => Ok(rho_kg_m3),
            AirDensity::Tabulated { site_altitude_m } => {
                let rho = air_density(site_altitude_m, building_height_m)?;
                tracker.record_values(
                    Equation::AirDensityTabulated,
                    "Site",
                    &[("A", site_altitude_m), ("h", building_height_m)],
                    rho,
                );
                Ok(rho)
            }
            AirDensity::LinearDecay { site_altitude_m } => {
                let rho = air_density_linear(site_altitude_m)?;
                tracker.record_values(Equation::AirDensityLinear, "Site", &[("A", site_altitude_m)], rho);
                Ok(rho)
            }
        }
    }
}

// ============================================================================
// Site Velocity
// ============================================================================

/// Wind climate at the site, shared by every building shape.
///
/// ```json
/// {
///   "basic_wind_velocity_ms": 22.0,
///   "air_density": { "method": "Specified", "rho_kg_m3": 1.25 },
///   "terrain": "III",
///   "orography": { "model": "Flat" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindSite {
    /// Fundamental value of the basic wind velocity v_b0 (m/s)
    pub basic_wind_velocity_ms: f64,
    #[serde(default = "default_factor")]
    pub c_dir: f64,
    #[serde(default = "default_factor")]
    pub c_season: f64,
    #[serde(default)]
    pub air_density: AirDensity,
    pub terrain: crate::terrain::TerrainCategory,
    #[serde(default)]
    pub orography: crate::terrain::Orography,
}

impl WindSite {
    pub fn new(basic_wind_velocity_ms: f64, terrain: crate::terrain::TerrainCategory) -> Self {
        Self {
            basic_wind_velocity_ms,
            c_dir: 1.0,
            c_season: 1.0,
            air_density: AirDensity::default(),
            terrain,
            orography: crate::terrain::Orography::default(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("basic_wind_velocity_ms", self.basic_wind_velocity_ms)?;
        require_positive("c_dir", self.c_dir)?;
        require_positive("c_season", self.c_season)?;
        self.air_density.validate()?;
        self.orography.validate()?;
        Ok(())
    }

    /// Basic wind velocity, recorded in the trace
    pub fn basic_velocity(&self, tracker: &mut EquationTracker) -> f64 {
        let v_b = basic_wind_velocity(self.basic_wind_velocity_ms, self.c_dir, self.c_season);
        tracker.record_values(
            Equation::BasicWindVelocity,
            "Site",
            &[
                ("c_dir", self.c_dir),
                ("c_season", self.c_season),
                ("v_b0", self.basic_wind_velocity_ms),
            ],
            v_b,
        );
        v_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainCategory;

    #[test]
    fn test_air_density_anchors() {
        for (alt, rho) in AIR_DENSITY_TABLE {
            assert_eq!(air_density(alt, 0.0).unwrap(), rho);
        }
    }

    #[test]
    fn test_air_density_interpolates_total_elevation() {
        // 700 m site + 50 m building = 750 m, halfway between 500 and 1000
        let rho = air_density(700.0, 50.0).unwrap();
        assert!((rho - 1.09).abs() < 1e-12);
    }

    #[test]
    fn test_air_density_monotonic_and_clamped() {
        let mut previous = air_density(0.0, 0.0).unwrap();
        let mut alt = 0.0;
        while alt <= 3000.0 {
            let rho = air_density(alt, 0.0).unwrap();
            assert!(rho <= previous + 1e-12, "density increased at {} m", alt);
            previous = rho;
            alt += 37.5;
        }
        assert_eq!(air_density(4500.0, 10.0).unwrap(), 0.94);
    }

    #[test]
    fn test_air_density_rejects_negative_altitude() {
        let err = air_density(-10.0, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_air_density_linear() {
        assert!((air_density_linear(0.0).unwrap() - 1.25).abs() < 1e-12);
        assert!((air_density_linear(1000.0).unwrap() - 1.125).abs() < 1e-12);
        assert!(matches!(
            air_density_linear(12_000.0),
            Err(CalcError::DomainError { .. })
        ));
    }

    #[test]
    fn test_basic_velocity_pressure() {
        let v_b = basic_wind_velocity(22.0, 1.0, 1.0);
        assert_eq!(v_b, 22.0);
        assert!((basic_velocity_pressure(1.25, v_b) - 0.3025).abs() < 1e-9);
        assert!((basic_wind_velocity(25.0, 0.9, 0.8) - 18.0).abs() < 1e-12);
    }

    #[test]
    fn test_air_density_policy_records_trace() {
        let mut tracker = EquationTracker::new();
        let rho = AirDensity::Tabulated { site_altitude_m: 1000.0 }
            .resolve(0.0, &mut tracker)
            .unwrap();
        assert_eq!(rho, 1.06);
        assert_eq!(tracker.usages().len(), 1);

        let specified = AirDensity::default().resolve(30.0, &mut tracker).unwrap();
        assert_eq!(specified, 1.25);
        assert_eq!(tracker.usages().len(), 1);
    }

    #[test]
    fn test_site_defaults_from_json() {
        let json = r#"{ "basic_wind_velocity_ms": 22.0, "terrain": "III" }"#;
        let site: WindSite = serde_json::from_str(json).unwrap();
        assert_eq!(site.c_dir, 1.0);
        assert_eq!(site.c_season, 1.0);
        assert_eq!(site.air_density, AirDensity::Specified { rho_kg_m3: 1.25 });
        assert_eq!(site.terrain, TerrainCategory::III);
        assert!(site.validate().is_ok());
    }

    #[test]
    fn test_site_validation() {
        let mut site = WindSite::new(22.0, TerrainCategory::II);
        site.c_dir = 0.0;
        assert!(site.validate().is_err());

        let mut site = WindSite::new(22.0, TerrainCategory::II);
        site.air_density = AirDensity::Tabulated { site_altitude_m: -5.0 };
        assert!(site.validate().is_err());
    }
}
