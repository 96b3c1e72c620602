//! # Terrain & Exposure
//!
//! Second stage: terrain roughness, orography, mean wind velocity,
//! turbulence and peak velocity pressure (EN 1991-1-4 §4.3 - §4.5).
//!
//! Different building shapes use different terrain tables and different
//! (but standard-consistent) turbulence and peak-pressure derivations.
//! Each is a named policy here; [`crate::calculations::RoofShape::policy`]
//! picks the combination a shape uses.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::terrain::{roughness_factor, terrain_profile, TerrainCategory, TerrainTable};
//!
//! let profile = terrain_profile(TerrainTable::Wall, TerrainCategory::III).unwrap();
//! assert_eq!(profile.z0_m, 0.3);
//! assert!((profile.k_r - 0.2154).abs() < 1e-4);
//!
//! let c_r = roughness_factor(9.75, &profile).unwrap();
//! assert!((c_r - 0.750).abs() < 1e-3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::environment::{basic_velocity_pressure, WindSite};
use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::units::{KiloPascals, Pascals};

/// Turbulence factor k_I (recommended value)
pub const TURBULENCE_FACTOR: f64 = 1.0;

/// Roughness length of terrain category II, the reference terrain
const Z0_REFERENCE: f64 = 0.05;

// ============================================================================
// Terrain Categories
// ============================================================================

/// Terrain category (EN 1991-1-4 Table 4.1), from open sea (0) to dense urban (IV).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCategory {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "I", alias = "1")]
    I,
    #[serde(rename = "II", alias = "2")]
    II,
    #[serde(rename = "III", alias = "3")]
    III,
    #[serde(rename = "IV", alias = "4")]
    IV,
}

impl TerrainCategory {
    pub const ALL: [TerrainCategory; 5] = [
        TerrainCategory::Zero,
        TerrainCategory::I,
        TerrainCategory::II,
        TerrainCategory::III,
        TerrainCategory::IV,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            TerrainCategory::Zero => "0",
            TerrainCategory::I => "I",
            TerrainCategory::II => "II",
            TerrainCategory::III => "III",
            TerrainCategory::IV => "IV",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TerrainCategory::Zero => "Sea or coastal area exposed to the open sea",
            TerrainCategory::I => "Lakes or flat area without obstacles",
            TerrainCategory::II => "Low vegetation, isolated obstacles",
            TerrainCategory::III => "Regular vegetation, buildings, suburbs, forest",
            TerrainCategory::IV => "At least 15% of surface covered with buildings over 15 m",
        }
    }

    /// Parse roman ("III") or arabic ("3") notation, case-insensitive.
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "0" => Ok(TerrainCategory::Zero),
            "I" | "1" => Ok(TerrainCategory::I),
            "II" | "2" => Ok(TerrainCategory::II),
            "III" | "3" => Ok(TerrainCategory::III),
            "IV" | "4" => Ok(TerrainCategory::IV),
            other => Err(CalcError::unsupported("terrain category", other)),
        }
    }
}

impl fmt::Display for TerrainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category {}", self.code())
    }
}

/// The terrain table a building shape reads z0 / z_min from.
///
/// | Category | Wall z0 / z_min | Roof z0 / z_min | Hipped z0 |
/// |----------|-----------------|-----------------|-----------|
/// | 0        | -               | 0.003 / 1       | 0.003     |
/// | I        | 0.01 / 1        | 0.01 / 1        | 0.01      |
/// | II       | 0.05 / 2        | 0.05 / 2        | 0.05      |
/// | III      | 0.3 / 3         | 0.3 / 5         | 0.3       |
/// | IV       | 1.0 / 10        | 1.0 / 10        | 3.0       |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainTable {
    /// Vertical walls; no category 0 row
    Wall,
    /// Flat, mono-pitch and duo-pitch roofs
    Roof,
    /// Hipped roofs; no minimum height
    Hipped,
}

impl TerrainTable {
    /// `(z0, z_min)` for a category
    pub fn row(&self, category: TerrainCategory) -> CalcResult<(f64, Option<f64>)> {
        use TerrainCategory::*;
        let row = match (self, category) {
            (TerrainTable::Wall, Zero) => {
                return Err(CalcError::unsupported("terrain category for walls", category.code()))
            }
            (TerrainTable::Wall, I) => (0.01, Some(1.0)),
            (TerrainTable::Wall, II) => (0.05, Some(2.0)),
            (TerrainTable::Wall, III) => (0.3, Some(3.0)),
            (TerrainTable::Wall, IV) => (1.0, Some(10.0)),

            (TerrainTable::Roof, Zero) => (0.003, Some(1.0)),
            (TerrainTable::Roof, I) => (0.01, Some(1.0)),
            (TerrainTable::Roof, II) => (0.05, Some(2.0)),
            (TerrainTable::Roof, III) => (0.3, Some(5.0)),
            (TerrainTable::Roof, IV) => (1.0, Some(10.0)),

            (TerrainTable::Hipped, Zero) => (0.003, None),
            (TerrainTable::Hipped, I) => (0.01, None),
            (TerrainTable::Hipped, II) => (0.05, None),
            (TerrainTable::Hipped, III) => (0.3, None),
            (TerrainTable::Hipped, IV) => (3.0, None),
        };
        Ok(row)
    }
}

/// Terrain parameters for one calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub category: TerrainCategory,
    pub table: TerrainTable,
    /// Roughness length z0 (m)
    pub z0_m: f64,
    /// Minimum height z_min (m); heights below it use z_min
    pub z_min_m: Option<f64>,
    /// Terrain factor k_r
    pub k_r: f64,
}

/// `k_r = 0.19 · (z0 / 0.05)^0.07`
pub fn terrain_factor(z0_m: f64) -> f64 {
    0.19 * (z0_m / Z0_REFERENCE).powf(0.07)
}

/// Look up z0 and z_min and derive k_r.
pub fn terrain_profile(table: TerrainTable, category: TerrainCategory) -> CalcResult<TerrainProfile> {
    let (z0_m, z_min_m) = table.row(category)?;
    Ok(TerrainProfile {
        category,
        table,
        z0_m,
        z_min_m,
        k_r: terrain_factor(z0_m),
    })
}

// ============================================================================
// Reference Heights
// ============================================================================

/// Building height relative to its crosswind width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightRatioClass {
    /// h <= b
    Low,
    /// b < h < 2b
    Intermediate,
    /// h >= 2b
    Tall,
}

impl HeightRatioClass {
    pub fn classify(height_m: f64, width_m: f64) -> Self {
        if height_m <= width_m {
            HeightRatioClass::Low
        } else if height_m < 2.0 * width_m {
            HeightRatioClass::Intermediate
        } else {
            HeightRatioClass::Tall
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentLabel {
    Single,
    Lower,
    Upper,
}

/// A horizontal strip of the windward face with its own reference height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceHeightSegment {
    pub label: SegmentLabel,
    /// Reference height z_e (m)
    pub z_e_m: f64,
    /// Height of the strip (m)
    pub height_m: f64,
}

/// Split a windward face of height `h` and width `b` into reference-height strips.
pub fn reference_heights(height_m: f64, width_m: f64) -> Vec<ReferenceHeightSegment> {
    match HeightRatioClass::classify(height_m, width_m) {
        HeightRatioClass::Intermediate => vec![
            ReferenceHeightSegment {
                label: SegmentLabel::Lower,
                z_e_m: width_m,
                height_m: width_m,
            },
            ReferenceHeightSegment {
                label: SegmentLabel::Upper,
                z_e_m: height_m,
                height_m: height_m - width_m,
            },
        ],
        HeightRatioClass::Low | HeightRatioClass::Tall => vec![ReferenceHeightSegment {
            label: SegmentLabel::Single,
            z_e_m: height_m,
            height_m,
        }],
    }
}

// ============================================================================
// Profile Factors
// ============================================================================

/// `ln(max(z, z_min) / z0)`, the logarithm shared by roughness and turbulence.
///
/// Heights below z_min are raised to z_min. Without a z_min floor, a height at
/// or below z0 has no defined profile and is a [`CalcError::DomainError`].
pub fn log_height_ratio(z_e_m: f64, profile: &TerrainProfile) -> CalcResult<f64> {
    if !z_e_m.is_finite() || z_e_m < 0.0 {
        return Err(CalcError::domain(
            "reference height",
            format!("z_e = {} is not a valid height", z_e_m),
        ));
    }
    let z = match profile.z_min_m {
        Some(z_min) if z_e_m < z_min => {
            log::debug!("z_e = {:.3} m below z_min, using z_min = {:.1} m", z_e_m, z_min);
            z_min
        }
        _ => z_e_m,
    };
    let ratio = z / profile.z0_m;
    if ratio <= 1.0 {
        return Err(CalcError::domain(
            "roughness factor",
            format!("z = {} m does not exceed z0 = {} m", z, profile.z0_m),
        ));
    }
    Ok(ratio.ln())
}

/// `c_r = k_r · ln(max(z, z_min) / z0)`
pub fn roughness_factor(z_e_m: f64, profile: &TerrainProfile) -> CalcResult<f64> {
    Ok(profile.k_r * log_height_ratio(z_e_m, profile)?)
}

/// Orography factor from the upwind slope φ and location factor s.
pub fn orography_factor(upwind_slope: f64, location_factor: f64) -> f64 {
    if upwind_slope < 0.05 {
        1.0
    } else if upwind_slope < 0.3 {
        1.0 + 2.0 * location_factor * upwind_slope
    } else {
        1.0 + 0.6 * location_factor
    }
}

/// `v_m = c_r · c_0 · v_b`
pub fn mean_velocity(c_r: f64, c_0: f64, v_b: f64) -> f64 {
    c_r * c_0 * v_b
}

/// `I_v = k_I / (c_0 · ln(max(z, z_min) / z0))`
pub fn turbulence_intensity(k_i: f64, c_0: f64, z_e_m: f64, profile: &TerrainProfile) -> CalcResult<f64> {
    Ok(k_i / (c_0 * log_height_ratio(z_e_m, profile)?))
}

/// `I_v = k_I / ln(z / z0)`, no orography scaling
pub fn turbulence_intensity_simplified(k_i: f64, z_e_m: f64, profile: &TerrainProfile) -> CalcResult<f64> {
    Ok(k_i / log_height_ratio(z_e_m, profile)?)
}

/// `c_e = c_0² · c_r² · (1 + 7 · k_r / (c_0 · c_r))`
pub fn exposure_factor(c_0: f64, c_r: f64, k_r: f64) -> CalcResult<f64> {
    let speed_ratio = c_0 * c_r;
    if speed_ratio <= 0.0 {
        return Err(CalcError::domain(
            "exposure factor",
            format!("c_0 · c_r = {} must be positive", speed_ratio),
        ));
    }
    Ok(speed_ratio * speed_ratio * (1.0 + 7.0 * k_r / speed_ratio))
}

/// `q_p = c_e · q_b`
pub fn peak_pressure_from_exposure(q_b_kpa: f64, c_e: f64) -> f64 {
    q_b_kpa * c_e
}

/// Peak velocity pressure in kN/m²: `q_p = (1 + 7 · I_v) · ½ · ρ · v_m²`
pub fn peak_pressure(i_v: f64, rho: f64, v_m: f64) -> f64 {
    let q_p: KiloPascals = Pascals((1.0 + 7.0 * i_v) * 0.5 * rho * v_m * v_m).into();
    q_p.value()
}

// ============================================================================
// Orography Policy
// ============================================================================

/// How the orography factor c_0 is obtained.
///
/// ```json
/// { "model": "UpwindSlope", "upwind_slope": 0.1, "location_factor": 0.3 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum Orography {
    /// c_0 = 1
    #[default]
    Flat,
    /// c_0 from the upwind slope and orographic location factor
    UpwindSlope {
        upwind_slope: f64,
        #[serde(default = "default_location_factor")]
        location_factor: f64,
    },
    /// c_0 given directly
    Specified { c_0: f64 },
}

/// Location factor for a site near the crest (x/L_u = −0.4, z/L_e = 0.1)
fn default_location_factor() -> f64 {
    0.3
}

impl Orography {
    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            Orography::Flat => Ok(()),
            Orography::UpwindSlope {
                upwind_slope,
                location_factor,
            } => {
                require_non_negative("orography.upwind_slope", upwind_slope)?;
                require_non_negative("orography.location_factor", location_factor)
            }
            Orography::Specified { c_0 } => require_positive("orography.c_0", c_0),
        }
    }

    pub fn resolve(&self, tracker: &mut EquationTracker) -> f64 {
        match *self {
            Orography::Flat => 1.0,
            Orography::Specified { c_0 } => c_0,
            Orography::UpwindSlope {
                upwind_slope,
                location_factor,
            } => {
                let c_0 = orography_factor(upwind_slope, location_factor);
                tracker.record_values(
                    Equation::OrographyFactor,
                    "Site",
                    &[("phi", upwind_slope), ("s", location_factor)],
                    c_0,
                );
                c_0
            }
        }
    }
}

// ============================================================================
// Exposure Models
// ============================================================================

/// Turbulence intensity formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurbulenceModel {
    /// `k_I / (c_0 · ln(max(z, z_min) / z0))`
    OrographyScaled,
    /// `k_I / ln(z / z0)`
    Simplified,
}

/// Peak velocity pressure pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeakPressureModel {
    /// `q_p = c_e · q_b`
    ExposureFactor,
    /// `q_p = (1 + 7 I_v) · ½ ρ v_m²`
    Turbulence(TurbulenceModel),
}

/// Wind climate resolved for one calculation: stage 1 output plus terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    pub rho_kg_m3: f64,
    pub v_b_ms: f64,
    pub q_b_kpa: f64,
    pub c_0: f64,
    pub terrain: TerrainProfile,
}

/// Wind quantities at one reference height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureProfile {
    pub segment: ReferenceHeightSegment,
    pub c_r: f64,
    pub c_0: f64,
    pub v_m_ms: f64,
    /// Turbulence intensity (turbulence pathway only)
    pub i_v: Option<f64>,
    /// Exposure factor (exposure-factor pathway only)
    pub c_e: Option<f64>,
    /// Peak velocity pressure q_p (kN/m²)
    pub q_p_kpa: f64,
}

impl SiteConditions {
    /// Resolve density, velocities and terrain for a site.
    ///
    /// `density_height_m` is added to the site altitude by the tabulated
    /// density model.
    pub fn resolve(
        site: &WindSite,
        table: TerrainTable,
        density_height_m: f64,
        tracker: &mut EquationTracker,
    ) -> CalcResult<Self> {
        let rho_kg_m3 = site.air_density.resolve(density_height_m, tracker)?;
        let v_b_ms = site.basic_velocity(tracker);
        let q_b_kpa = basic_velocity_pressure(rho_kg_m3, v_b_ms);
        tracker.record_values(
            Equation::BasicVelocityPressure,
            "Site",
            &[("rho", rho_kg_m3), ("v_b", v_b_ms)],
            q_b_kpa,
        );

        let terrain = terrain_profile(table, site.terrain)?;
        tracker.record_values(Equation::TerrainFactor, "Site", &[("z_0", terrain.z0_m)], terrain.k_r);
        log::debug!(
            "terrain {} from {:?} table: z0 = {}, z_min = {:?}, k_r = {:.4}",
            site.terrain.code(),
            table,
            terrain.z0_m,
            terrain.z_min_m,
            terrain.k_r
        );

        let c_0 = site.orography.resolve(tracker);

        Ok(Self {
            rho_kg_m3,
            v_b_ms,
            q_b_kpa,
            c_0,
            terrain,
        })
    }

    /// Evaluate roughness, mean velocity and peak pressure at a segment's z_e.
    pub fn exposure_at(
        &self,
        segment: ReferenceHeightSegment,
        model: PeakPressureModel,
        tracker: &mut EquationTracker,
    ) -> CalcResult<ExposureProfile> {
        let context = format!("{:?} segment, z_e = {:.2} m", segment.label, segment.z_e_m);
        let z_e = segment.z_e_m;
        let profile = &self.terrain;

        let c_r = roughness_factor(z_e, profile)?;
        tracker.record_values(
            Equation::RoughnessFactor,
            context.clone(),
            &[
                ("k_r", profile.k_r),
                ("z", z_e),
                ("z_min", profile.z_min_m.unwrap_or(0.0)),
                ("z_0", profile.z0_m),
            ],
            c_r,
        );

        let v_m_ms = mean_velocity(c_r, self.c_0, self.v_b_ms);
        tracker.record_values(
            Equation::MeanWindVelocity,
            context.clone(),
            &[("c_r", c_r), ("c_0", self.c_0), ("v_b", self.v_b_ms)],
            v_m_ms,
        );

        let (i_v, c_e, q_p_kpa) = match model {
            PeakPressureModel::ExposureFactor => {
                let c_e = exposure_factor(self.c_0, c_r, profile.k_r)?;
                tracker.record_values(
                    Equation::ExposureFactor,
                    context.clone(),
                    &[("c_0", self.c_0), ("c_r", c_r), ("k_r", profile.k_r)],
                    c_e,
                );
                let q_p = peak_pressure_from_exposure(self.q_b_kpa, c_e);
                tracker.record_values(
                    Equation::PeakPressureFromExposure,
                    context,
                    &[("c_e", c_e), ("q_b", self.q_b_kpa)],
                    q_p,
                );
                (None, Some(c_e), q_p)
            }
            PeakPressureModel::Turbulence(turbulence) => {
                let i_v = match turbulence {
                    TurbulenceModel::OrographyScaled => {
                        let i_v = turbulence_intensity(TURBULENCE_FACTOR, self.c_0, z_e, profile)?;
                        tracker.record_values(
                            Equation::TurbulenceIntensity,
                            context.clone(),
                            &[("k_I", TURBULENCE_FACTOR), ("c_0", self.c_0), ("z", z_e), ("z_0", profile.z0_m)],
                            i_v,
                        );
                        i_v
                    }
                    TurbulenceModel::Simplified => {
                        let i_v = turbulence_intensity_simplified(TURBULENCE_FACTOR, z_e, profile)?;
                        tracker.record_values(
                            Equation::TurbulenceIntensitySimplified,
                            context.clone(),
                            &[("k_I", TURBULENCE_FACTOR), ("z", z_e), ("z_0", profile.z0_m)],
                            i_v,
                        );
                        i_v
                    }
                };
                let q_p = peak_pressure(i_v, self.rho_kg_m3, v_m_ms);
                tracker.record_values(
                    Equation::PeakVelocityPressure,
                    context,
                    &[("I_v", i_v), ("rho", self.rho_kg_m3), ("v_m", v_m_ms)],
                    q_p,
                );
                (Some(i_v), None, q_p)
            }
        };

        log::trace!("{:?}: c_r = {:.4}, v_m = {:.3}, q_p = {:.4}", segment.label, c_r, v_m_ms, q_p_kpa);

        Ok(ExposureProfile {
            segment,
            c_r,
            c_0: self.c_0,
            v_m_ms,
            i_v,
            c_e,
            q_p_kpa,
        })
    }
}
