//! # Equation Registry
//!
//! Central registry of every wind-load equation used by the engine. Each
//! equation carries metadata (formula, EN 1991-1-4 clause, variables,
//! assumptions) so a calculation can be audited step by step.
//!
//! ## Architecture
//!
//! - Type-safe equation identification via the [`Equation`] enum
//! - Full metadata for reports and the generated `EQUATIONS.md`
//! - [`EquationTracker`] collects the equations a calculation used, together
//!   with the numeric inputs and result of each step
//!
//! ## Usage
//!
//! ```rust
//! use wind_core::equations::registry::{Equation, EquationTracker};
//!
//! let mut tracker = EquationTracker::new();
//! tracker.record_values(
//!     Equation::BasicWindVelocity,
//!     "Site",
//!     &[("c_dir", 1.0), ("c_season", 1.0), ("v_b0", 22.0)],
//!     22.0,
//! );
//!
//! let steps = tracker.explanation();
//! assert_eq!(steps[0].title, "Basic Wind Velocity");
//! assert_eq!(steps[0].result, Some(22.0));
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// Code References
// ============================================================================

/// Reference to the standard clause an equation comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodeReference {
    /// EN 1991-1-4 Eurocode 1: Actions on structures - Wind actions
    EN1991_1_4 { year: u16, clause: &'static str },
    /// Fundamental mechanics / tributary-width load transfer
    Mechanics,
}

impl CodeReference {
    /// Format the reference for display in reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::EN1991_1_4 { year, clause } => {
                format!("EN 1991-1-4:{} {}", year, clause)
            }
            CodeReference::Mechanics => "Fundamental Mechanics".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::EN1991_1_4 { .. } => "EN 1991-1-4",
            CodeReference::Mechanics => "Mechanics",
        }
    }
}

const fn en(clause: &'static str) -> CodeReference {
    CodeReference::EN1991_1_4 { year: 2005, clause }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for grouping equations in reports, in calculation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Air density, basic velocity and basic velocity pressure
    Environment,
    /// Terrain, roughness, orography and mean velocity
    Terrain,
    /// Turbulence, exposure and peak velocity pressure
    Exposure,
    /// Reference heights, characteristic length and zone areas
    Geometry,
    /// External and internal pressure coefficients
    PressureCoefficients,
    /// Surface pressures and forces
    NetPressures,
    /// Purlin and truss loads
    LoadTransfer,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::Environment => "Environmental Parameters",
            EquationCategory::Terrain => "Terrain & Mean Wind",
            EquationCategory::Exposure => "Turbulence & Peak Pressure",
            EquationCategory::Geometry => "Geometry & Zones",
            EquationCategory::PressureCoefficients => "Pressure Coefficients",
            EquationCategory::NetPressures => "Net Pressures & Forces",
            EquationCategory::LoadTransfer => "Load Transfer",
        }
    }

    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::Environment => 1,
            EquationCategory::Terrain => 2,
            EquationCategory::Exposure => 3,
            EquationCategory::Geometry => 4,
            EquationCategory::PressureCoefficients => 5,
            EquationCategory::NetPressures => 6,
            EquationCategory::LoadTransfer => 7,
        }
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// A variable appearing in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    pub symbol: &'static str,
    pub description: &'static str,
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self {
            symbol,
            description,
            units,
        }
    }
}

/// Everything known about an equation, independent of any calculation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub formula_plain: &'static str,
    pub reference: CodeReference,
    /// Symbol and units of the computed quantity
    pub result: Variable,
    pub variables: Vec<Variable>,
    pub assumptions: Vec<&'static str>,
    pub category: EquationCategory,
    pub source_module: &'static str,
    pub source_function: &'static str,
}

/// Identifies an equation used by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    AirDensityTabulated,
    AirDensityLinear,
    BasicWindVelocity,
    BasicVelocityPressure,
    TerrainFactor,
    RoughnessFactor,
    OrographyFactor,
    MeanWindVelocity,
    TurbulenceIntensity,
    TurbulenceIntensitySimplified,
    ExposureFactor,
    PeakPressureFromExposure,
    PeakVelocityPressure,
    ReferenceHeight,
    CharacteristicLength,
    ZoneArea,
    ExternalCoefficientArea,
    ExternalCoefficientInterpolation,
    OpeningRatio,
    InternalCoefficientOpenings,
    ExternalPressure,
    NetPressure,
    WindForce,
    PurlinLoad,
    TrussLoad,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::AirDensityTabulated => EquationMetadata {
                name: "Air Density by Altitude",
                description: "Air density interpolated linearly between tabulated altitudes; \
                              above the last anchor the last density is used",
                formula_plain: "rho = interp([0,500,1000,1500,2000] m -> [1.20,1.12,1.06,1.00,0.94], A + h)",
                reference: en("4.5(1) Note 2"),
                result: Variable::new("rho", "Air density", "kg/m^3"),
                variables: vec![
                    Variable::new("A", "Site altitude above sea level", "m"),
                    Variable::new("h", "Building height added to the altitude", "m"),
                ],
                assumptions: vec!["Altitude clamped at 2000 m"],
                category: EquationCategory::Environment,
                source_module: "environment.rs",
                source_function: "air_density",
            },

            Equation::AirDensityLinear => EquationMetadata {
                name: "Air Density (Linear Decay)",
                description: "Air density decreasing linearly with site altitude",
                formula_plain: "rho = 1.25 * (1 - 0.0001 * A)",
                reference: en("4.5(1) Note 2"),
                result: Variable::new("rho", "Air density", "kg/m^3"),
                variables: vec![Variable::new("A", "Site altitude above sea level", "m")],
                assumptions: vec!["Valid below 10 000 m"],
                category: EquationCategory::Environment,
                source_module: "environment.rs",
                source_function: "air_density_linear",
            },

            Equation::BasicWindVelocity => EquationMetadata {
                name: "Basic Wind Velocity",
                description: "Fundamental value modified by directional and seasonal factors",
                formula_plain: "v_b = c_dir * c_season * v_b0",
                reference: en("4.2(2)P, Eq. 4.1"),
                result: Variable::new("v_b", "Basic wind velocity", "m/s"),
                variables: vec![
                    Variable::new("c_dir", "Directional factor", "-"),
                    Variable::new("c_season", "Season factor", "-"),
                    Variable::new("v_b0", "Fundamental value of the basic wind velocity", "m/s"),
                ],
                assumptions: vec!["c_dir and c_season default to 1.0"],
                category: EquationCategory::Environment,
                source_module: "environment.rs",
                source_function: "basic_wind_velocity",
            },

            Equation::BasicVelocityPressure => EquationMetadata {
                name: "Basic Velocity Pressure",
                description: "Dynamic pressure of the basic wind velocity",
                formula_plain: "q_b = 0.5 * rho * v_b^2 * 10^-3",
                reference: en("4.5(1), Eq. 4.10"),
                result: Variable::new("q_b", "Basic velocity pressure", "kN/m^2"),
                variables: vec![
                    Variable::new("rho", "Air density", "kg/m^3"),
                    Variable::new("v_b", "Basic wind velocity", "m/s"),
                ],
                assumptions: vec![],
                category: EquationCategory::Environment,
                source_module: "environment.rs",
                source_function: "basic_velocity_pressure",
            },

            Equation::TerrainFactor => EquationMetadata {
                name: "Terrain Factor",
                description: "Terrain factor depending on the roughness length",
                formula_plain: "k_r = 0.19 * (z_0 / 0.05)^0.07",
                reference: en("4.3.2(1), Eq. 4.5"),
                result: Variable::new("k_r", "Terrain factor", "-"),
                variables: vec![Variable::new("z_0", "Roughness length", "m")],
                assumptions: vec!["z_0,II = 0.05 m"],
                category: EquationCategory::Terrain,
                source_module: "terrain.rs",
                source_function: "terrain_factor",
            },

            Equation::RoughnessFactor => EquationMetadata {
                name: "Roughness Factor",
                description: "Logarithmic velocity profile, floored at the minimum height",
                formula_plain: "c_r = k_r * ln(max(z, z_min) / z_0)",
                reference: en("4.3.2(1), Eq. 4.4"),
                result: Variable::new("c_r", "Roughness factor", "-"),
                variables: vec![
                    Variable::new("k_r", "Terrain factor", "-"),
                    Variable::new("z", "Reference height", "m"),
                    Variable::new("z_min", "Minimum height", "m"),
                    Variable::new("z_0", "Roughness length", "m"),
                ],
                assumptions: vec!["z below z_min is raised to z_min"],
                category: EquationCategory::Terrain,
                source_module: "terrain.rs",
                source_function: "roughness_factor",
            },

            Equation::OrographyFactor => EquationMetadata {
                name: "Orography Factor",
                description: "Speed-up over isolated hills and escarpments",
                formula_plain: "c_0 = 1 (phi < 0.05); 1 + 2*s*phi (0.05 <= phi < 0.3); 1 + 0.6*s (phi >= 0.3)",
                reference: en("A.3, Eq. A.1-A.3"),
                result: Variable::new("c_0", "Orography factor", "-"),
                variables: vec![
                    Variable::new("phi", "Upwind slope H/L_u", "-"),
                    Variable::new("s", "Orographic location factor", "-"),
                ],
                assumptions: vec![],
                category: EquationCategory::Terrain,
                source_module: "terrain.rs",
                source_function: "orography_factor",
            },

            Equation::MeanWindVelocity => EquationMetadata {
                name: "Mean Wind Velocity",
                description: "Mean wind velocity at the reference height",
                formula_plain: "v_m = c_r * c_0 * v_b",
                reference: en("4.3.1(1), Eq. 4.3"),
                result: Variable::new("v_m", "Mean wind velocity", "m/s"),
                variables: vec![
                    Variable::new("c_r", "Roughness factor", "-"),
                    Variable::new("c_0", "Orography factor", "-"),
                    Variable::new("v_b", "Basic wind velocity", "m/s"),
                ],
                assumptions: vec![],
                category: EquationCategory::Terrain,
                source_module: "terrain.rs",
                source_function: "mean_velocity",
            },

            Equation::TurbulenceIntensity => EquationMetadata {
                name: "Turbulence Intensity",
                description: "Standard deviation of turbulence over mean velocity",
                formula_plain: "I_v = k_I / (c_0 * ln(max(z, z_min) / z_0))",
                reference: en("4.4(1), Eq. 4.7"),
                result: Variable::new("I_v", "Turbulence intensity", "-"),
                variables: vec![
                    Variable::new("k_I", "Turbulence factor", "-"),
                    Variable::new("c_0", "Orography factor", "-"),
                    Variable::new("z", "Reference height", "m"),
                    Variable::new("z_0", "Roughness length", "m"),
                ],
                assumptions: vec!["k_I = 1.0"],
                category: EquationCategory::Exposure,
                source_module: "terrain.rs",
                source_function: "turbulence_intensity",
            },

            Equation::TurbulenceIntensitySimplified => EquationMetadata {
                name: "Turbulence Intensity (Flat Terrain)",
                description: "Turbulence intensity without orography scaling",
                formula_plain: "I_v = k_I / ln(z / z_0)",
                reference: en("4.4(1), Eq. 4.7 with c_0 = 1"),
                result: Variable::new("I_v", "Turbulence intensity", "-"),
                variables: vec![
                    Variable::new("k_I", "Turbulence factor", "-"),
                    Variable::new("z", "Reference height", "m"),
                    Variable::new("z_0", "Roughness length", "m"),
                ],
                assumptions: vec!["k_I = 1.0", "No minimum-height floor"],
                category: EquationCategory::Exposure,
                source_module: "terrain.rs",
                source_function: "turbulence_intensity_simplified",
            },

            Equation::ExposureFactor => EquationMetadata {
                name: "Exposure Factor",
                description: "Ratio of peak to basic velocity pressure",
                formula_plain: "c_e = c_0^2 * c_r^2 * (1 + 7 * k_r / (c_0 * c_r))",
                reference: en("4.5(1), Eq. 4.9 / Figure 4.2"),
                result: Variable::new("c_e", "Exposure factor", "-"),
                variables: vec![
                    Variable::new("c_0", "Orography factor", "-"),
                    Variable::new("c_r", "Roughness factor", "-"),
                    Variable::new("k_r", "Terrain factor", "-"),
                ],
                assumptions: vec!["k_I = 1.0"],
                category: EquationCategory::Exposure,
                source_module: "terrain.rs",
                source_function: "exposure_factor",
            },

            Equation::PeakPressureFromExposure => EquationMetadata {
                name: "Peak Velocity Pressure (Exposure Factor)",
                description: "Peak velocity pressure from the exposure factor",
                formula_plain: "q_p = c_e * q_b",
                reference: en("4.5(1), Eq. 4.9"),
                result: Variable::new("q_p", "Peak velocity pressure", "kN/m^2"),
                variables: vec![
                    Variable::new("c_e", "Exposure factor", "-"),
                    Variable::new("q_b", "Basic velocity pressure", "kN/m^2"),
                ],
                assumptions: vec![],
                category: EquationCategory::Exposure,
                source_module: "terrain.rs",
                source_function: "peak_pressure_from_exposure",
            },

            Equation::PeakVelocityPressure => EquationMetadata {
                name: "Peak Velocity Pressure",
                description: "Peak velocity pressure from mean velocity and turbulence",
                formula_plain: "q_p = (1 + 7 * I_v) * 0.5 * rho * v_m^2 * 10^-3",
                reference: en("4.5(1), Eq. 4.8"),
                result: Variable::new("q_p", "Peak velocity pressure", "kN/m^2"),
                variables: vec![
                    Variable::new("I_v", "Turbulence intensity", "-"),
                    Variable::new("rho", "Air density", "kg/m^3"),
                    Variable::new("v_m", "Mean wind velocity", "m/s"),
                ],
                assumptions: vec![],
                category: EquationCategory::Exposure,
                source_module: "terrain.rs",
                source_function: "peak_pressure",
            },

            Equation::ReferenceHeight => EquationMetadata {
                name: "Reference Height",
                description: "Reference height of a windward wall strip",
                formula_plain: "h <= b: z_e = h; b < h < 2b: z_e = b (lower), h (upper); h >= 2b: z_e = h",
                reference: en("7.2.2(1), Figure 7.4"),
                result: Variable::new("z_e", "Reference height", "m"),
                variables: vec![
                    Variable::new("h", "Building height", "m"),
                    Variable::new("b", "Crosswind dimension", "m"),
                ],
                assumptions: vec!["Strip subdivision for h >= 2b is not applied"],
                category: EquationCategory::Geometry,
                source_module: "terrain.rs",
                source_function: "reference_heights",
            },

            Equation::CharacteristicLength => EquationMetadata {
                name: "Characteristic Length",
                description: "Length scale used to size pressure zones",
                formula_plain: "e = min(b, 2h)",
                reference: en("7.2.2(2), Figure 7.5"),
                result: Variable::new("e", "Characteristic length", "m"),
                variables: vec![
                    Variable::new("b", "Crosswind dimension", "m"),
                    Variable::new("h", "Reference height", "m"),
                ],
                assumptions: vec![],
                category: EquationCategory::Geometry,
                source_module: "zones.rs",
                source_function: "characteristic_length",
            },

            Equation::ZoneArea => EquationMetadata {
                name: "Zone Area",
                description: "Loaded area of a rectangular (or triangular) pressure zone",
                formula_plain: "A = w * l",
                reference: en("7.2.2 - 7.2.8, zone figures"),
                result: Variable::new("A", "Zone area", "m^2"),
                variables: vec![
                    Variable::new("w", "Zone width", "m"),
                    Variable::new("l", "Zone length", "m"),
                ],
                assumptions: vec!["Zones with zero area are omitted"],
                category: EquationCategory::Geometry,
                source_module: "zones.rs",
                source_function: "Zone::rect",
            },

            Equation::ExternalCoefficientArea => EquationMetadata {
                name: "External Pressure Coefficient by Area",
                description: "Log-linear interpolation between the 1 m^2 and 10 m^2 coefficients",
                formula_plain: "c_pe = c_pe,1 - (c_pe,1 - c_pe,10) * log10(A) for 1 < A < 10",
                reference: en("7.2.1(1), Figure 7.2"),
                result: Variable::new("c_pe", "External pressure coefficient", "-"),
                variables: vec![
                    Variable::new("c_pe,1", "Coefficient for A <= 1 m^2", "-"),
                    Variable::new("c_pe,10", "Coefficient for A >= 10 m^2", "-"),
                    Variable::new("A", "Loaded area", "m^2"),
                ],
                assumptions: vec!["c_pe,1 taken equal to c_pe,10 where not tabulated"],
                category: EquationCategory::PressureCoefficients,
                source_module: "coefficients/mod.rs",
                source_function: "resolve_by_area",
            },

            Equation::ExternalCoefficientInterpolation => EquationMetadata {
                name: "External Pressure Coefficient Interpolation",
                description: "Linear interpolation between tabulated pitch angles or ratios",
                formula_plain: "c = c_lo + (c_hi - c_lo) * (x - x_lo) / (x_hi - x_lo)",
                reference: en("7.2.3 - 7.2.8, table notes"),
                result: Variable::new("c_pe", "External pressure coefficient", "-"),
                variables: vec![
                    Variable::new("x", "Table parameter (pitch, h/d or h_p/h)", "-"),
                    Variable::new("x_lo", "Lower tabulated parameter", "-"),
                    Variable::new("x_hi", "Upper tabulated parameter", "-"),
                ],
                assumptions: vec!["Interpolation only between values of the same sign"],
                category: EquationCategory::PressureCoefficients,
                source_module: "coefficients/mod.rs",
                source_function: "CoefficientTable::resolve",
            },

            Equation::OpeningRatio => EquationMetadata {
                name: "Opening Ratio",
                description: "Share of openings lying on suction faces",
                formula_plain: "mu = (A_leeward + A_parallel) / (A_windward + A_leeward + A_parallel)",
                reference: en("7.2.9(6), Eq. 7.3"),
                result: Variable::new("mu", "Opening ratio", "-"),
                variables: vec![
                    Variable::new("A_windward", "Windward opening area", "m^2"),
                    Variable::new("A_leeward", "Leeward opening area", "m^2"),
                    Variable::new("A_parallel", "Opening area parallel to the wind", "m^2"),
                ],
                assumptions: vec!["mu = 0 when there are no openings"],
                category: EquationCategory::PressureCoefficients,
                source_module: "coefficients/internal.rs",
                source_function: "opening_ratio",
            },

            Equation::InternalCoefficientOpenings => EquationMetadata {
                name: "Internal Pressure Coefficient",
                description: "Internal coefficient interpolated on the building proportions",
                formula_plain: "c_pi = 0.17 (h/d <= 0.25); 0.10 (h/d >= 1.0); linear between",
                reference: en("7.2.9(6), Figure 7.13"),
                result: Variable::new("c_pi", "Internal pressure coefficient", "-"),
                variables: vec![
                    Variable::new("h/d", "Height to depth ratio", "-"),
                    Variable::new("mu", "Opening ratio", "-"),
                ],
                assumptions: vec!["mu is reported alongside c_pi"],
                category: EquationCategory::PressureCoefficients,
                source_module: "coefficients/internal.rs",
                source_function: "internal_coefficient_from_openings",
            },

            Equation::ExternalPressure => EquationMetadata {
                name: "External Wind Pressure",
                description: "Wind pressure acting on the external surface",
                formula_plain: "w_e = q_p * c_pe",
                reference: en("5.2(1), Eq. 5.1"),
                result: Variable::new("w_e", "External pressure", "kN/m^2"),
                variables: vec![
                    Variable::new("q_p", "Peak velocity pressure", "kN/m^2"),
                    Variable::new("c_pe", "External pressure coefficient", "-"),
                ],
                assumptions: vec!["Positive towards the surface"],
                category: EquationCategory::NetPressures,
                source_module: "combination.rs",
                source_function: "external_pressure",
            },

            Equation::NetPressure => EquationMetadata {
                name: "Net Wind Pressure",
                description: "External and internal pressure combined with the case convention",
                formula_plain: "w_net = q_p * (c_pe + c_pi) [additive] or q_p * (c_pe - c_pi) [subtractive]",
                reference: en("5.2(1)-(3), Eq. 5.1/5.2"),
                result: Variable::new("w_net", "Net pressure", "kN/m^2"),
                variables: vec![
                    Variable::new("q_p", "Peak velocity pressure", "kN/m^2"),
                    Variable::new("c_pe", "External pressure coefficient", "-"),
                    Variable::new("c_pi", "Internal pressure coefficient", "-"),
                ],
                assumptions: vec!["Most onerous c_pi retained", "q_p(z_i) = q_p(z_e)"],
                category: EquationCategory::NetPressures,
                source_module: "combination.rs",
                source_function: "net_pressure",
            },

            Equation::WindForce => EquationMetadata {
                name: "Wind Force on Zone",
                description: "Resultant force on a zone including the structural factor",
                formula_plain: "F_w = c_s c_d * w_net * A",
                reference: en("5.3(3), Eq. 5.5"),
                result: Variable::new("F_w", "Wind force", "kN"),
                variables: vec![
                    Variable::new("c_s c_d", "Structural factor", "-"),
                    Variable::new("w_net", "Net pressure", "kN/m^2"),
                    Variable::new("A", "Zone area", "m^2"),
                ],
                assumptions: vec![],
                category: EquationCategory::NetPressures,
                source_module: "combination.rs",
                source_function: "zone_force",
            },

            Equation::PurlinLoad => EquationMetadata {
                name: "Purlin Line Load",
                description: "Wind pressure collected over the purlin tributary width",
                formula_plain: "F_w,purlin = w_e * s_purlin",
                reference: CodeReference::Mechanics,
                result: Variable::new("F_w,purlin", "Purlin line load", "kN/m"),
                variables: vec![
                    Variable::new("w_e", "External pressure", "kN/m^2"),
                    Variable::new("s_purlin", "Purlin spacing", "m"),
                ],
                assumptions: vec!["Tributary width equals purlin spacing"],
                category: EquationCategory::LoadTransfer,
                source_module: "combination.rs",
                source_function: "purlin_load",
            },

            Equation::TrussLoad => EquationMetadata {
                name: "Truss Point Load",
                description: "Purlin line load collected over the truss spacing",
                formula_plain: "F_w,truss = F_w,purlin * s_truss",
                reference: CodeReference::Mechanics,
                result: Variable::new("F_w,truss", "Truss point load", "kN"),
                variables: vec![
                    Variable::new("F_w,purlin", "Purlin line load", "kN/m"),
                    Variable::new("s_truss", "Truss spacing", "m"),
                ],
                assumptions: vec!["Purlins simply supported between trusses"],
                category: EquationCategory::LoadTransfer,
                source_module: "combination.rs",
                source_function: "truss_load",
            },
        }
    }

    /// Get all equations in a given category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in calculation order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![
            Environment,
            Terrain,
            Exposure,
            Geometry,
            PressureCoefficients,
            NetPressures,
            LoadTransfer,
        ];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::AirDensityTabulated,
    Equation::AirDensityLinear,
    Equation::BasicWindVelocity,
    Equation::BasicVelocityPressure,
    Equation::TerrainFactor,
    Equation::RoughnessFactor,
    Equation::OrographyFactor,
    Equation::MeanWindVelocity,
    Equation::TurbulenceIntensity,
    Equation::TurbulenceIntensitySimplified,
    Equation::ExposureFactor,
    Equation::PeakPressureFromExposure,
    Equation::PeakVelocityPressure,
    Equation::ReferenceHeight,
    Equation::CharacteristicLength,
    Equation::ZoneArea,
    Equation::ExternalCoefficientArea,
    Equation::ExternalCoefficientInterpolation,
    Equation::OpeningRatio,
    Equation::InternalCoefficientOpenings,
    Equation::ExternalPressure,
    Equation::NetPressure,
    Equation::WindForce,
    Equation::PurlinLoad,
    Equation::TrussLoad,
];

// ============================================================================
// Usage Tracking
// ============================================================================

/// A named numeric value recorded in a trace step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceValue {
    pub symbol: String,
    pub value: f64,
}

/// A record of an equation being used in a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Where it was used (e.g. "Upper segment", "0° direction")
    pub context: String,
    /// The zone this step belongs to, if any
    pub zone: Option<String>,
    /// Numeric inputs in formula order
    pub inputs: Vec<TraceValue>,
    /// Computed value
    pub result: Option<f64>,
}

impl EquationUsage {
    /// Create a new equation usage record
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            zone: None,
            inputs: Vec::new(),
            result: None,
        }
    }

    /// Attach numeric inputs and the result
    pub fn with_values(mut self, inputs: &[(&str, f64)], result: f64) -> Self {
        self.inputs = inputs
            .iter()
            .map(|(symbol, value)| TraceValue {
                symbol: (*symbol).to_string(),
                value: *value,
            })
            .collect();
        self.result = Some(result);
        self
    }

    /// Attach the zone label
    pub fn for_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}

/// A human-readable audit step rendered from an [`EquationUsage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationStep {
    pub title: String,
    pub formula: String,
    pub reference: String,
    pub context: String,
    pub zone: Option<String>,
    pub inputs: Vec<TraceValue>,
    pub result: Option<f64>,
    pub result_symbol: String,
    pub result_units: String,
}

/// Collector for equation usage during a calculation.
///
/// A disabled tracker ignores every record call, so calculations can run
/// the same code path with or without an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
    #[serde(skip, default = "tracker_enabled_default")]
    enabled: bool,
}

fn tracker_enabled_default() -> bool {
    true
}

impl Default for EquationTracker {
    fn default() -> Self {
        Self {
            usages: Vec::new(),
            enabled: true,
        }
    }
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that records nothing
    pub fn disabled() -> Self {
        Self {
            usages: Vec::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        if self.enabled {
            self.usages.push(EquationUsage::new(equation, context));
        }
    }

    /// Record an equation with its numeric inputs and result
    pub fn record_values(
        &mut self,
        equation: Equation,
        context: impl Into<String>,
        inputs: &[(&str, f64)],
        result: f64,
    ) {
        if self.enabled {
            self.usages
                .push(EquationUsage::new(equation, context).with_values(inputs, result));
        }
    }

    /// Record an equation evaluated for a specific zone
    pub fn record_zone_values(
        &mut self,
        equation: Equation,
        context: impl Into<String>,
        zone: impl Into<String>,
        inputs: &[(&str, f64)],
        result: f64,
    ) {
        if self.enabled {
            self.usages.push(
                EquationUsage::new(equation, context)
                    .with_values(inputs, result)
                    .for_zone(zone),
            );
        }
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category, in calculation order
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Merge another tracker into this one
    pub fn merge(&mut self, other: EquationTracker) {
        if self.enabled {
            self.usages.extend(other.usages);
        }
    }

    /// Render the recorded steps as titled audit entries, in recording order.
    pub fn explanation(&self) -> Vec<ExplanationStep> {
        self.usages
            .iter()
            .map(|usage| {
                let meta = usage.equation.metadata();
                ExplanationStep {
                    title: meta.name.to_string(),
                    formula: meta.formula_plain.to_string(),
                    reference: meta.reference.citation(),
                    context: usage.context.clone(),
                    zone: usage.zone.clone(),
                    inputs: usage.inputs.clone(),
                    result: usage.result,
                    result_symbol: meta.result.symbol.to_string(),
                    result_units: meta.result.units.to_string(),
                }
            })
            .collect()
    }
}

// ============================================================================
// Markdown Generation
// ============================================================================

/// Generate the `EQUATIONS.md` reference from the registry.
///
/// ```rust
/// let markdown = wind_core::equations::generate_equations_markdown();
/// assert!(markdown.contains("Peak Velocity Pressure"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(24_000);

    output.push_str(
        r#"# Gale Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists every formula used by the wind load engine, with its
EN 1991-1-4 clause, source location and assumptions.

## Sign Conventions

| Quantity | Positive Direction |
|----------|-------------------|
| External pressure w_e | Towards the surface (pressure) |
| Internal pressure c_pi | Overpressure inside the building |
| Net pressure w_net | Towards the surface; negative is suction / uplift |
| Zone force F_w | Same sign as w_net |

---

"#,
    );

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            output.push_str("**Variables:**\n\n");
            output.push_str("| Symbol | Description | Units |\n");
            output.push_str("|--------|-------------|-------|\n");
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                meta.result.symbol, meta.result.description, meta.result.units
            ));
            for var in &meta.variables {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    var.symbol, var.description, var.units
                ));
            }
            output.push('\n');

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output.push_str(
        r#"## How to Audit

1. Find the equation you want to verify in the sections above
2. Check the **Reference** for the EN 1991-1-4 clause
3. Click the **Source** link to view the implementation code
4. Run `cargo test` to verify equations against known values
"#,
    );

    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_equations_have_metadata() {
        assert_eq!(ALL_EQUATIONS.len(), 25);

        for eq in ALL_EQUATIONS {
            let meta = eq.metadata();
            assert!(!meta.name.is_empty(), "Equation {:?} has no name", eq);
            assert!(!meta.formula_plain.is_empty(), "Equation {:?} has no formula", eq);
            assert!(!meta.variables.is_empty(), "Equation {:?} has no variables", eq);
            assert!(!meta.source_module.is_empty(), "Equation {:?} missing source_module", eq);
        }

        let q_b = Equation::BasicVelocityPressure.metadata();
        assert!(q_b.formula_plain.contains("0.5 * rho * v_b^2"));

        let area = Equation::ExternalCoefficientArea.metadata();
        assert!(area.formula_plain.contains("log10(A)"));
    }

    #[test]
    fn test_code_reference_citation() {
        let reference = CodeReference::EN1991_1_4 {
            year: 2005,
            clause: "4.3.2(1), Eq. 4.4",
        };
        assert_eq!(reference.citation(), "EN 1991-1-4:2005 4.3.2(1), Eq. 4.4");
        assert_eq!(CodeReference::Mechanics.short_form(), "Mechanics");
    }

    #[test]
    fn test_equation_tracker() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::RoughnessFactor, "Upper segment");
        tracker.record(Equation::MeanWindVelocity, "Upper segment");
        tracker.record(Equation::RoughnessFactor, "Lower segment");

        assert_eq!(tracker.usages().len(), 3);
        assert_eq!(tracker.unique_equations().len(), 2);
        assert_eq!(tracker.by_equation()[&Equation::RoughnessFactor].len(), 2);
    }

    #[test]
    fn test_disabled_tracker_records_nothing() {
        let mut tracker = EquationTracker::disabled();
        tracker.record_values(Equation::BasicWindVelocity, "Site", &[("v_b0", 22.0)], 22.0);
        tracker.record_zone_values(Equation::NetPressure, "0°", "F", &[("q_p", 0.6)], -1.2);
        assert!(tracker.is_empty());
        assert!(tracker.explanation().is_empty());
    }

    #[test]
    fn test_by_category() {
        let mut tracker = EquationTracker::new();
        tracker.record(Equation::PeakVelocityPressure, "test");
        tracker.record(Equation::BasicWindVelocity, "test");
        tracker.record(Equation::PurlinLoad, "test");

        let by_cat = tracker.by_category();
        let categories: Vec<_> = by_cat.iter().map(|(cat, _)| *cat).collect();
        assert_eq!(
            categories,
            vec![
                EquationCategory::Environment,
                EquationCategory::Exposure,
                EquationCategory::LoadTransfer
            ]
        );
    }

    #[test]
    fn test_explanation_steps() {
        let mut tracker = EquationTracker::new();
        tracker.record_zone_values(
            Equation::WindForce,
            "0°",
            "F",
            &[("c_s c_d", 1.0), ("w_net", -1.2), ("A", 2.0)],
            -2.4,
        );

        let steps = tracker.explanation();
        assert_eq!(steps.len(), 1);
        let step = &steps[0];
        assert_eq!(step.title, "Wind Force on Zone");
        assert_eq!(step.zone.as_deref(), Some("F"));
        assert_eq!(step.inputs.len(), 3);
        assert_eq!(step.inputs[1].symbol, "w_net");
        assert_eq!(step.result, Some(-2.4));
        assert_eq!(step.result_units, "kN");
        assert!(step.reference.starts_with("EN 1991-1-4"));
    }

    #[test]
    fn test_merge_respects_enabled() {
        let mut other = EquationTracker::new();
        other.record(Equation::TrussLoad, "0°");

        let mut enabled = EquationTracker::new();
        enabled.merge(other.clone());
        assert_eq!(enabled.usages().len(), 1);

        let mut disabled = EquationTracker::disabled();
        disabled.merge(other);
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_categories_sorted() {
        let cats = Equation::all_categories();
        let orders: Vec<u8> = cats.iter().map(|c| c.sort_order()).collect();
        let mut sorted = orders.clone();
        sorted.sort();
        assert_eq!(orders, sorted, "Categories should be sorted by sort_order");
    }

    #[test]
    fn test_generate_equations_markdown() {
        let markdown = generate_equations_markdown();

        assert!(markdown.contains("# Gale Equations Reference"));
        assert!(markdown.contains("Auto-generated from source code"));
        assert!(markdown.contains("## Sign Conventions"));

        for category in Equation::all_categories() {
            assert!(
                markdown.contains(&format!("## {}", category.display_name())),
                "Missing category {:?}",
                category
            );
        }

        assert!(markdown.contains("### Roughness Factor"));
        assert!(markdown.contains("`e = min(b, 2h)`"));
        assert!(markdown.contains("EN 1991-1-4:2005 4.4(1), Eq. 4.7"));
        assert!(markdown.contains("terrain.rs"));
        assert!(markdown.contains("**Total Equations:** 25"));
        assert!(markdown.contains("**Categories:** 7"));
    }
}
