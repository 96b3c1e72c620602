//! # Wind Load Calculations
//!
//! One module per building shape. Each follows the pattern:
//!
//! - `*Input` - geometry, site and policies (JSON-serializable)
//! - [`WindLoadResult`] - shared result record for every shape
//! - `calculate(&input)` - pure calculation, no trace
//! - `calculate_traced(&input)` - same numbers plus an [`EquationTracker`]
//!
//! The five stages (environment, terrain/exposure, zones, coefficients,
//! combination) run in order; shape-specific choices are gathered in a
//! [`ShapePolicy`] selected by [`RoofShape`].
//!
//! ## Available Calculations
//!
//! - [`wall`] - vertical walls of rectangular buildings
//! - [`flat_roof`] - flat roofs with or without parapets
//! - [`mono_pitch`] - mono-pitch roofs
//! - [`duo_pitch`] - duo-pitch roofs, both wind directions
//! - [`hipped`] - hipped roofs

pub mod duo_pitch;
pub mod flat_roof;
pub mod hipped;
pub mod mono_pitch;
pub mod wall;

use serde::{Deserialize, Serialize};

use crate::coefficients::{
    CoefficientTable, HeightDepthBracket, InterpolationOrder, InternalPressure, ParapetBracket,
    ResolvedInternalPressure,
};
use crate::combination::{
    pressure_extremes, CoefficientVariant, Combination, LoadTransferResult, NetPressureConvention, ZoneResult,
};
use crate::environment::WindSite;
use crate::equations::{Equation, EquationTracker};
use crate::errors::{CalcError, CalcResult};
use crate::terrain::{
    ExposureProfile, HeightRatioClass, PeakPressureModel, SiteConditions, TerrainTable, TurbulenceModel,
};
use crate::zones::{WallLayout, WindDirection, Zone};

pub use duo_pitch::DuoPitchInput;
pub use flat_roof::FlatRoofInput;
pub use hipped::HippedInput;
pub use mono_pitch::MonoPitchInput;
pub use wall::WallInput;

// ============================================================================
// Shape Policies
// ============================================================================

/// Building shapes the engine can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoofShape {
    Wall,
    Flat,
    MonoPitch,
    DuoPitch,
    Hipped,
}

/// Formula and table choices made by one shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapePolicy {
    pub terrain_table: TerrainTable,
    pub peak_pressure: PeakPressureModel,
    pub convention: NetPressureConvention,
    pub interpolation: InterpolationOrder,
    /// Used when the input does not name an internal pressure policy
    pub default_internal: InternalPressure,
    /// Whether the tabulated air density includes the building height
    pub density_at_height: bool,
    /// Inclusive pitch range in degrees, for pitched shapes
    pub pitch_range_deg: Option<(f64, f64)>,
    /// Direction the purlin/truss loads are taken from
    pub transfer_direction: Option<WindDirection>,
}

impl RoofShape {
    pub const ALL: [RoofShape; 5] = [
        RoofShape::Wall,
        RoofShape::Flat,
        RoofShape::MonoPitch,
        RoofShape::DuoPitch,
        RoofShape::Hipped,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RoofShape::Wall => "wall",
            RoofShape::Flat => "flat",
            RoofShape::MonoPitch => "mono",
            RoofShape::DuoPitch => "duo",
            RoofShape::Hipped => "hipped",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoofShape::Wall => "Vertical Walls",
            RoofShape::Flat => "Flat Roof",
            RoofShape::MonoPitch => "Mono-pitch Roof",
            RoofShape::DuoPitch => "Duo-pitch Roof",
            RoofShape::Hipped => "Hipped Roof",
        }
    }

    pub fn policy(&self) -> ShapePolicy {
        let roof_turbulence = PeakPressureModel::Turbulence(TurbulenceModel::OrographyScaled);
        match self {
            RoofShape::Wall => ShapePolicy {
                terrain_table: TerrainTable::Wall,
                peak_pressure: PeakPressureModel::ExposureFactor,
                convention: NetPressureConvention::Subtractive,
                interpolation: InterpolationOrder::ParameterThenArea,
                default_internal: InternalPressure::conservative(),
                density_at_height: true,
                pitch_range_deg: None,
                transfer_direction: None,
            },
            RoofShape::Flat => ShapePolicy {
                terrain_table: TerrainTable::Roof,
                peak_pressure: roof_turbulence,
                convention: NetPressureConvention::Subtractive,
                interpolation: InterpolationOrder::ParameterThenArea,
                default_internal: InternalPressure::conservative(),
                density_at_height: false,
                pitch_range_deg: None,
                transfer_direction: Some(WindDirection::Theta0),
            },
            RoofShape::MonoPitch => ShapePolicy {
                terrain_table: TerrainTable::Roof,
                peak_pressure: roof_turbulence,
                convention: NetPressureConvention::Additive,
                interpolation: InterpolationOrder::AreaThenParameter,
                default_internal: InternalPressure::OpeningRatio {
                    windward_m2: 0.0,
                    leeward_m2: 0.0,
                    parallel_m2: 0.0,
                },
                density_at_height: false,
                pitch_range_deg: Some((-5.0, 75.0)),
                transfer_direction: Some(WindDirection::Theta0),
            },
            RoofShape::DuoPitch => ShapePolicy {
                terrain_table: TerrainTable::Roof,
                peak_pressure: roof_turbulence,
                convention: NetPressureConvention::Additive,
                interpolation: InterpolationOrder::ParameterThenArea,
                default_internal: InternalPressure::Specified { c_pi: -0.3 },
                density_at_height: false,
                pitch_range_deg: Some((-75.0, 75.0)),
                transfer_direction: Some(WindDirection::Theta90),
            },
            RoofShape::Hipped => ShapePolicy {
                terrain_table: TerrainTable::Hipped,
                peak_pressure: PeakPressureModel::Turbulence(TurbulenceModel::Simplified),
                convention: NetPressureConvention::SignPaired,
                interpolation: InterpolationOrder::AreaThenParameter,
                default_internal: InternalPressure::conservative(),
                density_at_height: false,
                pitch_range_deg: Some((5.0, 75.0)),
                transfer_direction: Some(WindDirection::Theta0),
            },
        }
    }
}

impl ShapePolicy {
    /// Reject a pitch outside the shape's range.
    pub fn check_pitch(&self, pitch_deg: f64) -> CalcResult<()> {
        if let Some((min, max)) = self.pitch_range_deg {
            if !pitch_deg.is_finite() || pitch_deg < min || pitch_deg > max {
                return Err(CalcError::invalid_input(
                    "pitch_deg",
                    pitch_deg.to_string(),
                    format!("Pitch must be between {}° and {}°", min, max),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Results
// ============================================================================

/// Shape-specific classification reported with a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ShapeDetails {
    Wall {
        h_over_d: f64,
        bracket: HeightDepthBracket,
        layout: WallLayout,
        height_class: HeightRatioClass,
    },
    Flat {
        parapet_ratio: f64,
        bracket: ParapetBracket,
    },
    MonoPitch {
        pitch_deg: f64,
        h_over_d: f64,
    },
    DuoPitch {
        pitch_deg: f64,
        directions: Vec<WindDirection>,
    },
    Hipped {
        pitch_deg: f64,
    },
}

/// Result of a wind load calculation, common to every shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindLoadResult {
    pub shape: RoofShape,
    /// Density, velocities and terrain parameters
    pub site: SiteConditions,
    /// Wind quantities per reference height (one or two entries)
    pub exposure: Vec<ExposureProfile>,
    /// e = min(b, 2h)
    pub characteristic_length_m: f64,
    pub internal: ResolvedInternalPressure,
    pub details: ShapeDetails,
    /// Zone results in zone order, one row per direction and variant
    pub zones: Vec<ZoneResult>,
    /// Largest positive w_net, 0 when none
    pub max_positive_w_net_kpa: f64,
    /// Most negative w_net, 0 when none
    pub min_negative_w_net_kpa: f64,
    pub load_transfer: Option<LoadTransferResult>,
}

impl WindLoadResult {
    /// The zone row with the largest |w_net|
    pub fn governing_zone(&self) -> Option<&ZoneResult> {
        self.zones
            .iter()
            .max_by(|a, b| a.w_net_kpa.abs().total_cmp(&b.w_net_kpa.abs()))
    }
}

pub(crate) struct ResultParts {
    pub shape: RoofShape,
    pub site: SiteConditions,
    pub exposure: Vec<ExposureProfile>,
    pub characteristic_length_m: f64,
    pub internal: ResolvedInternalPressure,
    pub details: ShapeDetails,
    pub zones: Vec<ZoneResult>,
    pub load_transfer: Option<LoadTransferResult>,
}

impl From<ResultParts> for WindLoadResult {
    fn from(parts: ResultParts) -> Self {
        let (max_positive_w_net_kpa, min_negative_w_net_kpa) = pressure_extremes(&parts.zones);
        WindLoadResult {
            shape: parts.shape,
            site: parts.site,
            exposure: parts.exposure,
            characteristic_length_m: parts.characteristic_length_m,
            internal: parts.internal,
            details: parts.details,
            zones: parts.zones,
            max_positive_w_net_kpa,
            min_negative_w_net_kpa,
            load_transfer: parts.load_transfer,
        }
    }
}

// ============================================================================
// Shared Stages
// ============================================================================

pub(crate) fn default_structural_factor() -> f64 {
    1.0
}

pub(crate) fn record_geometry(
    crosswind_m: f64,
    height_m: f64,
    e_m: f64,
    zones: &[Zone],
    context: &str,
    tracker: &mut EquationTracker,
) {
    tracker.record_values(
        Equation::CharacteristicLength,
        context,
        &[("b", crosswind_m), ("h", height_m)],
        e_m,
    );
    for zone in zones {
        tracker.record_zone_values(
            Equation::ZoneArea,
            context,
            zone.id.label(),
            &[("w", zone.width_m), ("l", zone.length_m)],
            zone.area_m2,
        );
    }
}

/// Coefficient lookup for one zone set against one table.
pub(crate) struct ZoneEvaluation<'a> {
    pub table: &'a CoefficientTable,
    /// Table parameter (pitch, h/d or h_p/h)
    pub parameter: f64,
    pub order: InterpolationOrder,
    pub direction: Option<WindDirection>,
}

impl ZoneEvaluation<'_> {
    /// Resolve c_pe for every zone and combine it. `q_p` gives the peak
    /// pressure acting on a zone.
    pub fn run(
        &self,
        zones: &[Zone],
        combination: &Combination<'_>,
        q_p: impl Fn(&Zone) -> f64,
        tracker: &mut EquationTracker,
    ) -> CalcResult<Vec<ZoneResult>> {
        let bracket = self.table.bracket(self.parameter)?;
        let context = match self.direction {
            Some(d) => format!("{} {}", self.table.name, d.display_name()),
            None => self.table.name.to_string(),
        };

        let mut results = Vec::with_capacity(zones.len() * 2);
        for zone in zones {
            let variants = self
                .table
                .resolve(self.parameter, zone.id.table_key(), zone.area_m2, self.order)?;
            let label = zone.id.label();

            if bracket.fraction != 0.0 {
                tracker.record_zone_values(
                    Equation::ExternalCoefficientInterpolation,
                    context.clone(),
                    label,
                    &[
                        ("x", self.parameter),
                        ("x_lo", bracket.lower.key),
                        ("x_hi", bracket.upper.key),
                    ],
                    variants.c_pe_10,
                );
            }
            tracker.record_zone_values(
                Equation::ExternalCoefficientArea,
                context.clone(),
                label,
                &[("c_pe,1", variants.c_pe_1), ("c_pe,10", variants.c_pe_10), ("A", zone.area_m2)],
                variants.primary,
            );

            let q_p_kpa = q_p(zone);
            results.push(combination.zone(
                zone,
                self.direction,
                CoefficientVariant::Primary,
                q_p_kpa,
                variants.primary,
                tracker,
            )?);
            if let Some(positive) = variants.positive {
                results.push(combination.zone(
                    zone,
                    self.direction,
                    CoefficientVariant::Positive,
                    q_p_kpa,
                    positive,
                    tracker,
                )?);
            }
        }
        Ok(results)
    }
}

// ============================================================================
// Calculation Items
// ============================================================================

/// Enum wrapper for all calculation types.
///
/// ```json
/// { "type": "DuoPitch", "label": "Hall roof", "site": { ... }, ... }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Wall(WallInput),
    FlatRoof(FlatRoofInput),
    MonoPitch(MonoPitchInput),
    DuoPitch(DuoPitchInput),
    Hipped(HippedInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Wall(i) => &i.label,
            CalculationItem::FlatRoof(i) => &i.label,
            CalculationItem::MonoPitch(i) => &i.label,
            CalculationItem::DuoPitch(i) => &i.label,
            CalculationItem::Hipped(i) => &i.label,
        }
    }

    /// Site definition shared by every shape
    pub fn site_mut(&mut self) -> &mut WindSite {
        match self {
            CalculationItem::Wall(i) => &mut i.site,
            CalculationItem::FlatRoof(i) => &mut i.site,
            CalculationItem::MonoPitch(i) => &mut i.site,
            CalculationItem::DuoPitch(i) => &mut i.site,
            CalculationItem::Hipped(i) => &mut i.site,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Wall(_) => "Wall",
            CalculationItem::FlatRoof(_) => "FlatRoof",
            CalculationItem::MonoPitch(_) => "MonoPitch",
            CalculationItem::DuoPitch(_) => "DuoPitch",
            CalculationItem::Hipped(_) => "Hipped",
        }
    }

    pub fn shape(&self) -> RoofShape {
        match self {
            CalculationItem::Wall(_) => RoofShape::Wall,
            CalculationItem::FlatRoof(_) => RoofShape::Flat,
            CalculationItem::MonoPitch(_) => RoofShape::MonoPitch,
            CalculationItem::DuoPitch(_) => RoofShape::DuoPitch,
            CalculationItem::Hipped(_) => RoofShape::Hipped,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        match self {
            CalculationItem::Wall(i) => i.validate(),
            CalculationItem::FlatRoof(i) => i.validate(),
            CalculationItem::MonoPitch(i) => i.validate(),
            CalculationItem::DuoPitch(i) => i.validate(),
            CalculationItem::Hipped(i) => i.validate(),
        }
    }

    pub fn calculate(&self) -> CalcResult<WindLoadResult> {
        match self {
            CalculationItem::Wall(i) => wall::calculate(i),
            CalculationItem::FlatRoof(i) => flat_roof::calculate(i),
            CalculationItem::MonoPitch(i) => mono_pitch::calculate(i),
            CalculationItem::DuoPitch(i) => duo_pitch::calculate(i),
            CalculationItem::Hipped(i) => hipped::calculate(i),
        }
    }

    pub fn calculate_traced(&self) -> CalcResult<(WindLoadResult, EquationTracker)> {
        match self {
            CalculationItem::Wall(i) => wall::calculate_traced(i),
            CalculationItem::FlatRoof(i) => flat_roof::calculate_traced(i),
            CalculationItem::MonoPitch(i) => mono_pitch::calculate_traced(i),
            CalculationItem::DuoPitch(i) => duo_pitch::calculate_traced(i),
            CalculationItem::Hipped(i) => hipped::calculate_traced(i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policies_follow_shape_conventions() {
        assert_eq!(RoofShape::Wall.policy().peak_pressure, PeakPressureModel::ExposureFactor);
        assert_eq!(
            RoofShape::Hipped.policy().peak_pressure,
            PeakPressureModel::Turbulence(TurbulenceModel::Simplified)
        );
        assert_eq!(RoofShape::DuoPitch.policy().convention, NetPressureConvention::Additive);
        assert_eq!(RoofShape::Hipped.policy().convention, NetPressureConvention::SignPaired);
        assert_eq!(RoofShape::MonoPitch.policy().interpolation, InterpolationOrder::AreaThenParameter);
        assert_eq!(RoofShape::DuoPitch.policy().transfer_direction, Some(WindDirection::Theta90));
        assert_eq!(RoofShape::Wall.policy().terrain_table, TerrainTable::Wall);
    }

    #[test]
    fn test_pitch_ranges() {
        let duo = RoofShape::DuoPitch.policy();
        assert!(duo.check_pitch(-75.0).is_ok());
        assert!(duo.check_pitch(80.0).is_err());

        let mono = RoofShape::MonoPitch.policy();
        assert!(mono.check_pitch(-5.0).is_ok());
        assert!(mono.check_pitch(-6.0).is_err());

        let hipped = RoofShape::Hipped.policy();
        assert!(hipped.check_pitch(4.0).is_err());
        assert!(RoofShape::Wall.policy().check_pitch(400.0).is_ok());
    }

    #[test]
    fn test_shape_codes_unique() {
        let mut codes: Vec<&str> = RoofShape::ALL.iter().map(|s| s.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), RoofShape::ALL.len());
    }
}
