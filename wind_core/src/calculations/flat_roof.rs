//! # Flat Roofs
//!
//! Flat roofs (pitch within ±5°) with sharp eaves or parapets, EN 1991-1-4
//! §7.2.3. Coefficients are interpolated on the parapet ratio h_p/h and the
//! reference height is taken at the top of the parapet.

use serde::{Deserialize, Serialize};

use super::{
    default_structural_factor, record_geometry, ResultParts, RoofShape, ShapeDetails, WindLoadResult,
    ZoneEvaluation,
};
use crate::coefficients::{tables::FLAT_ROOF, InternalPressure, ParapetBracket};
use crate::combination::{transfer_loads, Combination, MemberSpacing};
use crate::environment::WindSite;
use crate::equations::EquationTracker;
use crate::errors::{require_non_negative, require_positive, CalcResult};
use crate::terrain::{ReferenceHeightSegment, SegmentLabel, SiteConditions};
use crate::zones::{characteristic_length, flat_roof_zones};

fn default_internal() -> InternalPressure {
    RoofShape::Flat.policy().default_internal
}

/// Input parameters for a flat roof.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Warehouse roof",
///   "site": { "basic_wind_velocity_ms": 24.0, "terrain": "II" },
///   "height_m": 6.0,
///   "parapet_height_m": 0.3,
///   "crosswind_m": 20.0,
///   "depth_m": 15.0,
///   "member_spacing": { "purlin_spacing_m": 1.5, "truss_spacing_m": 5.0 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRoofInput {
    pub label: String,

    pub site: WindSite,

    /// Eaves height h (m)
    pub height_m: f64,

    /// Parapet height h_p above the roof (m), 0 for sharp eaves
    #[serde(default)]
    pub parapet_height_m: f64,

    /// Dimension across the wind b (m)
    pub crosswind_m: f64,

    /// Dimension in the wind direction d (m)
    pub depth_m: f64,

    #[serde(default = "default_structural_factor")]
    pub structural_factor: f64,

    #[serde(default = "default_internal")]
    pub internal_pressure: InternalPressure,

    #[serde(default)]
    pub member_spacing: Option<MemberSpacing>,
}

impl FlatRoofInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.site.validate()?;
        require_positive("height_m", self.height_m)?;
        require_non_negative("parapet_height_m", self.parapet_height_m)?;
        require_positive("crosswind_m", self.crosswind_m)?;
        require_positive("depth_m", self.depth_m)?;
        require_positive("structural_factor", self.structural_factor)?;
        self.internal_pressure.validate()?;
        if let Some(spacing) = &self.member_spacing {
            spacing.validate()?;
        }
        Ok(())
    }

    /// h_p / h
    pub fn parapet_ratio(&self) -> f64 {
        self.parapet_height_m / self.height_m
    }

    /// z_e = h + h_p
    pub fn reference_height(&self) -> f64 {
        self.height_m + self.parapet_height_m
    }
}

pub fn calculate(input: &FlatRoofInput) -> CalcResult<WindLoadResult> {
    run(input, &mut EquationTracker::disabled())
}

pub fn calculate_traced(input: &FlatRoofInput) -> CalcResult<(WindLoadResult, EquationTracker)> {
    let mut tracker = EquationTracker::new();
    let result = run(input, &mut tracker)?;
    Ok((result, tracker))
}

fn run(input: &FlatRoofInput, tracker: &mut EquationTracker) -> CalcResult<WindLoadResult> {
    input.validate()?;
    let policy = RoofShape::Flat.policy();
    let (h, b, d) = (input.height_m, input.crosswind_m, input.depth_m);

    let site = SiteConditions::resolve(&input.site, policy.terrain_table, 0.0, tracker)?;
    let z_e = input.reference_height();
    let segment = ReferenceHeightSegment {
        label: SegmentLabel::Single,
        z_e_m: z_e,
        height_m: z_e,
    };
    let exposure = site.exposure_at(segment, policy.peak_pressure, tracker)?;
    let q_p_kpa = exposure.q_p_kpa;

    let e = characteristic_length(b, h);
    let zones = flat_roof_zones(e, b, d);
    record_geometry(b, h, e, &zones, "Flat roof", tracker);

    let ratio = input.parapet_ratio();
    let bracket = ParapetBracket::classify(ratio);
    log::debug!("flat roof '{}': h_p/h = {:.3} ({:?})", input.label, ratio, bracket);

    let internal = input.internal_pressure.resolve(h / d, tracker);
    let combination = Combination {
        convention: policy.convention,
        c_pi_candidates: &internal.candidates,
        structural_factor: input.structural_factor,
    };
    let evaluation = ZoneEvaluation {
        table: &FLAT_ROOF,
        parameter: ratio,
        order: policy.interpolation,
        direction: None,
    };
    let results = evaluation.run(&zones, &combination, |_| q_p_kpa, tracker)?;

    let load_transfer = match (input.member_spacing, policy.transfer_direction) {
        (Some(spacing), Some(direction)) => Some(transfer_loads(&results, direction, spacing, tracker)),
        _ => None,
    };

    Ok(ResultParts {
        shape: RoofShape::Flat,
        site,
        exposure: vec![exposure],
        characteristic_length_m: e,
        internal,
        details: ShapeDetails::Flat {
            parapet_ratio: ratio,
            bracket,
        },
        zones: results,
        load_transfer,
    }
    .into())
}
