//! # Hipped Roofs
//!
//! Hipped roofs with wind perpendicular to the main ridge (EN 1991-1-4
//! §7.2.6, Table 7.5). The reference height is the ridge height
//! `z = h_e + h_r`. The hipped terrain table has no minimum height, so it
//! must exceed the roughness length. Turbulence uses the simplified
//! `k_I / ln(z / z0)` form.
//!
//! Net pressures pair c_pi with the sign of c_pe by default: suction zones
//! take the positive internal coefficient, pressure zones the negative one.
//! Setting `"convention": "Subtractive"` restores `w_net = q_p · (c_pe − c_pi)`.

use serde::{Deserialize, Serialize};

use super::{
    default_structural_factor, record_geometry, ResultParts, RoofShape, ShapeDetails, WindLoadResult,
    ZoneEvaluation,
};
use crate::coefficients::{tables::HIPPED, InternalPressure};
use crate::combination::{transfer_loads, Combination, MemberSpacing, NetPressureConvention};
use crate::environment::WindSite;
use crate::equations::EquationTracker;
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::terrain::{ReferenceHeightSegment, SegmentLabel, SiteConditions};
use crate::zones::{characteristic_length, hipped_zones};

fn default_internal() -> InternalPressure {
    RoofShape::Hipped.policy().default_internal
}

fn default_convention() -> NetPressureConvention {
    RoofShape::Hipped.policy().convention
}

/// Input parameters for a hipped roof.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "House",
///   "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
///   "eaves_height_m": 6.8,
///   "ridge_rise_m": 2.95,
///   "crosswind_m": 31.2,
///   "depth_m": 10.0,
///   "pitch_deg": 15.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HippedInput {
    pub label: String,

    pub site: WindSite,

    /// Height of the eaves above ground, h_e (m)
    pub eaves_height_m: f64,

    /// Rise from eaves to ridge, h_r (m)
    pub ridge_rise_m: f64,

    /// Eaves length facing the wind, b >= d (m)
    pub crosswind_m: f64,

    /// Plan depth in the wind direction (m)
    pub depth_m: f64,

    /// Pitch of the main slopes, 5° to 75°
    pub pitch_deg: f64,

    #[serde(default = "default_structural_factor")]
    pub structural_factor: f64,

    #[serde(default = "default_internal")]
    pub internal_pressure: InternalPressure,

    #[serde(default = "default_convention")]
    pub convention: NetPressureConvention,

    #[serde(default)]
    pub member_spacing: Option<MemberSpacing>,
}

impl HippedInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.site.validate()?;
        require_positive("eaves_height_m", self.eaves_height_m)?;
        require_non_negative("ridge_rise_m", self.ridge_rise_m)?;
        require_positive("crosswind_m", self.crosswind_m)?;
        require_positive("depth_m", self.depth_m)?;
        if self.crosswind_m < self.depth_m {
            return Err(CalcError::invalid_input(
                "crosswind_m",
                self.crosswind_m.to_string(),
                format!("must be at least depth_m ({})", self.depth_m),
            ));
        }
        RoofShape::Hipped.policy().check_pitch(self.pitch_deg)?;
        require_positive("structural_factor", self.structural_factor)?;
        self.internal_pressure.validate()?;
        if let Some(spacing) = &self.member_spacing {
            spacing.validate()?;
        }
        Ok(())
    }

    /// Reference height z = h_e + h_r (m)
    pub fn reference_height(&self) -> f64 {
        self.eaves_height_m + self.ridge_rise_m
    }
}

pub fn calculate(input: &HippedInput) -> CalcResult<WindLoadResult> {
    run(input, &mut EquationTracker::disabled())
}

pub fn calculate_traced(input: &HippedInput) -> CalcResult<(WindLoadResult, EquationTracker)> {
    let mut tracker = EquationTracker::new();
    let result = run(input, &mut tracker)?;
    Ok((result, tracker))
}

fn run(input: &HippedInput, tracker: &mut EquationTracker) -> CalcResult<WindLoadResult> {
    input.validate()?;
    let policy = RoofShape::Hipped.policy();
    let (z, b, d) = (input.reference_height(), input.crosswind_m, input.depth_m);

    let site = SiteConditions::resolve(&input.site, policy.terrain_table, 0.0, tracker)?;
    let segment = ReferenceHeightSegment {
        label: SegmentLabel::Single,
        z_e_m: z,
        height_m: z,
    };
    let exposure = site.exposure_at(segment, policy.peak_pressure, tracker)?;
    let q_p_kpa = exposure.q_p_kpa;

    let e = characteristic_length(b, z);
    let zones = hipped_zones(e, b, d);
    if zones.len() < 8 {
        log::warn!("hipped roof '{}': only {} zones for e = {:.2} m", input.label, zones.len(), e);
    }
    record_geometry(b, z, e, &zones, "Hipped roof", tracker);

    let internal = input.internal_pressure.resolve(z / d, tracker);
    let combination = Combination {
        convention: input.convention,
        c_pi_candidates: &internal.candidates,
        structural_factor: input.structural_factor,
    };
    let evaluation = ZoneEvaluation {
        table: &HIPPED,
        parameter: input.pitch_deg,
        order: policy.interpolation,
        direction: None,
    };
    let results = evaluation.run(&zones, &combination, |_| q_p_kpa, tracker)?;

    let load_transfer = match (input.member_spacing, policy.transfer_direction) {
        (Some(spacing), Some(direction)) => Some(transfer_loads(&results, direction, spacing, tracker)),
        _ => None,
    };

    Ok(ResultParts {
        shape: RoofShape::Hipped,
        site,
        exposure: vec![exposure],
        characteristic_length_m: e,
        internal,
        details: ShapeDetails::Hipped {
            pitch_deg: input.pitch_deg,
        },
        zones: results,
        load_transfer,
    }
    .into())
}
