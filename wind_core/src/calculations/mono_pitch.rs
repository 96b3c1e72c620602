//! # Mono-pitch Roofs
//!
//! Mono-pitch roofs with the wind on the low eaves (EN 1991-1-4 §7.2.4,
//! θ = 0°). The coefficient is resolved by area first, then interpolated
//! on pitch; pitches below 5° use the 5° row. Internal pressure defaults to
//! the opening-ratio policy and combines additively.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::calculations::mono_pitch::{calculate, MonoPitchInput};
//!
//! let input: MonoPitchInput = serde_json::from_str(r#"{
//!     "label": "Lean-to",
//!     "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
//!     "height_m": 4.5,
//!     "width_m": 8.0,
//!     "length_m": 20.0,
//!     "pitch_deg": 15.0
//! }"#).unwrap();
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.internal.mu, Some(0.0));
//! ```

use serde::{Deserialize, Serialize};

use super::{
    default_structural_factor, record_geometry, ResultParts, RoofShape, ShapeDetails, WindLoadResult,
    ZoneEvaluation,
};
use crate::coefficients::{tables::MONO_PITCH, InternalPressure};
use crate::combination::{transfer_loads, Combination, MemberSpacing};
use crate::environment::WindSite;
use crate::equations::EquationTracker;
use crate::errors::{require_positive, CalcResult};
use crate::terrain::{ReferenceHeightSegment, SegmentLabel, SiteConditions};
use crate::zones::{characteristic_length, mono_pitch_zones};

fn default_internal() -> InternalPressure {
    RoofShape::MonoPitch.policy().default_internal
}

/// Input parameters for a mono-pitch roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonoPitchInput {
    pub label: String,

    pub site: WindSite,

    /// Height h (m)
    pub height_m: f64,

    /// Plan dimension along the slope, in the wind direction (m)
    pub width_m: f64,

    /// Eaves length (m)
    pub length_m: f64,

    /// Roof pitch α in degrees, −5° to 75°
    pub pitch_deg: f64,

    #[serde(default = "default_structural_factor")]
    pub structural_factor: f64,

    #[serde(default = "default_internal")]
    pub internal_pressure: InternalPressure,

    #[serde(default)]
    pub member_spacing: Option<MemberSpacing>,
}

impl MonoPitchInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.site.validate()?;
        require_positive("height_m", self.height_m)?;
        require_positive("width_m", self.width_m)?;
        require_positive("length_m", self.length_m)?;
        RoofShape::MonoPitch.policy().check_pitch(self.pitch_deg)?;
        require_positive("structural_factor", self.structural_factor)?;
        self.internal_pressure.validate()?;
        if let Some(spacing) = &self.member_spacing {
            spacing.validate()?;
        }
        Ok(())
    }
}

pub fn calculate(input: &MonoPitchInput) -> CalcResult<WindLoadResult> {
    run(input, &mut EquationTracker::disabled())
}

pub fn calculate_traced(input: &MonoPitchInput) -> CalcResult<(WindLoadResult, EquationTracker)> {
    let mut tracker = EquationTracker::new();
    let result = run(input, &mut tracker)?;
    Ok((result, tracker))
}

fn run(input: &MonoPitchInput, tracker: &mut EquationTracker) -> CalcResult<WindLoadResult> {
    input.validate()?;
    let policy = RoofShape::MonoPitch.policy();
    let h = input.height_m;

    let site = SiteConditions::resolve(&input.site, policy.terrain_table, 0.0, tracker)?;
    let segment = ReferenceHeightSegment {
        label: SegmentLabel::Single,
        z_e_m: h,
        height_m: h,
    };
    let exposure = site.exposure_at(segment, policy.peak_pressure, tracker)?;
    let q_p_kpa = exposure.q_p_kpa;

    let e = characteristic_length(input.width_m, h);
    let zones = mono_pitch_zones(e, input.width_m, input.length_m);
    record_geometry(input.width_m, h, e, &zones, "Mono-pitch roof", tracker);

    let h_over_d = h / input.width_m;
    let internal = input.internal_pressure.resolve(h_over_d, tracker);
    let combination = Combination {
        convention: policy.convention,
        c_pi_candidates: &internal.candidates,
        structural_factor: input.structural_factor,
    };
    let evaluation = ZoneEvaluation {
        table: &MONO_PITCH,
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
        shape: RoofShape::MonoPitch,
        site,
        exposure: vec![exposure],
        characteristic_length_m: e,
        internal,
        details: ShapeDetails::MonoPitch {
            pitch_deg: input.pitch_deg,
            h_over_d,
        },
        zones: results,
        load_transfer,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::{CoefficientVariant, ZoneResult};
    use crate::terrain::{Orography, TerrainCategory};
    use crate::zones::ZoneId;

    fn lean_to() -> MonoPitchInput {
        MonoPitchInput {
            label: "Lean-to".to_string(),
            site: WindSite::new(22.0, TerrainCategory::III),
            height_m: 4.5,
            width_m: 8.0,
            length_m: 20.0,
            pitch_deg: 15.0,
            structural_factor: 1.0,
            internal_pressure: default_internal(),
            member_spacing: None,
        }
    }

    fn primary(result: &WindLoadResult, zone: ZoneId) -> &ZoneResult {
        result
            .zones
            .iter()
            .find(|z| z.zone == zone && z.variant == CoefficientVariant::Primary)
            .unwrap()
    }

    #[test]
    fn test_zones_and_large_area_coefficients() {
        let result = calculate(&lean_to()).unwrap();
        // e = min(8, 9) = 8; H = 7.2 x 20 = 144 m²
        assert_eq!(result.characteristic_length_m, 8.0);
        assert_eq!(primary(&result, ZoneId::H).c_pe, -0.3);
        // F = 0.8 x 2.0 = 1.6 m²
        let f = primary(&result, ZoneId::F);
        let expected = -2.0 + 1.1 * 1.6f64.log10();
        assert!((f.c_pe - expected).abs() < 1e-12);
    }

    #[test]
    fn test_additive_net_pressure_with_opening_ratio() {
        let result = calculate(&lean_to()).unwrap();
        // h/d = 0.5625 -> c_pi between 0.17 and 0.10
        let c_pi = result.internal.candidates[0];
        assert!(c_pi < 0.17 && c_pi > 0.10);

        let h = primary(&result, ZoneId::H);
        assert!((h.w_net_kpa - h.q_p_kpa * (-0.3 + c_pi)).abs() < 1e-12);
    }

    #[test]
    fn test_compact_building_internal_coefficient() {
        let mut input = lean_to();
        input.height_m = 9.0;
        let result = calculate(&input).unwrap();
        assert_eq!(result.internal.candidates, vec![0.10]);
    }

    #[test]
    fn test_low_pitch_uses_five_degree_row() {
        let mut low = lean_to();
        low.pitch_deg = -3.0;
        let mut five = lean_to();
        five.pitch_deg = 5.0;
        let low = calculate(&low).unwrap();
        let five = calculate(&five).unwrap();
        assert_eq!(low.zones, five.zones);
    }

    #[test]
    fn test_pitch_out_of_range() {
        let mut input = lean_to();
        input.pitch_deg = 80.0;
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_positive_rows_for_steeper_pitch() {
        let mut input = lean_to();
        input.pitch_deg = 30.0;
        let result = calculate(&input).unwrap();
        let positive: Vec<_> = result
            .zones
            .iter()
            .filter(|z| z.variant == CoefficientVariant::Positive)
            .collect();
        assert_eq!(positive.len(), 3);
        assert_eq!(positive[0].c_pe, 0.7);
    }

    #[test]
    fn test_orography_raises_pressure() {
        let flat = calculate(&lean_to()).unwrap();
        let mut input = lean_to();
        input.site.orography = Orography::UpwindSlope {
            upwind_slope: 0.2,
            location_factor: 0.3,
        };
        let hill = calculate(&input).unwrap();
        assert!((hill.site.c_0 - 1.12).abs() < 1e-12);
        assert!(hill.exposure[0].q_p_kpa > flat.exposure[0].q_p_kpa);
    }
}
