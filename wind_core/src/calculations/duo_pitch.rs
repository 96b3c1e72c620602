//! # Duo-pitch Roofs
//!
//! Duo-pitch roofs evaluated for wind perpendicular (θ = 0°) and parallel
//! (θ = 90°) to the ridge, EN 1991-1-4 §7.2.5. Coefficients are interpolated
//! on pitch first and resolved by area second. Negative pitches describe
//! troughed roofs; the tables start at −45°.
//!
//! Purlin and truss loads are taken from the θ = 90° results.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::calculations::duo_pitch::{calculate, DuoPitchInput};
//! use wind_core::zones::WindDirection;
//!
//! let input: DuoPitchInput = serde_json::from_str(r#"{
//!     "label": "Hall",
//!     "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
//!     "height_m": 7.5,
//!     "width_m": 12.0,
//!     "length_m": 30.0,
//!     "pitch_deg": 15.0,
//!     "member_spacing": { "purlin_spacing_m": 1.2, "truss_spacing_m": 5.0 }
//! }"#).unwrap();
//!
//! let result = calculate(&input).unwrap();
//! let transfer = result.load_transfer.unwrap();
//! assert_eq!(transfer.direction, WindDirection::Theta90);
//! ```

use serde::{Deserialize, Serialize};

use super::{
    default_structural_factor, record_geometry, ResultParts, RoofShape, ShapeDetails, WindLoadResult,
    ZoneEvaluation,
};
use crate::coefficients::tables::{DUO_PITCH_0, DUO_PITCH_90};
use crate::coefficients::InternalPressure;
use crate::combination::{transfer_loads, Combination, MemberSpacing};
use crate::environment::WindSite;
use crate::equations::EquationTracker;
use crate::errors::{require_positive, CalcResult};
use crate::terrain::{ReferenceHeightSegment, SegmentLabel, SiteConditions};
use crate::zones::{characteristic_length, duo_pitch_zones, WindDirection};

fn default_internal() -> InternalPressure {
    RoofShape::DuoPitch.policy().default_internal
}

/// Input parameters for a duo-pitch roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuoPitchInput {
    pub label: String,

    pub site: WindSite,

    /// Height h (m)
    pub height_m: f64,

    /// Span across the ridge, both slopes (m)
    pub width_m: f64,

    /// Length along the ridge (m)
    pub length_m: f64,

    /// Roof pitch α in degrees; negative for troughed roofs
    pub pitch_deg: f64,

    #[serde(default = "default_structural_factor")]
    pub structural_factor: f64,

    #[serde(default = "default_internal")]
    pub internal_pressure: InternalPressure,

    #[serde(default)]
    pub member_spacing: Option<MemberSpacing>,
}

impl DuoPitchInput {
    pub fn validate(&self) -> CalcResult<()> {
        self.site.validate()?;
        require_positive("height_m", self.height_m)?;
        require_positive("width_m", self.width_m)?;
        require_positive("length_m", self.length_m)?;
        RoofShape::DuoPitch.policy().check_pitch(self.pitch_deg)?;
        require_positive("structural_factor", self.structural_factor)?;
        self.internal_pressure.validate()?;
        if let Some(spacing) = &self.member_spacing {
            spacing.validate()?;
        }
        Ok(())
    }
}

pub fn calculate(input: &DuoPitchInput) -> CalcResult<WindLoadResult> {
    run(input, &mut EquationTracker::disabled())
}

pub fn calculate_traced(input: &DuoPitchInput) -> CalcResult<(WindLoadResult, EquationTracker)> {
    let mut tracker = EquationTracker::new();
    let result = run(input, &mut tracker)?;
    Ok((result, tracker))
}

fn run(input: &DuoPitchInput, tracker: &mut EquationTracker) -> CalcResult<WindLoadResult> {
    input.validate()?;
    let policy = RoofShape::DuoPitch.policy();
    let h = input.height_m;
    log::debug!(
        "duo-pitch '{}': h = {} m, {} x {} m, pitch {}°",
        input.label,
        h,
        input.width_m,
        input.length_m,
        input.pitch_deg
    );

    let site = SiteConditions::resolve(&input.site, policy.terrain_table, 0.0, tracker)?;
    let segment = ReferenceHeightSegment {
        label: SegmentLabel::Single,
        z_e_m: h,
        height_m: h,
    };
    let exposure = site.exposure_at(segment, policy.peak_pressure, tracker)?;
    let q_p_kpa = exposure.q_p_kpa;

    let e = characteristic_length(input.width_m, h);
    let internal = input.internal_pressure.resolve(h / input.width_m, tracker);
    let combination = Combination {
        convention: policy.convention,
        c_pi_candidates: &internal.candidates,
        structural_factor: input.structural_factor,
    };

    let directions = [(WindDirection::Theta0, &DUO_PITCH_0), (WindDirection::Theta90, &DUO_PITCH_90)];
    let mut results = Vec::new();
    for (direction, table) in directions {
        let zones = duo_pitch_zones(direction, e, input.width_m, input.length_m);
        record_geometry(input.width_m, h, e, &zones, direction.display_name(), tracker);
        let evaluation = ZoneEvaluation {
            table,
            parameter: input.pitch_deg,
            order: policy.interpolation,
            direction: Some(direction),
        };
        results.extend(evaluation.run(&zones, &combination, |_| q_p_kpa, tracker)?);
    }

    let load_transfer = match (input.member_spacing, policy.transfer_direction) {
        (Some(spacing), Some(direction)) => Some(transfer_loads(&results, direction, spacing, tracker)),
        _ => None,
    };

    Ok(ResultParts {
        shape: RoofShape::DuoPitch,
        site,
        exposure: vec![exposure],
        characteristic_length_m: e,
        internal,
        details: ShapeDetails::DuoPitch {
            pitch_deg: input.pitch_deg,
            directions: directions.iter().map(|(d, _)| *d).collect(),
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
    use crate::terrain::TerrainCategory;
    use crate::zones::ZoneId;

    fn hall() -> DuoPitchInput {
        DuoPitchInput {
            label: "Hall".to_string(),
            site: WindSite::new(22.0, TerrainCategory::III),
            height_m: 7.5,
            width_m: 12.0,
            length_m: 30.0,
            pitch_deg: 15.0,
            structural_factor: 1.0,
            internal_pressure: default_internal(),
            member_spacing: None,
        }
    }

    fn primary(result: &WindLoadResult, zone: ZoneId, direction: WindDirection) -> &ZoneResult {
        result
            .zones
            .iter()
            .find(|z| z.zone == zone && z.direction == Some(direction) && z.variant == CoefficientVariant::Primary)
            .unwrap()
    }

    #[test]
    fn test_both_directions_evaluated() {
        let result = calculate(&hall()).unwrap();
        assert!(result.zones.iter().any(|z| z.direction == Some(WindDirection::Theta0)));
        assert!(result.zones.iter().any(|z| z.direction == Some(WindDirection::Theta90)));
        assert!(!result
            .zones
            .iter()
            .any(|z| z.zone == ZoneId::J && z.direction == Some(WindDirection::Theta90)));
    }

    #[test]
    fn test_fifteen_degree_coefficients() {
        let result = calculate(&hall()).unwrap();
        // e = min(12, 15) = 12; H (θ = 0°) = 4.8 x 30 m²
        assert_eq!(primary(&result, ZoneId::H, WindDirection::Theta0).c_pe, -0.3);
        assert_eq!(primary(&result, ZoneId::I, WindDirection::Theta90).c_pe, -0.5);
    }

    #[test]
    fn test_default_internal_is_additive_negative() {
        let result = calculate(&hall()).unwrap();
        assert_eq!(result.internal.candidates, vec![-0.3]);
        let h = primary(&result, ZoneId::H, WindDirection::Theta0);
        assert!((h.w_net_kpa - h.q_p_kpa * (-0.3 - 0.3)).abs() < 1e-12);
    }

    #[test]
    fn test_troughed_roof_limits() {
        let mut input = hall();
        input.pitch_deg = -45.0;
        assert!(calculate(&input).is_ok());

        input.pitch_deg = -60.0;
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        input.pitch_deg = -80.0;
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_transfer_from_ninety_degrees() {
        let mut input = hall();
        input.member_spacing = Some(MemberSpacing {
            purlin_spacing_m: 1.2,
            truss_spacing_m: 5.0,
        });
        let result = calculate(&input).unwrap();
        let transfer = result.load_transfer.as_ref().unwrap();
        assert_eq!(transfer.direction, WindDirection::Theta90);
        let zones: Vec<ZoneId> = transfer.members.iter().map(|m| m.zone).collect();
        assert_eq!(zones, vec![ZoneId::F, ZoneId::G, ZoneId::H, ZoneId::I]);
        let f90 = primary(&result, ZoneId::F, WindDirection::Theta90);
        assert!((transfer.members[0].purlin_kn_m - f90.w_e_kpa * 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_opening_ratio_policy_selectable() {
        let mut input = hall();
        input.internal_pressure = InternalPressure::OpeningRatio {
            windward_m2: 2.0,
            leeward_m2: 1.0,
            parallel_m2: 1.0,
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.internal.mu, Some(0.5));
        assert_eq!(result.internal.candidates.len(), 1);
    }

    #[test]
    fn test_trace_covers_every_stage() {
        let (_, tracker) = calculate_traced(&hall()).unwrap();
        let categories: Vec<_> = tracker.by_category().into_iter().map(|(c, _)| c).collect();
        assert!(categories.len() >= 6);
        assert!(!tracker.explanation().is_empty());
    }
}
