//! # Vertical Walls
//!
//! External pressures on the walls of a rectangular building (EN 1991-1-4
//! §7.2.2). Peak pressure follows the exposure-factor pathway
//! `q_p = c_e · q_b`, the windward face is split into strips when
//! `b < h < 2b`, and coefficients come from Table 7.1 interpolated on h/d.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::calculations::wall::{calculate, WallInput};
//! use wind_core::coefficients::InternalPressure;
//! use wind_core::environment::WindSite;
//! use wind_core::terrain::TerrainCategory;
//!
//! let input = WallInput {
//!     label: "Block A".to_string(),
//!     site: WindSite::new(22.0, TerrainCategory::III),
//!     height_m: 19.871,
//!     crosswind_m: 30.6,
//!     depth_m: 19.26,
//!     structural_factor: 1.0,
//!     internal_pressure: InternalPressure::Specified { c_pi: 0.35 },
//! };
//!
//! let result = calculate(&input).unwrap();
//! assert!((result.site.q_b_kpa - 0.3025).abs() < 1e-9);
//! assert!(result.min_negative_w_net_kpa < 0.0);
//! ```

use serde::{Deserialize, Serialize};

use super::{
    default_structural_factor, record_geometry, ResultParts, RoofShape, ShapeDetails, WindLoadResult,
    ZoneEvaluation,
};
use crate::coefficients::{tables::WALL, HeightDepthBracket, InternalPressure};
use crate::combination::Combination;
use crate::environment::WindSite;
use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::terrain::{reference_heights, HeightRatioClass, SegmentLabel, SiteConditions};
use crate::zones::{characteristic_length, wall_zones, WallLayout, ZoneId};

fn default_internal() -> InternalPressure {
    RoofShape::Wall.policy().default_internal
}

/// Input parameters for the walls of a rectangular building.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Block A",
///   "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
///   "height_m": 19.871,
///   "crosswind_m": 30.6,
///   "depth_m": 19.26,
///   "internal_pressure": { "policy": "Specified", "c_pi": 0.35 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallInput {
    /// User label (e.g., "Block A")
    pub label: String,

    pub site: WindSite,

    /// Building height h (m)
    pub height_m: f64,

    /// Dimension across the wind b (m)
    pub crosswind_m: f64,

    /// Dimension in the wind direction d (m)
    pub depth_m: f64,

    /// Structural factor c_s c_d
    #[serde(default = "default_structural_factor")]
    pub structural_factor: f64,

    #[serde(default = "default_internal")]
    pub internal_pressure: InternalPressure,
}

impl WallInput {
    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.site.validate()?;
        require_positive("height_m", self.height_m)?;
        require_positive("crosswind_m", self.crosswind_m)?;
        require_positive("depth_m", self.depth_m)?;
        require_positive("structural_factor", self.structural_factor)?;
        self.internal_pressure.validate()
    }

    /// h/d
    pub fn height_to_depth(&self) -> f64 {
        self.height_m / self.depth_m
    }
}

/// Calculate wall pressures without recording a trace.
pub fn calculate(input: &WallInput) -> CalcResult<WindLoadResult> {
    run(input, &mut EquationTracker::disabled())
}

/// Calculate wall pressures and return the equations used.
pub fn calculate_traced(input: &WallInput) -> CalcResult<(WindLoadResult, EquationTracker)> {
    let mut tracker = EquationTracker::new();
    let result = run(input, &mut tracker)?;
    Ok((result, tracker))
}

fn run(input: &WallInput, tracker: &mut EquationTracker) -> CalcResult<WindLoadResult> {
    input.validate()?;
    let policy = RoofShape::Wall.policy();
    let (h, b, d) = (input.height_m, input.crosswind_m, input.depth_m);
    log::debug!("wall '{}': h = {} m, b = {} m, d = {} m", input.label, h, b, d);

    let density_height = if policy.density_at_height { h } else { 0.0 };
    let site = SiteConditions::resolve(&input.site, policy.terrain_table, density_height, tracker)?;

    let segments = reference_heights(h, b);
    let mut exposure = Vec::with_capacity(segments.len());
    for segment in segments {
        tracker.record_values(
            Equation::ReferenceHeight,
            format!("{:?} segment", segment.label),
            &[("h", h), ("b", b)],
            segment.z_e_m,
        );
        exposure.push(site.exposure_at(segment, policy.peak_pressure, tracker)?);
    }
    let q_p_top = exposure
        .last()
        .map(|e| e.q_p_kpa)
        .ok_or_else(|| CalcError::internal("wall produced no reference height"))?;
    let q_p_lower = exposure
        .iter()
        .find(|e| e.segment.label == SegmentLabel::Lower)
        .map_or(q_p_top, |e| e.q_p_kpa);

    let e = characteristic_length(b, h);
    let zones = wall_zones(e, h, b, d);
    record_geometry(b, h, e, &zones, "Walls", tracker);

    let h_over_d = input.height_to_depth();
    let internal = input.internal_pressure.resolve(h_over_d, tracker);
    let combination = Combination {
        convention: policy.convention,
        c_pi_candidates: &internal.candidates,
        structural_factor: input.structural_factor,
    };
    let evaluation = ZoneEvaluation {
        table: &WALL,
        parameter: h_over_d,
        order: policy.interpolation,
        direction: None,
    };
    let results = evaluation.run(
        &zones,
        &combination,
        |zone| if zone.id == ZoneId::DLower { q_p_lower } else { q_p_top },
        tracker,
    )?;

    let details = ShapeDetails::Wall {
        h_over_d,
        bracket: HeightDepthBracket::classify(h_over_d),
        layout: WallLayout::classify(e, d),
        height_class: HeightRatioClass::classify(h, b),
    };

    Ok(ResultParts {
        shape: RoofShape::Wall,
        site,
        exposure,
        characteristic_length_m: e,
        internal,
        details,
        zones: results,
        load_transfer: None,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::CoefficientVariant;
    use crate::terrain::TerrainCategory;

    fn block_a() -> WallInput {
        WallInput {
            label: "Block A".to_string(),
            site: WindSite::new(22.0, TerrainCategory::III),
            height_m: 19.871,
            crosswind_m: 30.6,
            depth_m: 19.26,
            structural_factor: 1.0,
            internal_pressure: InternalPressure::Specified { c_pi: 0.35 },
        }
    }

    fn row(result: &WindLoadResult, zone: ZoneId) -> &crate::combination::ZoneResult {
        result
            .zones
            .iter()
            .find(|z| z.zone == zone && z.variant == CoefficientVariant::Primary)
            .unwrap()
    }

    #[test]
    fn test_block_a_peak_pressure() {
        let result = calculate(&block_a()).unwrap();
        assert!((result.site.q_b_kpa - 0.3025).abs() < 1e-9);
        assert_eq!(result.exposure.len(), 1);

        let exposure = &result.exposure[0];
        let c_e = exposure.c_e.unwrap();
        assert!((c_e - 2.1775).abs() < 1e-3);
        assert!((exposure.q_p_kpa - 0.3025 * c_e).abs() < 1e-12);
    }

    #[test]
    fn test_block_a_zones() {
        let result = calculate(&block_a()).unwrap();
        let ids: Vec<ZoneId> = result.zones.iter().map(|z| z.zone).collect();
        // e = 30.6 >= d: no zone C
        assert_eq!(ids, vec![ZoneId::A, ZoneId::B, ZoneId::D, ZoneId::E]);

        let q_p = result.exposure[0].q_p_kpa;
        let a = row(&result, ZoneId::A);
        assert_eq!(a.c_pe, -1.2);
        assert!((a.w_net_kpa - q_p * (-1.2 - 0.35)).abs() < 1e-12);

        let d = row(&result, ZoneId::D);
        assert_eq!(d.c_pe, 0.8);
        assert!((d.w_net_kpa - q_p * 0.45).abs() < 1e-12);
        assert!((d.f_w_kn - d.w_net_kpa * 30.6 * 19.871).abs() < 1e-9);

        // h/d just above 1: E between -0.5 and -0.7
        let e = row(&result, ZoneId::E);
        assert!(e.c_pe < -0.5 && e.c_pe > -0.7);
        assert!(result.load_transfer.is_none());
    }

    #[test]
    fn test_split_windward_face_uses_two_pressures() {
        let mut input = block_a();
        input.height_m = 20.0;
        input.crosswind_m = 12.0;
        input.depth_m = 30.0;
        let result = calculate(&input).unwrap();
        assert_eq!(result.exposure.len(), 2);

        let lower = row(&result, ZoneId::DLower);
        let upper = row(&result, ZoneId::DUpper);
        assert!(lower.q_p_kpa < upper.q_p_kpa);
        assert_eq!(lower.area_m2, 144.0);
        assert_eq!(row(&result, ZoneId::A).q_p_kpa, upper.q_p_kpa);
    }

    #[test]
    fn test_conservative_pair_picks_most_onerous() {
        let mut input = block_a();
        input.internal_pressure = InternalPressure::conservative();
        let result = calculate(&input).unwrap();
        assert_eq!(row(&result, ZoneId::A).c_pi, 0.2);
        assert_eq!(row(&result, ZoneId::D).c_pi, -0.3);
    }

    #[test]
    fn test_category_zero_unsupported() {
        let mut input = block_a();
        input.site.terrain = TerrainCategory::Zero;
        let err = calculate(&input).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONFIGURATION");
        assert!(!err.is_user_correctable());
    }

    #[test]
    fn test_validation_rejects_bad_geometry() {
        let mut input = block_a();
        input.depth_m = -1.0;
        assert!(calculate(&input).unwrap_err().is_user_correctable());
    }

    #[test]
    fn test_traced_matches_untraced() {
        let plain = calculate(&block_a()).unwrap();
        let (traced, tracker) = calculate_traced(&block_a()).unwrap();
        assert_eq!(plain, traced);
        assert!(tracker.unique_equations().contains(&Equation::ExposureFactor));
        assert!(tracker
            .usages()
            .iter()
            .any(|u| u.equation == Equation::WindForce && u.zone.as_deref() == Some("D")));
    }
}
