//! End-to-end scenarios through the public API, one or more per shape.

use approx::{assert_abs_diff_eq, assert_relative_eq};

use wind_core::calculations::{CalculationItem, RoofShape, WindLoadResult};
use wind_core::coefficients::tables::DUO_PITCH_0;
use wind_core::coefficients::{resolve_by_area, InterpolationOrder};
use wind_core::combination::{most_onerous, CoefficientVariant, NetPressureConvention};
use wind_core::environment::{air_density, basic_velocity_pressure, AIR_DENSITY_TABLE};
use wind_core::terrain::{roughness_factor, terrain_profile, TerrainCategory, TerrainTable};
use wind_core::zones::{WindDirection, ZoneId};
use wind_core::{CalculationRecord, EquationTracker};

fn item(json: &str) -> CalculationItem {
    serde_json::from_str(json).unwrap()
}

fn block_a_walls() -> CalculationItem {
    item(
        r#"{
            "type": "Wall",
            "label": "Block A",
            "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
            "height_m": 19.871,
            "crosswind_m": 30.6,
            "depth_m": 19.26,
            "internal_pressure": { "policy": "Specified", "c_pi": 0.35 }
        }"#,
    )
}

fn hall() -> CalculationItem {
    item(
        r#"{
            "type": "DuoPitch",
            "label": "Hall",
            "site": {
                "basic_wind_velocity_ms": 22.0,
                "terrain": "III",
                "orography": { "model": "UpwindSlope", "upwind_slope": 0.1 }
            },
            "height_m": 7.5,
            "width_m": 12.0,
            "length_m": 30.0,
            "pitch_deg": 15.0,
            "member_spacing": { "purlin_spacing_m": 1.2, "truss_spacing_m": 5.0 }
        }"#,
    )
}

fn primary(result: &WindLoadResult, zone: ZoneId, direction: Option<WindDirection>) -> f64 {
    result
        .zones
        .iter()
        .find(|z| z.zone == zone && z.direction == direction && z.variant == CoefficientVariant::Primary)
        .map(|z| z.w_net_kpa)
        .unwrap()
}

// ============================================================================
// Environment and terrain
// ============================================================================

#[test]
fn test_basic_velocity_pressure_reference_value() {
    assert_relative_eq!(basic_velocity_pressure(1.25, 22.0), 0.3025, epsilon = 1e-12);
}

#[test]
fn test_air_density_anchors_and_monotone() {
    for (altitude, rho) in AIR_DENSITY_TABLE {
        assert_abs_diff_eq!(air_density(altitude, 0.0).unwrap(), rho, epsilon = 1e-12);
    }
    let mut previous = f64::INFINITY;
    for step in 0..50 {
        let rho = air_density(step as f64 * 50.0, 0.0).unwrap();
        assert!(rho <= previous);
        previous = rho;
    }
    assert_abs_diff_eq!(air_density(2600.0, 0.0).unwrap(), 0.94, epsilon = 1e-12);
}

#[test]
fn test_terrain_three_roughness() {
    let profile = terrain_profile(TerrainTable::Wall, TerrainCategory::III).unwrap();
    assert_abs_diff_eq!(profile.z0_m, 0.3);
    assert_eq!(profile.z_min_m, Some(3.0));
    assert_abs_diff_eq!(profile.k_r, 0.2154, epsilon = 1e-4);
    assert_abs_diff_eq!(roughness_factor(9.75, &profile).unwrap(), 0.750, epsilon = 1e-3);
}

// ============================================================================
// Coefficients and combination
// ============================================================================

#[test]
fn test_duo_pitch_fifteen_degrees_zone_f() {
    let small = DUO_PITCH_0
        .resolve(15.0, ZoneId::F, 1.0, InterpolationOrder::ParameterThenArea)
        .unwrap();
    assert_abs_diff_eq!(small.primary, -2.0, epsilon = 1e-12);
    let large = DUO_PITCH_0
        .resolve(15.0, ZoneId::F, 10.0, InterpolationOrder::ParameterThenArea)
        .unwrap();
    assert_abs_diff_eq!(large.primary, -0.9, epsilon = 1e-12);
    assert_eq!(large.positive, Some(0.2));
}

#[test]
fn test_area_resolution_monotone_between_anchors() {
    let mut previous = resolve_by_area(-2.0, -0.9, 1.0);
    for step in 1..=90 {
        let area = 1.0 + step as f64 * 0.1;
        let c = resolve_by_area(-2.0, -0.9, area);
        assert!(c >= previous);
        previous = c;
    }
    assert_abs_diff_eq!(previous, -0.9, epsilon = 1e-12);
}

#[test]
fn test_sign_paired_keeps_suction_with_positive_internal() {
    let (c_pi, w_net) = most_onerous(0.5, -1.0, &[-0.3, 0.2], NetPressureConvention::SignPaired).unwrap();
    assert_eq!(c_pi, 0.2);
    assert_relative_eq!(w_net, -0.4, epsilon = 1e-12);
    let (c_pi, w_net) = most_onerous(0.5, 0.6, &[-0.3, 0.2], NetPressureConvention::SignPaired).unwrap();
    assert_eq!(c_pi, -0.3);
    assert_relative_eq!(w_net, 0.15, epsilon = 1e-12);
}

#[test]
fn test_subtractive_picks_positive_internal_for_suction() {
    let (c_pi, w_net) = most_onerous(0.5, -1.0, &[-0.3, 0.2], NetPressureConvention::Subtractive).unwrap();
    assert_eq!(c_pi, 0.2);
    assert_relative_eq!(w_net, -0.6, epsilon = 1e-12);
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_wall_scenario() {
    let result = block_a_walls().calculate().unwrap();
    assert_eq!(result.shape, RoofShape::Wall);
    let q_p = result.exposure[0].q_p_kpa;
    assert_relative_eq!(primary(&result, ZoneId::A, None), q_p * (-1.2 - 0.35), epsilon = 1e-12);
    assert!(result.zones.iter().all(|z| z.area_m2 > 0.0));
    assert_relative_eq!(result.min_negative_w_net_kpa, q_p * (-1.2 - 0.35), epsilon = 1e-12);
}

#[test]
fn test_duo_pitch_scenario() {
    let result = hall().calculate().unwrap();
    assert_relative_eq!(result.site.c_0, 1.06, epsilon = 1e-12);
    let transfer = result.load_transfer.as_ref().unwrap();
    assert_eq!(transfer.direction, WindDirection::Theta90);
    for member in &transfer.members {
        assert_relative_eq!(member.truss_kn, member.purlin_kn_m * 5.0, epsilon = 1e-12);
    }
    // Additive with the default C_pi = -0.3
    let h = primary(&result, ZoneId::H, Some(WindDirection::Theta0));
    assert_relative_eq!(h, result.exposure[0].q_p_kpa * -0.6, epsilon = 1e-12);
}

#[test]
fn test_governing_zone_matches_extremes() {
    let result = block_a_walls().calculate().unwrap();
    let governing = result.governing_zone().unwrap();
    let extreme = result.max_positive_w_net_kpa.max(-result.min_negative_w_net_kpa);
    assert_relative_eq!(governing.w_net_kpa.abs(), extreme, epsilon = 1e-12);
    assert_eq!(governing.zone, ZoneId::A);
}

#[test]
fn test_site_override_changes_exposure() {
    let mut rough = hall();
    rough.site_mut().terrain = TerrainCategory::IV;
    let q_rough = rough.calculate().unwrap().exposure[0].q_p_kpa;
    let q_base = hall().calculate().unwrap().exposure[0].q_p_kpa;
    assert!(q_rough < q_base);
}

#[test]
fn test_every_shape_dispatches_from_json() {
    let inputs = [
        r#"{ "type": "Wall", "label": "W", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "height_m": 10.0, "crosswind_m": 20.0, "depth_m": 12.0 }"#,
        r#"{ "type": "FlatRoof", "label": "F", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "height_m": 8.0, "parapet_height_m": 0.8, "crosswind_m": 20.0, "depth_m": 12.0 }"#,
        r#"{ "type": "MonoPitch", "label": "M", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "height_m": 5.0, "width_m": 8.0, "length_m": 20.0, "pitch_deg": 10.0 }"#,
        r#"{ "type": "DuoPitch", "label": "D", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "height_m": 6.0, "width_m": 10.0, "length_m": 24.0, "pitch_deg": 25.0 }"#,
        r#"{ "type": "Hipped", "label": "H", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "eaves_height_m": 5.0, "ridge_rise_m": 2.0, "crosswind_m": 16.0, "depth_m": 10.0, "pitch_deg": 20.0 }"#,
    ];
    let shapes: Vec<RoofShape> = inputs
        .iter()
        .map(|json| item(json).calculate().unwrap().shape)
        .collect();
    assert_eq!(shapes, RoofShape::ALL.to_vec());
}

#[test]
fn test_traced_results_match_and_explain() {
    let item = hall();
    let plain = item.calculate().unwrap();
    let (traced, tracker) = item.calculate_traced().unwrap();
    assert_eq!(plain, traced);
    assert!(!tracker.is_empty());

    let mut merged = EquationTracker::new();
    merged.merge(tracker.clone());
    assert_eq!(merged.usages().len(), tracker.usages().len());
}

#[test]
fn test_invalid_input_is_user_correctable() {
    let err = item(
        r#"{ "type": "Hipped", "label": "H", "site": { "basic_wind_velocity_ms": 26.0, "terrain": "II" },
             "eaves_height_m": 5.0, "ridge_rise_m": 2.0, "crosswind_m": 16.0, "depth_m": 10.0, "pitch_deg": 80.0 }"#,
    )
    .calculate()
    .unwrap_err();
    assert!(err.is_user_correctable());

    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["type"], "InvalidInput");
}

#[test]
fn test_hipped_house_scenario() {
    let result = item(
        r#"{ "type": "Hipped", "label": "House", "site": { "basic_wind_velocity_ms": 22.0, "terrain": "III" },
             "eaves_height_m": 6.8, "ridge_rise_m": 2.95, "crosswind_m": 31.2, "depth_m": 10.0, "pitch_deg": 15.0 }"#,
    )
    .calculate()
    .unwrap();
    let q_p = result.exposure[0].q_p_kpa;
    assert_relative_eq!(result.exposure[0].segment.z_e_m, 9.75, epsilon = 1e-12);
    assert_relative_eq!(primary(&result, ZoneId::H, None), q_p * (-0.3 + 0.2), epsilon = 1e-12);
    assert_relative_eq!(primary(&result, ZoneId::I, None), q_p * (-0.5 + 0.2), epsilon = 1e-12);
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_record_round_trip_recalculates() {
    let mut record = CalculationRecord::new(Some("Hall A".to_string()), hall());
    record.set_notes("Demo site");
    let restored = CalculationRecord::from_json(&record.to_json().unwrap()).unwrap();
    assert_eq!(restored, record);
    assert_eq!(restored.calculate().unwrap(), hall().calculate().unwrap());
}
