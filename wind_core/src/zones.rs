//! # Zone Decomposition
//!
//! Third stage: building geometry to named pressure zones (EN 1991-1-4
//! Figures 7.5 - 7.9). Every zone is sized from the characteristic length
//! `e = min(b, 2h)`. Zones whose area works out to zero are omitted, so
//! callers never iterate over empty zones.
//!
//! Widths are measured in the wind direction, lengths across it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::terrain::HeightRatioClass;
use crate::units::Meters;

/// Zones smaller than this are treated as absent (m²)
const AREA_EPSILON: f64 = 1e-9;

/// Pressure zone names used on walls (A-E) and roofs (F-M).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoneId {
    A,
    B,
    C,
    D,
    DLower,
    DUpper,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
}

impl ZoneId {
    pub fn label(&self) -> &'static str {
        match self {
            ZoneId::A => "A",
            ZoneId::B => "B",
            ZoneId::C => "C",
            ZoneId::D => "D",
            ZoneId::DLower => "D (lower)",
            ZoneId::DUpper => "D (upper)",
            ZoneId::E => "E",
            ZoneId::F => "F",
            ZoneId::G => "G",
            ZoneId::H => "H",
            ZoneId::I => "I",
            ZoneId::J => "J",
            ZoneId::K => "K",
            ZoneId::L => "L",
            ZoneId::M => "M",
        }
    }

    /// The coefficient-table column this zone reads from
    pub fn table_key(&self) -> ZoneId {
        match self {
            ZoneId::DLower | ZoneId::DUpper => ZoneId::D,
            other => *other,
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wind direction relative to the ridge (0° = perpendicular to the ridge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    #[serde(rename = "0")]
    Theta0,
    #[serde(rename = "90")]
    Theta90,
}

impl WindDirection {
    pub fn display_name(&self) -> &'static str {
        match self {
            WindDirection::Theta0 => "θ = 0°",
            WindDirection::Theta90 => "θ = 90°",
        }
    }
}

/// A named pressure zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub width_m: f64,
    pub length_m: f64,
    pub area_m2: f64,
}

impl Zone {
    /// Rectangular zone; negative extents collapse to zero.
    pub fn rect(id: ZoneId, width_m: f64, length_m: f64) -> Self {
        let width_m = width_m.max(0.0);
        let length_m = length_m.max(0.0);
        Self {
            id,
            width_m,
            length_m,
            area_m2: (Meters(width_m) * Meters(length_m)).value(),
        }
    }

    /// Triangular zone with the given base (across the wind) and height.
    pub fn triangle(id: ZoneId, height_m: f64, base_m: f64) -> Self {
        let height_m = height_m.max(0.0);
        let base_m = base_m.max(0.0);
        Self {
            id,
            width_m: height_m,
            length_m: base_m,
            area_m2: 0.5 * height_m * base_m,
        }
    }

    /// Trapezoidal zone between two parallel sides; `length_m` is the mean.
    pub fn trapezoid(id: ZoneId, width_m: f64, long_m: f64, short_m: f64) -> Self {
        let width_m = width_m.max(0.0);
        let length_m = 0.5 * (long_m.max(0.0) + short_m.max(0.0));
        Self {
            id,
            width_m,
            length_m,
            area_m2: (Meters(width_m) * Meters(length_m)).value(),
        }
    }

    pub fn is_present(&self) -> bool {
        self.area_m2 > AREA_EPSILON
    }
}

fn present(zones: Vec<Zone>) -> Vec<Zone> {
    zones.into_iter().filter(Zone::is_present).collect()
}

/// `e = min(b, 2h)`
pub fn characteristic_length(crosswind_m: f64, height_m: f64) -> f64 {
    crosswind_m.min(2.0 * height_m)
}

// ============================================================================
// Walls
// ============================================================================

/// Which of the side-wall layouts of Figure 7.5 applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallLayout {
    /// e < d: zones A, B and C
    Deep,
    /// d <= e < 5d: zones A and B
    Intermediate,
    /// e >= 5d: zone A only
    Shallow,
}

impl WallLayout {
    pub fn classify(e_m: f64, depth_m: f64) -> Self {
        if e_m < depth_m {
            WallLayout::Deep
        } else if e_m < 5.0 * depth_m {
            WallLayout::Intermediate
        } else {
            WallLayout::Shallow
        }
    }
}

/// Vertical wall zones: side walls A/B/C, windward D, leeward E.
///
/// The windward face splits into D lower / D upper when `b < h < 2b`.
pub fn wall_zones(e_m: f64, height_m: f64, crosswind_m: f64, depth_m: f64) -> Vec<Zone> {
    let h = height_m;
    let mut zones = match WallLayout::classify(e_m, depth_m) {
        WallLayout::Deep => vec![
            Zone::rect(ZoneId::A, e_m / 5.0, h),
            Zone::rect(ZoneId::B, 4.0 * e_m / 5.0, h),
            Zone::rect(ZoneId::C, depth_m - e_m, h),
        ],
        WallLayout::Intermediate => vec![
            Zone::rect(ZoneId::A, e_m / 5.0, h),
            Zone::rect(ZoneId::B, depth_m - e_m / 5.0, h),
        ],
        WallLayout::Shallow => vec![Zone::rect(ZoneId::A, depth_m, h)],
    };

    match HeightRatioClass::classify(h, crosswind_m) {
        HeightRatioClass::Intermediate => {
            zones.push(Zone::rect(ZoneId::DLower, crosswind_m, crosswind_m));
            zones.push(Zone::rect(ZoneId::DUpper, crosswind_m, h - crosswind_m));
        }
        HeightRatioClass::Low | HeightRatioClass::Tall => {
            zones.push(Zone::rect(ZoneId::D, crosswind_m, h));
        }
    }
    zones.push(Zone::rect(ZoneId::E, crosswind_m, h));

    present(zones)
}

// ============================================================================
// Roofs
// ============================================================================

/// Flat roof zones F, G, H, I for crosswind `b` and depth `d`.
pub fn flat_roof_zones(e_m: f64, crosswind_m: f64, depth_m: f64) -> Vec<Zone> {
    let edge = (e_m / 10.0).min(depth_m);
    let inner = e_m / 2.0;
    present(vec![
        Zone::rect(ZoneId::F, edge, e_m / 4.0),
        Zone::rect(ZoneId::G, edge, crosswind_m - inner),
        Zone::rect(ZoneId::H, inner.min(depth_m) - edge, crosswind_m),
        Zone::rect(ZoneId::I, depth_m - inner, crosswind_m),
    ])
}

/// Mono-pitch zones for wind on the low eaves: F, G along the eaves, H beyond.
pub fn mono_pitch_zones(e_m: f64, width_m: f64, length_m: f64) -> Vec<Zone> {
    present(vec![
        Zone::rect(ZoneId::F, e_m / 10.0, e_m / 4.0),
        Zone::rect(ZoneId::G, e_m / 10.0, length_m - e_m / 2.0),
        Zone::rect(ZoneId::H, width_m - e_m / 10.0, length_m),
    ])
}

/// Duo-pitch zones. `width_m` spans both slopes, `length_m` runs along the ridge.
///
/// - θ = 0°: F, G on the windward eaves, H windward slope, I leeward slope,
///   J the leeward strip along the ridge.
/// - θ = 90°: F, G at the gable edge (per slope), H behind them, I the rest.
pub fn duo_pitch_zones(direction: WindDirection, e_m: f64, width_m: f64, length_m: f64) -> Vec<Zone> {
    let strip = e_m / 10.0;
    let half = width_m / 2.0;
    match direction {
        WindDirection::Theta0 => present(vec![
            Zone::rect(ZoneId::F, strip, e_m / 4.0),
            Zone::rect(ZoneId::G, strip, length_m - e_m / 2.0),
            Zone::rect(ZoneId::H, half - strip, length_m),
            Zone::rect(ZoneId::I, half - strip, length_m),
            Zone::rect(ZoneId::J, strip, length_m),
        ]),
        WindDirection::Theta90 => {
            let edge = strip.min(length_m);
            present(vec![
                Zone::rect(ZoneId::F, edge, e_m / 4.0),
                Zone::rect(ZoneId::G, edge, half - e_m / 4.0),
                Zone::rect(ZoneId::H, (e_m / 2.0).min(length_m) - edge, half),
                Zone::rect(ZoneId::I, length_m - e_m / 2.0, half),
            ])
        }
    }
}

/// Hipped roof zones for wind perpendicular to the ridge.
///
/// `crosswind_m` is the eaves length facing the wind (b), `depth_m` the plan
/// depth (d), with b >= d and equal pitches so the ridge is b − d long. The
/// plan splits into two trapezoidal main slopes and two triangular hip
/// ends, each with an eaves band of width e/10:
///
/// - windward slope: F (one of two corners, e/4 long), G between them, H above
/// - leeward slope: J eaves band, I above
/// - hip end: L at the windward corner, K the rest of the band, M above
///
/// One entry is returned per zone type, so a full partition is
/// `2F + G + H + J + I + 2(K + L + M) = b · d`.
/// K collapses to L alone when e/4 + e/5 exceeds d; the sum then overshoots.
pub fn hipped_zones(e_m: f64, crosswind_m: f64, depth_m: f64) -> Vec<Zone> {
    let (b, d) = (crosswind_m, depth_m);
    let strip = e_m / 10.0;
    let corner = e_m / 4.0;
    let slope = d / 2.0 - strip;
    let ridge = b - d;
    present(vec![
        Zone::rect(ZoneId::F, strip, corner),
        Zone::trapezoid(ZoneId::G, strip, b - 2.0 * corner, b - 2.0 * corner - 2.0 * strip),
        Zone::trapezoid(ZoneId::H, slope, b - 2.0 * strip, ridge),
        Zone::trapezoid(ZoneId::I, slope, b - 2.0 * strip, ridge),
        Zone::trapezoid(ZoneId::J, strip, b, b - 2.0 * strip),
        Zone::trapezoid(ZoneId::K, strip, d - corner, d - corner - 2.0 * strip),
        Zone::rect(ZoneId::L, strip, corner),
        Zone::triangle(ZoneId::M, slope, d - 2.0 * strip),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(zones: &[Zone]) -> Vec<ZoneId> {
        zones.iter().map(|z| z.id).collect()
    }

    fn area(zones: &[Zone], id: ZoneId) -> f64 {
        zones.iter().find(|z| z.id == id).map(|z| z.area_m2).unwrap_or(0.0)
    }

    #[test]
    fn test_characteristic_length() {
        assert_eq!(characteristic_length(30.6, 19.871), 30.6);
        assert_eq!(characteristic_length(30.0, 6.0), 12.0);
    }

    #[test]
    fn test_wall_zones_deep_building() {
        // e = min(40, 2 * 8) = 16 < d = 25
        let e = characteristic_length(40.0, 8.0);
        let zones = wall_zones(e, 8.0, 40.0, 25.0);
        assert_eq!(ids(&zones), vec![ZoneId::A, ZoneId::B, ZoneId::C, ZoneId::D, ZoneId::E]);
        let side = area(&zones, ZoneId::A) + area(&zones, ZoneId::B) + area(&zones, ZoneId::C);
        assert!((side - 25.0 * 8.0).abs() < 1e-9);
        assert_eq!(area(&zones, ZoneId::D), 40.0 * 8.0);
        assert_eq!(area(&zones, ZoneId::E), 40.0 * 8.0);
    }

    #[test]
    fn test_wall_zones_side_area_sums_to_face() {
        for (h, b, d) in [(19.871, 30.6, 19.26), (5.0, 10.0, 60.0), (30.0, 12.0, 4.0), (3.0, 50.0, 1.0)] {
            let e = characteristic_length(b, h);
            let zones = wall_zones(e, h, b, d);
            let side: f64 = zones
                .iter()
                .filter(|z| matches!(z.id, ZoneId::A | ZoneId::B | ZoneId::C))
                .map(|z| z.area_m2)
                .sum();
            assert!((side - d * h).abs() < 1e-9, "A+B+C != d*h for {:?}", (h, b, d));
            let windward: f64 = zones
                .iter()
                .filter(|z| matches!(z.id, ZoneId::D | ZoneId::DLower | ZoneId::DUpper))
                .map(|z| z.area_m2)
                .sum();
            assert!(windward <= b * h + 1e-9);
            assert!(zones.iter().all(|z| z.area_m2 > 0.0));
        }
    }

    #[test]
    fn test_wall_zone_c_absent_when_e_exceeds_depth() {
        // e = 30.6 >= d = 19.26: layout without zone C
        let zones = wall_zones(30.6, 19.871, 30.6, 19.26);
        assert!(!ids(&zones).contains(&ZoneId::C));
        assert_eq!(WallLayout::classify(30.6, 19.26), WallLayout::Intermediate);
        assert_eq!(WallLayout::classify(30.6, 5.0), WallLayout::Shallow);
    }

    #[test]
    fn test_wall_windward_split() {
        // b = 12 < h = 20 < 24
        let zones = wall_zones(12.0, 20.0, 12.0, 30.0);
        assert_eq!(area(&zones, ZoneId::DLower), 144.0);
        assert_eq!(area(&zones, ZoneId::DUpper), 96.0);
        assert!(!ids(&zones).contains(&ZoneId::D));

        // h <= b: no D upper
        let zones = wall_zones(10.0, 5.0, 12.0, 30.0);
        assert!(!ids(&zones).contains(&ZoneId::DUpper));
        assert!(ids(&zones).contains(&ZoneId::D));
    }

    #[test]
    fn test_flat_roof_zones() {
        // b = 20, h = 6: e = 12
        let zones = flat_roof_zones(12.0, 20.0, 15.0);
        assert!((area(&zones, ZoneId::F) - 1.2 * 3.0).abs() < 1e-9);
        assert!((area(&zones, ZoneId::G) - 1.2 * 14.0).abs() < 1e-9);
        assert!((area(&zones, ZoneId::H) - 4.8 * 20.0).abs() < 1e-9);
        assert!((area(&zones, ZoneId::I) - 9.0 * 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_roof_shallow_depth_drops_zone_i() {
        let zones = flat_roof_zones(12.0, 20.0, 5.0);
        assert!(!ids(&zones).contains(&ZoneId::I));
        assert!((area(&zones, ZoneId::H) - 3.8 * 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_mono_pitch_zones() {
        let zones = mono_pitch_zones(10.0, 8.0, 20.0);
        assert_eq!(area(&zones, ZoneId::F), 2.5);
        assert_eq!(area(&zones, ZoneId::G), 15.0);
        assert_eq!(area(&zones, ZoneId::H), 140.0);
    }

    #[test]
    fn test_duo_pitch_zones_both_directions() {
        let zones = duo_pitch_zones(WindDirection::Theta0, 10.0, 12.0, 30.0);
        assert_eq!(ids(&zones), vec![ZoneId::F, ZoneId::G, ZoneId::H, ZoneId::I, ZoneId::J]);
        assert_eq!(area(&zones, ZoneId::H), 5.0 * 30.0);
        assert_eq!(area(&zones, ZoneId::J), 30.0);

        let zones = duo_pitch_zones(WindDirection::Theta90, 10.0, 12.0, 30.0);
        assert_eq!(ids(&zones), vec![ZoneId::F, ZoneId::G, ZoneId::H, ZoneId::I]);
        assert_eq!(area(&zones, ZoneId::G), 3.5);
        assert_eq!(area(&zones, ZoneId::I), 25.0 * 6.0);
    }

    #[test]
    fn test_narrow_duo_pitch_omits_g() {
        // L = 4 < e / 2 = 5
        let zones = duo_pitch_zones(WindDirection::Theta0, 10.0, 12.0, 4.0);
        assert!(!ids(&zones).contains(&ZoneId::G));
    }

    #[test]
    fn test_hipped_zones() {
        // z = 9.75, b = 31.2, d = 10: e = 19.5
        let e = characteristic_length(31.2, 9.75);
        let zones = hipped_zones(e, 31.2, 10.0);
        assert_eq!(zones.len(), 8);
        assert!((area(&zones, ZoneId::F) - 1.95 * 4.875).abs() < 1e-9);
        // Ridge 21.2 m, slope trapezoid 27.3 / 21.2 over 3.05 m
        assert!((area(&zones, ZoneId::H) - 3.05 * 24.25).abs() < 1e-9);
        assert!((area(&zones, ZoneId::K) - 1.95 * 3.175).abs() < 1e-9);
        assert!((area(&zones, ZoneId::M) - 0.5 * 3.05 * 6.1).abs() < 1e-9);
    }

    #[test]
    fn test_hipped_zones_partition_plan() {
        for (z, b, d) in [(9.75, 31.2, 10.0), (5.0, 12.0, 12.0), (6.0, 40.0, 12.0), (3.0, 9.0, 6.0)] {
            let e = characteristic_length(b, z);
            let zones = hipped_zones(e, b, d);
            let [f, g, h, i, j, k, l, m] = [
                ZoneId::F,
                ZoneId::G,
                ZoneId::H,
                ZoneId::I,
                ZoneId::J,
                ZoneId::K,
                ZoneId::L,
                ZoneId::M,
            ]
            .map(|id| area(&zones, id));
            let windward = 2.0 * f + g + h;
            let leeward = j + i;
            let hip_end = k + l + m;
            let slope_plan = (2.0 * b - d) * d / 4.0;
            assert!((windward - slope_plan).abs() < 1e-9, "windward slope for {:?}", (z, b, d));
            assert!((leeward - slope_plan).abs() < 1e-9, "leeward slope for {:?}", (z, b, d));
            assert!((hip_end - d * d / 4.0).abs() < 1e-9, "hip end for {:?}", (z, b, d));
            assert!((windward + leeward + 2.0 * hip_end - b * d).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zone_labels() {
        assert_eq!(ZoneId::DUpper.to_string(), "D (upper)");
        assert_eq!(ZoneId::DLower.table_key(), ZoneId::D);
        assert_eq!(ZoneId::F.table_key(), ZoneId::F);
    }
}
