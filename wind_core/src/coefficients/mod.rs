//! # Pressure Coefficients
//!
//! Fourth stage: external pressure coefficients from the EN 1991-1-4
//! tables, interpolated in the table parameter (pitch angle, h/d or h_p/h)
//! and in loaded area, plus the internal pressure coefficient policies.
//!
//! ## Area Dependence
//!
//! Tables give `c_pe,1` (loaded area <= 1 m²) and `c_pe,10` (>= 10 m²).
//! Between them the coefficient varies with log10 of the area
//! ([`resolve_by_area`]), not linearly with the area.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::coefficients::{resolve_by_area, tables::DUO_PITCH_0, InterpolationOrder};
//! use wind_core::zones::ZoneId;
//!
//! assert_eq!(resolve_by_area(-2.0, -0.9, 0.5), -2.0);
//! assert_eq!(resolve_by_area(-2.0, -0.9, 10.0), -0.9);
//!
//! let f = DUO_PITCH_0
//!     .resolve(15.0, ZoneId::F, 10.0, InterpolationOrder::ParameterThenArea)
//!     .unwrap();
//! assert_eq!(f.primary, -0.9);
//! ```

pub mod internal;
pub mod tables;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::zones::ZoneId;

pub use internal::{InternalPressure, ResolvedInternalPressure};

/// `c_pe = c_1` (A <= 1), `c_10` (A >= 10), else `c_1 − (c_1 − c_10)·log10(A)`
pub fn resolve_by_area(c_1: f64, c_10: f64, area_m2: f64) -> f64 {
    if area_m2 <= 1.0 {
        c_1
    } else if area_m2 >= 10.0 {
        c_10
    } else {
        c_1 - (c_1 - c_10) * area_m2.log10()
    }
}

fn lerp(y_0: f64, y_1: f64, fraction: f64) -> f64 {
    if fraction == 0.0 {
        y_0
    } else {
        y_0 + (y_1 - y_0) * fraction
    }
}

/// Whether the table parameter is interpolated before or after the area rule.
///
/// Both orders give the same coefficient, since the area rule is linear in
/// `(c_1, c_10)`. They are kept as separate policies so each shape states the
/// order its published procedure uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterpolationOrder {
    ParameterThenArea,
    AreaThenParameter,
}

/// What to do with a parameter outside the first/last table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangePolicy {
    Reject,
    Clamp,
}

/// The quantity a coefficient table is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableParameter {
    PitchAngle,
    HeightToDepth,
    ParapetRatio,
}

impl TableParameter {
    pub fn field_name(&self) -> &'static str {
        match self {
            TableParameter::PitchAngle => "pitch_deg",
            TableParameter::HeightToDepth => "h/d",
            TableParameter::ParapetRatio => "h_p/h",
        }
    }
}

/// Tabulated external coefficients for one zone in one table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalCoefficients {
    pub c_pe_10: f64,
    /// Small-area value; the large-area value applies when absent
    pub c_pe_1: Option<f64>,
    /// Alternative pressure value for zones that can see both signs
    pub c_pe_positive: Option<f64>,
}

impl ExternalCoefficients {
    /// Same value for every loaded area
    pub const fn uniform(c_pe_10: f64) -> Self {
        Self {
            c_pe_10,
            c_pe_1: None,
            c_pe_positive: None,
        }
    }

    pub const fn by_area(c_pe_10: f64, c_pe_1: f64) -> Self {
        Self {
            c_pe_10,
            c_pe_1: Some(c_pe_1),
            c_pe_positive: None,
        }
    }

    pub const fn with_positive(c_pe_10: f64, c_pe_1: Option<f64>, positive: f64) -> Self {
        Self {
            c_pe_10,
            c_pe_1,
            c_pe_positive: Some(positive),
        }
    }

    pub fn c_pe_1_or_10(&self) -> f64 {
        self.c_pe_1.unwrap_or(self.c_pe_10)
    }

    pub fn at_area(&self, area_m2: f64) -> f64 {
        resolve_by_area(self.c_pe_1_or_10(), self.c_pe_10, area_m2)
    }
}

/// One row of a coefficient table.
#[derive(Debug, Clone, Copy)]
pub struct CoefficientRow {
    pub key: f64,
    pub zones: &'static [(ZoneId, ExternalCoefficients)],
}

impl CoefficientRow {
    pub fn get(&self, zone: ZoneId) -> Option<&ExternalCoefficients> {
        self.zones.iter().find(|(id, _)| *id == zone).map(|(_, c)| c)
    }
}

/// The two rows around a parameter value.
#[derive(Debug, Clone, Copy)]
pub struct Bracket<'a> {
    pub lower: &'a CoefficientRow,
    pub upper: &'a CoefficientRow,
    /// 0 at `lower.key`, 1 at `upper.key`
    pub fraction: f64,
}

/// Coefficients resolved for one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CpeVariants {
    /// `c_pe,1` at the table parameter
    pub c_pe_1: f64,
    /// `c_pe,10` at the table parameter
    pub c_pe_10: f64,
    /// Coefficient at the zone's loaded area
    pub primary: f64,
    /// Alternative pressure coefficient, where tabulated
    pub positive: Option<f64>,
}

/// A static external-pressure coefficient table.
#[derive(Debug, Clone, Copy)]
pub struct CoefficientTable {
    pub name: &'static str,
    pub parameter: TableParameter,
    pub out_of_range: RangePolicy,
    /// Rows in ascending key order
    pub rows: &'static [CoefficientRow],
}

impl CoefficientTable {
    pub fn first_key(&self) -> f64 {
        self.rows.first().map(|r| r.key).unwrap_or(0.0)
    }

    pub fn last_key(&self) -> f64 {
        self.rows.last().map(|r| r.key).unwrap_or(0.0)
    }

    /// Find the rows around `x`, applying the table's range policy.
    pub fn bracket(&self, x: f64) -> CalcResult<Bracket<'_>> {
        let (first, last) = match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(CalcError::internal(format!("{} has no rows", self.name))),
        };

        if !x.is_finite() {
            return Err(CalcError::invalid_input(
                self.parameter.field_name(),
                x.to_string(),
                "Must be a finite number",
            ));
        }

        if x <= first.key || x >= last.key {
            let edge = if x <= first.key { first } else { last };
            if x != edge.key {
                match self.out_of_range {
                    RangePolicy::Reject => {
                        return Err(CalcError::invalid_input(
                            self.parameter.field_name(),
                            x.to_string(),
                            format!(
                                "Outside {} range [{}, {}]",
                                self.name,
                                first.key,
                                last.key
                            ),
                        ))
                    }
                    RangePolicy::Clamp => {
                        log::debug!("{} = {} clamped to {} row {}", self.parameter.field_name(), x, self.name, edge.key);
                    }
                }
            }
            return Ok(Bracket {
                lower: edge,
                upper: edge,
                fraction: 0.0,
            });
        }

        for pair in self.rows.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if x >= lower.key && x <= upper.key {
                let fraction = if x == lower.key {
                    0.0
                } else if x == upper.key {
                    return Ok(Bracket {
                        lower: upper,
                        upper,
                        fraction: 0.0,
                    });
                } else {
                    (x - lower.key) / (upper.key - lower.key)
                };
                return Ok(Bracket { lower, upper, fraction });
            }
        }

        Err(CalcError::internal(format!("{} rows are not sorted", self.name)))
    }

    fn zone_in<'a>(&self, row: &'a CoefficientRow, zone: ZoneId) -> CalcResult<&'a ExternalCoefficients> {
        row.get(zone).ok_or_else(|| {
            CalcError::unsupported(format!("zone in {} at {}", self.name, row.key), zone.label())
        })
    }

    /// Resolve a zone's coefficients at parameter `x` and loaded area.
    pub fn resolve(
        &self,
        x: f64,
        zone: ZoneId,
        area_m2: f64,
        order: InterpolationOrder,
    ) -> CalcResult<CpeVariants> {
        let bracket = self.bracket(x)?;
        let lo = self.zone_in(bracket.lower, zone)?;
        let hi = self.zone_in(bracket.upper, zone)?;
        let t = bracket.fraction;

        let c_pe_1 = lerp(lo.c_pe_1_or_10(), hi.c_pe_1_or_10(), t);
        let c_pe_10 = lerp(lo.c_pe_10, hi.c_pe_10, t);
        let primary = match order {
            InterpolationOrder::ParameterThenArea => resolve_by_area(c_pe_1, c_pe_10, area_m2),
            InterpolationOrder::AreaThenParameter => lerp(lo.at_area(area_m2), hi.at_area(area_m2), t),
        };
        let positive = match (lo.c_pe_positive, hi.c_pe_positive) {
            (None, None) => None,
            (a, b) => Some(lerp(a.unwrap_or(0.0), b.unwrap_or(0.0), t)),
        };

        Ok(CpeVariants {
            c_pe_1,
            c_pe_10,
            primary,
            positive,
        })
    }
}

// ============================================================================
// Ratio Brackets
// ============================================================================

/// h/d bracket of EN 1991-1-4 Table 7.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightDepthBracket {
    /// h/d <= 0.25
    Squat,
    /// 0.25 < h/d < 1
    BelowUnity,
    /// 1 <= h/d < 5
    AboveUnity,
    /// h/d >= 5
    Slender,
}

impl HeightDepthBracket {
    pub fn classify(h_over_d: f64) -> Self {
        if h_over_d <= 0.25 {
            HeightDepthBracket::Squat
        } else if h_over_d < 1.0 {
            HeightDepthBracket::BelowUnity
        } else if h_over_d < 5.0 {
            HeightDepthBracket::AboveUnity
        } else {
            HeightDepthBracket::Slender
        }
    }
}

/// Parapet bracket of EN 1991-1-4 Table 7.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParapetBracket {
    /// h_p/h = 0
    SharpEaves,
    /// 0 < h_p/h <= 0.05
    Low,
    /// 0.05 < h_p/h <= 0.1
    Medium,
    /// h_p/h > 0.1, coefficients of the 0.1 row
    High,
}

impl ParapetBracket {
    pub fn classify(ratio: f64) -> Self {
        if ratio <= 0.0 {
            ParapetBracket::SharpEaves
        } else if ratio <= 0.05 {
            ParapetBracket::Low
        } else if ratio <= 0.1 {
            ParapetBracket::Medium
        } else {
            ParapetBracket::High
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tables::{DUO_PITCH_0, DUO_PITCH_90, HIPPED, MONO_PITCH, WALL};
    use super::*;

    #[test]
    fn test_area_rule_boundaries() {
        assert_eq!(resolve_by_area(-2.5, -1.7, 1.0), -2.5);
        assert_eq!(resolve_by_area(-2.5, -1.7, 0.2), -2.5);
        assert_eq!(resolve_by_area(-2.5, -1.7, 10.0), -1.7);
        assert_eq!(resolve_by_area(-2.5, -1.7, 250.0), -1.7);
    }

    #[test]
    fn test_area_rule_monotonic_between() {
        let mut previous = resolve_by_area(-2.5, -1.7, 1.0);
        let mut area = 1.25;
        while area < 10.0 {
            let c = resolve_by_area(-2.5, -1.7, area);
            assert!(c > -2.5 && c < -1.7, "not strictly between at {}", area);
            assert!(c > previous, "not monotonic at {}", area);
            previous = c;
            area += 0.25;
        }
    }

    #[test]
    fn test_area_rule_is_log_linear() {
        // Geometric midpoint of 1 and 10 gives the arithmetic mean
        let c = resolve_by_area(-2.0, -1.0, 10f64.sqrt());
        assert!((c + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_duo_pitch_15_zone_f_exact_values() {
        let order = InterpolationOrder::ParameterThenArea;
        assert_eq!(DUO_PITCH_0.resolve(15.0, ZoneId::F, 1.0, order).unwrap().primary, -2.0);
        assert_eq!(DUO_PITCH_0.resolve(15.0, ZoneId::F, 0.4, order).unwrap().primary, -2.0);
        assert_eq!(DUO_PITCH_0.resolve(15.0, ZoneId::F, 10.0, order).unwrap().primary, -0.9);
    }

    #[test]
    fn test_pitch_interpolation() {
        // Halfway between 15° (-0.9) and 30° (-0.5) for a large zone F
        let c = DUO_PITCH_0
            .resolve(22.5, ZoneId::F, 50.0, InterpolationOrder::ParameterThenArea)
            .unwrap();
        assert!((c.primary + 0.7).abs() < 1e-12);
        // Positive: 0.2 -> 0.7
        assert!((c.positive.unwrap() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_interpolation_orders_agree() {
        for table in [&DUO_PITCH_0, &DUO_PITCH_90, &MONO_PITCH, &HIPPED] {
            for angle in [7.0, 12.5, 21.0, 38.0, 52.0] {
                for area in [0.5, 2.0, 4.5, 9.0, 30.0] {
                    let a = table
                        .resolve(angle, ZoneId::F, area, InterpolationOrder::ParameterThenArea)
                        .unwrap();
                    let b = table
                        .resolve(angle, ZoneId::F, area, InterpolationOrder::AreaThenParameter)
                        .unwrap();
                    assert!((a.primary - b.primary).abs() < 1e-12, "{} at {}°, {} m²", table.name, angle, area);
                }
            }
        }
    }

    #[test]
    fn test_reject_outside_range() {
        let err = DUO_PITCH_0
            .resolve(-60.0, ZoneId::F, 5.0, InterpolationOrder::ParameterThenArea)
            .unwrap_err();
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_clamp_outside_range() {
        let low = WALL.resolve(0.1, ZoneId::E, 20.0, InterpolationOrder::ParameterThenArea).unwrap();
        assert_eq!(low.primary, -0.3);
        let high = WALL.resolve(8.0, ZoneId::E, 20.0, InterpolationOrder::ParameterThenArea).unwrap();
        assert_eq!(high.primary, -0.7);
    }

    #[test]
    fn test_missing_zone_is_unsupported() {
        let err = DUO_PITCH_90
            .resolve(15.0, ZoneId::J, 5.0, InterpolationOrder::ParameterThenArea)
            .unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_CONFIGURATION");
    }

    #[test]
    fn test_exact_row_hits_do_not_blend() {
        let bracket = DUO_PITCH_0.bracket(30.0).unwrap();
        assert_eq!(bracket.lower.key, 30.0);
        assert_eq!(bracket.fraction, 0.0);
    }

    #[test]
    fn test_brackets() {
        assert_eq!(HeightDepthBracket::classify(0.25), HeightDepthBracket::Squat);
        assert_eq!(HeightDepthBracket::classify(0.6), HeightDepthBracket::BelowUnity);
        assert_eq!(HeightDepthBracket::classify(1.0), HeightDepthBracket::AboveUnity);
        assert_eq!(HeightDepthBracket::classify(5.0), HeightDepthBracket::Slender);

        assert_eq!(ParapetBracket::classify(0.0), ParapetBracket::SharpEaves);
        assert_eq!(ParapetBracket::classify(0.05), ParapetBracket::Low);
        assert_eq!(ParapetBracket::classify(0.08), ParapetBracket::Medium);
        assert_eq!(ParapetBracket::classify(0.3), ParapetBracket::High);
    }
}
