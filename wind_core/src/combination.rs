//! # Load Combination
//!
//! Fifth stage: external and internal coefficients combined into net
//! pressures, zone forces and the loads passed to purlins and trusses
//! (EN 1991-1-4 §5.2, §5.3).
//!
//! ## Sign Convention
//!
//! Positive pressures act towards the surface, negative ones (suction) away
//! from it. The internal coefficient enters the net pressure either added
//! or subtracted depending on the shape's [`NetPressureConvention`]. When
//! several c_pi candidates exist, each zone keeps the one giving the largest
//! |w_net|, except under `SignPaired`, where the sign of c_pe picks the
//! candidate: suction takes the largest c_pi, pressure the smallest.
//!
//! ## Example
//!
//! ```rust
//! use wind_core::combination::{most_onerous, NetPressureConvention};
//!
//! // Suction zone, c_pi = -0.3 or +0.2: +0.2 governs when subtracted
//! let (c_pi, w_net) = most_onerous(0.8, -1.2, &[-0.3, 0.2], NetPressureConvention::Subtractive).unwrap();
//! assert_eq!(c_pi, 0.2);
//! assert!((w_net + 1.12).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::units::{KiloNewtonsPerMeter, KiloPascals, Meters, SquareMeters};
use crate::zones::{WindDirection, Zone, ZoneId};

/// How c_pi enters the net pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetPressureConvention {
    /// `w_net = q_p · (c_pe + c_pi)`
    Additive,
    /// `w_net = q_p · (c_pe − c_pi)`
    Subtractive,
    /// `w_net = q_p · (c_pe + c_pi)` with c_pi = max for suction, min for pressure
    SignPaired,
}

/// `w_e = q_p · c_pe`
pub fn external_pressure(q_p_kpa: f64, c_pe: f64) -> f64 {
    q_p_kpa * c_pe
}

pub fn net_pressure(q_p_kpa: f64, c_pe: f64, c_pi: f64, convention: NetPressureConvention) -> f64 {
    match convention {
        NetPressureConvention::Additive | NetPressureConvention::SignPaired => q_p_kpa * (c_pe + c_pi),
        NetPressureConvention::Subtractive => q_p_kpa * (c_pe - c_pi),
    }
}

/// The governing c_pi candidate with its w_net.
///
/// Additive and subtractive conventions keep the largest |w_net|, ties keep
/// the first candidate. `SignPaired` pairs c_pe < 0 with the largest
/// candidate and c_pe >= 0 with the smallest.
pub fn most_onerous(
    q_p_kpa: f64,
    c_pe: f64,
    candidates: &[f64],
    convention: NetPressureConvention,
) -> CalcResult<(f64, f64)> {
    if convention == NetPressureConvention::SignPaired {
        let paired = if c_pe < 0.0 {
            candidates.iter().copied().reduce(f64::max)
        } else {
            candidates.iter().copied().reduce(f64::min)
        };
        return paired
            .map(|c_pi| (c_pi, net_pressure(q_p_kpa, c_pe, c_pi, convention)))
            .ok_or_else(|| CalcError::internal("no internal pressure coefficient to combine"));
    }

    let mut governing: Option<(f64, f64)> = None;
    for &c_pi in candidates {
        let w_net = net_pressure(q_p_kpa, c_pe, c_pi, convention);
        match governing {
            Some((_, best)) if w_net.abs() <= best.abs() => {}
            _ => governing = Some((c_pi, w_net)),
        }
    }
    governing.ok_or_else(|| CalcError::internal("no internal pressure coefficient to combine"))
}

/// `F_w = c_s c_d · w_net · A` in kN
pub fn zone_force(structural_factor: f64, w_net_kpa: f64, area_m2: f64) -> f64 {
    (KiloPascals(w_net_kpa) * SquareMeters(area_m2)).value() * structural_factor
}

/// Line load on a purlin (kN/m)
pub fn purlin_load(w_e_kpa: f64, purlin_spacing_m: f64) -> f64 {
    (KiloPascals(w_e_kpa) * Meters(purlin_spacing_m)).value()
}

/// Point load on a truss from one purlin (kN)
pub fn truss_load(purlin_kn_m: f64, truss_spacing_m: f64) -> f64 {
    (KiloNewtonsPerMeter(purlin_kn_m) * Meters(truss_spacing_m)).value()
}

// ============================================================================
// Zone Results
// ============================================================================

/// Which tabulated coefficient a result row uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoefficientVariant {
    /// Area-resolved c_pe
    Primary,
    /// Alternative pressure coefficient
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressureCase {
    Suction,
    Pressure,
}

impl PressureCase {
    pub fn of(w_net_kpa: f64) -> Self {
        if w_net_kpa < 0.0 {
            PressureCase::Suction
        } else {
            PressureCase::Pressure
        }
    }
}

/// Net pressure and force on one zone for one direction and coefficient variant.
///
/// ## JSON Example
///
/// ```json
/// {
///   "zone": "F",
///   "direction": "0",
///   "variant": "Primary",
///   "case": "Suction",
///   "width_m": 1.2,
///   "length_m": 3.0,
///   "area_m2": 3.6,
///   "q_p_kpa": 0.62,
///   "c_pe": -1.44,
///   "c_pi": 0.2,
///   "w_e_kpa": -0.89,
///   "w_net_kpa": -1.02,
///   "f_w_kn": -3.69
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneResult {
    pub zone: ZoneId,
    /// Wind direction, for shapes evaluated in more than one
    pub direction: Option<WindDirection>,
    pub variant: CoefficientVariant,
    pub case: PressureCase,
    pub width_m: f64,
    pub length_m: f64,
    pub area_m2: f64,
    pub q_p_kpa: f64,
    pub c_pe: f64,
    /// Governing internal coefficient
    pub c_pi: f64,
    pub w_e_kpa: f64,
    pub w_net_kpa: f64,
    pub f_w_kn: f64,
}

/// Combination rules shared by every zone of one calculation.
#[derive(Debug, Clone, Copy)]
pub struct Combination<'a> {
    pub convention: NetPressureConvention,
    pub c_pi_candidates: &'a [f64],
    /// c_s c_d
    pub structural_factor: f64,
}

impl Combination<'_> {
    /// Combine one zone's coefficient with the internal candidates.
    pub fn zone(
        &self,
        zone: &Zone,
        direction: Option<WindDirection>,
        variant: CoefficientVariant,
        q_p_kpa: f64,
        c_pe: f64,
        tracker: &mut EquationTracker,
    ) -> CalcResult<ZoneResult> {
        let context = match direction {
            Some(d) => format!("{}, {:?}", d.display_name(), variant),
            None => format!("{:?}", variant),
        };
        let label = zone.id.label();

        let w_e_kpa = external_pressure(q_p_kpa, c_pe);
        tracker.record_zone_values(
            Equation::ExternalPressure,
            context.clone(),
            label,
            &[("q_p", q_p_kpa), ("c_pe", c_pe)],
            w_e_kpa,
        );

        let (c_pi, w_net_kpa) = most_onerous(q_p_kpa, c_pe, self.c_pi_candidates, self.convention)?;
        tracker.record_zone_values(
            Equation::NetPressure,
            context.clone(),
            label,
            &[("q_p", q_p_kpa), ("c_pe", c_pe), ("c_pi", c_pi)],
            w_net_kpa,
        );

        let f_w_kn = zone_force(self.structural_factor, w_net_kpa, zone.area_m2);
        tracker.record_zone_values(
            Equation::WindForce,
            context,
            label,
            &[("c_s c_d", self.structural_factor), ("w_net", w_net_kpa), ("A", zone.area_m2)],
            f_w_kn,
        );

        log::trace!(
            "zone {} {:?}: c_pe = {:.3}, c_pi = {:.2}, w_net = {:.4} kPa, F_w = {:.3} kN",
            label,
            variant,
            c_pe,
            c_pi,
            w_net_kpa,
            f_w_kn
        );

        Ok(ZoneResult {
            zone: zone.id,
            direction,
            variant,
            case: PressureCase::of(w_net_kpa),
            width_m: zone.width_m,
            length_m: zone.length_m,
            area_m2: zone.area_m2,
            q_p_kpa,
            c_pe,
            c_pi,
            w_e_kpa,
            w_net_kpa,
            f_w_kn,
        })
    }
}

/// Largest positive and most negative w_net; 0 where none exist.
pub fn pressure_extremes(zones: &[ZoneResult]) -> (f64, f64) {
    zones.iter().fold((0.0_f64, 0.0_f64), |(max_pos, min_neg), z| {
        (max_pos.max(z.w_net_kpa), min_neg.min(z.w_net_kpa))
    })
}

// ============================================================================
// Load Transfer
// ============================================================================

/// Purlin and truss spacing for load transfer.
///
/// ```json
/// { "purlin_spacing_m": 1.2, "truss_spacing_m": 4.5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemberSpacing {
    pub purlin_spacing_m: f64,
    pub truss_spacing_m: f64,
}

impl MemberSpacing {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("member_spacing.purlin_spacing_m", self.purlin_spacing_m)?;
        require_positive("member_spacing.truss_spacing_m", self.truss_spacing_m)
    }
}

/// Loads transferred from one zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberLoad {
    pub zone: ZoneId,
    pub w_e_kpa: f64,
    /// F_w,purlin (kN/m)
    pub purlin_kn_m: f64,
    /// F_w,truss (kN)
    pub truss_kn: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadTransferResult {
    /// Direction the loads were taken from
    pub direction: WindDirection,
    pub spacing: MemberSpacing,
    pub members: Vec<MemberLoad>,
}

/// Transfer the primary-variant external pressures of the governing direction.
///
/// Results without a direction are treated as belonging to `direction`.
pub fn transfer_loads(
    zones: &[ZoneResult],
    direction: WindDirection,
    spacing: MemberSpacing,
    tracker: &mut EquationTracker,
) -> LoadTransferResult {
    let members = zones
        .iter()
        .filter(|z| z.variant == CoefficientVariant::Primary)
        .filter(|z| z.direction.map_or(true, |d| d == direction))
        .map(|z| {
            let label = z.zone.label();
            let purlin_kn_m = purlin_load(z.w_e_kpa, spacing.purlin_spacing_m);
            tracker.record_zone_values(
                Equation::PurlinLoad,
                direction.display_name(),
                label,
                &[("w_e", z.w_e_kpa), ("s_purlin", spacing.purlin_spacing_m)],
                purlin_kn_m,
            );
            let truss_kn = truss_load(purlin_kn_m, spacing.truss_spacing_m);
            tracker.record_zone_values(
                Equation::TrussLoad,
                direction.display_name(),
                label,
                &[("F_w,purlin", purlin_kn_m), ("s_truss", spacing.truss_spacing_m)],
                truss_kn,
            );
            MemberLoad {
                zone: z.zone,
                w_e_kpa: z.w_e_kpa,
                purlin_kn_m,
                truss_kn,
            }
        })
        .collect();

    LoadTransferResult {
        direction,
        spacing,
        members,
    }
}
