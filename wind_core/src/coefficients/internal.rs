//! Internal pressure coefficient policies (EN 1991-1-4 §7.2.9).
//!
//! A policy yields one or more candidate values of `c_pi`. The combination
//! stage evaluates every candidate for every zone and keeps the most onerous.

use serde::{Deserialize, Serialize};

use crate::equations::{Equation, EquationTracker};
use crate::errors::{require_non_negative, CalcError, CalcResult};

/// c_pi for squat buildings (h/d <= 0.25)
pub const C_PI_SQUAT: f64 = 0.17;
/// c_pi for compact buildings (h/d >= 1.0)
pub const C_PI_COMPACT: f64 = 0.10;

/// `μ = (A_leeward + A_parallel) / ΣA`, or 0 when there are no openings.
pub fn opening_ratio(windward_m2: f64, leeward_m2: f64, parallel_m2: f64) -> f64 {
    let total = windward_m2 + leeward_m2 + parallel_m2;
    if total <= 0.0 {
        0.0
    } else {
        (leeward_m2 + parallel_m2) / total
    }
}

/// c_pi interpolated on h/d between 0.17 (h/d <= 0.25) and 0.10 (h/d >= 1).
pub fn internal_coefficient_from_openings(h_over_d: f64) -> f64 {
    if h_over_d <= 0.25 {
        C_PI_SQUAT
    } else if h_over_d >= 1.0 {
        C_PI_COMPACT
    } else {
        C_PI_SQUAT + (C_PI_COMPACT - C_PI_SQUAT) * (h_over_d - 0.25) / 0.75
    }
}

fn default_c_pi_min() -> f64 {
    -0.3
}

fn default_c_pi_max() -> f64 {
    0.2
}

/// How c_pi is obtained for a calculation.
///
/// ```json
/// { "policy": "OpeningRatio", "windward_m2": 4.0, "leeward_m2": 2.0, "parallel_m2": 2.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy")]
pub enum InternalPressure {
    /// Both values are tried; the more onerous governs each zone
    ConservativePair {
        #[serde(default = "default_c_pi_min")]
        c_pi_min: f64,
        #[serde(default = "default_c_pi_max")]
        c_pi_max: f64,
    },
    /// From the opening areas and building proportions
    OpeningRatio {
        windward_m2: f64,
        leeward_m2: f64,
        parallel_m2: f64,
    },
    /// Given directly
    Specified { c_pi: f64 },
}

impl InternalPressure {
    /// The recommended −0.3 / +0.2 pair
    pub fn conservative() -> Self {
        InternalPressure::ConservativePair {
            c_pi_min: default_c_pi_min(),
            c_pi_max: default_c_pi_max(),
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        match *self {
            InternalPressure::ConservativePair { c_pi_min, c_pi_max } => {
                if c_pi_min > c_pi_max {
                    return Err(CalcError::invalid_input(
                        "internal_pressure.c_pi_min",
                        c_pi_min.to_string(),
                        format!("Must not exceed c_pi_max = {}", c_pi_max),
                    ));
                }
                Ok(())
            }
            InternalPressure::OpeningRatio {
                windward_m2,
                leeward_m2,
                parallel_m2,
            } => {
                require_non_negative("internal_pressure.windward_m2", windward_m2)?;
                require_non_negative("internal_pressure.leeward_m2", leeward_m2)?;
                require_non_negative("internal_pressure.parallel_m2", parallel_m2)
            }
            InternalPressure::Specified { c_pi } => {
                if !c_pi.is_finite() {
                    return Err(CalcError::invalid_input(
                        "internal_pressure.c_pi",
                        c_pi.to_string(),
                        "Must be a finite number",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Candidate c_pi values for a building with the given h/d.
    pub fn resolve(&self, h_over_d: f64, tracker: &mut EquationTracker) -> ResolvedInternalPressure {
        match *self {
            InternalPressure::ConservativePair { c_pi_min, c_pi_max } => ResolvedInternalPressure {
                candidates: vec![c_pi_min, c_pi_max],
                mu: None,
            },
            InternalPressure::Specified { c_pi } => ResolvedInternalPressure {
                candidates: vec![c_pi],
                mu: None,
            },
            InternalPressure::OpeningRatio {
                windward_m2,
                leeward_m2,
                parallel_m2,
            } => {
                let mu = opening_ratio(windward_m2, leeward_m2, parallel_m2);
                tracker.record_values(
                    Equation::OpeningRatio,
                    "Internal pressure",
                    &[("A_windward", windward_m2), ("A_leeward", leeward_m2), ("A_parallel", parallel_m2)],
                    mu,
                );
                let c_pi = internal_coefficient_from_openings(h_over_d);
                tracker.record_values(
                    Equation::InternalCoefficientOpenings,
                    "Internal pressure",
                    &[("h/d", h_over_d), ("mu", mu)],
                    c_pi,
                );
                log::debug!("opening ratio mu = {:.3}, h/d = {:.3} -> c_pi = {:.3}", mu, h_over_d, c_pi);
                ResolvedInternalPressure {
                    candidates: vec![c_pi],
                    mu: Some(mu),
                }
            }
        }
    }
}

/// Internal pressure values used by a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedInternalPressure {
    /// Every c_pi tried against each zone
    pub candidates: Vec<f64>,
    /// Opening ratio, when derived from openings
    pub mu: Option<f64>,
}
