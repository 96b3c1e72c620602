//! External pressure coefficient tables (EN 1991-1-4 Tables 7.1 - 7.5).
//!
//! Each entry is `c_pe,10`, optionally `c_pe,1`, and optionally the
//! alternative positive value for roofs that can see both signs.

use super::{CoefficientRow, CoefficientTable, ExternalCoefficients, RangePolicy, TableParameter};
use crate::zones::ZoneId as Z;

const fn c(c_10: f64) -> ExternalCoefficients {
    ExternalCoefficients::uniform(c_10)
}

const fn ca(c_10: f64, c_1: f64) -> ExternalCoefficients {
    ExternalCoefficients::by_area(c_10, c_1)
}

const fn cp(c_10: f64, positive: f64) -> ExternalCoefficients {
    ExternalCoefficients::with_positive(c_10, None, positive)
}

const fn cap(c_10: f64, c_1: f64, positive: f64) -> ExternalCoefficients {
    ExternalCoefficients::with_positive(c_10, Some(c_1), positive)
}

// ============================================================================
// Vertical Walls (Table 7.1)
// ============================================================================

/// Vertical walls, keyed by h/d. Clamped outside [0.25, 5].
pub static WALL: CoefficientTable = CoefficientTable {
    name: "wall table (h/d)",
    parameter: TableParameter::HeightToDepth,
    out_of_range: RangePolicy::Clamp,
    rows: &[
        CoefficientRow {
            key: 0.25,
            zones: &[
                (Z::A, ca(-1.2, -1.4)),
                (Z::B, ca(-0.8, -1.1)),
                (Z::C, c(-0.5)),
                (Z::D, ca(0.7, 1.0)),
                (Z::E, c(-0.3)),
            ],
        },
        CoefficientRow {
            key: 1.0,
            zones: &[
                (Z::A, ca(-1.2, -1.4)),
                (Z::B, ca(-0.8, -1.1)),
                (Z::C, c(-0.5)),
                (Z::D, ca(0.8, 1.0)),
                (Z::E, c(-0.5)),
            ],
        },
        CoefficientRow {
            key: 5.0,
            zones: &[
                (Z::A, ca(-1.2, -1.4)),
                (Z::B, ca(-0.8, -1.1)),
                (Z::C, c(-0.5)),
                (Z::D, ca(0.8, 1.0)),
                (Z::E, c(-0.7)),
            ],
        },
    ],
};

// ============================================================================
// Flat Roofs (Table 7.2)
// ============================================================================

/// Flat roofs, keyed by parapet ratio h_p/h. Clamped above 0.1.
pub static FLAT_ROOF: CoefficientTable = CoefficientTable {
    name: "flat roof table (h_p/h)",
    parameter: TableParameter::ParapetRatio,
    out_of_range: RangePolicy::Clamp,
    rows: &[
        CoefficientRow {
            key: 0.0,
            zones: &[
                (Z::F, ca(-1.8, -2.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-0.7, -1.2)),
                (Z::I, cp(-0.2, 0.2)),
            ],
        },
        CoefficientRow {
            key: 0.05,
            zones: &[
                (Z::F, ca(-1.4, -2.0)),
                (Z::G, ca(-0.9, -1.6)),
                (Z::H, ca(-0.7, -1.2)),
                (Z::I, cp(-0.2, 0.2)),
            ],
        },
        CoefficientRow {
            key: 0.1,
            zones: &[
                (Z::F, ca(-1.2, -1.8)),
                (Z::G, ca(-0.8, -1.4)),
                (Z::H, ca(-0.7, -1.2)),
                (Z::I, cp(-0.2, 0.2)),
            ],
        },
    ],
};

// ============================================================================
// Mono-pitch Roofs (Table 7.3a)
// ============================================================================

/// Mono-pitch roofs, θ = 0°, keyed by pitch. Pitches below 5° use the 5° row.
pub static MONO_PITCH: CoefficientTable = CoefficientTable {
    name: "mono-pitch table",
    parameter: TableParameter::PitchAngle,
    out_of_range: RangePolicy::Clamp,
    rows: &[
        CoefficientRow {
            key: 5.0,
            zones: &[
                (Z::F, cap(-1.7, -2.5, 0.0)),
                (Z::G, cap(-1.2, -2.0, 0.0)),
                (Z::H, cap(-0.6, -2.0, 0.0)),
            ],
        },
        CoefficientRow {
            key: 15.0,
            zones: &[
                (Z::F, cap(-0.9, -2.0, 0.2)),
                (Z::G, cap(-0.8, -1.5, 0.0)),
                (Z::H, cap(-0.3, -1.5, 0.0)),
            ],
        },
        CoefficientRow {
            key: 30.0,
            zones: &[
                (Z::F, cap(-0.5, -1.5, 0.7)),
                (Z::G, cap(-0.5, -1.5, 0.4)),
                (Z::H, cap(-0.2, -1.5, 0.4)),
            ],
        },
        CoefficientRow {
            key: 45.0,
            zones: &[(Z::F, cp(0.0, 0.7)), (Z::G, cp(0.0, 0.7)), (Z::H, cp(0.0, 0.6))],
        },
        CoefficientRow {
            key: 60.0,
            zones: &[(Z::F, c(0.7)), (Z::G, c(0.7)), (Z::H, c(0.7))],
        },
        CoefficientRow {
            key: 75.0,
            zones: &[(Z::F, c(0.8)), (Z::G, c(0.8)), (Z::H, c(0.8))],
        },
    ],
};

// ============================================================================
// Duo-pitch Roofs (Table 7.4a / 7.4b)
// ============================================================================

/// Duo-pitch roofs, θ = 0°, keyed by pitch in [−45°, 75°].
pub static DUO_PITCH_0: CoefficientTable = CoefficientTable {
    name: "duo-pitch table θ = 0°",
    parameter: TableParameter::PitchAngle,
    out_of_range: RangePolicy::Reject,
    rows: &[
        CoefficientRow {
            key: -45.0,
            zones: &[
                (Z::F, c(-0.6)),
                (Z::G, c(-0.6)),
                (Z::H, c(-0.8)),
                (Z::I, c(-0.7)),
                (Z::J, ca(-1.0, -1.5)),
            ],
        },
        CoefficientRow {
            key: -30.0,
            zones: &[
                (Z::F, ca(-1.1, -2.0)),
                (Z::G, ca(-0.8, -1.5)),
                (Z::H, c(-0.8)),
                (Z::I, c(-0.8)),
                (Z::J, ca(-0.8, -1.4)),
            ],
        },
        CoefficientRow {
            key: -15.0,
            zones: &[
                (Z::F, ca(-2.5, -2.8)),
                (Z::G, ca(-1.3, -2.0)),
                (Z::H, c(-0.9)),
                (Z::I, c(-0.5)),
                (Z::J, ca(-0.7, -1.2)),
            ],
        },
        CoefficientRow {
            key: -5.0,
            zones: &[
                (Z::F, ca(-2.3, -2.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, c(-0.8)),
                (Z::I, ca(-0.2, -0.6)),
                (Z::J, ca(0.2, -0.6)),
            ],
        },
        CoefficientRow {
            key: 5.0,
            zones: &[
                (Z::F, cap(-1.7, -2.5, 0.0)),
                (Z::G, cap(-1.2, -2.0, 0.0)),
                (Z::H, cp(-0.6, 0.0)),
                (Z::I, c(-0.6)),
                (Z::J, ca(0.2, -0.6)),
            ],
        },
        CoefficientRow {
            key: 15.0,
            zones: &[
                (Z::F, cap(-0.9, -2.0, 0.2)),
                (Z::G, cap(-0.8, -1.5, 0.2)),
                (Z::H, cp(-0.3, 0.2)),
                (Z::I, cp(-0.4, 0.0)),
                (Z::J, cap(-1.0, -1.5, 0.0)),
            ],
        },
        CoefficientRow {
            key: 30.0,
            zones: &[
                (Z::F, cap(-0.5, -1.5, 0.7)),
                (Z::G, cap(-0.5, -1.5, 0.7)),
                (Z::H, cp(-0.2, 0.4)),
                (Z::I, cp(-0.4, 0.0)),
                (Z::J, cp(-0.5, 0.0)),
            ],
        },
        CoefficientRow {
            key: 45.0,
            zones: &[
                (Z::F, cp(0.0, 0.7)),
                (Z::G, cp(0.0, 0.7)),
                (Z::H, cp(0.0, 0.6)),
                (Z::I, cp(-0.2, 0.0)),
                (Z::J, cp(-0.3, 0.0)),
            ],
        },
        CoefficientRow {
            key: 60.0,
            zones: &[
                (Z::F, c(0.7)),
                (Z::G, c(0.7)),
                (Z::H, c(0.7)),
                (Z::I, c(-0.2)),
                (Z::J, c(-0.3)),
            ],
        },
        CoefficientRow {
            key: 75.0,
            zones: &[
                (Z::F, c(0.8)),
                (Z::G, c(0.8)),
                (Z::H, c(0.8)),
                (Z::I, c(-0.2)),
                (Z::J, c(-0.3)),
            ],
        },
    ],
};

/// Duo-pitch roofs, θ = 90°, keyed by pitch in [−45°, 75°].
pub static DUO_PITCH_90: CoefficientTable = CoefficientTable {
    name: "duo-pitch table θ = 90°",
    parameter: TableParameter::PitchAngle,
    out_of_range: RangePolicy::Reject,
    rows: &[
        CoefficientRow {
            key: -45.0,
            zones: &[
                (Z::F, ca(-1.4, -2.0)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-1.0, -1.3)),
                (Z::I, ca(-0.9, -1.2)),
            ],
        },
        CoefficientRow {
            key: -30.0,
            zones: &[
                (Z::F, ca(-1.5, -2.1)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-1.0, -1.3)),
                (Z::I, ca(-0.9, -1.2)),
            ],
        },
        CoefficientRow {
            key: -15.0,
            zones: &[
                (Z::F, ca(-1.9, -2.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-0.8, -1.2)),
                (Z::I, ca(-0.8, -1.2)),
            ],
        },
        CoefficientRow {
            key: -5.0,
            zones: &[
                (Z::F, ca(-1.8, -2.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-0.7, -1.2)),
                (Z::I, ca(-0.6, -1.2)),
            ],
        },
        CoefficientRow {
            key: 5.0,
            zones: &[
                (Z::F, ca(-1.6, -2.2)),
                (Z::G, ca(-1.3, -2.0)),
                (Z::H, ca(-0.7, -1.2)),
                (Z::I, c(-0.6)),
            ],
        },
        CoefficientRow {
            key: 15.0,
            zones: &[
                (Z::F, ca(-1.3, -2.0)),
                (Z::G, ca(-1.3, -2.0)),
                (Z::H, ca(-0.8, -1.2)),
                (Z::I, c(-0.5)),
            ],
        },
        CoefficientRow {
            key: 30.0,
            zones: &[
                (Z::F, ca(-1.1, -1.5)),
                (Z::G, ca(-1.4, -2.0)),
                (Z::H, ca(-0.8, -1.2)),
                (Z::I, c(-0.5)),
            ],
        },
        CoefficientRow {
            key: 45.0,
            zones: &[
                (Z::F, ca(-1.1, -1.5)),
                (Z::G, ca(-1.4, -2.0)),
                (Z::H, ca(-0.9, -1.2)),
                (Z::I, c(-0.5)),
            ],
        },
        CoefficientRow {
            key: 60.0,
            zones: &[
                (Z::F, ca(-1.1, -1.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-0.8, -1.0)),
                (Z::I, c(-0.5)),
            ],
        },
        CoefficientRow {
            key: 75.0,
            zones: &[
                (Z::F, ca(-1.1, -1.5)),
                (Z::G, ca(-1.2, -2.0)),
                (Z::H, ca(-0.8, -1.0)),
                (Z::I, c(-0.5)),
            ],
        },
    ],
};

// ============================================================================
// Hipped Roofs (Table 7.5)
// ============================================================================

/// Hipped roofs, θ = 0°, keyed by pitch in [5°, 75°].
pub static HIPPED: CoefficientTable = CoefficientTable {
    name: "hipped roof table",
    parameter: TableParameter::PitchAngle,
    out_of_range: RangePolicy::Reject,
    rows: &[
        CoefficientRow {
            key: 5.0,
            zones: &[
                (Z::F, cap(-1.7, -2.5, 0.0)),
                (Z::G, cap(-1.2, -2.0, 0.0)),
                (Z::H, cap(-0.6, -1.2, 0.0)),
                (Z::I, ca(-0.3, -0.6)),
                (Z::J, ca(-0.6, -1.2)),
                (Z::K, ca(-0.6, -1.2)),
                (Z::L, ca(-1.2, -2.0)),
                (Z::M, ca(-0.6, -1.2)),
            ],
        },
        CoefficientRow {
            key: 15.0,
            zones: &[
                (Z::F, cap(-0.9, -2.0, 0.2)),
                (Z::G, cap(-0.8, -1.5, 0.2)),
                (Z::H, cp(-0.3, 0.2)),
                (Z::I, c(-0.5)),
                (Z::J, ca(-1.0, -1.5)),
                (Z::K, ca(-1.2, -2.0)),
                (Z::L, ca(-1.4, -2.0)),
                (Z::M, ca(-0.6, -1.2)),
            ],
        },
        CoefficientRow {
            key: 30.0,
            zones: &[
                (Z::F, cap(-0.5, -1.5, 0.5)),
                (Z::G, cap(-0.5, -1.5, 0.7)),
                (Z::H, cp(-0.2, 0.4)),
                (Z::I, c(-0.4)),
                (Z::J, ca(-0.7, -1.2)),
                (Z::K, c(-0.5)),
                (Z::L, ca(-1.4, -2.0)),
                (Z::M, ca(-0.8, -1.2)),
            ],
        },
        CoefficientRow {
            key: 45.0,
            zones: &[
                (Z::F, cp(0.0, 0.7)),
                (Z::G, cp(0.0, 0.7)),
                (Z::H, cp(0.0, 0.6)),
                (Z::I, c(-0.3)),
                (Z::J, c(-0.6)),
                (Z::K, c(-0.3)),
                (Z::L, ca(-1.3, -2.0)),
                (Z::M, ca(-0.8, -1.2)),
            ],
        },
        CoefficientRow {
            key: 60.0,
            zones: &[
                (Z::F, c(0.7)),
                (Z::G, c(0.7)),
                (Z::H, c(0.7)),
                (Z::I, c(-0.3)),
                (Z::J, c(-0.6)),
                (Z::K, c(-0.3)),
                (Z::L, ca(-1.2, -2.0)),
                (Z::M, c(-0.4)),
            ],
        },
        CoefficientRow {
            key: 75.0,
            zones: &[
                (Z::F, c(0.8)),
                (Z::G, c(0.8)),
                (Z::H, c(0.8)),
                (Z::I, c(-0.3)),
                (Z::J, c(-0.6)),
                (Z::K, c(-0.3)),
                (Z::L, ca(-1.2, -2.0)),
                (Z::M, c(-0.4)),
            ],
        },
    ],
};
