//! # Wind Load Equations
//!
//! Registry of every formula the engine evaluates, used for audit trails
//! and for generating `EQUATIONS.md`. The numeric implementations live next
//! to the stage that uses them ([`crate::environment`], [`crate::terrain`],
//! [`crate::coefficients`], [`crate::combination`]); this module only
//! describes them.
//!
//! ## Sign Conventions
//!
//! - **External pressure**: positive towards the surface
//! - **Suction**: negative
//! - **Internal pressure coefficient**: positive for internal overpressure
//!
//! ## References
//!
//! - EN 1991-1-4:2005+A1:2010 Eurocode 1: Actions on structures - Wind actions

pub mod registry;

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    ExplanationStep,
    TraceValue,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
};
