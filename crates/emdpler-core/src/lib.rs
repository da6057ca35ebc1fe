//! Driver for the externally compiled `emdpler` electromagnetic-induction
//! forward solver.
//!
//! The solver itself is an opaque Fortran executable. This crate owns the
//! fixed-column record codec for its `Input.in` deck, the template assembly
//! for that deck, and the runner that invokes the executable in a scoped
//! temporary workspace and decodes the three fixed-name result tables it
//! writes.

pub mod codec;
pub mod deck;
pub mod domain;
pub mod runner;

pub use domain::{
    EmdplerError, EmdplerResult, FrequencySweep, InductionSweep, LayeredModel, SoundingRequest,
    SoundingResponse,
};
pub use runner::ForwardRunner;
