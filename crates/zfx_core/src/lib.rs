//! Provide the canonical ZodiacFX architecture vocabulary for the zfxc back-end.
//!
//! Everything the generated C has to agree on lives here: the package and constructor parameter names of the
//! switch model, the names of the routine parameters and scratch locals, the parser labels, and the preamble macros.
//! The orchestrator and every phase translator read these constants instead of repeating string literals, so the
//! independently emitted fragments stay lexically consistent.
//!
//! ## Notes
//!
//! - This crate is pure: no IO, no global state, no compiler types.

pub mod conventions;
pub mod model;

pub use model::{BlockKind, Role};
