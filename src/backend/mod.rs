//! ZodiacFX Compiler Backend
//!
//! This module turns the evaluated top-level program into the two files the ZodiacFX firmware build consumes.
//!
//! The pipeline is:
//! 1. [`Program::try_build`] validates the `ZodiacfxSwitch` package and builds parser → pipeline → deparser
//! 2. [`Program::emit_c`] writes the `packet_in` routine
//! 3. [`Program::emit_h`] writes its prototype and the derived type declarations
//!
//! ## Module Organization
//!
//! - `program.rs` - The orchestrator: build sequencing and both emission procedures
//! - `phases.rs` - Contracts of the parser / pipeline / deparser translators
//! - `code_builder.rs` - Append-only C text buffer
//! - `target.rs` - Firmware-specific emission hooks
//! - `types.rs` - C declarations for program types
//! - `options.rs` - Compilation options
//! - `diagnostics.rs` / `errors.rs` - Reporting

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod code_builder;
pub mod diagnostics;
pub mod errors;
pub mod options;
pub mod phases;
pub mod program;
pub mod target;
pub mod types;

pub use code_builder::CodeBuilder;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use errors::{Artifact, BuildError, BuildWarning, EmitError, PhaseError};
pub use options::CompileOptions;
pub use phases::{ControlPhase, DeparserPhase, HeaderLayout, Headers, ParserPhase, PhaseFactory};
pub use program::{GeneratedArtifacts, Program, RoleBlock, resolve_role};
pub use target::{Target, ZodiacfxTarget};
pub use types::{CTypeFactory, EmittableType, TypeFactory};
