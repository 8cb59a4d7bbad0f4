#![forbid(unsafe_code)]
//! zfxc: ZodiacFX back-end for P4
//!
//! This crate takes the evaluated, type-checked top-level program produced by a P4 front-end and emits the two
//! files the ZodiacFX firmware build consumes: an implementation file holding the `packet_in` routine and a header
//! with its prototype and the derived type declarations.
//!
//! - [`ir`]: the front-end representation the back-end reads
//! - [`backend`]: the orchestrator, its phase contracts and the C emission machinery
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `backend` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: A malformed top-level package (a role bound to the wrong kind of block, or not bound at all)
//!   means the front-end broke its contract. That is a compiler bug, reported with `panic!("INVARIANT: ...")`, not a
//!   user diagnostic.

pub mod backend;
pub mod ir;
pub mod version;

pub use backend::{CodeBuilder, CompileOptions, GeneratedArtifacts, Program, ZodiacfxTarget};
pub use ir::{TopLevel, TypeMap};
