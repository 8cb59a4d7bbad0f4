//! Error types for the back-end build and emission steps.
//!
//! - [`BuildWarning`]: suspicious but not disqualifying (the build continues)
//! - [`BuildError`]: the build stops and no artifact is produced
//! - [`PhaseError`]: a phase translator rejected its block
//! - [`EmitError`]: emission was requested from a program that did not build
//!
//! Internal invariant violations (the front-end handed over a malformed package) are not represented here: they are
//! compiler bugs and panic with an `INVARIANT:` message.

use miette::Diagnostic;
use thiserror::Error;
use zfx_core::Role;

/// Failure reported by a phase translator's build step.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
pub struct PhaseError {
    pub message: String,
}

impl PhaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error that stops the build.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("expected toplevel package {package} to have {expected} parameters, found {found}")]
    #[diagnostic(
        code(zfx::build::arity),
        help("the ZodiacFX architecture is `ZodiacfxSwitch(prs, swtch, deprs)`")
    )]
    PackageArity {
        package: String,
        expected: usize,
        found: usize,
    },

    #[error("{role} phase failed: {source}")]
    #[diagnostic(code(zfx::build::phase))]
    Phase { role: Role, source: PhaseError },
}

impl BuildError {
    pub fn phase(role: Role, source: PhaseError) -> Self {
        BuildError::Phase { role, source }
    }
}

/// Recoverable finding recorded while building.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildWarning {
    #[error("{found}: the main zodiacfx package should be called {expected}; are you using the wrong architecture?")]
    #[diagnostic(code(zfx::build::package_name), severity(Warning))]
    UnexpectedPackage { found: String, expected: &'static str },
}

/// Which generated file an emission step produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Implementation,
    Header,
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Artifact::Implementation => write!(f, "implementation"),
            Artifact::Header => write!(f, "header"),
        }
    }
}

/// Error during emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("cannot emit {0}: program has not been built successfully")]
    NotBuilt(Artifact),
}
