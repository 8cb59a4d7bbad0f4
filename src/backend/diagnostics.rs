//! Diagnostics side channel for the back-end
//!
//! Build steps never print. They record into a [`Diagnostics`] sink, which also forwards every record to `tracing`,
//! and the caller decides how to render them.

use miette::Diagnostic as MietteDiagnostic;

use super::errors::{BuildError, BuildWarning};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code such as `zfx::build::arity`
    pub code: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn from_report(severity: Severity, report: &dyn MietteDiagnostic) -> Self {
        Self {
            severity,
            code: report.code().map(|c| c.to_string()),
            message: report.to_string(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}[{}]: {}", self.severity, code, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Collected diagnostics for one compilation run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recoverable finding.
    pub fn warning(&mut self, warning: &BuildWarning) {
        tracing::warn!(code = ?warning.code().map(|c| c.to_string()), "{}", warning);
        self.entries.push(Diagnostic::from_report(Severity::Warning, warning));
    }

    /// Record an error that stopped the build.
    pub fn error(&mut self, error: &BuildError) {
        tracing::error!(code = ?error.code().map(|c| c.to_string()), "{}", error);
        self.entries.push(Diagnostic::from_report(Severity::Error, error));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
