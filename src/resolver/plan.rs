// src/resolver/plan.rs

//! Verification result data structures
//!
//! Contains the diagnostics recorded by a verification run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Why a requirement is unsatisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmetKind {
    /// Nothing provides the capability
    Absent,
    /// Providers exist, none with a matching version
    VersionMismatch,
}

impl fmt::Display for UnmetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmetKind::Absent => write!(f, "absent"),
            UnmetKind::VersionMismatch => write!(f, "version mismatch"),
        }
    }
}

/// An unsatisfied requirement of one package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UnmetReq {
    /// Canonical requirement text
    pub req: String,
    pub kind: UnmetKind,
}

/// Package identity -> unsatisfied requirements, in requirement order
pub type Diagnostics = BTreeMap<String, Vec<UnmetReq>>;

/// A problem found by a verification run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A requirement with no acceptable provider
    Unmet {
        package: String,
        req: String,
        kind: UnmetKind,
    },
    /// A package other than the package manager provides `rpmlib(...)`
    RpmlibViolation { provider: String, capability: String },
    /// A cycle of install-time prerequisites; `broken` lost its edge
    PrereqLoop { cycle: Vec<String>, broken: String },
    /// A path installed by differently named packages
    FileConflict { path: String, packages: Vec<String> },
}

impl Problem {
    /// Errors make packages uninstallable or the order unreliable; file
    /// conflicts are only warnings
    pub fn is_error(&self) -> bool {
        !matches!(self, Problem::FileConflict { .. })
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Unmet { package, req, kind } => match kind {
                UnmetKind::Absent => write!(f, "{}: req {} not found", package, req),
                UnmetKind::VersionMismatch => {
                    write!(f, "{}: req {} version mismatch", package, req)
                }
            },
            Problem::RpmlibViolation {
                provider,
                capability,
            } => write!(f, "{}: provides rpmlib cap \"{}\"", provider, capability),
            Problem::PrereqLoop { cycle, broken } => write!(
                f,
                "PreReq loop: {} (edge from {} skipped)",
                cycle.join(" -> "),
                broken
            ),
            Problem::FileConflict { path, packages } => write!(
                f,
                "{} is owned by {}",
                path,
                packages.join(", ")
            ),
        }
    }
}
