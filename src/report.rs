// src/report.rs

//! Verification reports

use serde::Serialize;
use std::fmt::Write as _;

use crate::error::Result;
use crate::pkgset::PkgSet;
use crate::resolver::{Diagnostics, Problem};

/// A conflict edge between two packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictEntry {
    pub package: String,
    pub conflicts_with: String,
    pub obsoletes: bool,
}

/// Summary of a verification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub packages: usize,
    pub error_count: usize,
    pub unmet: usize,
    pub diagnostics: Diagnostics,
    pub tainted: Vec<String>,
    pub obsoleted: Vec<String>,
    pub install_order: Vec<String>,
    pub prereq_loops: Vec<Vec<String>>,
    pub conflicts: Vec<ConflictEntry>,
    /// rpmlib violations and prerequisite loops
    pub problems: Vec<String>,
    pub file_conflicts: Vec<String>,
}

impl Report {
    /// Build a report from the last verification run of `ps`
    pub fn from_pkgset(ps: &PkgSet) -> Result<Self> {
        let name = |id: crate::PkgId| ps.package(id).id();
        let graph = ps.graph()?;
        let problems = ps.problems()?;

        let mut conflicts = Vec::new();
        for id in ps.ids() {
            for edge in graph.cnflpkgs(id) {
                conflicts.push(ConflictEntry {
                    package: name(id),
                    conflicts_with: name(edge.target()),
                    obsoletes: edge.is_obsolete(),
                });
            }
        }

        Ok(Report {
            packages: ps.len(),
            error_count: ps.error_count()?,
            unmet: ps.verification().map(|v| v.nunmet).unwrap_or(0),
            diagnostics: ps.diagnostics()?.clone(),
            tainted: ps.tainted().into_iter().map(name).collect(),
            obsoleted: ps.obsoleted().into_iter().map(name).collect(),
            install_order: ps.ordered()?.iter().map(|id| name(*id)).collect(),
            prereq_loops: ps
                .loops()?
                .iter()
                .map(|lp| lp.cycle.iter().map(|id| name(*id)).collect())
                .collect(),
            conflicts,
            problems: problems
                .iter()
                .filter(|p| p.is_error() && !matches!(p, Problem::Unmet { .. }))
                .map(|p| p.to_string())
                .collect(),
            file_conflicts: problems
                .iter()
                .filter(|p| !p.is_error())
                .map(|p| p.to_string())
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        if self.diagnostics.is_empty() {
            let _ = writeln!(out, "No unsatisfied dependencies detected -- OK");
        } else {
            let _ = writeln!(out, "Unsatisfied dependencies:");
            for (pkg, unmet) in &self.diagnostics {
                for u in unmet {
                    let _ = writeln!(out, "  {}: req {} ({})", pkg, u.req, u.kind);
                }
            }
        }

        if !self.tainted.is_empty() {
            let _ = writeln!(
                out,
                "{} packages cannot be installed: {}",
                self.tainted.len(),
                self.tainted.join(", ")
            );
        }

        for p in &self.problems {
            let _ = writeln!(out, "{}", p);
        }

        if !self.obsoleted.is_empty() {
            let _ = writeln!(out, "Obsoleted: {}", self.obsoleted.join(", "));
        }

        if !self.conflicts.is_empty() {
            let _ = writeln!(out, "Conflicts:");
            for c in &self.conflicts {
                let kind = if c.obsoletes { "obsoletes" } else { "conflicts with" };
                let _ = writeln!(out, "  {} {} {}", c.package, kind, c.conflicts_with);
            }
        }

        if !self.file_conflicts.is_empty() {
            let _ = writeln!(out, "File conflicts:");
            for fc in &self.file_conflicts {
                let _ = writeln!(out, "  {}", fc);
            }
        }

        let _ = writeln!(
            out,
            "{} packages, {} errors",
            self.packages, self.error_count
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capreq::Capreq;
    use crate::config::PkgSetConfig;
    use crate::package::Package;
    use crate::version::RpmVersion;

    fn pkg(name: &str, evr: &str) -> Package {
        Package::new(name, RpmVersion::parse(evr).unwrap())
    }

    fn report() -> Report {
        let mut ps = PkgSet::new(PkgSetConfig::default()).unwrap();
        ps.extend(vec![
            pkg("a", "1-1").requires(Capreq::new("libgone.so.1")),
            pkg("b", "1-1").requires(Capreq::new("a")),
            pkg("c", "2-1").obsoletes(Capreq::new("d")),
            pkg("d", "1-1"),
        ]);
        ps.setup().unwrap();
        Report::from_pkgset(&ps).unwrap()
    }

    #[test]
    fn test_report_contents() {
        let r = report();
        assert_eq!(r.packages, 4);
        assert_eq!(r.unmet, 1);
        assert_eq!(r.error_count, 3);
        assert_eq!(r.tainted, vec!["a-1-1", "b-1-1"]);
        assert_eq!(r.obsoleted, vec!["d-1-1"]);
        assert_eq!(r.install_order.len(), 4);
        assert_eq!(
            r.conflicts,
            vec![ConflictEntry {
                package: "c-2-1".to_string(),
                conflicts_with: "d-1-1".to_string(),
                obsoletes: true,
            }]
        );
    }

    #[test]
    fn test_report_json() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["error_count"], 3);
        assert_eq!(value["diagnostics"]["a-1-1"][0]["req"], "libgone.so.1");
        assert_eq!(value["diagnostics"]["a-1-1"][0]["kind"], "absent");
    }

    #[test]
    fn test_file_conflicts_are_warnings() {
        let config = PkgSetConfig {
            verify_file_conflicts: true,
            ..PkgSetConfig::default()
        };
        let mut ps = PkgSet::new(config).unwrap();
        ps.extend(vec![
            pkg("a", "1-1").file("/etc/shared.conf"),
            pkg("b", "1-1").file("/etc/shared.conf"),
        ]);
        ps.setup().unwrap();

        let r = Report::from_pkgset(&ps).unwrap();
        assert_eq!(r.error_count, 0);
        assert!(r.problems.is_empty());
        assert_eq!(r.file_conflicts.len(), 1);
        assert!(r.file_conflicts[0].contains("/etc/shared.conf"));
    }

    #[test]
    fn test_report_text() {
        let text = report().to_text();
        assert!(text.contains("a-1-1: req libgone.so.1 (absent)"));
        assert!(text.contains("c-2-1 obsoletes d-1-1"));
        assert!(text.ends_with("4 packages, 3 errors\n"));
    }
}
