// src/resolver/lookup.rs

//! Requirement lookup and candidate filtering

use crate::capreq::Capreq;
use crate::index::Indexes;
use crate::package::{Package, PkgId};
use crate::platform::PlatformCaps;
use std::sync::Arc;
use tracing::{error, trace};

/// Outcome of looking a requirement up in the indexes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Nothing provides the name
    NotFound,
    /// Resolved. Zero candidates means satisfied without a package (rpmlib
    /// or built-in capability).
    Found(Vec<PkgId>),
}

/// A provider that is not the package manager claims an `rpmlib(...)` name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmlibViolation {
    pub provider: PkgId,
    pub capability: String,
}

/// Read-only view of everything a lookup needs
pub struct LookupContext<'a> {
    pub packages: &'a [Arc<Package>],
    pub indexes: &'a Indexes,
    pub platform: &'a dyn PlatformCaps,
    /// Name of the package manager's own package
    pub pm_package: &'a str,
    pub strict: bool,
}

impl<'a> LookupContext<'a> {
    fn pkg(&self, id: PkgId) -> &Package {
        &self.packages[id.index()]
    }

    /// Find the packages that may provide `req`, ignoring its version
    ///
    /// Integrity violations found on the way are appended to `violations`.
    pub fn lookup(&self, req: &Capreq, violations: &mut Vec<RpmlibViolation>) -> Lookup {
        let name = req.name();
        let mut found: Option<Vec<PkgId>> = None;

        if let Some(ids) = self.indexes.caps.lookup(name) {
            found = Some(ids.to_vec());
        } else if req.is_file() {
            let owners = self.indexes.files.lookup(name);
            if !owners.is_empty() {
                found = Some(owners);
            } else {
                let owners = self.indexes.files.dir_owners(name);
                if !owners.is_empty() {
                    trace!(" req {} --> directory owners", req);
                    found = Some(owners);
                }
            }
        }

        if req.is_rpmlib() {
            if let Some(ids) = found.take() {
                let mut valid = true;
                for id in ids {
                    let provider = self.pkg(id);
                    if provider.name() != self.pm_package {
                        error!("{}: provides rpmlib cap \"{}\"", provider.id(), name);
                        violations.push(RpmlibViolation {
                            provider: id,
                            capability: name.to_string(),
                        });
                        valid = false;
                    }
                }
                if valid {
                    found = Some(Vec::new());
                }
            }
        }

        match found {
            Some(ids) => Lookup::Found(ids),
            None if self.platform.provides_builtin(req) => {
                trace!(" req {} --> PM_CAP", req);
                Lookup::Found(Vec::new())
            }
            None => Lookup::NotFound,
        }
    }

    /// Keep candidates satisfying the version of `req`, sorted so the
    /// preferred provider comes first: descending by name, then EVR, ties
    /// kept in arena order
    pub fn filter_version(&self, req: &Capreq, candidates: &[PkgId]) -> Vec<PkgId> {
        let mut matches: Vec<PkgId> = if req.is_versioned() {
            candidates
                .iter()
                .copied()
                .filter(|id| self.pkg(*id).matches_req(req, self.strict))
                .collect()
        } else {
            candidates.to_vec()
        };

        if matches.len() > 1 {
            matches.sort_by(|a, b| self.pkg(*b).cmp_name_evr(self.pkg(*a)));
        }
        matches
    }
}

/// Drop `requirer` from its own candidate list
///
/// Returns `None` when the requirer is one of the candidates: a package
/// that provides what it requires satisfies the requirement itself, no
/// matter who else provides it.
pub fn exclude_self(requirer: PkgId, matches: &[PkgId]) -> Option<Vec<PkgId>> {
    if matches.contains(&requirer) {
        None
    } else {
        Some(matches.to_vec())
    }
}
