// src/resolver/graph.rs

//! Dependency graph storage
//!
//! Edges are kept per owning package, indexed by [`PkgId`]:
//! - `reqpkgs`: resolved requirement edges, sorted by primary target, at most
//!   one per (owner, primary target)
//! - `revreqpkgs`: packages depending on a package (reverse edges)
//! - `cnflpkgs`: resolved conflict/obsoletes edges, sorted by target
//!
//! The graph is rebuilt from scratch on every verification run.

use crate::capreq::Capreq;
use crate::package::{Package, PkgId};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::ops::BitOr;

/// Flags of a requirement or conflict edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EdgeFlags(u8);

impl EdgeFlags {
    pub const NONE: EdgeFlags = EdgeFlags(0);
    /// Target must be installed before the owner
    pub const PREREQ: EdgeFlags = EdgeFlags(1 << 0);
    /// Owner must be removed before the target
    pub const PREREQ_UN: EdgeFlags = EdgeFlags(1 << 1);
    pub const CONFLICT: EdgeFlags = EdgeFlags(1 << 2);
    pub const OBSOLETE: EdgeFlags = EdgeFlags(1 << 3);
    /// Requirement matched several packages
    pub const MULTI: EdgeFlags = EdgeFlags(1 << 4);

    /// Ordering flags carried by a requirement
    pub fn from_req(req: &Capreq) -> EdgeFlags {
        let mut flags = EdgeFlags::NONE;
        if req.is_prereq() {
            flags.insert(EdgeFlags::PREREQ);
        }
        if req.is_prereq_un() {
            flags.insert(EdgeFlags::PREREQ_UN);
        }
        flags
    }

    pub fn contains(self, other: EdgeFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: EdgeFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: EdgeFlags) {
        self.0 &= !other.0;
    }
}

impl BitOr for EdgeFlags {
    type Output = EdgeFlags;

    fn bitor(self, rhs: EdgeFlags) -> EdgeFlags {
        EdgeFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for EdgeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (EdgeFlags::PREREQ, "prereq"),
            (EdgeFlags::PREREQ_UN, "prereq-un"),
            (EdgeFlags::CONFLICT, "conflict"),
            (EdgeFlags::OBSOLETE, "obsolete"),
            (EdgeFlags::MULTI, "multi"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", set.join(","))
    }
}

/// Where a requirement edge points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReqTarget {
    Single(PkgId),
    /// Several providers matched; `primary` is the preferred one
    Multi {
        primary: PkgId,
        alternates: Vec<PkgId>,
    },
}

impl ReqTarget {
    pub fn primary(&self) -> PkgId {
        match self {
            ReqTarget::Single(id) => *id,
            ReqTarget::Multi { primary, .. } => *primary,
        }
    }

    pub fn alternates(&self) -> &[PkgId] {
        match self {
            ReqTarget::Single(_) => &[],
            ReqTarget::Multi { alternates, .. } => alternates,
        }
    }

    /// Primary followed by the alternates
    pub fn all(&self) -> impl Iterator<Item = PkgId> + '_ {
        std::iter::once(self.primary()).chain(self.alternates().iter().copied())
    }
}

/// A resolved requirement edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReqPkg {
    target: ReqTarget,
    /// Index of the first requirement resolved to this target
    req: usize,
    flags: EdgeFlags,
}

impl ReqPkg {
    pub fn target(&self) -> &ReqTarget {
        &self.target
    }

    pub fn primary(&self) -> PkgId {
        self.target.primary()
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    pub fn is_multi(&self) -> bool {
        self.flags.contains(EdgeFlags::MULTI)
    }

    pub fn is_prereq(&self) -> bool {
        self.flags.contains(EdgeFlags::PREREQ)
    }

    pub fn is_prereq_un(&self) -> bool {
        self.flags.contains(EdgeFlags::PREREQ_UN)
    }

    /// The owner's requirement behind this edge
    pub fn req<'a>(&self, owner: &'a Package) -> &'a Capreq {
        &owner.reqs()[self.req]
    }
}

/// A resolved conflict edge, owned by the declaring package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnflPkg {
    target: PkgId,
    cnfl: usize,
    flags: EdgeFlags,
}

impl CnflPkg {
    pub fn target(&self) -> PkgId {
        self.target
    }

    pub fn flags(&self) -> EdgeFlags {
        self.flags
    }

    pub fn is_obsolete(&self) -> bool {
        self.flags.contains(EdgeFlags::OBSOLETE)
    }

    /// The owner's conflict record behind this edge
    pub fn cnfl<'a>(&self, owner: &'a Package) -> &'a Capreq {
        &owner.cnfls()[self.cnfl]
    }
}

/// Per-run dependency graph over a package arena
#[derive(Debug, Clone, Default)]
pub struct DepGraph {
    reqpkgs: Vec<Vec<ReqPkg>>,
    revreqpkgs: Vec<Vec<PkgId>>,
    cnflpkgs: Vec<Vec<CnflPkg>>,
}

impl DepGraph {
    /// Empty graph over `npackages` packages
    pub fn new(npackages: usize) -> Self {
        Self {
            reqpkgs: vec![Vec::new(); npackages],
            revreqpkgs: vec![Vec::new(); npackages],
            cnflpkgs: vec![Vec::new(); npackages],
        }
    }

    pub fn len(&self) -> usize {
        self.reqpkgs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reqpkgs.is_empty()
    }

    fn check(&self, id: PkgId) {
        assert!(
            id.index() < self.reqpkgs.len(),
            "package {} outside of a graph of {} packages",
            id,
            self.reqpkgs.len()
        );
    }

    pub fn reqpkgs(&self, id: PkgId) -> &[ReqPkg] {
        &self.reqpkgs[id.index()]
    }

    pub fn revreqpkgs(&self, id: PkgId) -> &[PkgId] {
        &self.revreqpkgs[id.index()]
    }

    pub fn cnflpkgs(&self, id: PkgId) -> &[CnflPkg] {
        &self.cnflpkgs[id.index()]
    }

    /// Find the requirement edge of `owner` whose primary target is `target`
    pub fn find_reqpkg(&self, owner: PkgId, target: PkgId) -> Option<&ReqPkg> {
        let edges = &self.reqpkgs[owner.index()];
        edges
            .binary_search_by_key(&target, |e| e.primary())
            .ok()
            .map(|i| &edges[i])
    }

    fn add_revreq(&mut self, target: PkgId, owner: PkgId) {
        // owners are resolved in arena order, so a duplicate is always last
        let rev = &mut self.revreqpkgs[target.index()];
        if rev.last() != Some(&owner) {
            rev.push(owner);
        }
    }

    /// Record a requirement satisfied by exactly one package
    pub fn add_single(&mut self, owner: PkgId, req: usize, flags: EdgeFlags, target: PkgId) {
        self.check(owner);
        self.check(target);

        let edges = &mut self.reqpkgs[owner.index()];
        match edges.binary_search_by_key(&target, |e| e.primary()) {
            Ok(i) => edges[i].flags.insert(flags),
            Err(i) => edges.insert(
                i,
                ReqPkg {
                    target: ReqTarget::Single(target),
                    req,
                    flags,
                },
            ),
        }
        self.add_revreq(target, owner);
    }

    /// Record a requirement satisfied by several packages; `matches[0]` is
    /// the primary provider
    pub fn add_multi(&mut self, owner: PkgId, req: usize, flags: EdgeFlags, matches: &[PkgId]) {
        assert!(matches.len() > 1, "multi edge needs at least two matches");
        self.check(owner);
        matches.iter().for_each(|id| self.check(*id));

        let primary = matches[0];
        let alternates = &matches[1..];
        let flags = flags | EdgeFlags::MULTI;

        let edges = &mut self.reqpkgs[owner.index()];
        match edges.binary_search_by_key(&primary, |e| e.primary()) {
            Ok(i) => {
                let edge = &mut edges[i];
                let same = edge.target.alternates() == alternates;
                if !same {
                    edge.target = ReqTarget::Multi {
                        primary,
                        alternates: alternates.to_vec(),
                    };
                }
                edge.flags.insert(flags);
            }
            Err(i) => edges.insert(
                i,
                ReqPkg {
                    target: ReqTarget::Multi {
                        primary,
                        alternates: alternates.to_vec(),
                    },
                    req,
                    flags,
                },
            ),
        }

        for &target in matches {
            self.add_revreq(target, owner);
        }
    }

    /// Record a conflict edge, or add the obsolete flag to an existing one
    pub fn add_conflict(&mut self, owner: PkgId, cnfl: usize, obsolete: bool, target: PkgId) {
        self.check(owner);
        self.check(target);

        let edges = &mut self.cnflpkgs[owner.index()];
        match edges.binary_search_by_key(&target, |e| e.target) {
            Ok(i) => {
                if obsolete {
                    edges[i].flags.insert(EdgeFlags::OBSOLETE);
                }
            }
            Err(i) => {
                let mut flags = EdgeFlags::CONFLICT;
                if obsolete {
                    flags.insert(EdgeFlags::OBSOLETE);
                }
                edges.insert(
                    i,
                    CnflPkg {
                        target,
                        cnfl,
                        flags,
                    },
                );
            }
        }
    }

    /// All packages that break if `id` is removed: the transitive closure
    /// of reverse dependencies, sorted, not including `id` itself unless
    /// it sits on a cycle
    pub fn dependents_closure(&self, id: PkgId) -> Vec<PkgId> {
        let mut breaking = HashSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(id);

        while let Some(pkg) = queue.pop_front() {
            for &dependent in self.revreqpkgs(pkg) {
                if breaking.insert(dependent) {
                    queue.push_back(dependent);
                }
            }
        }

        let mut breaking: Vec<PkgId> = breaking.into_iter().collect();
        breaking.sort_unstable();
        breaking
    }

    /// Get statistics about the dependency graph
    pub fn stats(&self) -> GraphStats {
        let total_reqpkgs = self.reqpkgs.iter().map(|v| v.len()).sum();
        let multi_reqpkgs = self
            .reqpkgs
            .iter()
            .flat_map(|v| v.iter())
            .filter(|e| e.is_multi())
            .count();
        let total_cnflpkgs = self.cnflpkgs.iter().map(|v| v.len()).sum();
        let max_dependencies = self.reqpkgs.iter().map(|v| v.len()).max().unwrap_or(0);
        let max_dependents = self.revreqpkgs.iter().map(|v| v.len()).max().unwrap_or(0);

        GraphStats {
            total_packages: self.len(),
            total_reqpkgs,
            multi_reqpkgs,
            total_cnflpkgs,
            max_dependencies,
            max_dependents,
        }
    }
}

/// Statistics about the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_packages: usize,
    pub total_reqpkgs: usize,
    pub multi_reqpkgs: usize,
    pub total_cnflpkgs: usize,
    pub max_dependencies: usize,
    pub max_dependents: usize,
}
