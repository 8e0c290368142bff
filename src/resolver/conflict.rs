// src/resolver/conflict.rs

//! Conflict and obsoletes resolution
//!
//! Conflicts are one-directional: the edge lives on the declaring package
//! and nothing is recorded on the target.

use super::graph::DepGraph;
use super::lookup::LookupContext;
use crate::capreq::Capreq;
use crate::package::{Package, PkgId, PkgState};
use tracing::{debug, trace};

/// Does declared conflict `cnfl` of `pkg` hit candidate `spkg`?
fn conflict_matches(pkg: &Package, cnfl: &Capreq, spkg: &Package, strict: bool) -> bool {
    // bastard conflicts are direct
    if cnfl.is_bastard() && pkg.name() != spkg.name() {
        return false;
    }

    if cnfl.is_versioned() && !spkg.matches_req(cnfl, strict) {
        return false;
    }

    // multilib
    if pkg.cmp_name_evr(spkg).is_eq() && !pkg.same_arch(spkg) {
        return false;
    }

    true
}

/// Resolve every declared conflict into `graph`; returns the number of
/// (conflict, package) matches
pub fn verify_conflicts(ctx: &LookupContext<'_>, graph: &mut DepGraph) -> usize {
    let mut nmatches = 0;

    for (i, pkg) in ctx.packages.iter().enumerate() {
        if pkg.cnfls().is_empty() {
            continue;
        }
        let owner = PkgId::new(i);
        trace!("{}. {}", i, pkg.id());

        for (j, cnfl) in pkg.cnfls().iter().enumerate() {
            let Some(candidates) = ctx.indexes.caps.lookup(cnfl.name()) else {
                trace!(" cnfl {} --> NOT FOUND", cnfl);
                continue;
            };

            let mut matched = Vec::new();
            for &cand in candidates {
                if cand == owner {
                    continue;
                }
                let spkg = &ctx.packages[cand.index()];
                if !conflict_matches(pkg, cnfl, spkg, ctx.strict) {
                    continue;
                }
                graph.add_conflict(owner, j, cnfl.is_obsoletes(), cand);
                matched.push(spkg.id());
            }

            if matched.is_empty() {
                trace!(" cnfl {} --> UNMATCHED", cnfl);
            } else {
                trace!(" cnfl {} --> {}", cnfl, matched.join(", "));
                nmatches += matched.len();
            }
        }
    }

    debug!("Conflicts resolved: {} matches", nmatches);
    nmatches
}

/// Flag every package obsoleted by a package that can be installed;
/// returns the number of packages flagged
pub fn mark_obsoleted(graph: &DepGraph, states: &mut [PkgState]) -> usize {
    let mut nobsoleted = 0;
    for i in 0..graph.len() {
        if states[i].has_unmet_deps() {
            continue;
        }
        for edge in graph.cnflpkgs(PkgId::new(i)) {
            if !edge.is_obsolete() {
                continue;
            }
            let st = &mut states[edge.target().index()];
            if !st.is_obsoleted() {
                st.set_obsoleted();
                nobsoleted += 1;
            }
        }
    }
    nobsoleted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capreq::CapreqFlags;
    use crate::index::Indexes;
    use crate::platform::RpmlibCaps;
    use crate::version::RpmVersion;
    use std::sync::Arc;

    fn pkg(name: &str, evr: &str) -> Package {
        Package::new(name, RpmVersion::parse(evr).unwrap())
    }

    fn run(packages: Vec<Package>) -> DepGraph {
        let packages: Vec<Arc<Package>> = packages.into_iter().map(Arc::new).collect();
        let indexes = Indexes::build(&packages, None);
        let platform = RpmlibCaps::stock();
        let ctx = LookupContext {
            packages: &packages,
            indexes: &indexes,
            platform: &platform,
            pm_package: "rpm",
            strict: true,
        };
        let mut graph = DepGraph::new(packages.len());
        verify_conflicts(&ctx, &mut graph);
        graph
    }

    #[test]
    fn test_versioned_conflict() {
        let graph = run(vec![
            pkg("c", "1-1").conflicts(Capreq::parse("d = 1.0").unwrap()),
            pkg("d", "1.0-1"),
            pkg("d", "2.0-1"),
        ]);
        let edges = graph.cnflpkgs(PkgId::new(0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target(), PkgId::new(1));
    }

    #[test]
    fn test_multilib_and_self_never_conflict() {
        let graph = run(vec![
            pkg("lib", "1-1").with_arch("x86_64").conflicts(Capreq::new("lib")),
            pkg("lib", "1-1").with_arch("i686"),
            pkg("lib", "0.9-1").with_arch("x86_64"),
        ]);
        let edges = graph.cnflpkgs(PkgId::new(0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target(), PkgId::new(2));
    }

    #[test]
    fn test_bastard_conflict_same_name_only() {
        let bastard = Capreq::new("libfoo").with_flags(CapreqFlags::BASTARD);
        let graph = run(vec![
            pkg("foo", "2-1").conflicts(bastard),
            pkg("foo", "1-1").provides(Capreq::new("libfoo")),
            pkg("bar", "1-1").provides(Capreq::new("libfoo")),
        ]);
        let edges = graph.cnflpkgs(PkgId::new(0));
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target(), PkgId::new(1));
    }

    #[test]
    fn test_obsoletes_merge_and_mark() {
        let graph = run(vec![
            pkg("new", "1-1")
                .conflicts(Capreq::new("old"))
                .obsoletes(Capreq::new("old")),
            pkg("old", "1-1"),
        ]);
        let edges = graph.cnflpkgs(PkgId::new(0));
        assert_eq!(edges.len(), 1);
        assert!(edges[0].is_obsolete());

        let mut states = vec![PkgState::default(); 2];
        assert_eq!(mark_obsoleted(&graph, &mut states), 1);
        assert!(states[1].is_obsoleted());
        assert!(!states[0].is_obsoleted());

        // a tainted obsoleter obsoletes nothing
        let mut states = vec![PkgState::default(); 2];
        states[0].set_unmet_deps();
        assert_eq!(mark_obsoleted(&graph, &mut states), 0);
    }
}
