// src/resolver/engine.rs

//! Verification pipeline
//!
//! One run resolves every requirement of every package into the
//! dependency graph, spreads the consequence of unmet requirements to
//! dependents, resolves conflicts and finally orders the set. Every
//! problem is recorded before returning; nothing stops at the first
//! failure.

use std::sync::Arc;
use tracing::{debug, info, trace, warn};

use super::cache::{CacheStats, Cached, ReqCache};
use super::conflict;
use super::graph::{DepGraph, EdgeFlags, GraphStats};
use super::lookup::{exclude_self, Lookup, LookupContext, RpmlibViolation};
use super::order::{install_order, uninstall_order, PkgOrder, PrereqLoop};
use super::plan::{Diagnostics, Problem, UnmetKind, UnmetReq};
use super::taint;
use crate::capreq::Capreq;
use crate::config::PkgSetConfig;
use crate::index::{FileConflict, Indexes};
use crate::package::{Package, PkgId, PkgState};
use crate::platform::PlatformCaps;

/// Everything a verification run derives from a package set
#[derive(Debug, Clone, Default)]
pub struct Verification {
    pub graph: DepGraph,
    pub diagnostics: Diagnostics,
    pub problems: Vec<Problem>,
    /// Unsatisfied requirements
    pub nunmet: usize,
    /// Packages that cannot be installed, directly or transitively
    pub ntainted: usize,
    pub nobsoleted: usize,
    pub install: PkgOrder,
    pub uninstall: PkgOrder,
    pub file_conflicts: Vec<FileConflict>,
    pub cache_stats: CacheStats,
}

impl Verification {
    /// Unmet requirements plus tainted packages plus prerequisite loops
    pub fn error_count(&self) -> usize {
        self.nunmet + self.ntainted + self.install.loops.len()
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }
}

/// Dependency resolver over one indexed package arena
pub struct Resolver<'a> {
    ctx: LookupContext<'a>,
    config: &'a PkgSetConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(
        packages: &'a [Arc<Package>],
        indexes: &'a Indexes,
        platform: &'a dyn PlatformCaps,
        config: &'a PkgSetConfig,
    ) -> Self {
        Self {
            ctx: LookupContext {
                packages,
                indexes,
                platform,
                pm_package: &config.pm_package,
                strict: config.strict,
            },
            config,
        }
    }

    fn pkg_id(&self, id: PkgId) -> String {
        self.ctx.packages[id.index()].id()
    }

    /// Lookup plus version filter for one requirement string
    fn resolve_uncached(&self, req: &Capreq, violations: &mut Vec<RpmlibViolation>) -> Cached {
        match self.ctx.lookup(req, violations) {
            Lookup::NotFound => Cached::NotFound,
            Lookup::Found(candidates) if candidates.is_empty() => Cached::Builtin,
            Lookup::Found(candidates) => {
                let matches = self.ctx.filter_version(req, &candidates);
                if matches.is_empty() {
                    Cached::Mismatch
                } else {
                    Cached::Matches(matches.into())
                }
            }
        }
    }

    /// Run the whole pipeline. `states` must hold one entry per package;
    /// marks survive, derived flags are recomputed.
    pub fn verify(&self, states: &mut [PkgState]) -> Verification {
        let n = self.ctx.packages.len();
        assert_eq!(states.len(), n, "package state table out of sync");
        states.iter_mut().for_each(PkgState::clear_derived);

        let mut run = Verification {
            graph: DepGraph::new(n),
            ..Verification::default()
        };

        let unmet_pkgs = self.verify_deps(&mut run);
        run.ntainted = taint::propagate(&run.graph, states, &unmet_pkgs);

        if run.nunmet == 0 {
            info!("No unsatisfied dependencies detected -- OK");
        } else {
            info!(
                "{} unsatisfied dependencies, {} packages cannot be installed",
                run.nunmet, run.ntainted
            );
        }

        if self.config.verify_conflicts {
            conflict::verify_conflicts(&self.ctx, &mut run.graph);
            run.nobsoleted = conflict::mark_obsoleted(&run.graph, states);
            if run.nobsoleted > 0 {
                info!("{} packages are obsoleted by others", run.nobsoleted);
            }
        }

        if self.config.verify_order {
            self.order(&mut run);
        } else {
            let arena: Vec<PkgId> = (0..n).map(PkgId::new).collect();
            run.install.order = arena.clone();
            run.uninstall.order = arena;
        }

        if self.config.verify_file_conflicts {
            self.file_conflicts(&mut run);
        }

        let stats = run.graph.stats();
        debug!(
            "Graph: {} packages, {} requirement edges ({} multi), {} conflict edges",
            stats.total_packages, stats.total_reqpkgs, stats.multi_reqpkgs, stats.total_cnflpkgs
        );
        run
    }

    /// Resolve all requirements into `run.graph`; returns the packages with
    /// an unmet requirement of their own
    fn verify_deps(&self, run: &mut Verification) -> Vec<PkgId> {
        let mut cache = ReqCache::new();
        let mut violations = Vec::new();
        let mut unmet_pkgs = Vec::new();

        debug!("Verifying dependencies...");
        for (i, pkg) in self.ctx.packages.iter().enumerate() {
            if pkg.reqs().is_empty() {
                continue;
            }
            let owner = PkgId::new(i);
            trace!("{}. {}", i + 1, pkg.id());

            let mut has_unmet = false;
            for (j, req) in pkg.reqs().iter().enumerate() {
                let cached = cache.get_or_insert_with(req.to_string(), || {
                    self.resolve_uncached(req, &mut violations)
                });

                let kind = match cached {
                    Cached::Builtin => continue,
                    Cached::Matches(matches) => {
                        let Some(matches) = exclude_self(owner, &matches) else {
                            trace!(" req {} --> SELF", req);
                            continue;
                        };
                        trace!(
                            " req {} --> {}",
                            req,
                            matches
                                .iter()
                                .map(|id| self.pkg_id(*id))
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                        let flags = EdgeFlags::from_req(req);
                        if matches.len() == 1 {
                            run.graph.add_single(owner, j, flags, matches[0]);
                        } else {
                            run.graph.add_multi(owner, j, flags, &matches);
                        }
                        continue;
                    }
                    Cached::NotFound => UnmetKind::Absent,
                    Cached::Mismatch => UnmetKind::VersionMismatch,
                };

                trace!(" req {} --> {}", req, kind);
                run.nunmet += 1;
                has_unmet = true;
                run.diagnostics
                    .entry(pkg.id())
                    .or_default()
                    .push(UnmetReq {
                        req: req.to_string(),
                        kind,
                    });
                run.problems.push(Problem::Unmet {
                    package: pkg.id(),
                    req: req.to_string(),
                    kind,
                });
            }

            if has_unmet {
                unmet_pkgs.push(owner);
            }
        }

        for v in violations {
            run.problems.push(Problem::RpmlibViolation {
                provider: self.pkg_id(v.provider),
                capability: v.capability,
            });
        }

        run.cache_stats = cache.stats();
        debug!(
            "Requirement cache: {} hits, {} misses, {} entries",
            run.cache_stats.hits, run.cache_stats.misses, run.cache_stats.entries
        );
        unmet_pkgs
    }

    fn loop_problem(&self, lp: &PrereqLoop) -> Problem {
        Problem::PrereqLoop {
            cycle: lp.cycle.iter().map(|id| self.pkg_id(*id)).collect(),
            broken: self.pkg_id(lp.broken),
        }
    }

    fn order(&self, run: &mut Verification) {
        run.install = install_order(&run.graph);
        for lp in &run.install.loops {
            let problem = self.loop_problem(lp);
            warn!("{}", problem);
            run.problems.push(problem);
        }
        info!(
            "Install order: {} packages, {} prerequisite loops",
            run.install.order.len(),
            run.install.loops.len()
        );

        run.uninstall = uninstall_order(&run.graph);
        for lp in &run.uninstall.loops {
            warn!("Uninstall {}", self.loop_problem(lp));
        }
    }

    fn file_conflicts(&self, run: &mut Verification) {
        run.file_conflicts = self.ctx.indexes.files.conflicts(self.ctx.packages);
        for fc in &run.file_conflicts {
            let problem = Problem::FileConflict {
                path: fc.path.clone(),
                packages: fc.owners.iter().map(|id| self.pkg_id(*id)).collect(),
            };
            warn!("File conflict: {}", problem);
            run.problems.push(problem);
        }
    }
}
