// src/resolver/mod.rs

//! Dependency resolution, conflict detection and ordering
//!
//! This module turns an indexed package arena into a dependency graph:
//! requirement lookup with memoization, edge construction with multi-match
//! fan-out, unmet-dependency propagation, conflict resolution and
//! prerequisite ordering.

mod cache;
mod conflict;
mod engine;
mod graph;
mod lookup;
mod order;
mod plan;
mod taint;

pub use cache::{CacheStats, Cached, ReqCache};
pub use conflict::{mark_obsoleted, verify_conflicts};
pub use engine::{Resolver, Verification};
pub use graph::{CnflPkg, DepGraph, EdgeFlags, GraphStats, ReqPkg, ReqTarget};
pub use lookup::{exclude_self, Lookup, LookupContext, RpmlibViolation};
pub use order::{install_order, uninstall_order, PkgOrder, PrereqLoop};
pub use plan::{Diagnostics, Problem, UnmetKind, UnmetReq};
pub use taint::propagate as propagate_taint;
