// src/mark.rs

//! Selecting packages for installation
//!
//! Hand-marked packages pull in everything they need over requirement
//! edges. For a multi-match requirement the primary provider is taken
//! unless one of the alternates is already marked.

use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::error::Result;
use crate::package::PkgId;
use crate::pkgset::PkgSet;

/// Result of marking a selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkOutcome {
    /// Packages selected by the user
    pub hand_marked: Vec<PkgId>,
    /// Packages pulled in as dependencies, in discovery order
    pub dep_marked: Vec<PkgId>,
    /// Marked packages that cannot be installed
    pub tainted: Vec<PkgId>,
}

impl MarkOutcome {
    /// Everything marked, selection first
    pub fn all(&self) -> impl Iterator<Item = PkgId> + '_ {
        self.hand_marked.iter().chain(self.dep_marked.iter()).copied()
    }
}

/// Hand-mark `selection` and dep-mark its requirement closure
///
/// Previous marks are cleared first.
pub fn mark_with_deps(ps: &mut PkgSet, selection: &[PkgId]) -> Result<MarkOutcome> {
    let (packages, graph, states) = ps.split_mut()?;
    states.iter_mut().for_each(|st| st.unmark());

    let mut outcome = MarkOutcome::default();
    let mut queue = VecDeque::new();

    for &id in selection {
        let st = &mut states[id.index()];
        if st.is_hand_marked() {
            continue;
        }
        st.hand_mark();
        outcome.hand_marked.push(id);
        queue.push_back(id);
    }

    while let Some(id) = queue.pop_front() {
        if states[id.index()].has_unmet_deps() {
            warn!(
                "{}: cannot be installed, unsatisfied dependencies",
                packages[id.index()].id()
            );
            outcome.tainted.push(id);
        }

        for edge in graph.reqpkgs(id) {
            let target = edge.target();
            if target.all().any(|t| states[t.index()].is_marked()) {
                continue;
            }

            let primary = target.primary();
            states[primary.index()].dep_mark();
            outcome.dep_marked.push(primary);
            queue.push_back(primary);
        }
    }

    debug!(
        "Marked {} packages, {} as dependencies",
        outcome.hand_marked.len() + outcome.dep_marked.len(),
        outcome.dep_marked.len()
    );
    Ok(outcome)
}

/// Everything that breaks if `id` is removed
pub fn dependents_closure(ps: &PkgSet, id: PkgId) -> Result<Vec<PkgId>> {
    Ok(ps.graph()?.dependents_closure(id))
}

/// Currently marked packages, in arena order
pub fn marked(ps: &PkgSet) -> Vec<PkgId> {
    ps.ids().filter(|id| ps.state(*id).is_marked()).collect()
}
