// src/resolver/taint.rs

//! Unmet-dependency propagation

use super::graph::DepGraph;
use crate::package::{PkgId, PkgState};
use tracing::trace;

/// Taint every package that transitively depends on an initially tainted
/// one. Returns the number of packages tainted in total.
///
/// The taint flag doubles as the visited marker, so cycles in the
/// requirement graph terminate.
pub fn propagate(graph: &DepGraph, states: &mut [PkgState], initial: &[PkgId]) -> usize {
    let mut stack: Vec<PkgId> = Vec::with_capacity(initial.len());
    for &id in initial {
        states[id.index()].set_unmet_deps();
        stack.push(id);
    }

    while let Some(id) = stack.pop() {
        for &dependent in graph.revreqpkgs(id) {
            let st = &mut states[dependent.index()];
            if !st.has_unmet_deps() {
                trace!("  {} tainted through {}", dependent, id);
                st.set_unmet_deps();
                stack.push(dependent);
            }
        }
    }

    states.iter().filter(|s| s.has_unmet_deps()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::graph::EdgeFlags;

    fn id(i: usize) -> PkgId {
        PkgId::new(i)
    }

    #[test]
    fn test_propagates_through_cycle() {
        // 1 -> 0, 2 -> 1, 1 -> 2 (cycle), 3 independent
        let mut graph = DepGraph::new(4);
        graph.add_single(id(1), 0, EdgeFlags::NONE, id(0));
        graph.add_single(id(1), 1, EdgeFlags::NONE, id(2));
        graph.add_single(id(2), 0, EdgeFlags::NONE, id(1));

        let mut states = vec![PkgState::default(); 4];
        let n = propagate(&graph, &mut states, &[id(0)]);

        assert_eq!(n, 3);
        assert!(states[0].has_unmet_deps());
        assert!(states[1].has_unmet_deps());
        assert!(states[2].has_unmet_deps());
        assert!(!states[3].has_unmet_deps());
    }

    #[test]
    fn test_nothing_to_propagate() {
        let graph = DepGraph::new(2);
        let mut states = vec![PkgState::default(); 2];
        assert_eq!(propagate(&graph, &mut states, &[]), 0);
    }
}
