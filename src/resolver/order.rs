// src/resolver/order.rs

//! Install and uninstall ordering over prerequisite edges
//!
//! Depth-first post-order emission with three colours. Reaching a gray
//! package closes a prerequisite loop: the loop is recorded and the edge
//! that closed it is skipped, so ordering always completes.

use super::graph::{DepGraph, ReqPkg};
use crate::package::PkgId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A cycle of prerequisite edges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrereqLoop {
    /// Packages on the loop; first and last are the same package
    pub cycle: Vec<PkgId>,
    /// Package whose edge closing the loop was skipped
    pub broken: PkgId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PkgOrder {
    pub order: Vec<PkgId>,
    pub loops: Vec<PrereqLoop>,
}

fn order_by<F>(graph: &DepGraph, select: F) -> PkgOrder
where
    F: Fn(&ReqPkg) -> bool,
{
    let n = graph.len();
    let mut color = vec![Color::White; n];
    let mut order = Vec::with_capacity(n);
    let mut loops = Vec::new();
    let mut stack: Vec<(PkgId, usize)> = Vec::new();

    for root in (0..n).map(PkgId::new) {
        if color[root.index()] != Color::White {
            continue;
        }
        color[root.index()] = Color::Gray;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let edges = graph.reqpkgs(node);
            if top.1 >= edges.len() {
                color[node.index()] = Color::Black;
                order.push(node);
                stack.pop();
                continue;
            }

            let edge = &edges[top.1];
            top.1 += 1;
            if !select(edge) {
                continue;
            }

            let target = edge.primary();
            match color[target.index()] {
                Color::White => {
                    color[target.index()] = Color::Gray;
                    stack.push((target, 0));
                }
                Color::Gray => {
                    let start = stack
                        .iter()
                        .position(|(id, _)| *id == target)
                        .unwrap_or(0);
                    let mut cycle: Vec<PkgId> = stack[start..].iter().map(|(id, _)| *id).collect();
                    cycle.push(target);
                    loops.push(PrereqLoop {
                        cycle,
                        broken: node,
                    });
                }
                Color::Black => {}
            }
        }
    }

    PkgOrder { order, loops }
}

/// Every package, each after the packages it prerequires at install time
pub fn install_order(graph: &DepGraph) -> PkgOrder {
    order_by(graph, |edge| edge.is_prereq())
}

/// Every package, each before the packages it prerequires at uninstall time
pub fn uninstall_order(graph: &DepGraph) -> PkgOrder {
    let mut ordering = order_by(graph, |edge| edge.is_prereq_un());
    ordering.order.reverse();
    ordering
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::graph::EdgeFlags;

    fn id(i: usize) -> PkgId {
        PkgId::new(i)
    }

    fn position(order: &[PkgId], pkg: PkgId) -> usize {
        order.iter().position(|p| *p == pkg).unwrap()
    }

    #[test]
    fn test_install_order_respects_prereqs() {
        // 0 pre-requires 2, 2 pre-requires 1; 3 plainly requires 0
        let mut graph = DepGraph::new(4);
        graph.add_single(id(0), 0, EdgeFlags::PREREQ, id(2));
        graph.add_single(id(2), 0, EdgeFlags::PREREQ, id(1));
        graph.add_single(id(3), 0, EdgeFlags::NONE, id(0));

        let ordering = install_order(&graph);
        assert_eq!(ordering.order.len(), 4);
        assert!(ordering.loops.is_empty());
        assert!(position(&ordering.order, id(1)) < position(&ordering.order, id(2)));
        assert!(position(&ordering.order, id(2)) < position(&ordering.order, id(0)));
    }

    #[test]
    fn test_loop_is_reported_and_broken() {
        let mut graph = DepGraph::new(3);
        graph.add_single(id(0), 0, EdgeFlags::PREREQ, id(1));
        graph.add_single(id(1), 0, EdgeFlags::PREREQ, id(2));
        graph.add_single(id(2), 0, EdgeFlags::PREREQ, id(0));

        let ordering = install_order(&graph);
        assert_eq!(ordering.order.len(), 3);
        assert_eq!(ordering.loops.len(), 1);
        assert_eq!(ordering.loops[0].cycle, vec![id(0), id(1), id(2), id(0)]);
        assert_eq!(ordering.loops[0].broken, id(2));
        assert_eq!(ordering.order, vec![id(2), id(1), id(0)]);
    }

    #[test]
    fn test_multi_edge_orders_on_primary() {
        let mut graph = DepGraph::new(3);
        graph.add_multi(id(0), 0, EdgeFlags::PREREQ, &[id(2), id(1)]);

        let ordering = install_order(&graph);
        assert!(position(&ordering.order, id(2)) < position(&ordering.order, id(0)));
    }

    #[test]
    fn test_uninstall_order() {
        // 1 needs 0 at uninstall: remove 1 first
        let mut graph = DepGraph::new(2);
        graph.add_single(id(1), 0, EdgeFlags::PREREQ_UN, id(0));
        graph.add_single(id(0), 0, EdgeFlags::PREREQ, id(1));

        let ordering = uninstall_order(&graph);
        assert_eq!(ordering.order, vec![id(1), id(0)]);
        assert!(ordering.loops.is_empty());

        let ordering = install_order(&graph);
        assert_eq!(ordering.order, vec![id(1), id(0)]);
    }
}
