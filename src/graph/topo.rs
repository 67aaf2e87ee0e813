// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Cycle-checked topological ordering.
//!
//! Uses the "three colours" DFS: a node is unvisited (absent from the state
//! map), pending (on the current recursion path) or done. Meeting a pending
//! node again means the path has looped back on itself.
//!
//! Every node is emitted after all of its successors, so for an edge
//! `dependent -> dependency` the dependency comes first.
//!
//! **Time Complexity**: O(V + E)
//! **Space Complexity**: O(V) for the state map, path and call stack

use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use super::DirectedGraph;

/// A cycle found during [`DirectedGraph::topological_order`].
///
/// `cycle` starts at the first node found pending and ends with that same node,
/// e.g. `[b, c, d, b]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<N> {
    pub cycle: Vec<N>,
}

impl<N: Debug> Display for CycleError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<String> = self.cycle.iter().map(|n| format!("{:?}", n)).collect();
        write!(f, "cycle detected: {}", path.join(" -> "))
    }
}

impl<N: Debug> std::error::Error for CycleError<N> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Pending,
    Done,
}

impl<N> DirectedGraph<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// Orders all nodes so that each appears after its successors.
    ///
    /// Roots are visited in node insertion order and successors in edge
    /// insertion order, so the result is deterministic.
    ///
    /// # Example
    /// ```
    /// use the_switchyard::graph::DirectedGraph;
    ///
    /// let mut graph = DirectedGraph::new();
    /// graph.put_edge("a", "b").unwrap();
    /// graph.put_edge("b", "c").unwrap();
    /// assert_eq!(graph.topological_order().unwrap(), vec!["c", "b", "a"]);
    ///
    /// graph.put_edge("c", "a").unwrap();
    /// let err = graph.topological_order().unwrap_err();
    /// assert_eq!(err.cycle, vec!["a", "b", "c", "a"]);
    /// ```
    pub fn topological_order(&self) -> Result<Vec<N>, CycleError<N>> {
        let mut states: HashMap<&N, VisitState> = HashMap::with_capacity(self.node_count());
        let mut path: Vec<&N> = Vec::new();
        let mut order: Vec<N> = Vec::with_capacity(self.node_count());

        for node in self.nodes() {
            self.visit(node, &mut states, &mut path, &mut order)?;
        }

        Ok(order)
    }

    fn visit<'g>(
        &'g self,
        node: &'g N,
        states: &mut HashMap<&'g N, VisitState>,
        path: &mut Vec<&'g N>,
        order: &mut Vec<N>,
    ) -> Result<(), CycleError<N>> {
        match states.get(node) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::Pending) => {
                // Pending nodes are always on the path.
                let start = path.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<N> = path[start..].iter().map(|n| (*n).clone()).collect();
                cycle.push(node.clone());
                return Err(CycleError { cycle });
            }
            None => {}
        }

        states.insert(node, VisitState::Pending);
        path.push(node);

        for next in self.successors_of(node) {
            self.visit(next, states, path, order)?;
        }

        path.pop();
        states.insert(node, VisitState::Done);
        order.push(node.clone());
        Ok(())
    }
}
