// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Generic directed graph.
//!
//! Nodes and successor lists keep insertion order so that traversals, and the
//! load orders derived from them, are deterministic.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::errors::GraphError;

/// A directed edge from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<N> {
    source: N,
    target: N,
}

impl<N> Edge<N> {
    pub fn new(source: N, target: N) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &N {
        &self.source
    }

    pub fn target(&self) -> &N {
        &self.target
    }

    /// The same edge pointing the other way.
    pub fn flip(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

/// Builder for [`DirectedGraph`]; self-loops are forbidden unless enabled.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder<N> {
    allow_self_loops: bool,
    _nodes: PhantomData<fn() -> N>,
}

impl<N> Default for GraphBuilder<N> {
    fn default() -> Self {
        Self {
            allow_self_loops: false,
            _nodes: PhantomData,
        }
    }
}

impl<N> GraphBuilder<N> {
    pub fn allow_self_loops(mut self, allow: bool) -> Self {
        self.allow_self_loops = allow;
        self
    }

    pub fn build(self) -> DirectedGraph<N> {
        DirectedGraph {
            nodes: Vec::new(),
            successors: HashMap::new(),
            predecessors: HashMap::new(),
            allow_self_loops: self.allow_self_loops,
        }
    }
}

/// Directed graph over cloneable, hashable nodes.
///
/// Purely structural: the graph knows nothing about what its nodes mean.
///
/// # Example
/// ```
/// use the_switchyard::graph::DirectedGraph;
///
/// let mut graph = DirectedGraph::new();
/// graph.put_edge("app", "storage").unwrap();
/// graph.put_edge("storage", "io").unwrap();
///
/// assert_eq!(graph.successors(&"app").unwrap(), &["storage"]);
/// assert_eq!(graph.predecessors(&"io").unwrap(), &["storage"]);
/// assert!(graph.put_edge("io", "io").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N> {
    nodes: Vec<N>,
    successors: HashMap<N, Vec<N>>,
    predecessors: HashMap<N, Vec<N>>,
    allow_self_loops: bool,
}

impl<N> Default for DirectedGraph<N> {
    fn default() -> Self {
        GraphBuilder::default().build()
    }
}

impl<N> DirectedGraph<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// Creates an empty graph that rejects self-loops.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> GraphBuilder<N> {
        GraphBuilder::default()
    }

    pub fn allows_self_loops(&self) -> bool {
        self.allow_self_loops
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// All edges, grouped by source in node insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<&N>> {
        self.nodes.iter().flat_map(move |source| {
            self.successors_of(source)
                .iter()
                .map(move |target| Edge::new(source, target))
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.successors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, node: &N) -> bool {
        self.successors.contains_key(node)
    }

    pub fn contains_edge(&self, source: &N, target: &N) -> bool {
        self.successors_of(source).contains(target)
    }

    /// Nodes reachable from `node` through one outgoing edge.
    pub fn successors(&self, node: &N) -> Result<&[N], GraphError> {
        self.require(node)?;
        Ok(self.successors_of(node))
    }

    /// Nodes with an edge pointing at `node`.
    pub fn predecessors(&self, node: &N) -> Result<&[N], GraphError> {
        self.require(node)?;
        Ok(self
            .predecessors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    /// Union of [`predecessors`](Self::predecessors) and [`successors`](Self::successors),
    /// without duplicates.
    pub fn adjacent_nodes(&self, node: &N) -> Result<Vec<&N>, GraphError> {
        let mut adjacent: Vec<&N> = Vec::new();
        for candidate in self.predecessors(node)?.iter().chain(self.successors(node)?) {
            if !adjacent.contains(&candidate) {
                adjacent.push(candidate);
            }
        }
        Ok(adjacent)
    }

    /// Adds `node` if absent. Returns `true` if the graph changed.
    pub fn add_node(&mut self, node: N) -> bool {
        if self.successors.contains_key(&node) {
            return false;
        }
        self.successors.insert(node.clone(), Vec::new());
        self.predecessors.insert(node.clone(), Vec::new());
        self.nodes.push(node);
        true
    }

    /// Removes `node` together with every edge touching it.
    pub fn remove_node(&mut self, node: &N) -> bool {
        let Some(outgoing) = self.successors.remove(node) else {
            return false;
        };
        let incoming = self.predecessors.remove(node).unwrap_or_default();

        for target in &outgoing {
            if let Some(preds) = self.predecessors.get_mut(target) {
                preds.retain(|n| n != node);
            }
        }
        for source in &incoming {
            if let Some(succs) = self.successors.get_mut(source) {
                succs.retain(|n| n != node);
            }
        }
        self.nodes.retain(|n| n != node);
        true
    }

    /// Adds the edge `source -> target`, inserting missing endpoints.
    ///
    /// Fails with [`GraphError::SelfLoop`] when `source == target` and the graph
    /// was not built with self-loops enabled.
    pub fn put_edge(&mut self, source: N, target: N) -> Result<bool, GraphError> {
        if !self.allow_self_loops && source == target {
            return Err(GraphError::SelfLoop {
                node: format!("{:?}", source),
            });
        }

        let mut modified = self.add_node(source.clone());
        modified |= self.add_node(target.clone());

        if self.contains_edge(&source, &target) {
            return Ok(modified);
        }
        self.successors
            .entry(source.clone())
            .or_default()
            .push(target.clone());
        self.predecessors.entry(target).or_default().push(source);
        Ok(true)
    }

    /// Removes the edge `source -> target`. Endpoints stay in the graph.
    pub fn remove_edge(&mut self, source: &N, target: &N) -> bool {
        let removed = match self.successors.get_mut(source) {
            Some(succs) => {
                let before = succs.len();
                succs.retain(|n| n != target);
                succs.len() != before
            }
            None => false,
        };
        if removed {
            if let Some(preds) = self.predecessors.get_mut(target) {
                preds.retain(|n| n != source);
            }
        }
        removed
    }

    /// [`put_edge`](Self::put_edge) taking an [`Edge`].
    pub fn put_edge_from(&mut self, edge: Edge<N>) -> Result<bool, GraphError> {
        self.put_edge(edge.source, edge.target)
    }

    /// [`remove_edge`](Self::remove_edge) taking an [`Edge`].
    pub fn remove_edge_from(&mut self, edge: &Edge<N>) -> bool {
        self.remove_edge(&edge.source, &edge.target)
    }

    pub(crate) fn successors_of(&self, node: &N) -> &[N] {
        self.successors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn require(&self, node: &N) -> Result<(), GraphError> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(GraphError::UnknownNode {
                node: format!("{:?}", node),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_edge_adds_missing_nodes() {
        let mut graph = DirectedGraph::new();
        assert!(graph.put_edge("a", "b").unwrap());

        assert_eq!(graph.nodes().copied().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(graph.contains_edge(&"a", &"b"));
        assert!(!graph.contains_edge(&"b", &"a"));
    }

    #[test]
    fn test_put_edge_twice_is_not_a_change() {
        let mut graph = DirectedGraph::new();
        graph.put_edge(1, 2).unwrap();
        assert!(!graph.put_edge(1, 2).unwrap());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_self_loops_forbidden_by_default() {
        let mut graph = DirectedGraph::new();
        let err = graph.put_edge("a", "a").unwrap_err();
        assert!(matches!(err, GraphError::SelfLoop { .. }));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_self_loops_allowed_when_enabled() {
        let mut graph = DirectedGraph::builder().allow_self_loops(true).build();
        assert!(graph.allows_self_loops());
        assert!(graph.put_edge("a", "a").unwrap());
        assert_eq!(graph.successors(&"a").unwrap(), &["a"]);
        assert_eq!(graph.predecessors(&"a").unwrap(), &["a"]);
    }

    #[test]
    fn test_neighbour_queries() {
        let mut graph = DirectedGraph::new();
        graph.put_edge("a", "b").unwrap();
        graph.put_edge("c", "b").unwrap();
        graph.put_edge("b", "d").unwrap();
        graph.put_edge("d", "b").unwrap();

        assert_eq!(graph.predecessors(&"b").unwrap(), &["a", "c", "d"]);
        assert_eq!(graph.successors(&"b").unwrap(), &["d"]);
        assert_eq!(graph.adjacent_nodes(&"b").unwrap(), vec![&"a", &"c", &"d"]);
    }

    #[test]
    fn test_queries_on_unknown_node_fail() {
        let graph: DirectedGraph<&str> = DirectedGraph::new();
        assert!(matches!(
            graph.successors(&"ghost"),
            Err(GraphError::UnknownNode { .. })
        ));
        assert!(graph.predecessors(&"ghost").is_err());
        assert!(graph.adjacent_nodes(&"ghost").is_err());
    }

    #[test]
    fn test_remove_node_removes_incident_edges() {
        let mut graph = DirectedGraph::new();
        graph.put_edge("a", "b").unwrap();
        graph.put_edge("b", "c").unwrap();
        graph.put_edge("a", "c").unwrap();

        assert!(graph.remove_node(&"b"));
        assert!(!graph.remove_node(&"b"));

        assert_eq!(graph.node_count(), 2);
        let edges: Vec<_> = graph.edges().collect();
        assert_eq!(edges, vec![Edge::new(&"a", &"c")]);
        assert_eq!(graph.predecessors(&"c").unwrap(), &["a"]);
    }

    #[test]
    fn test_remove_edge_keeps_nodes() {
        let mut graph = DirectedGraph::new();
        graph.put_edge("a", "b").unwrap();

        assert!(graph.remove_edge(&"a", &"b"));
        assert!(!graph.remove_edge(&"a", &"b"));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.contains_node(&"a"));
        assert!(graph.predecessors(&"b").unwrap().is_empty());
    }

    #[test]
    fn test_edge_flip() {
        let edge = Edge::new("a", "b").flip();
        assert_eq!(edge.source(), &"b");
        assert_eq!(edge.target(), &"a");
    }

    #[test]
    fn test_edge_values_round_trip_through_graph() {
        let mut graph = DirectedGraph::new();
        let edge = Edge::new("a", "b");

        assert!(graph.put_edge_from(edge).unwrap());
        assert!(graph.put_edge_from(edge.flip()).unwrap());
        assert_eq!(graph.edges().count(), 2);

        assert!(graph.remove_edge_from(&edge));
        assert!(!graph.remove_edge_from(&edge));
        assert!(graph.contains_edge(&"b", &"a"));

        let mut strict = DirectedGraph::new();
        assert!(strict.put_edge_from(Edge::new(1, 1)).is_err());
    }
}
