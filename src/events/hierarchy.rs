// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Explicit ancestry table for event types.
//!
//! A subscription registered for `T` receives every event whose concrete type
//! is `T` or has `T` among its ancestors. Types may have several parents.
//! The table is validated once at build time (known parents, no duplicates,
//! no cycles) and is immutable afterwards, so lineages are precomputed.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::ConfigurationError;
use crate::events::EventType;
use crate::graph::DirectedGraph;

/// Immutable parent-pointer table for event types.
///
/// ```
/// use the_switchyard::events::{EventHierarchy, EventType};
///
/// const SERVER: EventType = EventType::new("server");
/// const PLAYER: EventType = EventType::new("player");
/// const CHAT: EventType = EventType::new("player.chat");
///
/// let hierarchy = EventHierarchy::builder()
///     .root(SERVER)
///     .declare(PLAYER, [SERVER])
///     .declare(CHAT, [PLAYER])
///     .build()
///     .unwrap();
///
/// assert!(hierarchy.is_assignable(&SERVER, &CHAT));
/// assert!(!hierarchy.is_assignable(&CHAT, &SERVER));
/// assert_eq!(hierarchy.lineage(&CHAT), vec![CHAT, PLAYER, SERVER]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventHierarchy {
    declared: Vec<EventType>,
    parents: HashMap<EventType, Vec<EventType>>,
    lineages: HashMap<EventType, Vec<EventType>>,
}

impl EventHierarchy {
    pub fn builder() -> EventHierarchyBuilder {
        EventHierarchyBuilder::default()
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.parents.contains_key(event_type)
    }

    /// Declared types, in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &EventType> {
        self.declared.iter()
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Direct parents of `event_type`; empty for roots and undeclared types.
    pub fn parents(&self, event_type: &EventType) -> &[EventType] {
        self.parents
            .get(event_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `event_type` followed by all of its ancestors, nearest first, without duplicates.
    ///
    /// An undeclared type has only itself as lineage.
    pub fn lineage(&self, event_type: &EventType) -> Vec<EventType> {
        self.lineages
            .get(event_type)
            .cloned()
            .unwrap_or_else(|| vec![event_type.clone()])
    }

    /// True iff an event of type `concrete` is delivered to registrations for `registered`.
    pub fn is_assignable(&self, registered: &EventType, concrete: &EventType) -> bool {
        registered == concrete
            || self
                .lineages
                .get(concrete)
                .is_some_and(|lineage| lineage.contains(registered))
    }
}

/// Collects declarations for an [`EventHierarchy`]; parents may be declared in any order.
#[derive(Debug, Clone, Default)]
pub struct EventHierarchyBuilder {
    declarations: Vec<(EventType, Vec<EventType>)>,
}

impl EventHierarchyBuilder {
    pub fn declare(
        mut self,
        event_type: EventType,
        parents: impl IntoIterator<Item = EventType>,
    ) -> Self {
        self.declarations
            .push((event_type, parents.into_iter().collect()));
        self
    }

    /// Declares a type without parents.
    pub fn root(self, event_type: EventType) -> Self {
        self.declare(event_type, Vec::new())
    }

    pub fn build(self) -> Result<EventHierarchy, ConfigurationError> {
        let mut parents: HashMap<EventType, Vec<EventType>> = HashMap::new();
        let mut declared = Vec::with_capacity(self.declarations.len());

        for (event_type, event_parents) in self.declarations {
            if parents.contains_key(&event_type) {
                return Err(ConfigurationError::DuplicateEventType {
                    event_type: event_type.to_string(),
                });
            }
            declared.push(event_type.clone());
            parents.insert(event_type, event_parents);
        }

        // Edges point child -> parent. Self-parenting surfaces as a self-loop error.
        let mut graph: DirectedGraph<EventType> = DirectedGraph::new();
        for event_type in &declared {
            graph.add_node(event_type.clone());
        }
        for event_type in &declared {
            for parent in &parents[event_type] {
                if !parents.contains_key(parent) {
                    return Err(ConfigurationError::UnknownParent {
                        event_type: event_type.to_string(),
                        parent: parent.to_string(),
                    });
                }
                graph
                    .put_edge(event_type.clone(), parent.clone())
                    .map_err(|_| ConfigurationError::CyclicHierarchy {
                        cycle: vec![event_type.to_string(), parent.to_string()],
                    })?;
            }
        }
        graph
            .topological_order()
            .map_err(|err| ConfigurationError::CyclicHierarchy {
                cycle: err.cycle.iter().map(ToString::to_string).collect(),
            })?;

        let lineages = declared
            .iter()
            .map(|event_type| (event_type.clone(), compute_lineage(event_type, &parents)))
            .collect();

        Ok(EventHierarchy {
            declared,
            parents,
            lineages,
        })
    }
}

/// Breadth-first walk up the parent pointers.
fn compute_lineage(
    event_type: &EventType,
    parents: &HashMap<EventType, Vec<EventType>>,
) -> Vec<EventType> {
    let mut lineage = vec![event_type.clone()];
    let mut seen: HashSet<&EventType> = HashSet::from([event_type]);
    let mut queue: VecDeque<&EventType> = VecDeque::from([event_type]);

    while let Some(current) = queue.pop_front() {
        for parent in parents.get(current).into_iter().flatten() {
            if seen.insert(parent) {
                lineage.push(parent.clone());
                queue.push_back(parent);
            }
        }
    }
    lineage
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: EventType = EventType::new("root");
    const LEFT: EventType = EventType::new("left");
    const RIGHT: EventType = EventType::new("right");
    const LEAF: EventType = EventType::new("leaf");

    fn diamond() -> EventHierarchy {
        EventHierarchy::builder()
            .declare(LEAF, [LEFT, RIGHT])
            .declare(LEFT, [ROOT])
            .declare(RIGHT, [ROOT])
            .root(ROOT)
            .build()
            .unwrap()
    }

    #[test]
    fn test_lineage_is_transitive_and_deduplicated() {
        let hierarchy = diamond();
        assert_eq!(hierarchy.lineage(&LEAF), vec![LEAF, LEFT, RIGHT, ROOT]);
        assert_eq!(hierarchy.lineage(&ROOT), vec![ROOT]);
    }

    #[test]
    fn test_is_assignable() {
        let hierarchy = diamond();
        assert!(hierarchy.is_assignable(&ROOT, &LEAF));
        assert!(hierarchy.is_assignable(&RIGHT, &LEAF));
        assert!(hierarchy.is_assignable(&LEAF, &LEAF));
        assert!(!hierarchy.is_assignable(&LEFT, &RIGHT));
        assert!(!hierarchy.is_assignable(&LEAF, &ROOT));
    }

    #[test]
    fn test_undeclared_type_has_only_itself() {
        let hierarchy = diamond();
        let stray = EventType::new("stray");
        assert!(!hierarchy.contains(&stray));
        assert_eq!(hierarchy.lineage(&stray), vec![stray.clone()]);
        assert!(hierarchy.parents(&stray).is_empty());
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let hierarchy = diamond();
        let types: Vec<_> = hierarchy.types().cloned().collect();
        assert_eq!(types, vec![LEAF, LEFT, RIGHT, ROOT]);
        assert_eq!(hierarchy.len(), 4);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let err = EventHierarchy::builder()
            .declare(LEAF, [ROOT])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownParent {
                event_type: "leaf".to_string(),
                parent: "root".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = EventHierarchy::builder()
            .root(ROOT)
            .root(ROOT)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateEventType { .. }));
    }

    #[test]
    fn test_cycles_rejected() {
        let err = EventHierarchy::builder()
            .declare(LEFT, [RIGHT])
            .declare(RIGHT, [LEFT])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::CyclicHierarchy {
                cycle: vec!["left".to_string(), "right".to_string(), "left".to_string()],
            }
        );

        let err = EventHierarchy::builder()
            .declare(ROOT, [ROOT])
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::CyclicHierarchy { .. }));
    }
}
