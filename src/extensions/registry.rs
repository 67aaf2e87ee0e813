// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Extension registry and dependency-first load ordering.
//!
//! The registry only records declarations and computes an order; invoking
//! lifecycle hooks in that order is the host's job.

use std::collections::HashMap;

use crate::errors::{RegistryError, StateError};
use crate::extensions::{Dependency, ExtensionId};
use crate::graph::DirectedGraph;
use crate::observability::messages::registry::{
    CyclicDependencyDetected, ExtensionRegistered, ExtensionReplaced, LoadOrderResolved,
    MissingDependency, OptionalDependencySkipped,
};
use crate::observability::messages::StructuredLog;

#[derive(Debug, Clone)]
struct Declaration {
    id: ExtensionId,
    dependencies: Vec<Dependency>,
}

/// Collects extension declarations and resolves a safe load order.
///
/// # Example
///
/// ```
/// use the_switchyard::extensions::{Dependency, ExtensionRegistry};
///
/// let mut registry = ExtensionRegistry::new();
/// registry.register("economy", [Dependency::required("storage")])?;
/// registry.register("storage", [])?;
/// registry.register("shops", [
///     Dependency::required("economy"),
///     Dependency::optional("metrics"),
/// ])?;
///
/// let order = registry.load_order()?;
/// let names: Vec<&str> = order.iter().map(|id| id.as_str()).collect();
/// assert_eq!(names, ["storage", "economy", "shops"]);
/// # Ok::<(), the_switchyard::errors::RegistryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    declarations: Vec<Declaration>,
    index: HashMap<ExtensionId, usize>,
    sealed: bool,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the declaration of `id`.
    ///
    /// Registering an id again replaces its dependencies but keeps its original
    /// registration position.
    ///
    /// # Errors
    ///
    /// [`StateError::RegistrySealed`] once [`load_order`](Self::load_order) has succeeded.
    pub fn register(
        &mut self,
        id: impl Into<ExtensionId>,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(StateError::RegistrySealed.into());
        }

        let declaration = Declaration {
            id: id.into(),
            dependencies: dependencies.into_iter().collect(),
        };

        ExtensionRegistered {
            extension_id: declaration.id.as_str(),
            dependency_count: declaration.dependencies.len(),
        }
        .log();

        match self.index.get(&declaration.id) {
            Some(&position) => {
                ExtensionReplaced {
                    extension_id: declaration.id.as_str(),
                }
                .log();
                self.declarations[position] = declaration;
            }
            None => {
                self.index
                    .insert(declaration.id.clone(), self.declarations.len());
                self.declarations.push(declaration);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// True once a load order has been computed.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Registered ids, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &ExtensionId> {
        self.declarations.iter().map(|declaration| &declaration.id)
    }

    /// Declared dependencies of `id`, or `None` if it is not registered.
    pub fn dependencies_of(&self, id: &str) -> Option<&[Dependency]> {
        self.index
            .get(id)
            .map(|&position| self.declarations[position].dependencies.as_slice())
    }

    /// Builds the dependency graph: one node per extension in registration
    /// order and an edge `extension -> dependency` per resolvable dependency.
    ///
    /// Every required dependency is checked before the first edge is inserted.
    /// Self-dependencies become self-loops and are reported as cycles by
    /// [`load_order`](Self::load_order).
    pub fn dependency_graph(&self) -> Result<DirectedGraph<ExtensionId>, RegistryError> {
        for declaration in &self.declarations {
            for dependency in &declaration.dependencies {
                if dependency.is_optional() || self.contains(dependency.target().as_str()) {
                    continue;
                }
                MissingDependency {
                    extension_id: declaration.id.as_str(),
                    dependency: dependency.target().as_str(),
                }
                .log();
                return Err(RegistryError::MissingDependency {
                    extension: declaration.id.to_string(),
                    dependency: dependency.target().to_string(),
                });
            }
        }

        let mut graph = DirectedGraph::builder().allow_self_loops(true).build();
        for declaration in &self.declarations {
            graph.add_node(declaration.id.clone());
        }
        for declaration in &self.declarations {
            for dependency in &declaration.dependencies {
                if !self.contains(dependency.target().as_str()) {
                    OptionalDependencySkipped {
                        extension_id: declaration.id.as_str(),
                        dependency: dependency.target().as_str(),
                    }
                    .log();
                    continue;
                }
                graph.put_edge(declaration.id.clone(), dependency.target().clone())?;
            }
        }
        Ok(graph)
    }

    /// Computes a dependency-first load order and seals the registry.
    ///
    /// Without any dependency edges the order is the registration order.
    /// Otherwise nodes are visited depth-first in registration order and each
    /// extension follows everything it depends on. Nothing is sealed on failure.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::MissingDependency`] - a required dependency is not registered
    /// * [`RegistryError::CircularDependency`] - dependencies form a cycle; the
    ///   path starts and ends at the same extension
    /// * [`RegistryError::State`] - called after a previous success
    pub fn load_order(&mut self) -> Result<Vec<ExtensionId>, RegistryError> {
        if self.sealed {
            return Err(StateError::RegistrySealed.into());
        }

        let graph = self.dependency_graph()?;
        let order = if graph.edge_count() == 0 {
            self.ids().cloned().collect()
        } else {
            graph.topological_order().map_err(|error| {
                let cycle: Vec<&str> = error.cycle.iter().map(ExtensionId::as_str).collect();
                CyclicDependencyDetected { cycle: &cycle }.log();
                RegistryError::CircularDependency {
                    cycle: error.cycle.iter().map(ToString::to_string).collect(),
                }
            })?
        };

        let names: Vec<&str> = order.iter().map(ExtensionId::as_str).collect();
        LoadOrderResolved {
            order: &names,
            edge_count: graph.edge_count(),
        }
        .log();

        self.sealed = true;
        Ok(order)
    }
}
