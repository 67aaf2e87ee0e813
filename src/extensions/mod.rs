// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Extension declarations and dependency-first load ordering.

mod dependency;
mod registry;

pub use dependency::{Dependency, DependencyKind, ExtensionId};
pub use registry::ExtensionRegistry;
