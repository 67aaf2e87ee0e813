// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // YAML manifests
pub mod errors;     // error handling
pub mod events;     // event bus
pub mod extensions; // extension registry + load order
pub mod graph;      // generic directed graph + topological sort
pub mod observability;
