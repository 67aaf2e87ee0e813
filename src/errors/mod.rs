// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod graph;
mod handler;
mod manifest;
mod registry;
mod state;

pub use config::ConfigurationError;
pub use graph::GraphError;
pub use handler::{HandlerError, HandlerFailure};
pub use manifest::ManifestError;
pub use registry::RegistryError;
pub use state::StateError;
