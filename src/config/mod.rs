// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! YAML manifests declaring event types and extensions.

mod loader;

#[cfg(test)]
mod integration_tests;

pub use loader::{
    load_and_validate_manifest, load_manifest, DependencyConfig, EventTypeConfig,
    ExtensionConfig, ListenerConfig, Manifest,
};
