// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A one-time setup step was requested again.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// `load_order` already succeeded; the registry no longer accepts changes.
    #[error("extension registry is sealed: the load order has already been computed")]
    RegistrySealed,
}
