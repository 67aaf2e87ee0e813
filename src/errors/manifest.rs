// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

use super::ConfigurationError;

/// Errors from reading and validating a YAML manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid manifest: {0}")]
    Invalid(#[from] ConfigurationError),
}
