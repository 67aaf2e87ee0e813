// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::borrow::Borrow;
use std::fmt::{self, Display};

/// Unique identifier of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct ExtensionId(String);

impl ExtensionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ExtensionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExtensionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ExtensionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether a missing dependency target is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DependencyKind {
    #[default]
    Required,
    /// Ignored when the target is not registered; ordered like a required
    /// dependency when it is.
    Optional,
}

/// One declared dependency of an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    target: ExtensionId,
    kind: DependencyKind,
}

impl Dependency {
    pub fn new(target: impl Into<ExtensionId>, kind: DependencyKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }

    pub fn required(target: impl Into<ExtensionId>) -> Self {
        Self::new(target, DependencyKind::Required)
    }

    pub fn optional(target: impl Into<ExtensionId>) -> Self {
        Self::new(target, DependencyKind::Optional)
    }

    pub fn target(&self) -> &ExtensionId {
        &self.target
    }

    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn is_optional(&self) -> bool {
        self.kind == DependencyKind::Optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_kind() {
        let required = Dependency::required("storage");
        let optional = Dependency::optional(String::from("metrics"));

        assert_eq!(required.target().as_str(), "storage");
        assert!(!required.is_optional());
        assert_eq!(optional.kind(), DependencyKind::Optional);
        assert!(optional.is_optional());
    }

    #[test]
    fn test_extension_id_deserializes_from_plain_string() {
        let id: ExtensionId = serde_yaml::from_str("economy").unwrap();
        assert_eq!(id, ExtensionId::from("economy"));
        assert_eq!(id.to_string(), "economy");
    }
}
