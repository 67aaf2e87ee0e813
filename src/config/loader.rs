// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{ConfigurationError, ManifestError, RegistryError};
use crate::events::{EventHierarchy, EventType, Priority, Subscriber, SubscriberBuilder};
use crate::extensions::{Dependency, ExtensionId, ExtensionRegistry};

/// Declarative description of an event hierarchy and a set of extensions.
///
/// A manifest is plain data: [`hierarchy`](Manifest::hierarchy) and
/// [`registry`](Manifest::registry) turn it into the runtime structures.
///
/// # Fields
/// * `event_types` - Declared event types with their parents, in declaration order
/// * `extensions` - Extension declarations, in registration order
///
/// # Example
/// ```yaml
/// event_types:
///   - name: server
///   - name: player
///     parents: [server]
///   - name: player.chat
///     parents: [player]
/// extensions:
///   - id: storage
///   - id: economy
///     depends_on: [storage]
///   - id: shops
///     depends_on:
///       - economy
///       - id: metrics
///         optional: true
///     listens:
///       - event: player.chat
///         priority: high
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub event_types: Vec<EventTypeConfig>,
    #[serde(default)]
    pub extensions: Vec<ExtensionConfig>,
}

/// One declared event type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventTypeConfig {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// One extension declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionConfig {
    pub id: ExtensionId,
    #[serde(default)]
    pub depends_on: Vec<DependencyConfig>,
    #[serde(default)]
    pub listens: Vec<ListenerConfig>,
}

/// A dependency, either as a bare id (required) or as a map with an
/// `optional` flag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DependencyConfig {
    Required(ExtensionId),
    Detailed {
        id: ExtensionId,
        #[serde(default)]
        optional: bool,
    },
}

impl DependencyConfig {
    pub fn to_dependency(&self) -> Dependency {
        match self {
            DependencyConfig::Required(id) => Dependency::required(id.clone()),
            DependencyConfig::Detailed { id, optional: true } => Dependency::optional(id.clone()),
            DependencyConfig::Detailed { id, optional: false } => Dependency::required(id.clone()),
        }
    }
}

/// Subscription rules for one event type an extension listens to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListenerConfig {
    pub event: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub accepts_cancelled: bool,
    /// Invocation limit; absent or `0` means unlimited.
    #[serde(default)]
    pub expire_after: Option<u32>,
}

impl ListenerConfig {
    pub fn event_type(&self) -> EventType {
        EventType::owned(self.event.clone())
    }

    /// A subscriber builder carrying these rules; the caller supplies the handler.
    pub fn subscriber(&self, name: &str) -> SubscriberBuilder {
        Subscriber::builder()
            .name(name)
            .event_type(self.event_type())
            .priority(self.priority)
            .accepts_cancelled(self.accepts_cancelled)
            .expire_after(self.expire_after.unwrap_or(0))
    }
}

impl Manifest {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Builds the event hierarchy declared by `event_types`.
    pub fn hierarchy(&self) -> Result<EventHierarchy, ConfigurationError> {
        self.event_types
            .iter()
            .fold(EventHierarchy::builder(), |builder, declared| {
                builder.declare(
                    EventType::owned(declared.name.clone()),
                    declared.parents.iter().cloned().map(EventType::owned),
                )
            })
            .build()
    }

    /// Registers every extension, in manifest order, into a fresh registry.
    pub fn registry(&self) -> Result<ExtensionRegistry, RegistryError> {
        let mut registry = ExtensionRegistry::new();
        for extension in &self.extensions {
            registry.register(
                extension.id.clone(),
                extension.depends_on.iter().map(DependencyConfig::to_dependency),
            )?;
        }
        Ok(registry)
    }

    /// Checks the hierarchy, extension id uniqueness and that every listener
    /// refers to a declared event type.
    ///
    /// Dependency resolution is left to [`ExtensionRegistry::load_order`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let hierarchy = self.hierarchy()?;

        let mut seen = HashSet::new();
        for extension in &self.extensions {
            if !seen.insert(&extension.id) {
                return Err(ConfigurationError::DuplicateExtension {
                    id: extension.id.to_string(),
                });
            }
            for listener in &extension.listens {
                if !hierarchy.contains(&listener.event_type()) {
                    return Err(ConfigurationError::UndeclaredEventType {
                        event_type: listener.event.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Load a manifest from a YAML file.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Manifest::from_yaml_str(&content)
}

/// Load a manifest from a YAML file and validate it.
pub fn load_and_validate_manifest<P: AsRef<Path>>(path: P) -> Result<Manifest, ManifestError> {
    let manifest = load_manifest(path)?;
    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_manifest() {
        let yaml = r#"
event_types:
  - name: server
  - name: player
    parents: [server]
extensions:
  - id: storage
  - id: economy
    depends_on: [storage]
    listens:
      - event: player
"#;
        let manifest = Manifest::from_yaml_str(yaml).unwrap();

        assert_eq!(manifest.event_types.len(), 2);
        assert!(manifest.event_types[0].parents.is_empty());
        assert_eq!(manifest.event_types[1].parents, vec!["server"]);
        assert_eq!(manifest.extensions[1].id, ExtensionId::from("economy"));

        let listener = &manifest.extensions[1].listens[0];
        assert_eq!(listener.priority, Priority::Normal);
        assert!(!listener.accepts_cancelled);
        assert_eq!(listener.expire_after, None);
    }

    #[test]
    fn parse_dependency_forms() {
        let yaml = r#"
extensions:
  - id: shops
    depends_on:
      - economy
      - id: metrics
        optional: true
      - id: storage
"#;
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        let dependencies: Vec<Dependency> = manifest.extensions[0]
            .depends_on
            .iter()
            .map(DependencyConfig::to_dependency)
            .collect();

        assert_eq!(
            dependencies,
            vec![
                Dependency::required("economy"),
                Dependency::optional("metrics"),
                Dependency::required("storage"),
            ]
        );
    }

    #[test]
    fn parse_listener_rules() {
        let yaml = r#"
event: player.chat
priority: lowest
accepts_cancelled: true
expire_after: 2
"#;
        let listener: ListenerConfig = serde_yaml::from_str(yaml).unwrap();
        let subscriber = listener
            .subscriber("audit")
            .handler(|_: &mut dyn crate::events::Event| Ok(()))
            .build()
            .unwrap();

        assert_eq!(subscriber.name(), "audit");
        assert_eq!(subscriber.event_type(), Some(&EventType::new("player.chat")));
        assert_eq!(subscriber.priority(), Priority::Lowest);
        assert!(subscriber.accepts_cancelled());
        assert_eq!(subscriber.expire_after(), Some(2));
    }

    #[test]
    fn reject_unknown_priority() {
        let yaml = "event: tick\npriority: urgent\n";
        assert!(serde_yaml::from_str::<ListenerConfig>(yaml).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_extension() {
        let yaml = "extensions:\n  - id: a\n  - id: a\n";
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        assert_eq!(
            manifest.validate().unwrap_err(),
            ConfigurationError::DuplicateExtension { id: "a".to_string() }
        );
    }

    #[test]
    fn validate_rejects_undeclared_listener_type() {
        let yaml = r#"
event_types:
  - name: tick
extensions:
  - id: clock
    listens:
      - event: tock
"#;
        let manifest = Manifest::from_yaml_str(yaml).unwrap();
        assert_eq!(
            manifest.validate().unwrap_err(),
            ConfigurationError::UndeclaredEventType {
                event_type: "tock".to_string()
            }
        );
    }

    #[test]
    fn empty_manifest_is_valid() {
        let manifest = Manifest::from_yaml_str("{}").unwrap();
        assert!(manifest.validate().is_ok());
        assert!(manifest.hierarchy().unwrap().is_empty());
        assert!(manifest.registry().unwrap().is_empty());
    }
}
