// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::config::{load_and_validate_manifest, load_manifest, Manifest};
use crate::errors::{ConfigurationError, ManifestError, RegistryError};
use crate::events::{Event, EventBus, EventType, Priority};

struct Announcement(EventType);

impl Event for Announcement {
    fn event_type(&self) -> EventType {
        self.0.clone()
    }
}

fn manifest_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

/// The sample manifest parses, validates and yields the expected hierarchy.
#[test]
fn test_demo_manifest_hierarchy() {
    let manifest = load_and_validate_manifest("configs/demo.yaml").unwrap();

    assert_eq!(manifest.event_types.len(), 5);
    assert_eq!(manifest.extensions.len(), 5);

    let hierarchy = manifest.hierarchy().unwrap();
    let chat = EventType::new("player.chat");
    assert_eq!(
        hierarchy.lineage(&chat),
        vec![
            chat.clone(),
            EventType::new("player"),
            EventType::new("moderation"),
            EventType::new("server"),
        ]
    );
    assert!(!hierarchy.is_assignable(&EventType::new("player.join"), &chat));
}

/// The sample manifest resolves to a dependency-first load order.
#[test]
fn test_demo_manifest_load_order() {
    let manifest = load_and_validate_manifest("configs/demo.yaml").unwrap();
    let mut registry = manifest.registry().unwrap();

    let order = registry.load_order().unwrap();
    let names: Vec<&str> = order.iter().map(|id| id.as_str()).collect();

    assert_eq!(names, ["storage", "economy", "shops", "chat-filter", "audit"]);
}

/// Listener rules from the manifest drive subscriptions on a bus.
#[test]
fn test_demo_manifest_listeners_subscribe() {
    let manifest = load_and_validate_manifest("configs/demo.yaml").unwrap();
    let bus = EventBus::new(manifest.hierarchy().unwrap());
    let calls = Arc::new(Mutex::new(Vec::new()));

    for extension in &manifest.extensions {
        for listener in &extension.listens {
            let calls = Arc::clone(&calls);
            let name = extension.id.to_string();
            let subscriber = listener
                .subscriber(extension.id.as_str())
                .handler(move |_: &mut dyn Event| {
                    calls.lock().push(name.clone());
                    Ok(())
                })
                .build()
                .unwrap();
            bus.subscribe(subscriber).unwrap();
        }
    }

    let outcome = bus.dispatch(&mut Announcement(EventType::new("player.chat")));

    assert!(outcome.is_clean());
    assert_eq!(*calls.lock(), vec!["chat-filter", "economy", "audit"]);
    assert_eq!(
        manifest.extensions[0].listens[0].priority,
        Priority::Low
    );
}

#[test]
fn test_load_manifest_from_temp_file() {
    let file = manifest_file(
        r#"
event_types:
  - name: tick
extensions:
  - id: clock
    listens:
      - event: tick
"#,
    );

    let manifest = load_and_validate_manifest(file.path()).unwrap();

    assert_eq!(manifest.extensions[0].id.as_str(), "clock");
    assert_eq!(manifest.hierarchy().unwrap().len(), 1);
}

#[test]
fn test_missing_file_is_a_read_error() {
    let err = load_manifest("configs/does-not-exist.yaml").unwrap_err();

    match err {
        ManifestError::Read { path, .. } => {
            assert!(path.ends_with("does-not-exist.yaml"));
        }
        other => panic!("expected a read error, got {:?}", other),
    }
}

#[test]
fn test_malformed_yaml_is_a_parse_error() {
    let file = manifest_file("event_types: [name: {\n");

    let err = load_manifest(file.path()).unwrap_err();

    assert!(matches!(err, ManifestError::Parse(_)));
}

#[test]
fn test_cyclic_hierarchy_is_invalid() {
    let file = manifest_file(
        r#"
event_types:
  - name: a
    parents: [b]
  - name: b
    parents: [a]
"#,
    );

    let err = load_and_validate_manifest(file.path()).unwrap_err();

    match err {
        ManifestError::Invalid(ConfigurationError::CyclicHierarchy { cycle }) => {
            assert!(cycle.contains(&"a".to_string()));
            assert!(cycle.contains(&"b".to_string()));
        }
        other => panic!("expected a cyclic hierarchy, got {:?}", other),
    }
}

#[test]
fn test_unknown_parent_is_invalid() {
    let manifest = Manifest::from_yaml_str(
        r#"
event_types:
  - name: child
    parents: [ghost]
"#,
    )
    .unwrap();

    assert_eq!(
        manifest.validate().unwrap_err(),
        ConfigurationError::UnknownParent {
            event_type: "child".to_string(),
            parent: "ghost".to_string(),
        }
    );
}

#[test]
fn test_manifest_with_missing_dependency_fails_at_load_order() {
    let manifest = Manifest::from_yaml_str(
        r#"
extensions:
  - id: shops
    depends_on: [economy]
"#,
    )
    .unwrap();
    assert!(manifest.validate().is_ok());

    let err = manifest.registry().unwrap().load_order().unwrap_err();

    assert_eq!(
        err,
        RegistryError::MissingDependency {
            extension: "shops".to_string(),
            dependency: "economy".to_string(),
        }
    );
}
