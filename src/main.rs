// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{Context, Result};
use std::env;
use std::time::Instant;
use the_switchyard::config::{load_and_validate_manifest, ExtensionConfig};
use the_switchyard::events::{Cancellable, Event, EventBus, EventType};
use the_switchyard::extensions::ExtensionId;

/// Event used to exercise every declared type once.
struct DemoEvent {
    event_type: EventType,
    cancelled: bool,
}

impl Cancellable for DemoEvent {
    fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}

impl Event for DemoEvent {
    fn event_type(&self) -> EventType {
        self.event_type.clone()
    }

    fn as_cancellable(&self) -> Option<&dyn Cancellable> {
        Some(self)
    }

    fn as_cancellable_mut(&mut self) -> Option<&mut dyn Cancellable> {
        Some(self)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let manifest_path = match args.as_slice() {
        [_, path] => path,
        _ => {
            let program = args.first().map(String::as_str).unwrap_or("the-switchyard");
            eprintln!("Usage: {} <manifest.yaml>", program);
            eprintln!("Example: {} configs/demo.yaml", program);
            eprintln!("Set RUST_LOG=the_switchyard=debug to see bus and registry events.");
            std::process::exit(1);
        }
    };

    let start_time = Instant::now();
    let manifest = load_and_validate_manifest(manifest_path)
        .with_context(|| format!("failed to load manifest {}", manifest_path))?;

    println!("🚉 Switchyard");
    println!("═════════════");
    println!("📋 Manifest: {}", manifest_path);
    println!(
        "🔧 {} event types, {} extensions",
        manifest.event_types.len(),
        manifest.extensions.len()
    );
    println!();

    let mut registry = manifest.registry()?;
    let order = registry.load_order()?;

    println!("📦 Load order:");
    for (position, id) in order.iter().enumerate() {
        println!("  {}. {}", position + 1, id);
    }
    println!();

    let bus = EventBus::new(manifest.hierarchy()?);
    for id in &order {
        if let Some(extension) = find_extension(&manifest.extensions, id) {
            subscribe_listeners(&bus, extension)?;
        }
    }

    println!("📣 Dispatching one event per declared type:");
    let event_types: Vec<EventType> = bus.hierarchy().types().cloned().collect();
    for event_type in event_types {
        let subscriber_count = bus.subscriber_count(&event_type);
        println!("  ▶ {} ({} subscribers)", event_type, subscriber_count);

        let outcome = bus.dispatch(&mut DemoEvent {
            event_type,
            cancelled: false,
        });
        for error in &outcome.errors {
            eprintln!("    ❌ {}", error);
        }
        println!(
            "    ✅ invoked {}, skipped {}, failed {}",
            outcome.invoked,
            outcome.skipped,
            outcome.errors.len()
        );
    }

    println!();
    println!("🎉 Done in {:.2?}", start_time.elapsed());
    Ok(())
}

fn find_extension<'a>(extensions: &'a [ExtensionConfig], id: &ExtensionId) -> Option<&'a ExtensionConfig> {
    extensions.iter().find(|extension| extension.id == *id)
}

fn subscribe_listeners(bus: &EventBus, extension: &ExtensionConfig) -> Result<()> {
    for listener in &extension.listens {
        let name = extension.id.to_string();
        let subscriber = listener
            .subscriber(extension.id.as_str())
            .handler(move |event: &mut dyn Event| {
                println!("    ↳ {} handled {}", name, event.event_type());
                Ok(())
            })
            .build()?;
        bus.subscribe(subscriber)?;
    }
    Ok(())
}
