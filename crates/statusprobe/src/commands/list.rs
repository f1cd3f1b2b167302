//! List command - show the component registry

use crate::context::Context;
use crate::output::print_serialized;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use statusprobe_core::ComponentRegistration;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct ComponentEntry {
    id: String,
    label: String,
    probes: Vec<ProbeEntry>,
}

#[derive(Debug, Serialize)]
struct ProbeEntry {
    name: String,
    kind: String,
    target: String,
}

impl From<&ComponentRegistration> for ComponentEntry {
    fn from(registration: &ComponentRegistration) -> Self {
        Self {
            id: registration.id.clone(),
            label: registration.label.clone(),
            probes: registration
                .group
                .probes()
                .iter()
                .map(|probe| ProbeEntry {
                    name: probe.name().to_string(),
                    kind: probe.kind().to_string(),
                    target: probe.target(),
                })
                .collect(),
        }
    }
}

/// List components and their probes
///
/// Builds the registrations, so an invalid configuration fails here the same
/// way it would fail `run`.
pub fn run(config: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
    let ctx = Context::new(config.as_deref())?;
    let entries: Vec<ComponentEntry> = ctx.registrations()?.iter().map(Into::into).collect();

    if json {
        return print_serialized(&entries);
    }

    if verbose {
        println!("{} Configuration: {}\n", "→".cyan(), ctx.source);
    }
    for entry in &entries {
        println!("{} {}", entry.label.bold(), format!("[{}]", entry.id).dimmed());
        for probe in &entry.probes {
            println!("  - {} ({} {})", probe.name, probe.kind, probe.target);
        }
    }
    println!("\n{} component(s)", entries.len());
    Ok(())
}
