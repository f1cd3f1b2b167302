//! Orchestrator - runs every registered component and aggregates the run

use crate::{
    error::Result,
    group::{GroupReport, ProbeGroup},
    report::Reporter,
    status::{ComponentStatus, SystemStatus, to_component_status, to_system_status},
};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A reported component and the probes that decide its status
pub struct ComponentRegistration {
    /// Opaque status board identifier
    pub id: String,
    pub label: String,
    pub group: ProbeGroup,
}

impl ComponentRegistration {
    pub fn new(id: impl Into<String>, label: impl Into<String>, group: ProbeGroup) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            group,
        }
    }
}

/// How component groups are scheduled within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Execution {
    /// One group after another, in registration order
    #[default]
    Sequential,
    /// Groups run concurrently; publishing still follows registration order
    Parallel,
}

/// Outcome of one component within a run
#[derive(Debug, Clone, Serialize)]
pub struct ComponentReport {
    pub id: String,
    pub label: String,
    pub status: ComponentStatus,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_error: Option<String>,
    pub group: GroupReport,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub system_status: SystemStatus,
    pub components: Vec<ComponentReport>,
    /// Publish calls that failed; these never change `system_status`
    pub reporting_failures: usize,
}

impl RunReport {
    pub fn statuses(&self) -> Vec<ComponentStatus> {
        self.components.iter().map(|c| c.status).collect()
    }

    pub fn component(&self, id: &str) -> Option<&ComponentReport> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs the static component list and publishes each status
pub struct Orchestrator<R: Reporter> {
    registrations: Vec<ComponentRegistration>,
    reporter: R,
    execution: Execution,
}

impl<R: Reporter> Orchestrator<R> {
    pub fn new(registrations: Vec<ComponentRegistration>, reporter: R) -> Self {
        Self {
            registrations,
            reporter,
            execution: Execution::Sequential,
        }
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn registrations(&self) -> &[ComponentRegistration] {
        &self.registrations
    }

    pub fn execution(&self) -> Execution {
        self.execution
    }

    /// Runs every component once and returns the overall status
    pub fn run(&self) -> SystemStatus {
        self.run_report().system_status
    }

    /// Runs every component once and returns the full report
    pub fn run_report(&self) -> RunReport {
        let started_at = Utc::now();
        let started = Instant::now();

        let components: Vec<ComponentReport> = match self.execution {
            Execution::Sequential => self
                .registrations
                .iter()
                .map(|registration| {
                    let group = registration.group.run();
                    self.settle(registration, group)
                })
                .collect(),
            Execution::Parallel => {
                let groups: Vec<GroupReport> = self
                    .registrations
                    .par_iter()
                    .map(|registration| registration.group.run())
                    .collect();
                self.registrations
                    .iter()
                    .zip(groups)
                    .map(|(registration, group)| self.settle(registration, group))
                    .collect()
            }
        };

        let statuses: Vec<ComponentStatus> = components.iter().map(|c| c.status).collect();
        let system_status = to_system_status(&statuses);
        let reporting_failures = components.iter().filter(|c| !c.published).count();

        if reporting_failures > 0 {
            log::warn!(
                "{} of {} component statuses could not be published",
                reporting_failures,
                components.len()
            );
        }
        log::info!("system status: {}", system_status);

        RunReport {
            started_at,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            system_status,
            components,
            reporting_failures,
        }
    }

    /// Maps a group outcome to a status and publishes it
    fn settle(&self, registration: &ComponentRegistration, group: GroupReport) -> ComponentReport {
        let status = to_component_status(group.verdict);

        if status.is_operational() {
            log::info!("{} is operational", registration.label);
        } else {
            let reasons: Vec<String> = group
                .failures()
                .map(|p| format!("{}: {}", p.name, p.error.as_deref().unwrap_or("failed")))
                .collect();
            log::info!("{} is down ({})", registration.label, reasons.join("; "));
        }

        let (published, publish_error) = match self.reporter.publish(&registration.id, status) {
            Ok(()) => (true, None),
            Err(err) => {
                log::warn!(
                    "could not publish {} for {} ({}): {}",
                    status,
                    registration.label,
                    registration.id,
                    err
                );
                (false, Some(err.to_string()))
            }
        };

        ComponentReport {
            id: registration.id.clone(),
            label: registration.label.clone(),
            status,
            published,
            publish_error,
            group,
        }
    }
}
