//! Run command - probe every component once and publish the results

use crate::cli::RunArgs;
use crate::context::Context;
use crate::output::print_serialized;
use crate::statuspage::StatuspageReporter;
use anyhow::{Result, anyhow};
use colored::Colorize;
use serde_json::json;
use statusprobe_core::orchestrator::ComponentReport;
use statusprobe_core::{
    ComponentStatus, Execution, NoopReporter, Orchestrator, Reporter, RunReport, SystemStatus,
};
use std::env;

/// Probe all components and publish their status
///
/// # Exit Code
///
/// Always exits with code 0 once probing started. Outages are reported in
/// the output, not via exit code; only configuration errors fail the command.
pub fn run(args: RunArgs, verbose: bool) -> Result<()> {
    let ctx = Context::new(args.config.as_deref())?;
    let registrations = ctx.registrations()?;

    let execution = if args.parallel {
        Execution::Parallel
    } else {
        ctx.config.execution()
    };

    let reporter: Box<dyn Reporter> = if args.dry_run {
        Box::new(NoopReporter)
    } else {
        Box::new(statuspage_reporter(&ctx, args.api_key)?)
    };

    let report = Orchestrator::new(registrations, reporter)
        .with_execution(execution)
        .run_report();

    if args.json {
        render_json(&report, args.dry_run)?;
    } else {
        render_human(&report, verbose);
    }

    Ok(())
}

fn statuspage_reporter(ctx: &Context, api_key: Option<String>) -> Result<StatuspageReporter> {
    let statuspage = ctx.config.statuspage.as_ref().ok_or_else(|| {
        anyhow!(
            "no [statuspage] section in {}; pass --dry-run to probe without publishing",
            ctx.source
        )
    })?;

    let api_key = match api_key {
        Some(key) => key,
        None => env::var(&statuspage.api_key_env).map_err(|_| {
            anyhow!(
                "{} is not set; pass --api-key or --dry-run",
                statuspage.api_key_env
            )
        })?,
    };

    StatuspageReporter::new(statuspage, api_key)
}

/// Render run report as JSON
fn render_json(report: &RunReport, dry_run: bool) -> Result<()> {
    let output = json!({
        "schema_version": "1.0",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "dry_run": dry_run,
        "report": report,
    });
    print_serialized(&output)
}

/// Render run report in human-readable format
fn render_human(report: &RunReport, verbose: bool) {
    for component in &report.components {
        render_component(component, verbose);
    }
    render_summary(report);
}

fn render_component(component: &ComponentReport, verbose: bool) {
    let icon = status_icon(component.status);
    match component.status {
        ComponentStatus::Operational => println!("{} {} is operational", icon, component.label),
        ComponentStatus::MajorOutage => println!("{} {} is down", icon, component.label),
    }

    for probe in &component.group.probes {
        match &probe.error {
            Some(error) => println!("  - {} ({}): {}", probe.name, probe.kind, error),
            None if verbose => println!(
                "  - {} ({}): ok in {} ms",
                probe.name, probe.kind, probe.elapsed_ms
            ),
            None => {}
        }
    }

    if let Some(error) = &component.publish_error {
        println!("  {} status update failed: {}", "⚠".yellow(), error);
    }
}

/// Render overall summary
fn render_summary(report: &RunReport) {
    println!();
    match report.system_status {
        SystemStatus::AllOperational => {
            println!("{}", "All systems operational".green().bold());
        }
        SystemStatus::PartialOutage => {
            println!("{}", "Partial outage".yellow().bold());
        }
        SystemStatus::AllDown => {
            println!("{}", "All systems down".red().bold());
        }
    }

    if report.reporting_failures > 0 {
        println!(
            "{} {} status update(s) failed",
            "⚠".yellow().bold(),
            report.reporting_failures
        );
    }
}

/// Get status icon for component status
fn status_icon(status: ComponentStatus) -> String {
    match status {
        ComponentStatus::Operational => "✓".green().to_string(),
        ComponentStatus::MajorOutage => "✗".red().to_string(),
    }
}
