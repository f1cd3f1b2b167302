//! Reporter seam towards the external status board

use crate::error::ReportError;
use crate::status::ComponentStatus;

/// Publishes one component status to a status board
///
/// The orchestrator calls this once per component per run, never retries,
/// and only logs and counts failures.
pub trait Reporter: Send + Sync {
    fn publish(&self, component_id: &str, status: ComponentStatus) -> Result<(), ReportError>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn publish(&self, component_id: &str, status: ComponentStatus) -> Result<(), ReportError> {
        (**self).publish(component_id, status)
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn publish(&self, component_id: &str, status: ComponentStatus) -> Result<(), ReportError> {
        (**self).publish(component_id, status)
    }
}

/// Dry-run reporter: logs what would be published
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn publish(&self, component_id: &str, status: ComponentStatus) -> Result<(), ReportError> {
        log::info!("dry run: would publish {} for component {}", status, component_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_reporter_always_succeeds() {
        let reporter = NoopReporter;
        assert!(reporter.publish("abc", ComponentStatus::MajorOutage).is_ok());
    }

    #[test]
    fn test_boxed_reporter_delegates() {
        let reporter: Box<dyn Reporter> = Box::new(NoopReporter);
        assert!(reporter.publish("abc", ComponentStatus::Operational).is_ok());
    }
}
