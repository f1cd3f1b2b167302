//! Probe groups: the probes behind one reported component

use crate::probe::{Probe, ProbeReport, Verdict};
use serde::Serialize;

/// Outcome of running every probe of a group
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub verdict: Verdict,
    pub probes: Vec<ProbeReport>,
}

impl GroupReport {
    /// Reports of the probes that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &ProbeReport> {
        self.probes.iter().filter(|p| !p.verdict.is_pass())
    }
}

/// Ordered, non-empty set of probes reduced with logical AND
///
/// Non-emptiness is enforced when groups are built from configuration.
pub struct ProbeGroup {
    probes: Vec<Box<dyn Probe>>,
}

impl ProbeGroup {
    pub fn new(probes: Vec<Box<dyn Probe>>) -> Self {
        Self { probes }
    }

    pub fn single(probe: impl Probe + 'static) -> Self {
        Self::new(vec![Box::new(probe)])
    }

    pub fn probes(&self) -> &[Box<dyn Probe>] {
        &self.probes
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Executes every probe, even after a failure, and ANDs the verdicts
    pub fn run(&self) -> GroupReport {
        let probes: Vec<ProbeReport> = self.probes.iter().map(|probe| probe.execute()).collect();
        let verdict = probes
            .iter()
            .fold(Verdict::Pass, |acc, report| acc.and(report.verdict));

        GroupReport { verdict, probes }
    }

    pub fn verdict(&self) -> Verdict {
        self.run().verdict
    }
}
