//! Component and system status derived from verdicts

use crate::probe::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Externally reported health of one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Operational,
    MajorOutage,
}

impl ComponentStatus {
    /// Status board vocabulary
    pub fn as_str(self) -> &'static str {
        match self {
            ComponentStatus::Operational => "operational",
            ComponentStatus::MajorOutage => "major_outage",
        }
    }

    pub fn is_operational(self) -> bool {
        self == ComponentStatus::Operational
    }
}

impl fmt::Display for ComponentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate health over all components
///
/// Ordered from worst to best so that monotonicity can be stated as
/// `a <= b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    AllDown,
    PartialOutage,
    AllOperational,
}

impl SystemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemStatus::AllOperational => "all_operational",
            SystemStatus::PartialOutage => "partial_outage",
            SystemStatus::AllDown => "all_down",
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn to_component_status(verdict: Verdict) -> ComponentStatus {
    match verdict {
        Verdict::Pass => ComponentStatus::Operational,
        Verdict::Fail => ComponentStatus::MajorOutage,
    }
}

/// An empty set of components counts as all operational.
pub fn to_system_status(statuses: &[ComponentStatus]) -> SystemStatus {
    let operational = statuses.iter().filter(|s| s.is_operational()).count();

    if operational == statuses.len() {
        SystemStatus::AllOperational
    } else if operational == 0 {
        SystemStatus::AllDown
    } else {
        SystemStatus::PartialOutage
    }
}
