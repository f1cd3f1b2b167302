//! Protocol probes
//!
//! A probe performs one synthetic transaction against one target and turns
//! the outcome into a [`Verdict`]. Implementations report *why* they failed
//! through [`ProbeError`]; [`Probe::execute`] folds every error into
//! `Verdict::Fail` so that no single target can abort a run.

use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

pub mod dialect;
pub mod handshake;
pub mod http;

pub use handshake::{HandshakeProbe, SocketTarget};
pub use http::{HttpMethod, HttpProbe};

/// Default timeout for raw socket transactions (3 seconds)
pub const DEFAULT_TCP_TIMEOUT: Duration = Duration::from_secs(3);

/// Default receive buffer for handshake responses
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Pass/fail outcome of a probe or a group of probes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }

    /// Logical AND of two verdicts
    pub fn and(self, other: Verdict) -> Verdict {
        Verdict::from(self.is_pass() && other.is_pass())
    }
}

impl From<bool> for Verdict {
    fn from(pass: bool) -> Self {
        if pass {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail => f.write_str("fail"),
        }
    }
}

/// Transaction shape of a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    Handshake,
    HttpGet,
    HttpPost,
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeKind::Handshake => f.write_str("tcp handshake"),
            ProbeKind::HttpGet => f.write_str("http get"),
            ProbeKind::HttpPost => f.write_str("http post"),
        }
    }
}

/// Result of executing one probe
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub name: String,
    pub kind: ProbeKind,
    pub verdict: Verdict,
    /// Failure description, absent on pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// One synthetic network transaction against one target
///
/// Implementations must not keep connections between calls: every call
/// opens, uses and releases its own transport.
pub trait Probe: Send + Sync {
    /// Name used in logs and reports
    fn name(&self) -> &str;

    fn kind(&self) -> ProbeKind;

    /// Human readable target (host:port or URL)
    fn target(&self) -> String;

    /// Runs the transaction once
    fn probe(&self) -> Result<(), ProbeError>;

    /// Runs the transaction and folds any error into a failing verdict
    fn execute(&self) -> ProbeReport {
        let started = Instant::now();
        let outcome = self.probe();
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(()) => {
                log::debug!("probe '{}' passed in {} ms", self.name(), elapsed_ms);
                ProbeReport {
                    name: self.name().to_string(),
                    kind: self.kind(),
                    verdict: Verdict::Pass,
                    error: None,
                    elapsed_ms,
                }
            }
            Err(err) => {
                log::debug!("probe '{}' failed: {}", self.name(), err);
                ProbeReport {
                    name: self.name().to_string(),
                    kind: self.kind(),
                    verdict: Verdict::Fail,
                    error: Some(err.to_string()),
                    elapsed_ms,
                }
            }
        }
    }
}
