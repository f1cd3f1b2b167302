use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusprobeError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    #[error("CONFIG_EMPTY_GROUP: component '{0}' has no probes")]
    ConfigEmptyGroup(String),

    #[error("CONFIG_DUPLICATE_COMPONENT: component id '{0}' is registered twice")]
    ConfigDuplicateComponent(String),

    #[error("CONFIG_UNKNOWN_CREDENTIAL: probe '{probe}' references undeclared credential '{credential}'")]
    ConfigUnknownCredential { probe: String, credential: String },

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<serde_json::Error> for StatusprobeError {
    fn from(err: serde_json::Error) -> Self {
        StatusprobeError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, StatusprobeError>;

/// Why a single probe transaction did not pass
///
/// Every variant is turned into a failing verdict by `Probe::execute`; the
/// error itself only survives as a diagnostic message.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("PROBE_RESOLVE_FAILED: cannot resolve {target}: {source}")]
    Resolve {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("PROBE_NO_ADDRESS: {0} resolved to no addresses")]
    NoAddress(String),

    #[error("PROBE_CONNECT_FAILED: {target}: {source}")]
    Connect {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("PROBE_TIMEOUT: {target} did not answer within {} ms", .timeout.as_millis())]
    Timeout { target: String, timeout: Duration },

    #[error("PROBE_IO_ERROR: {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error("PROBE_RESPONSE_MISMATCH: expected \"{expected}\", received \"{received}\"")]
    ResponseMismatch { expected: String, received: String },

    #[error("PROBE_STATUS_MISMATCH: expected HTTP {expected}, received {received}")]
    StatusMismatch { expected: u16, received: u16 },

    #[error("PROBE_HTTP_FAILED: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProbeError {
    /// Maps a socket error onto the probe taxonomy
    ///
    /// Read and write timeouts surface as `WouldBlock` on unix and `TimedOut`
    /// on windows; both mean the peer stayed silent past the deadline.
    pub(crate) fn from_io(target: &str, timeout: Duration, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ProbeError::Timeout {
                target: target.to_string(),
                timeout,
            },
            _ => ProbeError::Io {
                target: target.to_string(),
                source: err,
            },
        }
    }

    /// True for failures where no transaction took place at all
    pub fn is_transport(&self) -> bool {
        !matches!(
            self,
            ProbeError::ResponseMismatch { .. } | ProbeError::StatusMismatch { .. }
        )
    }
}

/// Failure to hand a component status to the status board
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("REPORT_REJECTED: status board answered HTTP {status} for component '{component_id}'")]
    Rejected { component_id: String, status: u16 },

    #[error("REPORT_TRANSPORT_FAILED: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("REPORT_FAILED: {0}")]
    Other(String),
}
