// Core modules
pub mod config;
pub mod error;
pub mod group;
pub mod http_client;
pub mod orchestrator;
pub mod probe;
pub mod report;
pub mod status;

// Re-export commonly used types
pub use config::{Config, Credentials};
pub use error::{ProbeError, ReportError, Result, StatusprobeError};
pub use group::{GroupReport, ProbeGroup};
pub use orchestrator::{ComponentRegistration, Execution, Orchestrator, RunReport};
pub use probe::{HandshakeProbe, HttpProbe, Probe, ProbeReport, SocketTarget, Verdict};
pub use report::{NoopReporter, Reporter};
pub use status::{ComponentStatus, SystemStatus, to_component_status, to_system_status};
