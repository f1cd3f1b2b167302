//! Configuration: component registry, probe targets and defaults
//!
//! The configuration only names credentials; their values are supplied by
//! the caller through [`Credentials`].

mod builtin;
pub mod model;

pub use builtin::BUILTIN_CONFIG;
pub use model::{
    ComponentConfig, Config, DefaultsConfig, HandshakeConfig, HttpConfig, Payload, ProbeConfig,
    StatuspageConfig,
};

use crate::error::{Result, StatusprobeError};
use crate::group::ProbeGroup;
use crate::orchestrator::{ComponentRegistration, Execution};
use crate::probe::{HandshakeProbe, HttpMethod, HttpProbe, Probe, SocketTarget};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Secret values keyed by credential name
#[derive(Clone, Default)]
pub struct Credentials {
    values: BTreeMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl FromStr for Config {
    type Err = StatusprobeError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| StatusprobeError::ConfigParseError(e.to_string()))
    }
}

impl Config {
    /// Reads a statusprobe.toml file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StatusprobeError::ConfigParseError(format!("{}: {}", path.display(), e))
        })?;

        content.parse()
    }

    /// Registry of the production deployment
    pub fn builtin() -> Result<Self> {
        BUILTIN_CONFIG.parse()
    }

    pub fn execution(&self) -> Execution {
        self.defaults.execution
    }

    /// Builds the component registrations, validating every probe
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a component id is used twice or a component has no probes
    /// - a payload is not valid hex, or an expected response is empty
    /// - a URL does not parse, or a timeout/buffer size is zero
    /// - a probe names a credential missing from `[credentials]`
    pub fn registrations(&self, credentials: &Credentials) -> Result<Vec<ComponentRegistration>> {
        let mut seen = HashSet::new();
        let mut registrations = Vec::with_capacity(self.components.len());

        for (index, component) in self.components.iter().enumerate() {
            if !seen.insert(component.id.as_str()) {
                return Err(StatusprobeError::ConfigDuplicateComponent(
                    component.id.clone(),
                ));
            }
            if component.probes.is_empty() {
                return Err(StatusprobeError::ConfigEmptyGroup(component.id.clone()));
            }

            let probes = component
                .probes
                .iter()
                .enumerate()
                .map(|(probe_index, probe)| {
                    let field = format!("components[{index}].probes[{probe_index}]");
                    self.build_probe(&field, probe, credentials)
                })
                .collect::<Result<Vec<_>>>()?;

            registrations.push(ComponentRegistration::new(
                component.id.clone(),
                component.label.clone(),
                ProbeGroup::new(probes),
            ));
        }

        Ok(registrations)
    }

    fn build_probe(
        &self,
        field: &str,
        probe: &ProbeConfig,
        credentials: &Credentials,
    ) -> Result<Box<dyn Probe>> {
        match probe {
            ProbeConfig::Handshake(handshake) => {
                Ok(Box::new(self.build_handshake(field, handshake)?))
            }
            ProbeConfig::Http(http) => Ok(Box::new(self.build_http(field, http, credentials)?)),
        }
    }

    fn build_handshake(&self, field: &str, config: &HandshakeConfig) -> Result<HandshakeProbe> {
        let send = config.send.to_bytes().map_err(|e| invalid(format!("{field}.send"), e))?;
        let expect = config
            .expect
            .to_bytes()
            .map_err(|e| invalid(format!("{field}.expect"), e))?;
        if expect.is_empty() {
            return Err(invalid(format!("{field}.expect"), "expected response is empty"));
        }

        let timeout = positive_timeout(
            field,
            config.timeout_ms.unwrap_or(self.defaults.tcp_timeout_ms),
        )?;
        let buffer_size = config.buffer_size.unwrap_or(self.defaults.buffer_size);
        if buffer_size == 0 {
            return Err(invalid(format!("{field}.buffer_size"), "must be positive"));
        }
        if buffer_size < expect.len() {
            return Err(invalid(
                format!("{field}.buffer_size"),
                format!(
                    "{} bytes cannot hold the {}-byte expected response",
                    buffer_size,
                    expect.len()
                ),
            ));
        }

        Ok(HandshakeProbe::new(
            config.name.clone(),
            SocketTarget::new(config.host.clone(), config.port),
            send,
            expect,
        )
        .with_timeout(timeout)
        .with_buffer_size(buffer_size))
    }

    fn build_http(
        &self,
        field: &str,
        config: &HttpConfig,
        credentials: &Credentials,
    ) -> Result<HttpProbe> {
        let url = Url::parse(&config.url).map_err(|e| invalid(format!("{field}.url"), e))?;
        let timeout = positive_timeout(
            field,
            config.timeout_ms.unwrap_or(self.defaults.http_timeout_ms),
        )?;

        let mut probe = match config.method {
            HttpMethod::Get => HttpProbe::get(config.name.clone(), url),
            HttpMethod::Post => HttpProbe::post(
                config.name.clone(),
                url,
                config
                    .form
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        }
        .with_timeout(timeout);

        if let Some(status) = config.expected_status {
            probe = probe.with_expected_status(status);
        }

        if let Some(name) = &config.credential {
            if !self.credentials.contains_key(name) {
                return Err(StatusprobeError::ConfigUnknownCredential {
                    probe: config.name.clone(),
                    credential: name.clone(),
                });
            }
            // A missing secret still runs the probe; the service will reject it
            let token = credentials.get(name).unwrap_or_else(|| {
                log::warn!(
                    "credential '{}' has no value, probe '{}' sends an empty token",
                    name,
                    config.name
                );
                ""
            });
            probe = probe.with_bearer(token);
        }

        Ok(probe)
    }
}

fn invalid(field: String, reason: impl fmt::Display) -> StatusprobeError {
    StatusprobeError::ConfigInvalidValue {
        field,
        reason: reason.to_string(),
    }
}

fn positive_timeout(field: &str, millis: u64) -> Result<Duration> {
    if millis == 0 {
        return Err(invalid(format!("{field}.timeout_ms"), "must be positive"));
    }
    Ok(Duration::from_millis(millis))
}
