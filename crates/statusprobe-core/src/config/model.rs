use crate::orchestrator::Execution;
use crate::probe::HttpMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// statusprobe.toml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub statuspage: Option<StatuspageConfig>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Credential name -> environment variable holding its value
    #[serde(default)]
    pub credentials: BTreeMap<String, String>,
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatuspageConfig {
    pub page_id: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_tcp_timeout_ms")]
    pub tcp_timeout_ms: u64,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    #[serde(default)]
    pub execution: Execution,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tcp_timeout_ms: default_tcp_timeout_ms(),
            http_timeout_ms: default_http_timeout_ms(),
            buffer_size: default_buffer_size(),
            execution: Execution::Sequential,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    /// Status board component id
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub probes: Vec<ProbeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeConfig {
    Handshake(HandshakeConfig),
    Http(HttpConfig),
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakeConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub send: Payload,
    pub expect: Payload,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    #[serde(default)]
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub name: String,
    #[serde(default = "default_method")]
    pub method: HttpMethod,
    pub url: String,
    /// Defaults to 200 for GET and 201 for POST
    #[serde(default)]
    pub expected_status: Option<u16>,
    #[serde(default)]
    pub form: BTreeMap<String, String>,
    /// Name of a `[credentials]` entry sent as bearer token
    #[serde(default)]
    pub credential: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Raw bytes written as `{ text = "..." }` or `{ hex = "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payload {
    Text(String),
    Hex(String),
}

impl Payload {
    pub fn to_bytes(&self) -> Result<Vec<u8>, hex::FromHexError> {
        match self {
            Payload::Text(text) => Ok(text.as_bytes().to_vec()),
            Payload::Hex(encoded) => {
                let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
                hex::decode(compact)
            }
        }
    }
}

fn default_api_base() -> String {
    "https://api.statuspage.io".to_string()
}

fn default_api_key_env() -> String {
    "STATUSPAGE_APIKEY".to_string()
}

fn default_tcp_timeout_ms() -> u64 {
    3000
}

fn default_http_timeout_ms() -> u64 {
    5000
}

fn default_buffer_size() -> usize {
    1024
}

fn default_method() -> HttpMethod {
    HttpMethod::Get
}
