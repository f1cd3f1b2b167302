//! Global context for CLI commands

use anyhow::{Context as _, Result};
use statusprobe_core::{ComponentRegistration, Config, Credentials};
use std::env;
use std::path::{Path, PathBuf};

/// Loaded configuration plus the credential values it names
pub struct Context {
    pub config: Config,
    pub credentials: Credentials,
    pub source: ConfigSource,
}

/// Where the configuration came from
pub enum ConfigSource {
    Builtin,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Builtin => f.write_str("built-in registry"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Context {
    /// Loads the configuration and resolves credentials from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, source) = match config_path {
            Some(path) => (
                Config::from_file(path)?,
                ConfigSource::File(path.to_path_buf()),
            ),
            None => (Config::builtin()?, ConfigSource::Builtin),
        };
        log::debug!("using configuration from {}", source);

        let credentials = credentials_from_env(&config);

        Ok(Self {
            config,
            credentials,
            source,
        })
    }

    /// Validated component registrations
    pub fn registrations(&self) -> Result<Vec<ComponentRegistration>> {
        self.config
            .registrations(&self.credentials)
            .with_context(|| format!("invalid configuration in {}", self.source))
    }
}

/// Reads each `[credentials]` entry from the environment variable it names
///
/// Unset variables are skipped; the config layer decides how to treat them.
fn credentials_from_env(config: &Config) -> Credentials {
    let mut credentials = Credentials::new();
    for (name, var) in &config.credentials {
        match env::var(var) {
            Ok(value) => credentials.insert(name, value),
            Err(_) => log::debug!("credential '{}': {} is not set", name, var),
        }
    }
    credentials
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_context_without_file() {
        let ctx = Context::new(None).unwrap();
        assert!(matches!(ctx.source, ConfigSource::Builtin));
        assert_eq!(ctx.config.components.len(), 5);
    }

    #[test]
    fn test_credentials_read_from_named_variable() {
        let config: Config = r#"
[credentials]
token = "STATUSPROBE_TEST_CONTEXT_TOKEN"
unset = "STATUSPROBE_TEST_CONTEXT_UNSET"
"#
        .parse()
        .unwrap();

        // SAFETY: the variable names are unique to this test
        unsafe {
            env::set_var("STATUSPROBE_TEST_CONTEXT_TOKEN", "secret");
            env::remove_var("STATUSPROBE_TEST_CONTEXT_UNSET");
        }

        let credentials = credentials_from_env(&config);
        assert_eq!(credentials.get("token"), Some("secret"));
        assert_eq!(credentials.get("unset"), None);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let result = Context::new(Some(Path::new("does/not/exist.toml")));
        assert!(result.is_err());
    }
}
