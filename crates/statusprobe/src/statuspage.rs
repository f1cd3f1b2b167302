//! Statuspage.io reporter
//!
//! Publishes component status with
//! `PATCH {api_base}/v1/pages/{page_id}/components/{id}/?api_key=...`.

use anyhow::{Result, bail};
use reqwest::blocking::Client;
use serde_json::json;
use statusprobe_core::config::StatuspageConfig;
use statusprobe_core::http_client::{DEFAULT_HTTP_TIMEOUT, build_client};
use statusprobe_core::{ComponentStatus, ReportError, Reporter};
use std::fmt;
use std::time::Duration;
use url::Url;

pub struct StatuspageReporter {
    client: Client,
    base: Url,
    page_id: String,
    api_key: String,
}

impl StatuspageReporter {
    pub fn new(config: &StatuspageConfig, api_key: String) -> Result<Self> {
        Self::with_timeout(config, api_key, DEFAULT_HTTP_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns an error if `api_base` is not an absolute http(s) URL, the
    /// page id is empty, or the HTTP client cannot be built
    pub fn with_timeout(config: &StatuspageConfig, api_key: String, timeout: Duration) -> Result<Self> {
        let base = Url::parse(&config.api_base)?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            bail!("statuspage api_base must be an http(s) URL: {}", config.api_base);
        }
        if config.page_id.trim().is_empty() {
            bail!("statuspage page_id must not be empty");
        }

        Ok(Self {
            client: build_client(timeout)?,
            base,
            page_id: config.page_id.clone(),
            api_key,
        })
    }

    /// Component endpoint without the key
    pub fn component_url(&self, component_id: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "v1",
                "pages",
                self.page_id.as_str(),
                "components",
                component_id,
                "",
            ]);
        }
        url
    }
}

impl fmt::Debug for StatuspageReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatuspageReporter")
            .field("base", &self.base.as_str())
            .field("page_id", &self.page_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Reporter for StatuspageReporter {
    fn publish(&self, component_id: &str, status: ComponentStatus) -> Result<(), ReportError> {
        let url = self.component_url(component_id);
        log::debug!("PATCH {} status={}", url, status);

        let response = self
            .client
            .patch(url)
            .query(&[("api_key", self.api_key.as_str())])
            .json(&json!({ "component": { "status": status.as_str() } }))
            .send()
            .map_err(|e| ReportError::Transport(e.without_url()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ReportError::Rejected {
                component_id: component_id.to_string(),
                status: response.status().as_u16(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn config(api_base: &str) -> StatuspageConfig {
        StatuspageConfig {
            page_id: "page123".to_string(),
            api_base: api_base.to_string(),
            api_key_env: "STATUSPAGE_APIKEY".to_string(),
        }
    }

    #[test]
    fn test_component_url_layout() {
        let reporter =
            StatuspageReporter::new(&config("https://api.statuspage.io"), "key".into()).unwrap();
        assert_eq!(
            reporter.component_url("tqwvqj1jzq1x").as_str(),
            "https://api.statuspage.io/v1/pages/page123/components/tqwvqj1jzq1x/"
        );
    }

    #[test]
    fn test_component_url_keeps_base_path() {
        let reporter =
            StatuspageReporter::new(&config("http://localhost:8080/proxy/"), "key".into()).unwrap();
        assert_eq!(
            reporter.component_url("abc").as_str(),
            "http://localhost:8080/proxy/v1/pages/page123/components/abc/"
        );
    }

    #[test]
    fn test_publish_sends_patch_with_status_body() {
        let mut server = Server::new();
        let mock = server
            .mock(
                "PATCH",
                Matcher::Regex(r"^/v1/pages/page123/components/abc/".to_string()),
            )
            .match_query(Matcher::UrlEncoded("api_key".into(), "secret".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"component": {"status": "major_outage"}})))
            .with_status(200)
            .create();

        let reporter = StatuspageReporter::new(&config(&server.url()), "secret".into()).unwrap();
        reporter
            .publish("abc", ComponentStatus::MajorOutage)
            .unwrap();

        mock.assert();
    }

    #[test]
    fn test_publish_operational_vocabulary() {
        let mut server = Server::new();
        let mock = server
            .mock(
                "PATCH",
                Matcher::Regex(r"^/v1/pages/page123/components/xyz/".to_string()),
            )
            .match_body(Matcher::Json(json!({"component": {"status": "operational"}})))
            .with_status(200)
            .create();

        let reporter = StatuspageReporter::new(&config(&server.url()), "k".into()).unwrap();
        assert!(reporter.publish("xyz", ComponentStatus::Operational).is_ok());
        mock.assert();
    }

    #[test]
    fn test_non_success_is_rejected() {
        let mut server = Server::new();
        let _mock = server
            .mock("PATCH", Matcher::Any)
            .with_status(401)
            .create();

        let reporter = StatuspageReporter::new(&config(&server.url()), "bad".into()).unwrap();
        let err = reporter
            .publish("abc", ComponentStatus::Operational)
            .unwrap_err();

        assert!(matches!(
            err,
            ReportError::Rejected { ref component_id, status: 401 } if component_id == "abc"
        ));
    }

    #[test]
    fn test_unreachable_board_is_transport_error_without_key() {
        let port = statusprobe_testkit::refused_port();
        let reporter = StatuspageReporter::with_timeout(
            &config(&format!("http://127.0.0.1:{port}")),
            "topsecret".into(),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = reporter
            .publish("abc", ComponentStatus::Operational)
            .unwrap_err();

        assert!(matches!(err, ReportError::Transport(_)));
        assert!(!err.to_string().contains("topsecret"));
    }

    #[test]
    fn test_invalid_api_base_rejected() {
        assert!(StatuspageReporter::new(&config("not a url"), "k".into()).is_err());
        assert!(StatuspageReporter::new(&config("mailto:ops@example.com"), "k".into()).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let reporter =
            StatuspageReporter::new(&config("https://api.statuspage.io"), "topsecret".into())
                .unwrap();
        let debug = format!("{:?}", reporter);
        assert!(!debug.contains("topsecret"));
        assert!(debug.contains("<redacted>"));
    }
}
