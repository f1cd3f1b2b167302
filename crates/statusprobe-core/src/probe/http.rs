//! HTTP status code probes
//!
//! One request per execution, judged only by its status code. A fresh
//! client is built per execution so no pooled connection outlives the call.

use crate::error::ProbeError;
use crate::http_client::{DEFAULT_HTTP_TIMEOUT, build_client};
use crate::probe::{Probe, ProbeKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

#[derive(Clone)]
pub struct HttpProbe {
    name: String,
    method: HttpMethod,
    url: Url,
    expected_status: u16,
    form: Vec<(String, String)>,
    bearer: Option<String>,
    timeout: Duration,
}

impl HttpProbe {
    /// Liveness/read check: GET expecting 200
    pub fn get(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Get,
            url,
            expected_status: 200,
            form: Vec::new(),
            bearer: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Resource creation check: form POST expecting 201
    pub fn post(name: impl Into<String>, url: Url, form: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            method: HttpMethod::Post,
            url,
            expected_status: 201,
            form,
            bearer: None,
            timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    pub fn with_expected_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Keeps the bearer token out of logs and panics
impl fmt::Debug for HttpProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProbe")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("expected_status", &self.expected_status)
            .field("form", &self.form)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Probe for HttpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProbeKind {
        match self.method {
            HttpMethod::Get => ProbeKind::HttpGet,
            HttpMethod::Post => ProbeKind::HttpPost,
        }
    }

    fn target(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    fn probe(&self) -> Result<(), ProbeError> {
        let client = build_client(self.timeout)?;

        let mut request = match self.method {
            HttpMethod::Get => client.get(self.url.clone()),
            HttpMethod::Post => client.post(self.url.clone()).form(&self.form),
        };
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let received = request.send()?.status().as_u16();
        if received == self.expected_status {
            Ok(())
        } else {
            Err(ProbeError::StatusMismatch {
                expected: self.expected_status,
                received,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Verdict;
    use mockito::{Matcher, Server};
    use statusprobe_testkit::tcp::{ScriptedPeer, refused_port};

    fn url(server: &Server, path: &str) -> Url {
        Url::parse(&format!("{}{}", server.url(), path)).unwrap()
    }

    fn location_form() -> Vec<(String, String)> {
        vec![
            ("device_id".to_string(), "71588519".to_string()),
            ("latitudes".to_string(), String::new()),
        ]
    }

    #[test]
    fn test_get_200_passes() {
        let mut server = Server::new();
        let mock = server.mock("GET", "/events").with_status(200).create();

        let report = HttpProbe::get("frontend", url(&server, "/events")).execute();

        mock.assert();
        assert_eq!(report.verdict, Verdict::Pass, "{:?}", report.error);
    }

    #[test]
    fn test_get_non_200_fails() {
        for status in [201, 204, 301, 404, 500, 503] {
            let mut server = Server::new();
            let _mock = server.mock("GET", "/time/").with_status(status).create();

            let err = HttpProbe::get("api", url(&server, "/time/"))
                .probe()
                .unwrap_err();
            assert!(
                matches!(err, ProbeError::StatusMismatch { .. } | ProbeError::Http(_)),
                "status {status}: {err:?}"
            );
        }
    }

    #[test]
    fn test_post_201_passes_with_form_and_bearer() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/locations")
            .match_header("authorization", "Bearer s3cret")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("device_id".into(), "71588519".into()),
                Matcher::UrlEncoded("latitudes".into(), "".into()),
            ]))
            .with_status(201)
            .create();

        let report = HttpProbe::post("phone api", url(&server, "/locations"), location_form())
            .with_bearer("s3cret")
            .execute();

        mock.assert();
        assert_eq!(report.verdict, Verdict::Pass, "{:?}", report.error);
    }

    #[test]
    fn test_post_other_codes_fail() {
        for status in [200, 400, 401, 403, 500] {
            let mut server = Server::new();
            let _mock = server.mock("POST", "/locations").with_status(status).create();

            let report =
                HttpProbe::post("phone api", url(&server, "/locations"), location_form()).execute();
            assert_eq!(report.verdict, Verdict::Fail, "status {status} passed");
        }
    }

    #[test]
    fn test_custom_expected_status() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/health").with_status(204).create();

        let report = HttpProbe::get("health", url(&server, "/health"))
            .with_expected_status(204)
            .execute();
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_connection_refused_fails() {
        let target = Url::parse(&format!("http://127.0.0.1:{}/", refused_port())).unwrap();
        let err = HttpProbe::get("down", target)
            .with_timeout(Duration::from_millis(500))
            .probe()
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_silent_server_times_out() {
        let peer = ScriptedPeer::silent(Duration::from_secs(3));
        let target = Url::parse(&format!("http://127.0.0.1:{}/", peer.port())).unwrap();

        let report = HttpProbe::get("hung", target)
            .with_timeout(Duration::from_millis(300))
            .execute();

        assert_eq!(report.verdict, Verdict::Fail);
        assert!(report.elapsed_ms < 2000);
    }

    #[test]
    fn test_non_http_answer_fails() {
        let peer = ScriptedPeer::reply(b"NOT HTTP AT ALL\r\n\r\n");
        let target = Url::parse(&format!("http://127.0.0.1:{}/", peer.port())).unwrap();

        let report = HttpProbe::get("garbled", target)
            .with_timeout(Duration::from_secs(2))
            .execute();

        assert_eq!(report.verdict, Verdict::Fail);
        assert!(report.error.unwrap().starts_with("PROBE_HTTP_FAILED"));
    }

    #[test]
    fn test_unresolvable_host_fails() {
        let target = Url::parse("http://statusprobe.invalid/").unwrap();
        let report = HttpProbe::get("nxdomain", target)
            .with_timeout(Duration::from_millis(500))
            .execute();
        assert_eq!(report.verdict, Verdict::Fail);
    }

    #[test]
    fn test_debug_redacts_bearer() {
        let probe = HttpProbe::post(
            "phone api",
            Url::parse("https://api.example.com/locations").unwrap(),
            vec![],
        )
        .with_bearer("s3cret");

        let debug = format!("{probe:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
