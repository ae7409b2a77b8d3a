use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

pub type Pairs = [(String, String)];

/// Raw HTTP access used by the client. Returns response bodies regardless of status code.
pub trait Transport {
    fn get(&mut self, url: &str, query: &Pairs) -> Result<String>;
    fn post(&mut self, url: &str, query: &Pairs, form: &Pairs) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport(Client);

impl HttpTransport {
    pub fn new(insecure: bool, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().danger_accept_invalid_certs(insecure);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self(client))
    }
}

impl Transport for HttpTransport {
    fn get(&mut self, url: &str, query: &Pairs) -> Result<String> {
        let body = self
            .0
            .get(url)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?
            .text()?;
        Ok(body)
    }

    fn post(&mut self, url: &str, query: &Pairs, form: &Pairs) -> Result<String> {
        let body = self
            .0
            .post(url)
            .query(query)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(serde_urlencoded::to_string(form)?)
            .send()
            .with_context(|| format!("POST {url}"))?
            .text()?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn get_passes_query_and_returns_body() -> Result<()> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/heroes")
                .query_param("api_key", "secret");
            then.status(200).body(r#"[{"id":1}]"#);
        });

        let mut transport = HttpTransport::new(false, None)?;
        let body = transport.get(&server.url("/heroes"), &pairs(&[("api_key", "secret")]))?;

        assert_eq!(body, r#"[{"id":1}]"#);
        mock.assert();
        Ok(())
    }

    #[test]
    fn error_status_still_returns_body() -> Result<()> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/matches/1");
            then.status(404).body(r#"{"error":"Not Found"}"#);
        });

        let mut transport = HttpTransport::new(false, None)?;
        let body = transport.get(&server.url("/matches/1"), &[])?;

        assert_eq!(body, r#"{"error":"Not Found"}"#);
        mock.assert();
        Ok(())
    }

    #[test]
    fn post_sends_form_body() -> Result<()> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/request/42")
                .query_param("api_key", "secret")
                .body("reason=parse+me&priority=1");
            then.status(200).body(r#"{"job":{"jobId":7}}"#);
        });

        let mut transport = HttpTransport::new(false, None)?;
        let body = transport.post(
            &server.url("/request/42"),
            &pairs(&[("api_key", "secret")]),
            &pairs(&[("reason", "parse me"), ("priority", "1")]),
        )?;

        assert_eq!(body, r#"{"job":{"jobId":7}}"#);
        mock.assert();
        Ok(())
    }

    #[test]
    fn connection_failure_is_an_error() -> Result<()> {
        let mut transport = HttpTransport::new(false, Some(Duration::from_secs(2)))?;
        assert!(transport.get("http://127.0.0.1:1/heroes", &[]).is_err());
        Ok(())
    }
}
