use std::fmt::Display;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};
use opendota_model::{HeroId, MatchId, Mode, RequestError};
use serde_json::Value;

use crate::config::Config;
use crate::cooldown::Cooldown;
use crate::response::{self, is_maintenance_page, NODE_DISABLED_BODY};
use crate::transport::{HttpTransport, Transport};

const API_KEY_PARAM: &str = "api_key";

/// Blocking OpenDota client with a built-in cooldown between requests.
///
/// All request operations take `&mut self`; wrap the client in a `Mutex`
/// to share it between threads.
pub struct OpenDota<T = HttpTransport> {
    hostname: String,
    api_key: Option<String>,
    verbose: bool,
    max_retries: Option<u32>,
    retry_delay: Duration,
    cooldown: Cooldown,
    transport: T,
}

impl OpenDota<HttpTransport> {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.insecure, config.timeout())?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> OpenDota<T> {
    pub fn with_transport(config: &Config, transport: T) -> Self {
        let client = Self {
            hostname: config.effective_hostname(),
            api_key: config.api_key().map(String::from),
            verbose: config.verbose,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            cooldown: Cooldown::new(config.cooldown()),
            transport,
        };
        if config.insecure {
            warn!("TLS certificate verification is disabled");
        }
        client.report(format!(
            "Initialised OpenDota instance. Host: {}, cooldown: {:?}",
            client.hostname,
            client.cooldown.interval()
        ));
        client
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn cooldown(&self) -> &Cooldown {
        &self.cooldown
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET /heroes
    pub fn heroes(&mut self, mode: Mode) -> Result<Value, RequestError> {
        self.request("heroes", mode, &[], false)
    }

    /// GET /heroes/{hero_id}/matches
    pub fn hero_matches(&mut self, hero_id: HeroId, mode: Mode) -> Result<Value, RequestError> {
        self.request(&format!("heroes/{hero_id}/matches"), mode, &[], false)
    }

    /// GET /matches/{match_id}
    pub fn match_details(&mut self, match_id: MatchId, mode: Mode) -> Result<Value, RequestError> {
        self.request(&format!("matches/{match_id}"), mode, &[], false)
    }

    /// Sends a request to an arbitrary endpoint.
    ///
    /// In [`Mode::Wait`] generic API errors are retried after the retry delay
    /// until a valid payload arrives or `max_retries` is spent. "Not Found" and
    /// "Node disabled" are never retried.
    pub fn request(
        &mut self,
        path: &str,
        mode: Mode,
        data: &[(&str, &str)],
        is_post: bool,
    ) -> Result<Value, RequestError> {
        let path = path.trim_start_matches('/');
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            let err = match self.attempt(path, mode, data, is_post) {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if mode == Mode::Wait && err.is_retryable() {
                if self.max_retries.is_some_and(|max| attempts > max) {
                    warn!("/{path}: giving up after {attempts} attempts: {err}");
                    return Err(RequestError::RetriesExhausted {
                        attempts,
                        last: Box::new(err),
                    });
                }
                self.report(format!("{err}. Waiting"));
                thread::sleep(self.retry_delay);
                continue;
            }
            match &err {
                RequestError::Skipped => {}
                RequestError::NotFound => self.report("404, Skipping"),
                RequestError::NodeDisabled => self.report("Node disabled"),
                _ => self.report(format!("{err}. Skipping request")),
            }
            return Err(err);
        }
    }

    fn attempt(
        &mut self,
        path: &str,
        mode: Mode,
        data: &[(&str, &str)],
        is_post: bool,
    ) -> Result<Value, RequestError> {
        self.report(format!("Sending request to /{path} endpoint ({mode})"));
        match mode {
            Mode::Wait => {
                if !self.cooldown.is_ready() {
                    self.report("Holding on");
                }
                self.cooldown.wait();
            }
            Mode::Skip if !self.cooldown.is_ready() => {
                self.report("API Cooldown. Skipping request");
                return Err(RequestError::Skipped);
            }
            Mode::Skip | Mode::Immediate => {}
        }

        let body = if is_post {
            self.post(path, data)
        } else {
            self.get(path, data)
        };
        self.cooldown.mark_request();

        response::parse(&body?)
    }

    fn get(&mut self, path: &str, data: &[(&str, &str)]) -> Result<String, RequestError> {
        let url = self.endpoint_url(path);
        let query = self.with_api_key(data);
        let body = self.transport.get(&url, &query);
        self.report_transport(&body);
        body.map_err(transport_error)
    }

    fn post(&mut self, path: &str, data: &[(&str, &str)]) -> Result<String, RequestError> {
        let url = self.endpoint_url(path);
        let query = self.with_api_key(&[]);
        let form = owned_pairs(data);
        let body = self.transport.post(&url, &query, &form);
        self.report_transport(&body);
        let body = body.map_err(transport_error)?;
        if is_maintenance_page(&body) {
            return Ok(NODE_DISABLED_BODY.to_string());
        }
        Ok(body)
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.hostname.trim_end_matches('/'), path)
    }

    fn with_api_key(&self, data: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut pairs = owned_pairs(data);
        if let Some(key) = &self.api_key {
            pairs.push((API_KEY_PARAM.to_string(), key.clone()));
        }
        pairs
    }

    fn report_transport(&self, body: &Result<String>) {
        match body {
            Ok(_) => self.report("OK"),
            Err(e) => warn!("HTTP error: {e:#}"),
        }
    }

    fn report(&self, message: impl Display) {
        if self.verbose {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }
}

fn owned_pairs(data: &[(&str, &str)]) -> Vec<(String, String)> {
    data.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn transport_error(e: anyhow::Error) -> RequestError {
    RequestError::Transport(format!("{e:#}"))
}
