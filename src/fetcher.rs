use std::thread;
use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::Url;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::config::{QueryParams, Settings};
use crate::error::FetchError;
use crate::http_client::build_http_client;

const RETRY_PAUSE: Duration = Duration::from_millis(500);

pub trait RemoteFetcher {
    fn fetch(&self, base_url: &str, params: &QueryParams) -> Result<Vec<u8>, FetchError>;
}

impl<F: RemoteFetcher + ?Sized> RemoteFetcher for &F {
    fn fetch(&self, base_url: &str, params: &QueryParams) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(base_url, params)
    }
}

pub fn build_url(base_url: &str, params: &QueryParams) -> Result<Url, FetchError> {
    Url::parse_with_params(base_url, params.iter()).map_err(|err| FetchError::InvalidUrl {
        url: base_url.to_string(),
        reason: err.to_string(),
    })
}

pub struct HttpFetcher {
    client: OnceCell<Client>,
    timeout: Duration,
    user_agent: String,
    attempts: u32,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: impl Into<String>, attempts: u32) -> Self {
        Self {
            client: OnceCell::new(),
            timeout,
            user_agent: user_agent.into(),
            attempts: attempts.max(1),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.timeout,
            settings.user_agent.clone(),
            settings.fetch_attempts,
        )
    }

    fn client(&self) -> Result<&Client, FetchError> {
        self.client
            .get_or_try_init(|| build_http_client(self.timeout, &self.user_agent))
    }

    fn fetch_once(&self, client: &Client, url: &Url) -> Result<Vec<u8>, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = client.get(url.clone()).send().map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = resp.bytes().map_err(transport)?;
        Ok(body.to_vec())
    }
}

impl RemoteFetcher for HttpFetcher {
    fn fetch(&self, base_url: &str, params: &QueryParams) -> Result<Vec<u8>, FetchError> {
        let url = build_url(base_url, params)?;
        let client = self.client()?;

        let mut attempt = 1;
        loop {
            debug!(%url, attempt, "fetching");
            match self.fetch_once(client, &url) {
                Ok(body) => return Ok(body),
                Err(err) if attempt < self.attempts && err.is_transient() => {
                    warn!(%url, attempt, error = %err, "fetch failed, retrying");
                    attempt += 1;
                    thread::sleep(RETRY_PAUSE);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
