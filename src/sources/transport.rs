use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::Config;
use crate::errors::NoteSearchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET per call, no retries. Non-success statuses are returned, not raised.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> NoteSearchResult<HttpResponse>;
}

pub struct HttpTransport {
    client: Client,
    proxy_prefix: Option<String>,
}

impl HttpTransport {
    pub fn new(timeout: Duration, proxy_prefix: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(concat!("notesearch/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
            proxy_prefix,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.proxy_url.clone(),
        )
    }

    /// The URL actually requested: the target itself, or the proxy prefix
    /// followed by the percent-encoded target.
    pub fn outbound_url(&self, url: &str) -> String {
        match &self.proxy_prefix {
            Some(prefix) => {
                let encoded: String = url::form_urlencoded::byte_serialize(url.as_bytes()).collect();
                format!("{}{}", prefix, encoded)
            }
            None => url.to_string(),
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> NoteSearchResult<HttpResponse> {
        let outbound = self.outbound_url(url);
        debug!(url = %outbound, "GET");

        let response = self.client.get(&outbound).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(HttpResponse { status, body })
    }
}
