//! HTTP access to the grading API.
//!
//! The driver only sees the [`Transport`] trait; [`HttpTransport`] is the
//! production implementation backed by `reqwest` with rustls.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;
use crate::options::CheckOptions;

/// Fetches one `analyze` document for a set of query parameters.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<Value, TransportError>;
}

/// `reqwest`-backed transport for `<api-url>/analyze`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    analyze_url: String,
}

impl HttpTransport {
    /// `request_timeout` bounds each request end to end, so a server that
    /// accepts the connection and never answers still yields an error.
    pub fn new(
        api_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(concat!("check_ssllabs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            analyze_url: analyze_url(api_url),
        })
    }

    pub fn from_options(options: &CheckOptions) -> Result<Self, TransportError> {
        Self::new(
            &options.api_url,
            options.connect_timeout,
            options.request_timeout,
        )
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<Value, TransportError> {
        let response = self
            .client
            .get(&self.analyze_url)
            .query(params)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, url = %self.analyze_url, "analyze request rejected");
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

fn analyze_url(base: &str) -> String {
    format!("{}/analyze", base.trim_end_matches('/'))
}

/// Map a `reqwest` failure onto the probe's transport categories.
fn classify(err: reqwest::Error) -> TransportError {
    debug!(error = %err, "analyze request failed");
    if err.is_timeout() && err.is_connect() {
        TransportError::ConnectTimeout
    } else if err.is_timeout() {
        TransportError::RequestTimeout
    } else if is_tls_failure(&err) {
        TransportError::Tls
    } else if err.is_connect() {
        TransportError::Resolve
    } else {
        TransportError::Request(err.to_string())
    }
}

/// rustls errors usually arrive wrapped in an `io::Error`, whose `source()`
/// skips the wrapped value, so unwrap those explicitly.
fn is_tls_failure(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<rustls::Error>() {
            return true;
        }
        if let Some(inner) = e.downcast_ref::<std::io::Error>().and_then(|io| io.get_ref()) {
            if is_tls_failure(inner) {
                return true;
            }
        }
        current = e.source();
    }
    false
}
