//! Check configuration.

use std::time::Duration;

use crate::grade::{ThresholdError, Thresholds};

/// Public SSL Labs API, version 2.
pub const DEFAULT_API_URL: &str = "https://api.ssllabs.com/api/v2/";
/// Fixed delay between polls of an in-progress assessment.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(240);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CACHE_HOURS: u32 = 2;

/// How the first request asks for an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Accept a cached assessment no older than `max_age_hours`.
    FromCache { max_age_hours: u32 },
    /// Always start a fresh assessment.
    StartNew,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::FromCache {
            max_age_hours: DEFAULT_CACHE_HOURS,
        }
    }
}

/// Immutable settings for one check run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOptions {
    pub domain: String,
    /// Only grade the endpoint with this address.
    pub ip_filter: Option<String>,
    pub publish: bool,
    pub cache: CachePolicy,
    /// Bound on the polling sequence; `None` polls until a terminal state.
    pub deadline: Option<Duration>,
    pub poll_interval: Duration,
    pub thresholds: Thresholds,
    pub api_url: String,
    pub connect_timeout: Duration,
    /// Upper bound for a single API request, including the first one.
    pub request_timeout: Duration,
}

impl CheckOptions {
    /// Options with defaults for everything but the domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ip_filter: None,
            publish: false,
            cache: CachePolicy::default(),
            deadline: Some(DEFAULT_DEADLINE),
            poll_interval: DEFAULT_POLL_INTERVAL,
            thresholds: Thresholds::default(),
            api_url: DEFAULT_API_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_ip_filter(mut self, ip: impl Into<String>) -> Self {
        self.ip_filter = Some(ip.into());
        self
    }

    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// A zero deadline disables it.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = (!deadline.is_zero()).then_some(deadline);
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Reject settings that cannot produce a meaningful check.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.domain.trim().is_empty() {
            return Err(OptionsError::EmptyDomain);
        }
        if matches!(self.ip_filter.as_deref(), Some(ip) if ip.trim().is_empty()) {
            return Err(OptionsError::EmptyIpFilter);
        }
        if self.poll_interval.is_zero() {
            return Err(OptionsError::ZeroPollInterval);
        }
        if self.request_timeout.is_zero() {
            return Err(OptionsError::ZeroRequestTimeout);
        }
        Ok(())
    }

    /// Query parameters for the request that starts or reuses an assessment.
    pub fn initial_params(&self) -> Vec<(&'static str, String)> {
        let mut params = self.poll_params();
        match self.cache {
            CachePolicy::FromCache { max_age_hours } => {
                params.push(("fromCache", "on".to_string()));
                params.push(("maxAge", max_age_hours.to_string()));
            }
            CachePolicy::StartNew => params.push(("startNew", "on".to_string())),
        }
        params
    }

    /// Query parameters for follow-up polls. Never carries `startNew`,
    /// which would restart the running assessment.
    pub fn poll_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("host", self.domain.clone()),
            ("publish", if self.publish { "on" } else { "off" }.to_string()),
        ]
    }
}

/// Configuration rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("domain name must not be empty")]
    EmptyDomain,

    #[error("IP address filter must not be empty")]
    EmptyIpFilter,

    #[error("poll interval must be greater than zero")]
    ZeroPollInterval,

    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,

    #[error(transparent)]
    Threshold(#[from] ThresholdError),
}
