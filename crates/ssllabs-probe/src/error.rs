//! Probe error types.

use thiserror::Error;

use crate::status::{CheckOutcome, Status};

/// Failures talking to the grading API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Could not connect to ssllabs: Connection timeout")]
    ConnectTimeout,

    #[error("Could not fetch data from API: Request timed out")]
    RequestTimeout,

    #[error("Could not connect to ssllabs: Certificate validation failed")]
    Tls,

    #[error("Could not connect to ssllabs: Failed to resolve hostname")]
    Resolve,

    #[error("Could not fetch data from API: HTTP error code was {0}")]
    HttpStatus(u16),

    #[error("Could not fetch data from API: {0}")]
    Decode(String),

    #[error("Could not build API request: {0}")]
    Request(String),
}

/// Everything that ends a check before a grade can be reported.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Check failed: {0}")]
    AssessmentFailed(String),

    #[error("Timeout while waiting for test results")]
    Timeout,

    #[error("IP address '{ip}' not found in test results of domain '{domain}'")]
    IpNotFound { ip: String, domain: String },
}

impl CheckError {
    /// Operational failures are UNKNOWN; problems with the assessed
    /// domain itself are CRITICAL.
    pub fn status(&self) -> Status {
        match self {
            CheckError::Transport(_) => Status::Unknown,
            CheckError::AssessmentFailed(_)
            | CheckError::Timeout
            | CheckError::IpNotFound { .. } => Status::Critical,
        }
    }
}

impl From<CheckError> for CheckOutcome {
    fn from(err: CheckError) -> Self {
        CheckOutcome::new(err.status(), err.to_string())
    }
}

pub type CheckResult<T> = Result<T, CheckError>;
