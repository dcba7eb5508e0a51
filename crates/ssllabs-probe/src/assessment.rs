//! Assessment documents returned by the `analyze` endpoint.

use serde::Deserialize;
use serde_json::Value;

/// Lifecycle state reported by the grading service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssessmentStatus {
    Dns,
    InProgress,
    Ready,
    Error,
    /// Anything the service adds later; polled like `IN_PROGRESS`.
    #[serde(other)]
    Other,
}

impl AssessmentStatus {
    /// `READY` and `ERROR` will not change without a new request.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssessmentStatus::Ready | AssessmentStatus::Error)
    }
}

/// One tested address of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub ip_address: String,
    #[serde(default)]
    pub grade: Option<String>,
}

impl Endpoint {
    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentFields {
    status: AssessmentStatus,
    #[serde(default)]
    status_message: Option<String>,
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

/// A fetched assessment: the typed fields the probe acts on plus the raw
/// document for the diagnostic dump.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub status: AssessmentStatus,
    pub status_message: Option<String>,
    pub endpoints: Vec<Endpoint>,
    raw: Value,
}

impl Assessment {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let fields = AssessmentFields::deserialize(&raw)?;
        Ok(Self {
            status: fields.status,
            status_message: fields.status_message,
            endpoints: fields.endpoints,
            raw,
        })
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
