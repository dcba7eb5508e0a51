//! Assessment driver — brings a remote assessment to a terminal state.
//!
//! The first request starts (or reuses) an assessment; later requests only
//! poll it. The polling sequence runs under a single deadline that also
//! interrupts an in-flight request or a pending sleep.

use tracing::{debug, info, warn};

use crate::assessment::{Assessment, AssessmentStatus};
use crate::error::{CheckError, CheckResult, TransportError};
use crate::options::CheckOptions;
use crate::transport::Transport;

pub struct AssessmentDriver<'a, T: ?Sized> {
    transport: &'a T,
    options: &'a CheckOptions,
}

impl<'a, T: Transport + ?Sized> AssessmentDriver<'a, T> {
    pub fn new(transport: &'a T, options: &'a CheckOptions) -> Self {
        Self { transport, options }
    }

    /// Fetch the assessment and poll it until it is `READY`.
    ///
    /// A terminal `ERROR` and an expired deadline are both reported as
    /// errors, distinct from transport failures.
    pub async fn run(&self) -> CheckResult<Assessment> {
        let domain = &self.options.domain;
        info!(%domain, cache = ?self.options.cache, "requesting assessment");

        let first = self.fetch(&self.options.initial_params()).await?;
        let assessment = if first.is_terminal() {
            first
        } else {
            self.poll_with_deadline(first).await?
        };

        match assessment.status {
            AssessmentStatus::Error => {
                let message = assessment.status_message.clone().unwrap_or_default();
                warn!(%domain, %message, "assessment failed");
                Err(CheckError::AssessmentFailed(message))
            }
            _ => Ok(assessment),
        }
    }

    async fn poll_with_deadline(&self, current: Assessment) -> CheckResult<Assessment> {
        let Some(deadline) = self.options.deadline else {
            return self.poll(current).await;
        };

        match tokio::time::timeout(deadline, self.poll(current)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    domain = %self.options.domain,
                    deadline_secs = deadline.as_secs(),
                    "deadline expired before assessment finished"
                );
                Err(CheckError::Timeout)
            }
        }
    }

    async fn poll(&self, mut current: Assessment) -> CheckResult<Assessment> {
        let params = self.options.poll_params();
        while !current.is_terminal() {
            tokio::time::sleep(self.options.poll_interval).await;
            current = self.fetch(&params).await?;
            info!(domain = %self.options.domain, status = ?current.status, "polled assessment");
        }
        Ok(current)
    }

    async fn fetch(&self, params: &[(&'static str, String)]) -> CheckResult<Assessment> {
        let raw = self.transport.fetch(params).await?;
        let assessment =
            Assessment::from_value(raw).map_err(|e| TransportError::Decode(e.to_string()))?;
        debug!(
            status = ?assessment.status,
            endpoints = assessment.endpoints.len(),
            "assessment fetched"
        );
        Ok(assessment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use crate::options::CachePolicy;

    /// Replays canned documents and records the parameters it was called with.
    struct Scripted {
        responses: Mutex<Vec<Value>>,
        calls: Mutex<Vec<Vec<(&'static str, String)>>>,
    }

    impl Scripted {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<(&'static str, String)>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn fetch(
            &self,
            params: &[(&'static str, String)],
        ) -> Result<Value, TransportError> {
            self.calls.lock().unwrap().push(params.to_vec());
            let mut responses = self.responses.lock().unwrap();
            if responses.len() > 1 {
                Ok(responses.remove(0))
            } else {
                Ok(responses[0].clone())
            }
        }
    }

    fn ready() -> Value {
        json!({ "status": "READY", "endpoints": [{ "ipAddress": "192.0.2.1", "grade": "A" }] })
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_first_response_skips_polling() {
        let transport = Scripted::new(vec![ready()]);
        let options = CheckOptions::new("example.com");

        let assessment = AssessmentDriver::new(&transport, &options).run().await.unwrap();
        assert_eq!(assessment.status, AssessmentStatus::Ready);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn only_first_request_carries_start_hints() {
        let transport = Scripted::new(vec![
            json!({ "status": "DNS" }),
            json!({ "status": "IN_PROGRESS" }),
            ready(),
        ]);
        let options = CheckOptions::new("example.com").with_cache(CachePolicy::StartNew);

        AssessmentDriver::new(&transport, &options).run().await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].iter().any(|(k, v)| *k == "startNew" && v == "on"));
        for poll in &calls[1..] {
            assert_eq!(poll, &options.poll_params());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn polls_at_fixed_interval() {
        let transport = Scripted::new(vec![
            json!({ "status": "IN_PROGRESS" }),
            json!({ "status": "IN_PROGRESS" }),
            ready(),
        ]);
        let options = CheckOptions::new("example.com");

        let started = tokio::time::Instant::now();
        AssessmentDriver::new(&transport, &options).run().await.unwrap();
        assert_eq!(started.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn error_status_fails_with_message() {
        let transport = Scripted::new(vec![
            json!({ "status": "IN_PROGRESS" }),
            json!({ "status": "ERROR", "statusMessage": "Unable to resolve domain name" }),
        ]);
        let options = CheckOptions::new("example.invalid");

        let err = AssessmentDriver::new(&transport, &options).run().await.unwrap_err();
        assert!(
            matches!(&err, CheckError::AssessmentFailed(m) if m == "Unable to resolve domain name")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_pending_sleep() {
        let transport = Scripted::new(vec![json!({ "status": "IN_PROGRESS" })]);
        let options = CheckOptions::new("example.com").with_deadline(Duration::from_secs(5));

        let started = tokio::time::Instant::now();
        let err = AssessmentDriver::new(&transport, &options).run().await.unwrap_err();
        assert!(matches!(err, CheckError::Timeout));
        // Expired mid-sleep, before the first poll was issued.
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_deadline_polls_until_terminal() {
        let mut responses = vec![json!({ "status": "IN_PROGRESS" }); 40];
        responses.push(ready());
        let transport = Scripted::new(responses);
        let options = CheckOptions::new("example.com").with_deadline(Duration::ZERO);

        let assessment = AssessmentDriver::new(&transport, &options).run().await.unwrap();
        assert!(assessment.is_terminal());
        assert_eq!(transport.calls().len(), 41);
    }

    #[tokio::test(start_paused = true)]
    async fn undecodable_document_is_a_transport_failure() {
        let transport = Scripted::new(vec![json!({ "endpoints": [] })]);
        let options = CheckOptions::new("example.com");

        let err = AssessmentDriver::new(&transport, &options).run().await.unwrap_err();
        assert!(matches!(err, CheckError::Transport(TransportError::Decode(_))));
    }
}
