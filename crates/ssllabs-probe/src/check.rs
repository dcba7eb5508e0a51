//! One complete check: drive the assessment, grade it, produce an outcome.

use tracing::info;

use crate::assessment::{Assessment, Endpoint};
use crate::driver::AssessmentDriver;
use crate::error::{CheckError, CheckResult};
use crate::grade::worst_grade;
use crate::options::CheckOptions;
use crate::status::{CheckOutcome, Status};
use crate::transport::Transport;

/// Grade derived from a finished assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grading {
    pub worst_grade: Option<String>,
    pub status: Status,
}

/// Run the full check. Every failure becomes an outcome; nothing escapes.
pub async fn run_check<T: Transport + ?Sized>(
    transport: &T,
    options: &CheckOptions,
) -> CheckOutcome {
    match AssessmentDriver::new(transport, options).run().await {
        Ok(assessment) => match grade_assessment(&assessment, options) {
            Ok(grading) => grading_outcome(&grading, options).with_details(assessment.into_raw()),
            Err(err) => err.into(),
        },
        Err(err) => err.into(),
    }
}

/// Reduce the considered endpoints to a worst grade and classify it.
pub fn grade_assessment(assessment: &Assessment, options: &CheckOptions) -> CheckResult<Grading> {
    let considered = considered_endpoints(&assessment.endpoints, options)?;
    let worst = worst_grade(considered.iter().map(|e| e.grade()));
    let status = options.thresholds.classify(worst);

    info!(
        domain = %options.domain,
        endpoints = considered.len(),
        worst_grade = worst.unwrap_or("-"),
        %status,
        "assessment graded"
    );

    Ok(Grading {
        worst_grade: worst.map(str::to_string),
        status,
    })
}

/// All endpoints, or just the one matching the IP filter.
fn considered_endpoints<'a>(
    endpoints: &'a [Endpoint],
    options: &CheckOptions,
) -> CheckResult<Vec<&'a Endpoint>> {
    let Some(ip) = options.ip_filter.as_deref() else {
        return Ok(endpoints.iter().collect());
    };

    endpoints
        .iter()
        .find(|e| e.ip_address == ip)
        .map(|e| vec![e])
        .ok_or_else(|| CheckError::IpNotFound {
            ip: ip.to_string(),
            domain: options.domain.clone(),
        })
}

fn grading_outcome(grading: &Grading, options: &CheckOptions) -> CheckOutcome {
    let grade = grading.worst_grade.as_deref().unwrap_or("unknown");
    CheckOutcome::new(
        grading.status,
        format!("SSLLabs score for domain '{}' is {grade}", options.domain),
    )
}
