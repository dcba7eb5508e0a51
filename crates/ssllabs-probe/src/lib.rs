//! ssllabs-probe — SSL Labs grade check for monitoring frameworks.
//!
//! Requests an assessment from the SSL Labs `analyze` API, polls it until
//! it finishes, reduces the endpoint grades to the worst one and maps that
//! onto a monitoring status (OK / WARNING / CRITICAL / UNKNOWN).
//!
//! # Architecture
//!
//! ```text
//! run_check(transport, options)
//!   ├── AssessmentDriver
//!   │   ├── first fetch (fromCache/maxAge or startNew)
//!   │   └── poll every 10s under a deadline → Assessment
//!   ├── grade_assessment()
//!   │   ├── IP filter → considered endpoints
//!   │   ├── worst_grade() via is_worse()
//!   │   └── Thresholds::classify() → Status
//!   └── CheckOutcome { status, message, details }
//! ```
//!
//! Exit codes are fixed by the monitoring convention: OK=0, WARNING=1,
//! CRITICAL=2, UNKNOWN=3.

pub mod assessment;
pub mod check;
pub mod driver;
pub mod error;
pub mod grade;
pub mod options;
pub mod status;
pub mod transport;

pub use assessment::{Assessment, AssessmentStatus, Endpoint};
pub use check::{Grading, grade_assessment, run_check};
pub use driver::AssessmentDriver;
pub use error::{CheckError, CheckResult, TransportError};
pub use grade::{ThresholdError, Thresholds, is_worse, worst_grade};
pub use options::{CachePolicy, CheckOptions, OptionsError};
pub use status::{CheckOutcome, Status};
pub use transport::{HttpTransport, Transport};
