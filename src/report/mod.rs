//! Reporting to the health-aggregation service
//!
//! The check never signals its verdict through its exit status; every outcome
//! is delivered through a [`HealthReporter`].

mod kuberhealthy;

use async_trait::async_trait;

use crate::deadline::Deadline;
use crate::error::ReportError;

pub use kuberhealthy::{CheckReport, KuberhealthyClient, RUN_UUID_HEADER};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthReporter: Send + Sync {
    /// Block until the reporting endpoint accepts connections or `deadline`
    /// passes.
    async fn wait_until_reachable(&self, deadline: &Deadline) -> Result<(), ReportError>;

    async fn report_success(&self) -> Result<(), ReportError>;

    async fn report_failure(&self, errors: Vec<String>) -> Result<(), ReportError>;
}
