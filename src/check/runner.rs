//! Check pipeline: readiness gate, namespace listing, probing, verdict

use futures::{stream, StreamExt};
use std::fmt::Display;
use tracing::{debug, error, info, instrument};

use super::prober::{probe_namespace, ProbeOutcome, ProbeSpec};
use super::summary::RunSummary;
use crate::config::Config;
use crate::deadline::Deadline;
use crate::error::{CheckError, ClusterError};
use crate::k8s::ClusterApi;
use crate::report::HealthReporter;

/// Verdict that was delivered to the health-aggregation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Healthy { succeeded: usize, total: usize },
    Unhealthy { errors: Vec<String> },
}

/// One run of the namespace pod check
pub struct NamespaceCheck<'a> {
    cluster: &'a dyn ClusterApi,
    reporter: &'a dyn HealthReporter,
    spec: ProbeSpec,
    concurrency: usize,
}

impl<'a> NamespaceCheck<'a> {
    /// Create a sequential check with the default probe pod
    pub fn new(cluster: &'a dyn ClusterApi, reporter: &'a dyn HealthReporter) -> Self {
        Self {
            cluster,
            reporter,
            spec: ProbeSpec::default(),
            concurrency: 1,
        }
    }

    /// Create a check using the probe pod and concurrency from `config`
    pub fn from_config(
        cluster: &'a dyn ClusterApi,
        reporter: &'a dyn HealthReporter,
        config: &Config,
    ) -> Self {
        Self::new(cluster, reporter)
            .with_spec(ProbeSpec::from_config(config))
            .with_concurrency(config.probe_concurrency())
    }

    /// Set the probe pod deployed into each namespace
    pub fn with_spec(mut self, spec: ProbeSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Set how many namespaces are probed at once, at least one
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Run the check and deliver its verdict.
    ///
    /// Returns the delivered verdict. `Err` only when the verdict itself could
    /// not be reported.
    #[instrument(skip_all, fields(pod = %self.spec.pod_name, concurrency = self.concurrency))]
    pub async fn run(&self, deadline: Deadline) -> Result<Verdict, CheckError> {
        // Readiness is best effort: an unreachable endpoint is logged and the
        // run goes on, since the report may still get through later.
        if let Err(e) = self.reporter.wait_until_reachable(&deadline).await {
            error!(
                error = %e,
                "Error waiting for kuberhealthy endpoint to be contactable by checker pod"
            );
        }
        debug!(
            remaining_secs = deadline.remaining().as_secs(),
            "Readiness gate finished"
        );

        let namespaces = match self.list_namespaces(&deadline).await {
            Ok(namespaces) => namespaces,
            Err(e) => return report_setup_failure(self.reporter, e).await,
        };
        info!(count = namespaces.len(), "Found namespaces");

        let outcomes = self.probe_all(&namespaces, &deadline).await;
        let summary = RunSummary::aggregate(&outcomes);

        self.deliver(summary).await
    }

    async fn list_namespaces(&self, deadline: &Deadline) -> Result<Vec<String>, CheckError> {
        deadline
            .run(self.cluster.list_namespaces())
            .await
            .unwrap_or_else(|_| Err(ClusterError::DeadlineExceeded))
            .map_err(CheckError::ListNamespaces)
    }

    /// Probe every namespace, at most `concurrency` at a time. Outcomes come
    /// back in listing order regardless of completion order.
    async fn probe_all(&self, namespaces: &[String], deadline: &Deadline) -> Vec<ProbeOutcome> {
        stream::iter(namespaces)
            .map(|namespace| probe_namespace(self.cluster, &self.spec, deadline, namespace))
            .buffered(self.concurrency)
            .collect()
            .await
    }

    async fn deliver(&self, summary: RunSummary) -> Result<Verdict, CheckError> {
        if summary.is_healthy() {
            info!(
                succeeded = summary.succeeded,
                total = summary.total,
                "namespace-pod-check was able to successfully deploy and delete test pods in all namespaces"
            );
            self.reporter.report_success().await?;
            info!("Successfully reported to kuberhealthy");
            return Ok(Verdict::Healthy {
                succeeded: summary.succeeded,
                total: summary.total,
            });
        }

        error!(
            failed = summary.failed,
            total = summary.total,
            "{}",
            summary.failure_headline()
        );
        let errors = summary.failure_messages();
        self.reporter.report_failure(errors.clone()).await?;
        info!("Successfully reported error to kuberhealthy");
        Ok(Verdict::Unhealthy { errors })
    }
}

/// Report a failure that stopped the run before any namespace was probed
pub async fn report_setup_failure<R, E>(reporter: &R, err: E) -> Result<Verdict, CheckError>
where
    R: HealthReporter + ?Sized,
    E: Display,
{
    let errors = vec![err.to_string()];
    error!(error = %err, "Check could not run");
    reporter.report_failure(errors.clone()).await?;
    info!("Successfully reported error to kuberhealthy");
    Ok(Verdict::Unhealthy { errors })
}
