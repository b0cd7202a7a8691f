//! Error types for the namespace pod check

use strum::Display;
use thiserror::Error;

/// Step of the per-namespace pod lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProbeStage {
    Create,
    Delete,
}

/// Errors raised by the Kubernetes collaborator
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("error creating kube client: {0}")]
    Connect(String),

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Why a single namespace probe failed
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("error deploying pod {pod} in namespace {namespace}: {source}")]
    Create {
        pod: String,
        namespace: String,
        #[source]
        source: ClusterError,
    },

    #[error("error deleting pod {pod} in namespace {namespace}: {source}")]
    Delete {
        pod: String,
        namespace: String,
        #[source]
        source: ClusterError,
    },
}

impl ProbeError {
    /// Lifecycle step the failure happened in
    pub fn stage(&self) -> ProbeStage {
        match self {
            ProbeError::Create { .. } => ProbeStage::Create,
            ProbeError::Delete { .. } => ProbeStage::Delete,
        }
    }
}

/// Errors from the health-aggregation service client
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("KH_REPORTING_URL is not set")]
    MissingUrl,

    #[error("invalid reporting url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid run uuid {0}")]
    InvalidRunId(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("reporting endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("reporting endpoint {0} was not reachable before the deadline")]
    Unreachable(String),
}

/// Run-level failures that decide how the process ends
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to list namespaces: {0}")]
    ListNamespaces(#[source] ClusterError),

    #[error("error when reporting to kuberhealthy: {0}")]
    Report(#[from] ReportError),
}
