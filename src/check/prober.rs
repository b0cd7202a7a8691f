//! Per-namespace probe: create the probe pod, then delete it

use k8s_openapi::api::core::v1::Pod;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::deadline::Deadline;
use crate::error::{ClusterError, ProbeError, ProbeStage};
use crate::k8s::{probe_pod, ClusterApi};

/// What gets deployed into every namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSpec {
    pub pod_name: String,
    pub image: String,
}

impl ProbeSpec {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pod_name: config.probe_pod_name.clone(),
            image: config.probe_image.clone(),
        }
    }

    pub fn pod_for(&self, namespace: &str) -> Pod {
        probe_pod(&self.pod_name, namespace, &self.image)
    }
}

impl Default for ProbeSpec {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of probing one namespace
#[derive(Debug)]
pub struct ProbeOutcome {
    pub namespace: String,
    pub error: Option<ProbeError>,
}

impl ProbeOutcome {
    pub fn success(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            error: None,
        }
    }

    pub fn failure(namespace: impl Into<String>, error: ProbeError) -> Self {
        Self {
            namespace: namespace.into(),
            error: Some(error),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Deploy and then delete the probe pod in `namespace`.
///
/// Never fails as a whole: any error is captured in the returned outcome.
/// Deletion only runs after a successful creation. A failed deletion leaves
/// the pod behind; it is reported, not cleaned up.
#[instrument(skip(cluster, spec, deadline), fields(pod = %spec.pod_name))]
pub async fn probe_namespace<C>(
    cluster: &C,
    spec: &ProbeSpec,
    deadline: &Deadline,
    namespace: &str,
) -> ProbeOutcome
where
    C: ClusterApi + ?Sized,
{
    info!("Deploying pod in namespace");

    let result = match create(cluster, spec, deadline, namespace).await {
        Ok(()) => delete(cluster, spec, deadline, namespace).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ProbeOutcome::success(namespace),
        Err(e) => {
            error!(error = %e, "Namespace probe failed");
            if e.stage() == ProbeStage::Delete {
                warn!(
                    pod = %spec.pod_name,
                    namespace,
                    "Probe pod may be left behind in namespace"
                );
            }
            ProbeOutcome::failure(namespace, e)
        }
    }
}

async fn create<C>(
    cluster: &C,
    spec: &ProbeSpec,
    deadline: &Deadline,
    namespace: &str,
) -> Result<(), ProbeError>
where
    C: ClusterApi + ?Sized,
{
    let pod = spec.pod_for(namespace);
    deadline
        .run(cluster.create_pod(namespace, &pod))
        .await
        .unwrap_or_else(|_| Err(ClusterError::DeadlineExceeded))
        .map_err(|source| ProbeError::Create {
            pod: spec.pod_name.clone(),
            namespace: namespace.to_string(),
            source,
        })?;

    info!(pod = %spec.pod_name, namespace, "Pod created successfully in namespace");
    Ok(())
}

async fn delete<C>(
    cluster: &C,
    spec: &ProbeSpec,
    deadline: &Deadline,
    namespace: &str,
) -> Result<(), ProbeError>
where
    C: ClusterApi + ?Sized,
{
    deadline
        .run(cluster.delete_pod(namespace, &spec.pod_name))
        .await
        .unwrap_or_else(|_| Err(ClusterError::DeadlineExceeded))
        .map_err(|source| ProbeError::Delete {
            pod: spec.pod_name.clone(),
            namespace: namespace.to_string(),
            source,
        })?;

    info!(pod = %spec.pod_name, namespace, "Pod successfully deleted in namespace");
    Ok(())
}
