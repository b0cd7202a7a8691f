//! Kubernetes client wrapper for the namespace pod check

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Namespace, Pod};
use kube::{
    api::{Api, DeleteParams, ListParams, PostParams},
    Client, Config,
};
use tracing::{info, instrument};

use crate::error::ClusterError;

/// The cluster operations the check needs
///
/// Implemented by [`K8sClient`] against a live API server and by fakes in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Names of every namespace visible to the client, in API order
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError>;

    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<(), ClusterError>;

    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError>;
}

/// Wrapper around kube::Client
#[derive(Clone)]
pub struct K8sClient {
    client: Client,
}

impl K8sClient {
    /// Create a new K8sClient using the default kubeconfig or in-cluster config
    #[instrument(skip_all)]
    pub async fn new() -> Result<Self, ClusterError> {
        let config = Config::infer()
            .await
            .map_err(|e| ClusterError::Connect(e.to_string()))?;
        let client = Client::try_from(config)?;

        info!("Connected to Kubernetes cluster");

        Ok(Self { client })
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl ClusterApi for K8sClient {
    #[instrument(skip(self))]
    async fn list_namespaces(&self) -> Result<Vec<String>, ClusterError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;
        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    #[instrument(skip(self, pod), fields(pod_name = %pod.metadata.name.as_deref().unwrap_or("unknown")))]
    async fn create_pod(&self, namespace: &str, pod: &Pod) -> Result<(), ClusterError> {
        self.pods(namespace)
            .create(&PostParams::default(), pod)
            .await?;
        info!("Created pod");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_pod(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.pods(namespace)
            .delete(name, &DeleteParams::default())
            .await?;
        info!("Deleted pod");
        Ok(())
    }
}
