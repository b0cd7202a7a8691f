//! Kubernetes integration module
//!
//! This module handles all interactions with the cluster:
//! - Listing the namespaces to probe
//! - Creating and deleting the probe pod in a namespace

mod client;
mod resources;

pub use client::{ClusterApi, K8sClient};
pub use resources::{probe_labels, probe_pod, PROBE_CONTAINER_NAME};

#[cfg(test)]
pub use client::MockClusterApi;
