//! Probe pod definition

use k8s_openapi::api::core::v1::{Container, Pod, PodSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Name of the single probe container
pub const PROBE_CONTAINER_NAME: &str = "busybox";

/// Labels stamped on every probe pod
pub fn probe_labels() -> BTreeMap<String, String> {
    [
        ("app".to_string(), "demo".to_string()),
        (
            "app.kubernetes.io/managed-by".to_string(),
            "namespace-pod-check".to_string(),
        ),
    ]
    .into_iter()
    .collect()
}

/// Create the idle pod deployed into `namespace`
pub fn probe_pod(name: &str, namespace: &str, image: &str) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(probe_labels()),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: PROBE_CONTAINER_NAME.to_string(),
                image: Some(image.to_string()),
                image_pull_policy: Some("IfNotPresent".to_string()),
                command: Some(vec!["sleep".to_string(), "3600".to_string()]),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_pod_is_scoped_to_namespace() {
        let pod = probe_pod("checker", "team-a", "busybox");
        assert_eq!(pod.metadata.name.as_deref(), Some("checker"));
        assert_eq!(pod.metadata.namespace.as_deref(), Some("team-a"));

        let labels = pod.metadata.labels.unwrap();
        assert_eq!(labels.get("app").map(String::as_str), Some("demo"));
    }

    #[test]
    fn test_probe_pod_has_single_idle_container() {
        let pod = probe_pod("checker", "default", "busybox:1.36");
        let spec = pod.spec.unwrap();
        assert_eq!(spec.containers.len(), 1);

        let container = &spec.containers[0];
        assert_eq!(container.name, PROBE_CONTAINER_NAME);
        assert_eq!(container.image.as_deref(), Some("busybox:1.36"));
        assert_eq!(container.image_pull_policy.as_deref(), Some("IfNotPresent"));
        assert_eq!(
            container.command,
            Some(vec!["sleep".to_string(), "3600".to_string()])
        );
    }
}
