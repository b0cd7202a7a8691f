//! Namespace pod check
//!
//! Verifies that every namespace in a Kubernetes cluster accepts the creation
//! and deletion of a minimal pod, and reports the verdict to Kuberhealthy.

pub mod check;
pub mod config;
pub mod deadline;
pub mod error;
pub mod k8s;
pub mod report;
