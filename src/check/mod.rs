//! The namespace pod check
//!
//! Enumerates namespaces, deploys and deletes a probe pod in each one under a
//! shared deadline, and turns the outcomes into a single verdict.

mod prober;
mod runner;
mod summary;

pub use prober::{probe_namespace, ProbeOutcome, ProbeSpec};
pub use runner::{report_setup_failure, NamespaceCheck, Verdict};
pub use summary::RunSummary;
