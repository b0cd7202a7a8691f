//! Aggregation of per-namespace outcomes into one run verdict

use super::prober::ProbeOutcome;

/// Tally of one run over every enumerated namespace
///
/// `succeeded + failed == total` always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Failure causes in the order the namespaces were listed
    pub errors: Vec<String>,
}

impl RunSummary {
    /// Fold outcomes into a summary. Any failure fails the run; there is no
    /// weighting or threshold.
    pub fn aggregate(outcomes: &[ProbeOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut summary, outcome| {
            summary.total += 1;
            match &outcome.error {
                None => summary.succeeded += 1,
                Some(e) => {
                    summary.failed += 1;
                    summary.errors.push(e.to_string());
                }
            }
            summary
        })
    }

    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn failure_headline(&self) -> String {
        format!(
            "unable to deploy or delete test pods in {} out of {} namespaces",
            self.failed, self.total
        )
    }

    /// Messages sent with a failure report: the headline, then each cause
    pub fn failure_messages(&self) -> Vec<String> {
        std::iter::once(self.failure_headline())
            .chain(self.errors.iter().cloned())
            .collect()
    }
}
