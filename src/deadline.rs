//! Shared run deadline
//!
//! Every Kubernetes call and the readiness gate race against the same
//! deadline; once it passes, pending work resolves to [`Expired`].

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline exceeded")]
pub struct Expired;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Drive `fut` until it completes or the deadline passes. An already
    /// expired deadline fails without polling `fut`.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, Expired>
    where
        F: Future,
    {
        if self.is_expired() {
            return Err(Expired);
        }
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| Expired)
    }
}
