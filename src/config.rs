use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_check_timeout_secs")]
    pub check_timeout_secs: u64,

    #[serde(default = "default_probe_pod_name")]
    pub probe_pod_name: String,

    #[serde(default = "default_probe_image")]
    pub probe_image: String,

    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,

    #[serde(default)]
    pub kh_reporting_url: Option<String>,

    #[serde(default)]
    pub kh_run_uuid: Option<String>,

    /// Unix timestamp in seconds set by the scheduler of the check
    #[serde(default)]
    pub kh_check_run_deadline: Option<i64>,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_check_timeout_secs() -> u64 {
    60
}

fn default_probe_pod_name() -> String {
    "kuberhealthy-namespace-checker-pod".to_string()
}

fn default_probe_image() -> String {
    "busybox".to_string()
}

fn default_probe_concurrency() -> usize {
    1
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        let settings: Config = config
            .try_deserialize()
            .context("invalid check configuration")?;

        Ok(settings)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    /// Number of namespaces probed at once, never below one
    pub fn probe_concurrency(&self) -> usize {
        self.probe_concurrency.max(1)
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Time left for the run: the configured timeout, cut short by the
    /// scheduler deadline when that one comes first.
    pub fn run_budget(&self, now: DateTime<Utc>) -> Duration {
        let timeout = self.check_timeout();
        let Some(deadline) = self
            .kh_check_run_deadline
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        else {
            return timeout;
        };

        match (deadline - now).to_std() {
            Ok(left) => left.min(timeout),
            Err(_) => Duration::ZERO,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_timeout_secs: default_check_timeout_secs(),
            probe_pod_name: default_probe_pod_name(),
            probe_image: default_probe_image(),
            probe_concurrency: default_probe_concurrency(),
            kh_reporting_url: None,
            kh_run_uuid: None,
            kh_check_run_deadline: None,
            debug: false,
            log_format: default_log_format(),
        }
    }
}
