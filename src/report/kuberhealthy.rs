//! HTTP client for the Kuberhealthy reporting endpoint

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use url::Host;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::HealthReporter;
use crate::config::Config;
use crate::deadline::Deadline;
use crate::error::ReportError;

/// Header carrying the run identifier assigned by Kuberhealthy
pub const RUN_UUID_HEADER: &str = "kh-run-uuid";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const REACHABILITY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Body posted to the reporting endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    #[serde(rename = "OK")]
    pub ok: bool,
    #[serde(rename = "Errors")]
    pub errors: Vec<String>,
}

impl CheckReport {
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self { ok: false, errors }
    }
}

#[derive(Clone)]
pub struct KuberhealthyClient {
    http: reqwest::Client,
    url: Url,
    run_id: Option<Uuid>,
}

impl KuberhealthyClient {
    /// Create a client posting to `url`, tagging reports with `run_id` when set
    pub fn new(url: &str, run_id: Option<&str>) -> Result<Self, ReportError> {
        let url = Url::parse(url).map_err(|e| ReportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if url.host_str().is_none() {
            return Err(ReportError::InvalidUrl {
                url: url.to_string(),
                reason: "missing host".to_string(),
            });
        }

        let run_id = run_id
            .filter(|id| !id.is_empty())
            .map(|id| Uuid::parse_str(id).map_err(|_| ReportError::InvalidRunId(id.to_string())))
            .transpose()?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { http, url, run_id })
    }

    /// Create a client from `KH_REPORTING_URL` and `KH_RUN_UUID`
    pub fn from_config(config: &Config) -> Result<Self, ReportError> {
        let url = config
            .kh_reporting_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or(ReportError::MissingUrl)?;
        Self::new(url, config.kh_run_uuid.as_deref())
    }

    /// Get the reporting endpoint
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn port(&self) -> u16 {
        self.url.port_or_known_default().unwrap_or(80)
    }

    /// Open a TCP connection to the endpoint. IP literals are connected to
    /// directly; only domain names go through the resolver.
    async fn connect(&self) -> io::Result<TcpStream> {
        let port = self.port();
        match self.url.host() {
            Some(Host::Ipv4(ip)) => TcpStream::connect(SocketAddr::from((ip, port))).await,
            Some(Host::Ipv6(ip)) => TcpStream::connect(SocketAddr::from((ip, port))).await,
            Some(Host::Domain(name)) => TcpStream::connect((name, port)).await,
            None => Err(io::Error::new(io::ErrorKind::InvalidInput, "missing host")),
        }
    }

    #[instrument(skip(self, report), fields(ok = report.ok, errors = report.errors.len()))]
    async fn send(&self, report: &CheckReport) -> Result<(), ReportError> {
        let mut request = self.http.post(self.url.clone()).json(report);
        if let Some(run_id) = self.run_id {
            request = request.header(RUN_UUID_HEADER, run_id.to_string());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Report accepted");
        Ok(())
    }
}

#[async_trait]
impl HealthReporter for KuberhealthyClient {
    async fn wait_until_reachable(&self, deadline: &Deadline) -> Result<(), ReportError> {
        let endpoint = format!("{}:{}", self.url.host_str().unwrap_or_default(), self.port());

        let poll = async {
            loop {
                match self.connect().await {
                    Ok(_) => return,
                    Err(e) => {
                        debug!(endpoint = %endpoint, error = %e, "Kuberhealthy not reachable yet");
                        tokio::time::sleep(REACHABILITY_POLL_INTERVAL).await;
                    }
                }
            }
        };

        deadline
            .run(poll)
            .await
            .map_err(|_| ReportError::Unreachable(endpoint.clone()))?;
        info!(endpoint = %endpoint, "Kuberhealthy is reachable");
        Ok(())
    }

    async fn report_success(&self) -> Result<(), ReportError> {
        self.send(&CheckReport::success()).await
    }

    async fn report_failure(&self, errors: Vec<String>) -> Result<(), ReportError> {
        self.send(&CheckReport::failure(errors)).await
    }
}
