use anyhow::Result;
use chrono::Utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use namespace_pod_check::{
    check::{report_setup_failure, NamespaceCheck, Verdict},
    config::Config,
    deadline::Deadline,
    k8s::K8sClient,
    report::KuberhealthyClient,
};

fn init_tracing(config: &Config) {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;
    init_tracing(&config);

    let budget = config.run_budget(Utc::now());
    tracing::info!(budget_secs = budget.as_secs(), "Starting namespace-pod-check");
    let deadline = Deadline::after(budget);

    let reporter = KuberhealthyClient::from_config(&config)?;
    tracing::debug!(url = %reporter.url(), "Reporting client initialized");

    let result = match K8sClient::new().await {
        Ok(k8s) => {
            NamespaceCheck::from_config(&k8s, &reporter, &config)
                .run(deadline)
                .await
        }
        Err(e) => report_setup_failure(&reporter, e).await,
    };

    match result {
        Ok(Verdict::Healthy { succeeded, total }) => {
            tracing::info!(succeeded, total, "Check passed");
            Ok(())
        }
        Ok(Verdict::Unhealthy { errors }) => {
            tracing::info!(errors = errors.len(), "Check failed and was reported");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Unable to deliver check result");
            Err(e.into())
        }
    }
}
