//! Run report notification
//!
//! After a crawl the run log is sent to a list of recipients. Delivery is
//! best-effort: a failure is logged and never changes the outcome of the run.
//! The transport is a webhook receiving the report as JSON.

use crate::config::NotifyConfig;
use crate::output::CrawlStatistics;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while delivering a report
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint rejected the report with status {0}")]
    Rejected(u16),

    #[error("Invalid notification configuration: {0}")]
    InvalidConfig(String),
}

/// A free-text report addressed to a list of recipients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub subject: String,
    pub recipients: Vec<String>,
    pub body: String,
}

/// Delivers run reports
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, report: &Report) -> Result<(), NotifyError>;
}

/// Posts the report as JSON to a webhook endpoint
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    endpoint: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NotifyError> {
        let endpoint = endpoint.into();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(NotifyError::InvalidConfig(format!(
                "endpoint must be an http(s) URL: {}",
                endpoint
            )));
        }

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { endpoint, client })
    }

    pub fn from_config(config: &NotifyConfig) -> Result<Self, NotifyError> {
        Self::new(config.endpoint.as_str())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, report: &Report) -> Result<(), NotifyError> {
        let response = self.client.post(&self.endpoint).json(report).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        tracing::debug!("Report delivered to {}", self.endpoint);
        Ok(())
    }
}

/// Sends a report, logging instead of returning any failure
///
/// # Returns
///
/// Whether the report was delivered
pub async fn notify_best_effort(notifier: &dyn Notifier, report: &Report) -> bool {
    match notifier.send(report).await {
        Ok(()) => {
            tracing::info!("Run report sent to {}", report.recipients.join(", "));
            true
        }
        Err(e) => {
            tracing::warn!("Failed to send run report: {}", e);
            false
        }
    }
}

/// Builds the run report for the configured recipients
pub fn build_report(
    config: &NotifyConfig,
    statistics: &CrawlStatistics,
    results_path: Option<&Path>,
) -> Report {
    Report {
        subject: config.subject.clone(),
        recipients: config
            .recipients
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect(),
        body: report_body(statistics, results_path),
    }
}

/// The plain-text run log
pub fn report_body(statistics: &CrawlStatistics, results_path: Option<&Path>) -> String {
    let mut body = format!(
        "Crawling finished. It found {} URLs with marketing content.\n",
        statistics.matches
    );
    match results_path {
        Some(path) => body.push_str(&format!("URLs saved in {}.\n", path.display())),
        None => body.push_str("The results could not be saved.\n"),
    }
    body.push('\n');
    body.push_str(&statistics.render());
    body
}
