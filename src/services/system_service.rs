use chrono::Utc;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::info;

use crate::error::Result;
use crate::services::http_client::{timeouts, ApiClient, NO_QUERY};

const BASE: &str = "system";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub timestamp: String,
    pub user_agent: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>, context: Option<String>) -> Self {
        Self {
            message: message.into(),
            context,
            timestamp: Utc::now().to_rfc3339(),
            user_agent: concat!("bench-office/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Client-side event forwarded to the audit log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
    pub timestamp: String,
}

impl ActivityLogEntry {
    pub fn new(action: impl Into<String>, details: Option<JsonValue>) -> Self {
        Self {
            action: action.into(),
            details,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Clone)]
pub struct SystemService {
    api: ApiClient,
}

impl SystemService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn health(&self) -> Result<JsonValue> {
        self.api
            .get_json(&format!("{}/health", BASE), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn version(&self) -> Result<JsonValue> {
        self.api
            .get_json(&format!("{}/version", BASE), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn report_error(&self, report: &ErrorReport) -> Result<()> {
        info!("Reporting client error: {}", report.message);
        let _: JsonValue = self
            .api
            .send_json(
                Method::POST,
                &format!("{}/error-report", BASE),
                report,
                timeouts::READ,
            )
            .await?;
        Ok(())
    }

    pub async fn log_activity(&self, entry: &ActivityLogEntry) -> Result<()> {
        let _: JsonValue = self
            .api
            .send_json(
                Method::POST,
                &format!("{}/activity-log", BASE),
                entry,
                timeouts::READ,
            )
            .await?;
        Ok(())
    }
}
