use serde_json::{Map, Value as JsonValue};
use tracing::warn;

use crate::error::Result;
use crate::services::http_client::{timeouts, ApiClient, NO_QUERY};

const BASE: &str = "dashboard";

pub const DEFAULT_TREND_DAYS: u32 = 30;

#[derive(Clone)]
pub struct AnalyticsService {
    api: ApiClient,
}

impl AnalyticsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn overview(&self) -> Result<JsonValue> {
        self.fetch("stats").await
    }

    pub async fn consultant_performance(&self) -> JsonValue {
        or_empty_object(self.fetch("consultant-performance").await, "consultant performance")
    }

    pub async fn vendor_analytics(&self) -> JsonValue {
        or_empty_object(self.fetch("vendor-analytics").await, "vendor analytics")
    }

    pub async fn submission_trends(&self, days: Option<u32>) -> Result<JsonValue> {
        let days = days.unwrap_or(DEFAULT_TREND_DAYS);
        self.api
            .get_json(
                &format!("{}/submission-trends", BASE),
                &[("days", days)],
                timeouts::READ,
            )
            .await
    }

    pub async fn skill_demand(&self) -> Result<JsonValue> {
        self.fetch("skill-demand").await
    }

    async fn fetch(&self, endpoint: &str) -> Result<JsonValue> {
        self.api
            .get_json(&format!("{}/{}", BASE, endpoint), NO_QUERY, timeouts::READ)
            .await
    }
}

fn or_empty_object(result: Result<JsonValue>, what: &str) -> JsonValue {
    result.unwrap_or_else(|e| {
        warn!("Loading {} failed, showing empty result: {}", what, e);
        JsonValue::Object(Map::new())
    })
}
