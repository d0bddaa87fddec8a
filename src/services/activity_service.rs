use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::dto::activity_dto::{ActivityExportFormat, ActivityPayload};
use crate::error::Result;
use crate::models::activity::Activity;
use crate::models::file::Blob;
use crate::services::http_client::{or_empty, timeouts, ApiClient, NO_QUERY};
use crate::utils::validation::validate;

const BASE: &str = "candidate-activities";

#[derive(Clone)]
pub struct ActivityService {
    api: ApiClient,
}

impl ActivityService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Timeline of one candidate. Failures show as an empty timeline.
    pub async fn for_candidate(&self, candidate_id: i64) -> Vec<Activity> {
        let result: Result<Vec<Activity>> = self
            .api
            .get_json(&format!("{}/candidate/{}", BASE, candidate_id), NO_QUERY, timeouts::READ)
            .await;
        or_empty(result, &format!("Loading activities of candidate {}", candidate_id))
    }

    pub async fn create(&self, payload: &ActivityPayload) -> Result<Activity> {
        validate(payload)?;
        info!(
            "Recording {} for candidate {} at {}",
            payload.activity_type, payload.candidate_id, payload.client_name
        );
        self.api
            .send_json(Method::POST, BASE, payload, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to save activity: {}", e))
    }

    pub async fn update(&self, id: i64, payload: &ActivityPayload) -> Result<Activity> {
        validate(payload)?;
        info!("Updating activity {}", id);
        self.api
            .send_json(Method::PUT, &format!("{}/{}", BASE, id), payload, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to update activity {}: {}", id, e))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting activity {}", id);
        self.api
            .delete(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to delete activity {}: {}", id, e))
    }

    pub async fn summary(&self, candidate_id: i64) -> Result<JsonValue> {
        self.api
            .get_json(
                &format!("{}/candidate/{}/summary", BASE, candidate_id),
                NO_QUERY,
                timeouts::READ,
            )
            .await
    }

    pub async fn export(&self, candidate_id: i64, format: ActivityExportFormat) -> Result<Blob> {
        let request = self
            .api
            .request(
                Method::GET,
                &format!("{}/candidate/{}/export", BASE, candidate_id),
                timeouts::EXPORT,
            )?
            .query(&[("format", format.as_str())]);
        self.api
            .fetch_blob(request)
            .await
            .inspect_err(|e| error!("Failed to export activities of candidate {}: {}", candidate_id, e))
    }
}
