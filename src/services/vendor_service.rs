use reqwest::Method;
use serde::Serialize;
use tracing::{error, info};

use crate::error::Result;
use crate::models::vendor::{Vendor, VendorPayload};
use crate::services::http_client::{timeouts, ApiClient, NO_QUERY};
use crate::utils::validation::validate;

const BASE: &str = "vendors";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone)]
pub struct VendorService {
    api: ApiClient,
}

impl VendorService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Vendor>> {
        self.api.get_json(BASE, NO_QUERY, timeouts::READ).await
    }

    pub async fn get(&self, id: i64) -> Result<Vendor> {
        self.api
            .get_json(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn create(&self, payload: &VendorPayload) -> Result<Vendor> {
        validate(payload)?;
        info!("Creating vendor {}", payload.name);
        self.api
            .send_json(Method::POST, BASE, payload, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to create vendor: {}", e))
    }

    pub async fn update(&self, id: i64, payload: &VendorPayload) -> Result<Vendor> {
        validate(payload)?;
        info!("Updating vendor {}", id);
        self.api
            .send_json(Method::PUT, &format!("{}/{}", BASE, id), payload, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to update vendor {}: {}", id, e))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting vendor {}", id);
        self.api
            .delete(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to delete vendor {}: {}", id, e))
    }

    pub async fn search(&self, criteria: &VendorSearch) -> Result<Vec<Vendor>> {
        self.api
            .get_json(&format!("{}/search", BASE), criteria, timeouts::READ)
            .await
    }

    pub async fn by_status(&self, status: &str) -> Result<Vec<Vendor>> {
        self.api
            .get_json(&format!("{}/status/{}", BASE, status.trim()), NO_QUERY, timeouts::READ)
            .await
    }
}
