use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, info};

use crate::dto::candidate_dto::{AdvancedSearch, CandidateForm, ExportFormat, ExportRequest, SearchFilters};
use crate::error::Result;
use crate::models::candidate::BenchCandidate;
use crate::models::file::{Blob, OCTET_STREAM};
use crate::models::page::{Page, PageQuery};
use crate::models::upload::{append_uploads, TypedUpload, CANDIDATE_FORM_FIELDS};
use crate::services::http_client::{timeouts, ApiClient, NO_QUERY};
use crate::utils::validation::{ensure_uploadable, normalize_linkedin_url, validate};

const BASE: &str = "bench-candidates";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    #[serde(flatten)]
    filters: SearchFilters,
    page: u32,
    size: u32,
}

#[derive(Clone)]
pub struct CandidateService {
    api: ApiClient,
    max_upload_bytes: u64,
}

impl CandidateService {
    pub fn new(api: ApiClient, max_upload_bytes: u64) -> Self {
        Self { api, max_upload_bytes }
    }

    pub async fn list(&self, page: &PageQuery) -> Result<Page<BenchCandidate>> {
        self.api.get_json(BASE, page, timeouts::READ).await
    }

    pub async fn get(&self, id: i64) -> Result<BenchCandidate> {
        self.api
            .get_json(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
    }

    /// Validates the form and every file before anything is sent.
    pub async fn create(&self, form: &CandidateForm, uploads: &[TypedUpload]) -> Result<BenchCandidate> {
        let body = self.prepare(form, uploads)?;
        let request = self.api.request(Method::POST, BASE, timeouts::WRITE)?;

        info!(
            "Creating bench candidate {} with {} document(s)",
            form.full_name(),
            uploads.len()
        );
        self.api
            .send_multipart(request, body)
            .await
            .inspect(|c: &BenchCandidate| info!("Created bench candidate {}", c.id))
            .inspect_err(|e| error!("Failed to create bench candidate: {}", e))
    }

    pub async fn update(&self, id: i64, form: &CandidateForm, uploads: &[TypedUpload]) -> Result<BenchCandidate> {
        let body = self.prepare(form, uploads)?;
        let request = self
            .api
            .request(Method::PUT, &format!("{}/{}", BASE, id), timeouts::WRITE)?;

        info!("Updating bench candidate {} with {} new document(s)", id, uploads.len());
        self.api
            .send_multipart(request, body)
            .await
            .inspect_err(|e| error!("Failed to update bench candidate {}: {}", id, e))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        info!("Deleting bench candidate {}", id);
        self.api
            .delete(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to delete bench candidate {}: {}", id, e))
    }

    pub async fn search(&self, filters: &SearchFilters, page: &PageQuery) -> Result<Page<BenchCandidate>> {
        let query = SearchQuery {
            filters: filters.trimmed(),
            page: page.page,
            size: page.size,
        };
        self.api
            .get_json(&format!("{}/search", BASE), &query, timeouts::READ)
            .await
    }

    pub async fn by_consultant(&self, consultant_id: i64) -> Result<Vec<BenchCandidate>> {
        self.api
            .get_json(&format!("{}/consultant/{}", BASE, consultant_id), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn count(&self) -> Result<i64> {
        self.api
            .get_json(&format!("{}/count", BASE), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<BenchCandidate>> {
        self.api
            .get_json(&format!("{}/recent", BASE), &[("limit", limit)], timeouts::READ)
            .await
    }

    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let query: Vec<(&str, i64)> = ids.iter().map(|id| ("ids", *id)).collect();

        info!("Bulk deleting {} bench candidate(s)", ids.len());
        self.api
            .delete(&format!("{}/bulk", BASE), &query, timeouts::BULK)
            .await
            .inspect_err(|e| error!("Failed to bulk delete bench candidates: {}", e))
    }

    pub async fn advanced_search(&self, criteria: &AdvancedSearch, page: &PageQuery) -> Result<Page<BenchCandidate>> {
        validate(criteria)?;
        let request = self
            .api
            .request(Method::POST, &format!("{}/advanced-search", BASE), timeouts::READ)?
            .query(page)
            .json(criteria);
        let response = self.api.execute(request).await?;
        Ok(response.json().await?)
    }

    pub async fn export(&self, ids: &[i64], format: ExportFormat) -> Result<Blob> {
        let body = ExportRequest {
            candidate_ids: ids.to_vec(),
            format,
        };
        let request = self
            .api
            .request(Method::POST, &format!("{}/export", BASE), timeouts::EXPORT)?
            .json(&body);

        info!("Exporting {} bench candidate(s) as {}", ids.len(), format.as_str());
        self.api
            .fetch_blob(request)
            .await
            .inspect_err(|e| error!("Failed to export bench candidates: {}", e))
    }

    pub async fn statistics(&self) -> Result<JsonValue> {
        self.api
            .get_json(&format!("{}/statistics", BASE), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn download_resume(&self, id: i64) -> Result<Blob> {
        let request = self
            .api
            .request(Method::GET, &format!("{}/{}/resume", BASE, id), timeouts::DOWNLOAD)?
            .header(ACCEPT, OCTET_STREAM);
        self.api.fetch_blob(request).await
    }

    fn prepare(&self, form: &CandidateForm, uploads: &[TypedUpload]) -> Result<reqwest::multipart::Form> {
        let mut form = form.trimmed();
        form.validate_submission()?;
        for upload in uploads {
            ensure_uploadable(&upload.file, self.max_upload_bytes)?;
        }

        form.linkedin_url = form
            .linkedin_url
            .as_deref()
            .map(normalize_linkedin_url)
            .filter(|url| !url.is_empty());

        append_uploads(form.to_form(), uploads, CANDIDATE_FORM_FIELDS)
    }
}
