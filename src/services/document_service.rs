use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use reqwest::Method;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::models::document::{BatchDeleteOutcome, CandidateDocument};
use crate::models::file::{Blob, OCTET_STREAM};
use crate::models::upload::{append_uploads, TypedUpload, MULTI_UPLOAD_FIELDS};
use crate::services::http_client::{or_empty, timeouts, ApiClient, NO_QUERY};
use crate::utils::validation::ensure_uploadable;

const PREVIEW_ACCEPT: &str = "application/pdf,image/*,text/*";

#[derive(Clone)]
pub struct DocumentService {
    api: ApiClient,
    max_upload_bytes: u64,
}

fn documents_path(candidate_id: i64) -> String {
    format!("bench-candidates/{}/documents", candidate_id)
}

fn document_path(candidate_id: i64, document_id: i64) -> String {
    format!("{}/{}", documents_path(candidate_id), document_id)
}

impl DocumentService {
    pub fn new(api: ApiClient, max_upload_bytes: u64) -> Self {
        Self { api, max_upload_bytes }
    }

    /// Never fails: an unreachable server or an error status yields no documents.
    pub async fn list(&self, candidate_id: i64) -> Vec<CandidateDocument> {
        let result: Result<Vec<CandidateDocument>> = self
            .api
            .get_json(&documents_path(candidate_id), NO_QUERY, timeouts::READ)
            .await;
        or_empty(result, &format!("Listing documents of candidate {}", candidate_id))
    }

    pub async fn upload(&self, candidate_id: i64, upload: &TypedUpload) -> Result<CandidateDocument> {
        ensure_uploadable(&upload.file, self.max_upload_bytes)?;

        let mut form = Form::new().part("file", upload.file.to_part()?);
        if let Some(description) = &upload.description {
            form = form.text("description", description.clone());
        }
        let request = self
            .api
            .request(Method::POST, &documents_path(candidate_id), timeouts::WRITE)?
            .query(&[("documentType", upload.document_type.as_str())]);

        info!(
            "Uploading {} as {} for candidate {}",
            upload.file.name, upload.document_type, candidate_id
        );
        self.api
            .send_multipart(request, form)
            .await
            .inspect_err(|e| error!("Failed to upload document {}: {}", upload.file.name, e))
    }

    /// One request; the i-th file part is followed by its own type part.
    pub async fn upload_many(&self, candidate_id: i64, uploads: &[TypedUpload]) -> Result<Vec<CandidateDocument>> {
        if uploads.is_empty() {
            return Ok(Vec::new());
        }
        for upload in uploads {
            ensure_uploadable(&upload.file, self.max_upload_bytes)?;
        }

        let form = append_uploads(Form::new(), uploads, MULTI_UPLOAD_FIELDS)?;
        let request = self.api.request(
            Method::POST,
            &format!("{}/multiple", documents_path(candidate_id)),
            timeouts::MULTI_UPLOAD,
        )?;

        info!("Uploading {} documents for candidate {}", uploads.len(), candidate_id);
        self.api
            .send_multipart(request, form)
            .await
            .inspect_err(|e| error!("Failed to upload documents for candidate {}: {}", candidate_id, e))
    }

    pub async fn download(&self, candidate_id: i64, document_id: i64) -> Result<Blob> {
        let request = self
            .api
            .request(Method::GET, &document_path(candidate_id, document_id), timeouts::DOWNLOAD)?
            .header(ACCEPT, OCTET_STREAM);
        self.api.fetch_blob(request).await
    }

    pub async fn preview(&self, candidate_id: i64, document_id: i64) -> Result<Blob> {
        let request = self
            .api
            .request(Method::GET, &document_path(candidate_id, document_id), timeouts::DOWNLOAD)?
            .header(ACCEPT, PREVIEW_ACCEPT);
        self.api.fetch_blob(request).await
    }

    pub async fn delete(&self, candidate_id: i64, document_id: i64) -> Result<()> {
        info!("Deleting document {} of candidate {}", document_id, candidate_id);
        self.api
            .delete(&document_path(candidate_id, document_id), NO_QUERY, timeouts::READ)
            .await
            .inspect_err(|e| error!("Failed to delete document {}: {}", document_id, e))
    }

    pub async fn info(&self, candidate_id: i64, document_id: i64) -> Option<CandidateDocument> {
        let result: Result<CandidateDocument> = self
            .api
            .get_json(
                &format!("{}/info", document_path(candidate_id, document_id)),
                NO_QUERY,
                timeouts::READ,
            )
            .await;
        or_empty(result.map(Some), &format!("Fetching info for document {}", document_id))
    }

    /// Deletes one by one. Failures are collected, not fatal, so a partial
    /// batch is reported as such.
    pub async fn delete_many(&self, candidate_id: i64, document_ids: &[i64]) -> BatchDeleteOutcome {
        let mut outcome = BatchDeleteOutcome::default();
        for &document_id in document_ids {
            match self.delete(candidate_id, document_id).await {
                Ok(()) => outcome.deleted.push(document_id),
                Err(e) => outcome.failed.push((document_id, e.to_string())),
            }
        }
        if !outcome.is_complete() {
            warn!(
                "Deleted {} of {} documents for candidate {}",
                outcome.deleted.len(),
                document_ids.len(),
                candidate_id
            );
        }
        outcome
    }
}
