use reqwest::multipart::Form;
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::models::document::DocumentType;
use crate::models::file::LocalFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Selected,
    Typed,
}

/// A file chosen in the candidate form, waiting for its document type.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub id: Uuid,
    pub file: LocalFile,
    pub document_type: Option<DocumentType>,
    pub description: Option<String>,
}

impl PendingUpload {
    pub fn new(file: LocalFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            document_type: None,
            description: None,
        }
    }

    pub fn state(&self) -> UploadState {
        match self.document_type {
            Some(_) => UploadState::Typed,
            None => UploadState::Selected,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state() == UploadState::Typed
    }
}

/// File and type travel together so the multipart parts cannot drift apart.
#[derive(Debug, Clone)]
pub struct TypedUpload {
    pub file: LocalFile,
    pub document_type: DocumentType,
    pub description: Option<String>,
}

impl TypedUpload {
    pub fn new(file: LocalFile, document_type: DocumentType) -> Self {
        Self {
            file,
            document_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Multipart field names used by one endpoint.
#[derive(Debug, Clone, Copy)]
pub struct UploadFields {
    pub file: &'static str,
    pub document_type: &'static str,
    pub description: &'static str,
}

pub const CANDIDATE_FORM_FIELDS: UploadFields = UploadFields {
    file: "documents",
    document_type: "documentTypes",
    description: "documentDescriptions",
};

pub const MULTI_UPLOAD_FIELDS: UploadFields = UploadFields {
    file: "files",
    document_type: "documentTypes",
    description: "documentDescriptions",
};

/// Appends one file part immediately followed by its type part (and its
/// description when any upload in the batch carries one).
pub fn append_uploads(mut form: Form, uploads: &[TypedUpload], fields: UploadFields) -> Result<Form> {
    let with_descriptions = uploads.iter().any(|u| u.description.is_some());
    for upload in uploads {
        form = form
            .part(fields.file, upload.file.to_part()?)
            .text(fields.document_type, upload.document_type.as_str());
        if with_descriptions {
            form = form.text(
                fields.description,
                upload.description.clone().unwrap_or_default(),
            );
        }
    }
    Ok(form)
}

#[derive(Debug, Clone, Default)]
pub struct UploadBatch {
    items: Vec<PendingUpload>,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, file: LocalFile) -> Uuid {
        let pending = PendingUpload::new(file);
        let id = pending.id;
        self.items.push(pending);
        id
    }

    pub fn add_typed(&mut self, file: LocalFile, document_type: DocumentType) -> Uuid {
        let id = self.add(file);
        self.set_type(id, document_type);
        id
    }

    pub fn set_type(&mut self, id: Uuid, document_type: DocumentType) -> bool {
        match self.items.iter_mut().find(|p| p.id == id) {
            Some(pending) => {
                pending.document_type = Some(document_type);
                true
            }
            None => false,
        }
    }

    pub fn set_description(&mut self, id: Uuid, description: impl Into<String>) -> bool {
        let description = description.into();
        match self.items.iter_mut().find(|p| p.id == id) {
            Some(pending) => {
                pending.description = Some(description).filter(|d| !d.trim().is_empty());
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<PendingUpload> {
        let index = self.items.iter().position(|p| p.id == id)?;
        Some(self.items.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&PendingUpload> {
        self.items.iter().find(|p| p.id == id)
    }

    pub fn items(&self) -> &[PendingUpload] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn untyped_count(&self) -> usize {
        self.items.iter().filter(|p| !p.is_ready()).count()
    }

    /// Typed items in selection order. Untyped ones stay behind.
    pub fn submission(&self) -> Vec<TypedUpload> {
        self.items
            .iter()
            .filter_map(|p| {
                p.document_type.map(|document_type| TypedUpload {
                    file: p.file.clone(),
                    document_type,
                    description: p.description.clone(),
                })
            })
            .collect()
    }

    pub fn into_submission(self) -> Vec<TypedUpload> {
        let skipped = self.untyped_count();
        if skipped > 0 {
            warn!("{} selected file(s) have no document type and will not be uploaded", skipped);
        }
        self.items
            .into_iter()
            .filter_map(|p| {
                let PendingUpload {
                    file,
                    document_type,
                    description,
                    ..
                } = p;
                document_type.map(|document_type| TypedUpload {
                    file,
                    document_type,
                    description,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> LocalFile {
        LocalFile::new(name, "application/pdf", name.as_bytes().to_vec())
    }

    #[test]
    fn typing_makes_item_eligible() {
        let mut batch = UploadBatch::new();
        let id = batch.add(file("resume.pdf"));
        assert_eq!(batch.get(id).unwrap().state(), UploadState::Selected);
        assert!(batch.submission().is_empty());

        assert!(batch.set_type(id, DocumentType::Resume));
        assert_eq!(batch.get(id).unwrap().state(), UploadState::Typed);

        let submission = batch.submission();
        assert_eq!(submission.len(), 1);
        assert_eq!(submission[0].document_type, DocumentType::Resume);
        assert_eq!(submission[0].file.name, "resume.pdf");
    }

    #[test]
    fn removed_item_never_reaches_submission() {
        let mut batch = UploadBatch::new();
        let keep = batch.add_typed(file("passport.pdf"), DocumentType::Passport);
        let drop = batch.add_typed(file("old.pdf"), DocumentType::Other);

        let removed = batch.remove(drop).unwrap();
        assert_eq!(removed.file.name, "old.pdf");
        assert!(batch.remove(drop).is_none());
        assert!(!batch.set_type(drop, DocumentType::Resume));

        let names: Vec<_> = batch.into_submission().into_iter().map(|u| u.file.name).collect();
        assert_eq!(names, vec!["passport.pdf"]);
        let _ = keep;
    }

    #[test]
    fn submission_keeps_selection_order_and_skips_untyped() {
        let mut batch = UploadBatch::new();
        batch.add_typed(file("a.pdf"), DocumentType::Resume);
        batch.add(file("b.pdf"));
        let c = batch.add_typed(file("c.pdf"), DocumentType::Ssn);
        batch.set_description(c, "front side");

        assert_eq!(batch.untyped_count(), 1);
        let submission = batch.into_submission();
        let kinds: Vec<_> = submission.iter().map(|u| u.document_type).collect();
        assert_eq!(kinds, vec![DocumentType::Resume, DocumentType::Ssn]);
        assert_eq!(submission[1].description.as_deref(), Some("front side"));
    }

    #[test]
    fn blank_description_is_dropped() {
        let mut batch = UploadBatch::new();
        let id = batch.add(file("a.pdf"));
        batch.set_description(id, "   ");
        assert!(batch.get(id).unwrap().description.is_none());
    }
}
