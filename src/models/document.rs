use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::file_utils::{file_category, file_icon, FileCategory};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Resume,
    Passport,
    VisaDocument,
    #[serde(rename = "I94")]
    I94,
    Ead,
    Ssn,
    Diploma,
    Transcript,
    #[default]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 9] = [
        DocumentType::I94,
        DocumentType::Passport,
        DocumentType::Resume,
        DocumentType::VisaDocument,
        DocumentType::Ead,
        DocumentType::Ssn,
        DocumentType::Diploma,
        DocumentType::Transcript,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "RESUME",
            DocumentType::Passport => "PASSPORT",
            DocumentType::VisaDocument => "VISA_DOCUMENT",
            DocumentType::I94 => "I94",
            DocumentType::Ead => "EAD",
            DocumentType::Ssn => "SSN",
            DocumentType::Diploma => "DIPLOMA",
            DocumentType::Transcript => "TRANSCRIPT",
            DocumentType::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Resume => "Resume/CV",
            DocumentType::Passport => "Passport",
            DocumentType::VisaDocument => "Visa Document",
            DocumentType::I94 => "I-94 Document",
            DocumentType::Ead => "EAD Card",
            DocumentType::Ssn => "SSN Card",
            DocumentType::Diploma => "Diploma/Degree",
            DocumentType::Transcript => "Transcript",
            DocumentType::Other => "Other",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        let normalized = if normalized == "I_94" { "I94".to_string() } else { normalized };
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Unknown document type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateDocument {
    pub id: i64,
    pub filename: Option<String>,
    pub original_filename: String,
    pub file_size: Option<i64>,
    pub content_type: Option<String>,
    #[serde(default)]
    pub document_type: DocumentType,
    pub uploaded_at: Option<NaiveDateTime>,
    pub uploaded_by_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl CandidateDocument {
    pub fn icon(&self) -> &'static str {
        file_icon(&self.original_filename)
    }

    pub fn category(&self) -> FileCategory {
        file_category(&self.original_filename)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchDeleteOutcome {
    pub deleted: Vec<i64>,
    pub failed: Vec<(i64, String)>,
}

impl BatchDeleteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
