use reqwest::StatusCode;

use crate::utils::thumbnail::ThumbnailError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid file: {}", .0.join("; "))]
    InvalidFile(Vec<String>),

    #[error("Unauthorized: session expired")]
    Unauthorized,

    #[error("Session has been closed")]
    SessionClosed,

    #[error("Server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Thumbnail error: {0}")]
    Thumbnail(#[from] ThumbnailError),
}

impl Error {
    /// Text shown to the operator for a failed call. Server messages win;
    /// transport failures fall back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Api {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            Error::Validation(errors) => validation_messages(errors).join("\n"),
            Error::InvalidFile(errors) => errors.join("\n"),
            Error::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Error::Thumbnail(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

fn validation_messages(errors: &validator::ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages
}
