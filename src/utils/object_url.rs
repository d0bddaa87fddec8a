use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::file::{Blob, LocalFile};

const URL_PREFIX: &str = "blob:bench-office/";

/// In-memory table of blobs reachable through `blob:` URLs.
#[derive(Clone, Default)]
pub struct ObjectUrlRegistry {
    entries: Arc<Mutex<HashMap<Uuid, Blob>>>,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, blob: Blob) -> ObjectUrl {
        let id = Uuid::new_v4();
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(id, blob);
            }
            Err(_) => warn!("object URL registry lock poisoned, URL {} will not resolve", id),
        }
        debug!("Created object URL {}{}", URL_PREFIX, id);
        ObjectUrl {
            id,
            url: format!("{}{}", URL_PREFIX, id),
            registry: self.clone(),
            revoked: false,
        }
    }

    pub fn resolve(&self, url: &str) -> Option<Blob> {
        let id = url.strip_prefix(URL_PREFIX).and_then(|raw| Uuid::parse_str(raw).ok())?;
        self.entries.lock().ok()?.get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    fn revoke(&self, id: Uuid) {
        if let Ok(mut entries) = self.entries.lock() {
            if entries.remove(&id).is_some() {
                debug!("Revoked object URL {}{}", URL_PREFIX, id);
            }
        }
    }
}

/// Single-owner handle. Revoked explicitly with [`ObjectUrl::revoke`] or
/// when dropped.
pub struct ObjectUrl {
    id: Uuid,
    url: String,
    registry: ObjectUrlRegistry,
    revoked: bool,
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn blob(&self) -> Option<Blob> {
        self.registry.resolve(&self.url)
    }

    pub fn to_data_url(&self) -> Option<String> {
        let blob = self.blob()?;
        Some(format!(
            "data:{};base64,{}",
            blob.content_type,
            BASE64.encode(&blob.bytes)
        ))
    }

    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.registry.revoke(self.id);
            self.revoked = true;
        }
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectUrl").field("url", &self.url).finish()
    }
}

/// Only images and PDFs get a preview URL.
pub fn preview_url(registry: &ObjectUrlRegistry, file: &LocalFile) -> Option<ObjectUrl> {
    if file.is_image() || file.is_pdf() {
        Some(registry.create(Blob::from(file.clone())))
    } else {
        None
    }
}
