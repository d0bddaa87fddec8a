use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use tracing::{info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

pub const LOGIN_PATH: &str = "/login";

/// Where the bearer token lives between calls.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn store(&self, token: &str) -> Result<()>;
    fn clear(&self);
}

/// Receives the forced redirect issued after a 401.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }

    fn store(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| Error::Config("credential store lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Token persisted as the sole content of a file.
///
/// The file is read once on construction; afterwards `token()` is served from
/// memory so request building never touches the disk.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    cached: RwLock<Option<String>>,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = std::fs::read_to_string(&path)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            path,
            cached: RwLock::new(cached),
        }
    }

    fn set_cached(&self, token: Option<String>) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = token;
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn token(&self) -> Option<String> {
        self.cached.read().map(|guard| guard.clone()).unwrap_or(None)
    }

    fn store(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        self.set_cached(Some(token.to_string()).filter(|t| !t.is_empty()));
        Ok(())
    }

    fn clear(&self) {
        self.set_cached(None);
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove credentials file {}: {}", self.path.display(), e);
            }
        }
    }
}

/// Records the redirect so the caller's event loop can act on it.
#[derive(Debug, Default)]
pub struct LoginRedirect {
    pending: Mutex<Option<String>>,
}

impl LoginRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut guard| guard.take())
    }
}

impl Navigator for LoginRedirect {
    fn redirect(&self, path: &str) {
        if let Ok(mut guard) = self.pending.lock() {
            *guard = Some(path.to_string());
        }
    }
}

struct SessionInner {
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    closed: AtomicBool,
}

/// Explicitly opened context shared by every resource client: base URL,
/// credentials and the login redirect target.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    pub fn open(
        base_url: Url,
        credentials: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        info!("Opening session against {}", base_url);
        Self {
            inner: Arc::new(SessionInner {
                base_url,
                credentials,
                navigator,
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_config(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let credentials: Arc<dyn CredentialStore> = match &config.credentials_path {
            Some(path) => Arc::new(FileCredentialStore::new(path.clone())),
            None => Arc::new(MemoryCredentialStore::new()),
        };
        if let Some(token) = &config.api_token {
            credentials.store(token)?;
        }
        Ok(Self::open(config.api_base_url.clone(), credentials, navigator))
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.credentials
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.ensure_open()?;
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.inner.credentials.token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    pub fn handle_unauthorized(&self) {
        warn!("Received 401, clearing credentials and redirecting to {}", LOGIN_PATH);
        self.inner.credentials.clear();
        self.inner.navigator.redirect(LOGIN_PATH);
    }

    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::SeqCst) {
            info!("Session against {} closed", self.inner.base_url);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }
}
