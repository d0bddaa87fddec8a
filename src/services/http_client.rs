use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::middleware::auth::Session;
use crate::models::file::{filename_from_disposition, Blob, OCTET_STREAM};

/// Per-call deadlines. Every request picks one at its call site.
pub mod timeouts {
    use std::time::Duration;

    pub const READ: Duration = Duration::from_secs(30);
    pub const BULK: Duration = Duration::from_secs(60);
    pub const DOWNLOAD: Duration = Duration::from_secs(120);
    pub const EXPORT: Duration = Duration::from_secs(180);
    pub const WRITE: Duration = Duration::from_secs(300);
    pub const MULTI_UPLOAD: Duration = Duration::from_secs(600);
}

const JSON: &str = "application/json";

pub const NO_QUERY: &[(&str, &str)] = &[];

/// Shared transport for every resource client: bearer injection, the 401
/// hook and status mapping. Cloning shares the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("bench-office/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, session })
    }

    pub fn with_client(client: Client, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn request(&self, method: Method, path: &str, timeout: Duration) -> Result<RequestBuilder> {
        let url = self.session.endpoint(path)?;
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url).timeout(timeout);
        Ok(self.session.authorize(builder))
    }

    fn json_request(&self, method: Method, path: &str, timeout: Duration) -> Result<RequestBuilder> {
        Ok(self
            .request(method, path, timeout)?
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON))
    }

    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.handle_unauthorized();
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status,
                message: server_message(&body),
            });
        }
        Ok(response)
    }

    pub async fn get_json<T, Q>(&self, path: &str, query: &Q, timeout: Duration) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.json_request(Method::GET, path, timeout)?.query(query);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B, timeout: Duration) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.json_request(method, path, timeout)?.json(body);
        let response = self.execute(request).await?;
        parse_body(response).await
    }

    /// Multipart bodies carry their own boundary content type.
    pub async fn send_multipart<T>(&self, request: RequestBuilder, form: Form) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let request = request.header(ACCEPT, JSON).multipart(form);
        let response = self.execute(request).await?;
        parse_body(response).await
    }

    pub async fn delete<Q>(&self, path: &str, query: &Q, timeout: Duration) -> Result<()>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.json_request(Method::DELETE, path, timeout)?.query(query);
        self.execute(request).await?;
        Ok(())
    }

    pub async fn fetch_blob(&self, request: RequestBuilder) -> Result<Blob> {
        let response = self.execute(request).await?;
        let content_type = header_str(&response, CONTENT_TYPE.as_str())
            .unwrap_or_else(|| OCTET_STREAM.to_string());
        let filename = header_str(&response, CONTENT_DISPOSITION.as_str())
            .as_deref()
            .and_then(filename_from_disposition);
        let bytes = response.bytes().await?;

        Ok(Blob {
            bytes,
            content_type,
            filename,
        })
    }
}

/// Read enrichment calls degrade to an empty value instead of failing.
pub fn or_empty<T: Default>(result: Result<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{} failed, showing empty result: {}", what, e);
            T::default()
        }
    }
}

/// Writes may answer with an empty body; treat that as JSON null.
async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(JsonValue::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

fn header_str(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Pulls `message` (or `error`) out of an error body.
pub fn server_message(body: &str) -> Option<String> {
    let value: JsonValue = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(JsonValue::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_prefers_message_then_error() {
        assert_eq!(
            server_message(r#"{"message":"Duplicate email","error":"Bad Request"}"#).as_deref(),
            Some("Duplicate email")
        );
        assert_eq!(server_message(r#"{"error":"Not Found"}"#).as_deref(), Some("Not Found"));
        assert_eq!(server_message(r#"{"message":"  ","error":"Conflict"}"#).as_deref(), Some("Conflict"));
        assert_eq!(server_message("<html>502</html>"), None);
        assert_eq!(server_message(""), None);
    }

    #[test]
    fn or_empty_swallows_errors() {
        let failed: Result<Vec<i32>> = Err(Error::Unauthorized);
        assert!(or_empty(failed, "listing").is_empty());
        assert_eq!(or_empty(Ok(vec![1]), "listing"), vec![1]);
    }

    #[test]
    fn deadlines_increase_with_payload_weight() {
        assert!(timeouts::READ < timeouts::BULK);
        assert!(timeouts::DOWNLOAD < timeouts::EXPORT);
        assert!(timeouts::WRITE < timeouts::MULTI_UPLOAD);
    }
}
