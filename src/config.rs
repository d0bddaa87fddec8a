use crate::error::{Error, Result};
use crate::utils::file_utils::DEFAULT_MAX_FILE_SIZE;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub credentials_path: Option<PathBuf>,
    pub max_upload_bytes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let raw_base = env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Ok(Self {
            api_base_url: parse_base_url(&raw_base)?,
            api_token: get_env_opt("API_TOKEN"),
            credentials_path: get_env_opt("CREDENTIALS_PATH").map(PathBuf::from),
            max_upload_bytes: match get_env_opt("MAX_UPLOAD_BYTES") {
                Some(_) => get_env_parse("MAX_UPLOAD_BYTES")?,
                None => DEFAULT_MAX_FILE_SIZE,
            },
        })
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            api_token: None,
            credentials_path: None,
            max_upload_bytes: DEFAULT_MAX_FILE_SIZE,
        })
    }
}

/// Relative joins drop the last path segment unless the base ends in `/`.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Config("API_BASE_URL must not be empty".to_string()));
    }
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    Url::parse(&normalized)
        .map_err(|e| Error::Config(format!("Invalid value for API_BASE_URL: {}", e)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(name)?;
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("http://localhost:8080/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/");
        assert_eq!(
            url.join("bench-candidates/7").unwrap().as_str(),
            "http://localhost:8080/api/bench-candidates/7"
        );
    }

    #[test]
    fn empty_base_url_is_config_error() {
        assert!(matches!(parse_base_url("  "), Err(Error::Config(_))));
        assert!(matches!(parse_base_url("not a url"), Err(Error::Config(_))));
    }

    #[test]
    fn explicit_base_url_uses_default_ceiling() {
        let config = Config::with_base_url("https://office.example.com/api/").unwrap();
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_FILE_SIZE);
        assert!(config.api_token.is_none());
    }
}
