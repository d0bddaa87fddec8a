use validator::Validate;

use crate::error::{Error, Result};
use crate::models::file::LocalFile;
use crate::utils::file_utils::validate_file;

const LINKEDIN_PROFILE_BASE: &str = "https://www.linkedin.com/in/";

pub fn validate<T: Validate>(val: &T) -> Result<()> {
    val.validate().map_err(Error::from)
}

/// Rejects the file with every violation listed; never touches the network.
pub fn ensure_uploadable(file: &LocalFile, max_size: u64) -> Result<()> {
    let result = validate_file(file, &[], max_size);
    if result.is_valid {
        Ok(())
    } else {
        Err(Error::InvalidFile(result.errors))
    }
}

/// Turns whatever the operator typed into a full profile URL.
/// Blank input stays blank.
pub fn normalize_linkedin_url(raw: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        return String::new();
    }

    let lower = value.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return value.to_string();
    }
    if lower.starts_with("www.") || lower.starts_with("linkedin.com") {
        return format!("https://{}", value);
    }
    if let Some(handle) = value.strip_prefix("in/").or_else(|| value.strip_prefix("/in/")) {
        return format!("{}{}", LINKEDIN_PROFILE_BASE, handle.trim_matches('/'));
    }
    format!("{}{}", LINKEDIN_PROFILE_BASE, value.trim_start_matches('@').trim_matches('/'))
}
