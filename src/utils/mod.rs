pub mod file_utils;
pub mod object_url;
pub mod thumbnail;
pub mod validation;
