pub mod activity;
pub mod candidate;
pub mod document;
pub mod file;
pub mod page;
pub mod upload;
pub mod vendor;
