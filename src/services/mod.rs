pub mod activity_service;
pub mod analytics_service;
pub mod candidate_service;
pub mod document_service;
pub mod employee_service;
pub mod http_client;
pub mod system_service;
pub mod vendor_service;
