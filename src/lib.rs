pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::middleware::auth::{Navigator, Session};
use crate::services::{
    activity_service::ActivityService, analytics_service::AnalyticsService,
    candidate_service::CandidateService, document_service::DocumentService,
    employee_service::EmployeeService, http_client::ApiClient, system_service::SystemService,
    vendor_service::VendorService,
};
use crate::utils::object_url::ObjectUrlRegistry;

/// Every resource client over one session and one connection pool, plus the
/// object URL registry the preview surfaces draw from.
#[derive(Clone)]
pub struct BackOffice {
    pub session: Session,
    pub candidates: CandidateService,
    pub documents: DocumentService,
    pub activities: ActivityService,
    pub vendors: VendorService,
    pub analytics: AnalyticsService,
    pub employees: EmployeeService,
    pub system: SystemService,
    pub object_urls: ObjectUrlRegistry,
}

impl BackOffice {
    pub fn connect(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let session = Session::from_config(config, navigator)?;
        Self::with_session(session, config.max_upload_bytes)
    }

    pub fn with_session(session: Session, max_upload_bytes: u64) -> Result<Self> {
        let api = ApiClient::new(session.clone())?;

        Ok(Self {
            session,
            candidates: CandidateService::new(api.clone(), max_upload_bytes),
            documents: DocumentService::new(api.clone(), max_upload_bytes),
            activities: ActivityService::new(api.clone()),
            vendors: VendorService::new(api.clone()),
            analytics: AnalyticsService::new(api.clone()),
            employees: EmployeeService::new(api.clone()),
            system: SystemService::new(api),
            object_urls: ObjectUrlRegistry::new(),
        })
    }

    /// Ends the session. Clients cloned from this one stop issuing requests.
    pub fn close(&self) {
        self.session.close();
    }
}
