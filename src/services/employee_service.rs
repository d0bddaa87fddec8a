use serde::Serialize;

use crate::error::Result;
use crate::models::candidate::Employee;
use crate::services::http_client::{timeouts, ApiClient, NO_QUERY};

const BASE: &str = "employees";

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Read-only view of the staff directory, used to pick the assigned consultant.
#[derive(Clone)]
pub struct EmployeeService {
    api: ApiClient,
}

impl EmployeeService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Employee>> {
        self.api.get_json(BASE, NO_QUERY, timeouts::READ).await
    }

    pub async fn get(&self, id: i64) -> Result<Employee> {
        self.api
            .get_json(&format!("{}/{}", BASE, id), NO_QUERY, timeouts::READ)
            .await
    }

    pub async fn search(&self, criteria: &EmployeeSearch) -> Result<Vec<Employee>> {
        self.api
            .get_json(&format!("{}/search", BASE), criteria, timeouts::READ)
            .await
    }
}
