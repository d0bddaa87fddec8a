use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::activity::{Activity, ActivityType};

/// Body for creating or replacing an activity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    pub candidate_id: i64,
    pub activity_type: ActivityType,
    #[validate(length(min = 1, max = 200, message = "Client name is required"))]
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[validate(email(message = "Please provide a valid contact email"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub activity_date: NaiveDate,
}

impl ActivityPayload {
    pub fn new(candidate_id: i64, activity_type: ActivityType, client_name: impl Into<String>, activity_date: NaiveDate) -> Self {
        Self {
            candidate_id,
            activity_type,
            client_name: client_name.into(),
            contact_person: None,
            contact_phone: None,
            contact_email: None,
            submitted_rate: None,
            notes: None,
            activity_date,
        }
    }

    /// Starting point for editing an existing entry.
    pub fn from_activity(activity: &Activity, fallback_date: NaiveDate) -> Self {
        Self {
            candidate_id: activity.candidate_id.unwrap_or_default(),
            activity_type: activity.activity_type,
            client_name: activity.client_name.clone().unwrap_or_default(),
            contact_person: activity.contact_person.clone(),
            contact_phone: activity.contact_phone.clone(),
            contact_email: activity.contact_email.clone(),
            submitted_rate: activity.submitted_rate,
            notes: activity.notes.clone(),
            activity_date: activity.activity_date.unwrap_or(fallback_date),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ActivityExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityExportFormat::Csv => "csv",
            ActivityExportFormat::Xlsx => "xlsx",
            ActivityExportFormat::Pdf => "pdf",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    #[test]
    fn serializes_camel_case_without_empty_optionals() {
        let mut payload = ActivityPayload::new(7, ActivityType::InterviewScheduled, "Acme Corp", date());
        payload.submitted_rate = Some(Decimal::new(85, 0));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["candidateId"], 7);
        assert_eq!(value["activityType"], "INTERVIEW_SCHEDULED");
        assert_eq!(value["activityDate"], "2024-03-18");
        assert!(value.get("contactEmail").is_none());
        assert!(value.get("submittedRate").is_some());
    }

    #[test]
    fn edit_payload_keeps_existing_values() {
        let activity: Activity = serde_json::from_value(serde_json::json!({
            "id": 12,
            "candidateId": 7,
            "activityType": "REJECTED",
            "clientName": "Initech",
            "submittedRate": "70.5"
        }))
        .unwrap();
        let payload = ActivityPayload::from_activity(&activity, date());
        assert_eq!(payload.candidate_id, 7);
        assert_eq!(payload.activity_type, ActivityType::Rejected);
        assert_eq!(payload.client_name, "Initech");
        assert_eq!(payload.submitted_rate, Some(Decimal::new(705, 1)));
        assert_eq!(payload.activity_date, date());
    }

    #[test]
    fn client_name_and_email_are_checked() {
        let mut payload = ActivityPayload::new(7, ActivityType::Applied, "", date());
        payload.contact_email = Some("nope".into());
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.keys().any(|k| k.to_string() == "client_name"));
        assert!(fields.keys().any(|k| k.to_string() == "contact_email"));
    }
}
