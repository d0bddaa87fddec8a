use std::borrow::Cow;

use chrono::NaiveDate;
use reqwest::multipart::Form;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::candidate::{compose_full_name, split_domains, split_full_name, BenchCandidate, VisaStatus};

pub const OTHER_PRIMARY_SKILL: &str = "OTHER";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CandidateForm {
    #[validate(length(min = 1, message = "First Name is required"))]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1, message = "Last Name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Phone Number is required"))]
    pub phone_number: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    pub passport_number: Option<String>,
    pub country_of_citizenship: Option<String>,
    pub linkedin_url: Option<String>,

    pub address1: Option<String>,
    pub address2: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    pub country: Option<String>,

    pub visa_status: VisaStatus,
    pub other_visa_status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Primary Skill is required"))]
    pub primary_skill: String,
    pub other_primary_skill: Option<String>,
    pub additional_skills: Option<String>,
    #[validate(range(min = 0, max = 50, message = "Experience years must be between 0 and 50"))]
    pub experience_years: i32,
    #[serde(default)]
    pub domains: Vec<String>,

    pub target_rate: Option<Decimal>,
    pub assigned_consultant_id: Option<i64>,
    pub notes: Option<String>,
}

impl Default for CandidateForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            middle_name: None,
            last_name: String::new(),
            phone_number: String::new(),
            email: String::new(),
            passport_number: None,
            country_of_citizenship: None,
            linkedin_url: None,
            address1: None,
            address2: None,
            city: String::new(),
            state: String::new(),
            country: None,
            visa_status: VisaStatus::H1b,
            other_visa_status: None,
            start_date: None,
            end_date: None,
            primary_skill: String::new(),
            other_primary_skill: None,
            additional_skills: None,
            experience_years: 0,
            domains: Vec::new(),
            target_rate: None,
            assigned_consultant_id: None,
            notes: None,
        }
    }
}

impl CandidateForm {
    /// Prefills the edit form from a stored record.
    pub fn from_candidate(candidate: &BenchCandidate) -> Self {
        let split = candidate
            .full_name
            .as_deref()
            .map(split_full_name)
            .unwrap_or_default();
        let pick = |explicit: &Option<String>, fallback: String| {
            explicit
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            first_name: pick(&candidate.first_name, split.first),
            middle_name: Some(pick(&candidate.middle_name, split.middle)).filter(|s| !s.is_empty()),
            last_name: pick(&candidate.last_name, split.last),
            phone_number: candidate.phone_number.clone().unwrap_or_default(),
            email: candidate.email.clone().unwrap_or_default(),
            passport_number: candidate.passport_number.clone(),
            country_of_citizenship: candidate.country_of_citizenship.clone(),
            linkedin_url: candidate.linkedin_url.clone(),
            address1: candidate.address1.clone(),
            address2: candidate.address2.clone(),
            city: candidate.city.clone().unwrap_or_default(),
            state: candidate.state.clone().unwrap_or_default(),
            country: candidate.country.clone(),
            visa_status: candidate.visa_status.unwrap_or(VisaStatus::H1b),
            other_visa_status: candidate.other_visa_status.clone(),
            start_date: candidate.start_date,
            end_date: candidate.end_date,
            primary_skill: candidate.primary_skill.clone().unwrap_or_default(),
            other_primary_skill: candidate.other_primary_skill.clone(),
            additional_skills: candidate.additional_skills.clone(),
            experience_years: candidate.experience_years.unwrap_or(0),
            domains: candidate.domain_tags(),
            target_rate: candidate.target_rate,
            assigned_consultant_id: candidate.assigned_consultant_id,
            notes: candidate.notes.clone(),
        }
    }

    pub fn full_name(&self) -> String {
        compose_full_name(
            Some(&self.first_name),
            self.middle_name.as_deref(),
            Some(&self.last_name),
        )
    }

    pub fn trimmed(&self) -> Self {
        let trim = |s: &String| s.trim().to_string();
        let trim_opt = non_blank;
        Self {
            first_name: trim(&self.first_name),
            middle_name: trim_opt(&self.middle_name),
            last_name: trim(&self.last_name),
            phone_number: trim(&self.phone_number),
            email: trim(&self.email),
            passport_number: trim_opt(&self.passport_number),
            country_of_citizenship: trim_opt(&self.country_of_citizenship),
            linkedin_url: trim_opt(&self.linkedin_url),
            address1: trim_opt(&self.address1),
            address2: trim_opt(&self.address2),
            city: trim(&self.city),
            state: trim(&self.state),
            country: trim_opt(&self.country),
            visa_status: self.visa_status,
            other_visa_status: trim_opt(&self.other_visa_status),
            start_date: self.start_date,
            end_date: self.end_date,
            primary_skill: trim(&self.primary_skill),
            other_primary_skill: trim_opt(&self.other_primary_skill),
            additional_skills: trim_opt(&self.additional_skills),
            experience_years: self.experience_years,
            domains: self
                .domains
                .iter()
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
            target_rate: self.target_rate,
            assigned_consultant_id: self.assigned_consultant_id,
            notes: trim_opt(&self.notes),
        }
    }

    /// Field rules plus the "OTHER needs free text" rules, all reported at once.
    pub fn validate_submission(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.visa_status == VisaStatus::Other && self.other_visa_status.is_none() {
            errors.add("otherVisaStatus".into(), required("Please specify the visa status"));
        }
        if self.primary_skill.eq_ignore_ascii_case(OTHER_PRIMARY_SKILL) && self.other_primary_skill.is_none() {
            errors.add("otherPrimarySkill".into(), required("Please specify the primary skill"));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                errors.add("endDate".into(), required("Visa end date must not precede start date"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Text parts in submission order; blank values are left out.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let primary_skill = if self.primary_skill.eq_ignore_ascii_case(OTHER_PRIMARY_SKILL) {
            self.other_primary_skill.clone().unwrap_or_default()
        } else {
            self.primary_skill.clone()
        };
        let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string());

        let fields: Vec<(&'static str, Option<String>)> = vec![
            ("fullName", Some(self.full_name())),
            ("firstName", Some(self.first_name.clone())),
            ("middleName", self.middle_name.clone()),
            ("lastName", Some(self.last_name.clone())),
            ("phoneNumber", Some(self.phone_number.clone())),
            ("email", Some(self.email.clone())),
            ("passportNumber", self.passport_number.clone()),
            ("countryOfCitizenship", self.country_of_citizenship.clone()),
            ("linkedinUrl", self.linkedin_url.clone()),
            ("address1", self.address1.clone()),
            ("address2", self.address2.clone()),
            ("city", Some(self.city.clone())),
            ("state", Some(self.state.clone())),
            ("country", self.country.clone()),
            ("visaStatus", Some(self.visa_status.as_str().to_string())),
            ("otherVisaStatus", self.other_visa_status.clone()),
            ("startDate", date(self.start_date)),
            ("endDate", date(self.end_date)),
            ("primarySkill", Some(primary_skill)),
            ("otherPrimarySkill", self.other_primary_skill.clone()),
            ("additionalSkills", self.additional_skills.clone()),
            ("experienceYears", Some(self.experience_years.to_string())),
            ("domains", Some(self.domains.join(","))),
            ("targetRate", self.target_rate.map(|r| r.to_string())),
            ("assignedConsultantId", self.assigned_consultant_id.map(|id| id.to_string())),
            ("notes", self.notes.clone()),
        ];

        fields
            .into_iter()
            .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
            .collect()
    }

    pub fn to_form(&self) -> Form {
        self.text_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(message: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed(message))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<VisaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_consultant_name: Option<String>,
}

impl SearchFilters {
    /// Blank text filters are dropped so they never reach the query string.
    pub fn trimmed(&self) -> Self {
        Self {
            full_name: non_blank(&self.full_name),
            visa_status: self.visa_status,
            primary_skill: non_blank(&self.primary_skill),
            state: non_blank(&self.state),
            assigned_consultant_name: non_blank(&self.assigned_consultant_name),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedSearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visa_status: Option<VisaStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_consultant_name: Option<String>,
    #[validate(range(min = 0, max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_experience: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_experience: Option<i32>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
}

impl AdvancedSearch {
    pub fn with_domains(mut self, raw: &str) -> Self {
        self.domains = split_domains(raw);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub candidate_ids: Vec<i64>,
    pub format: ExportFormat,
}
