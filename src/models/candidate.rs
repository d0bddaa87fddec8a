use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisaStatus {
    #[serde(rename = "H1B")]
    H1b,
    #[serde(rename = "H4EAD")]
    H4Ead,
    #[serde(rename = "L1")]
    L1,
    #[serde(rename = "L2EAD")]
    L2Ead,
    #[serde(rename = "OPT")]
    Opt,
    #[serde(rename = "STEM_OPT")]
    StemOpt,
    #[serde(rename = "CPT")]
    Cpt,
    #[serde(rename = "F1")]
    F1,
    #[serde(rename = "GC")]
    GreenCard,
    #[serde(rename = "CITIZEN")]
    Citizen,
    #[serde(rename = "OTHER")]
    Other,
}

impl VisaStatus {
    pub const ALL: [VisaStatus; 11] = [
        VisaStatus::H1b,
        VisaStatus::H4Ead,
        VisaStatus::L1,
        VisaStatus::L2Ead,
        VisaStatus::Opt,
        VisaStatus::StemOpt,
        VisaStatus::Cpt,
        VisaStatus::F1,
        VisaStatus::GreenCard,
        VisaStatus::Citizen,
        VisaStatus::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VisaStatus::H1b => "H1B",
            VisaStatus::H4Ead => "H4EAD",
            VisaStatus::L1 => "L1",
            VisaStatus::L2Ead => "L2EAD",
            VisaStatus::Opt => "OPT",
            VisaStatus::StemOpt => "STEM_OPT",
            VisaStatus::Cpt => "CPT",
            VisaStatus::F1 => "F1",
            VisaStatus::GreenCard => "GC",
            VisaStatus::Citizen => "CITIZEN",
            VisaStatus::Other => "OTHER",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            VisaStatus::StemOpt => "STEM OPT",
            VisaStatus::GreenCard => "Green Card",
            VisaStatus::Citizen => "US Citizen",
            VisaStatus::Other => "Other",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for VisaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(' ', "_");
        VisaStatus::ALL
            .into_iter()
            .find(|v| v.as_str() == normalized)
            .ok_or_else(|| format!("Unknown visa status: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchCandidate {
    pub id: i64,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub passport_number: Option<String>,
    pub country_of_citizenship: Option<String>,
    pub linkedin_url: Option<String>,

    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,

    pub visa_status: Option<VisaStatus>,
    pub other_visa_status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    pub primary_skill: Option<String>,
    pub other_primary_skill: Option<String>,
    pub additional_skills: Option<String>,
    pub experience_years: Option<i32>,
    pub domains: Option<String>,
    #[serde(default)]
    pub domain_list: Vec<String>,

    pub target_rate: Option<Decimal>,
    pub assigned_consultant_id: Option<i64>,
    pub assigned_consultant_name: Option<String>,
    pub notes: Option<String>,

    pub resume_filename: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub created_by_name: Option<String>,
    pub location: Option<String>,
    pub full_address: Option<String>,
    #[serde(default)]
    pub document_count: i32,
    #[serde(default)]
    pub has_linkedin_profile: bool,
}

impl BenchCandidate {
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => compose_full_name(
                self.first_name.as_deref(),
                self.middle_name.as_deref(),
                self.last_name.as_deref(),
            ),
        }
    }

    /// Server sends both a comma-joined string and a list; older records
    /// only carry the string.
    pub fn domain_tags(&self) -> Vec<String> {
        if !self.domain_list.is_empty() {
            return self.domain_list.clone();
        }
        self.domains
            .as_deref()
            .map(split_domains)
            .unwrap_or_default()
    }

    pub fn effective_visa_status(&self) -> Option<String> {
        match self.visa_status {
            Some(VisaStatus::Other) => self
                .other_visa_status
                .clone()
                .filter(|s| !s.trim().is_empty())
                .or_else(|| Some(VisaStatus::Other.display_name().to_string())),
            Some(status) => Some(status.display_name().to_string()),
            None => None,
        }
    }
}

pub fn compose_full_name(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> String {
    [first, middle, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub first: String,
    pub middle: String,
    pub last: String,
}

pub fn split_full_name(full_name: &str) -> NameParts {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.len() {
        0 => NameParts::default(),
        1 => NameParts {
            first: tokens[0].to_string(),
            ..NameParts::default()
        },
        n => NameParts {
            first: tokens[0].to_string(),
            middle: tokens[1..n - 1].join(" "),
            last: tokens[n - 1].to_string(),
        },
    }
}

pub fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_name_skips_blank_parts() {
        assert_eq!(compose_full_name(Some(" Ana "), Some(""), Some("Lopez")), "Ana Lopez");
        assert_eq!(compose_full_name(None, None, None), "");
    }

    #[test]
    fn split_full_name_uses_first_and_last_tokens() {
        let parts = split_full_name("Ravi Kumar Venkata Rao");
        assert_eq!(parts.first, "Ravi");
        assert_eq!(parts.middle, "Kumar Venkata");
        assert_eq!(parts.last, "Rao");
        assert_eq!(split_full_name("Cher").last, "");
    }

    #[test]
    fn visa_status_parses_display_spellings() {
        assert_eq!("STEM OPT".parse::<VisaStatus>().unwrap(), VisaStatus::StemOpt);
        assert_eq!("gc".parse::<VisaStatus>().unwrap(), VisaStatus::GreenCard);
        assert!("B2".parse::<VisaStatus>().is_err());
        assert_eq!(VisaStatus::GreenCard.display_name(), "Green Card");
    }

    #[test]
    fn deserializes_server_payload() {
        let candidate: BenchCandidate = serde_json::from_value(json!({
            "id": 42,
            "firstName": "Priya",
            "lastName": "Shah",
            "visaStatus": "OTHER",
            "otherVisaStatus": "TN",
            "domains": "Healthcare, Retail",
            "targetRate": 85.5,
            "createdAt": "2024-05-01T09:30:00",
            "startDate": "2024-06-01",
            "documentCount": 3
        }))
        .unwrap();

        assert_eq!(candidate.display_name(), "Priya Shah");
        assert_eq!(candidate.domain_tags(), vec!["Healthcare", "Retail"]);
        assert_eq!(candidate.effective_visa_status().as_deref(), Some("TN"));
        assert_eq!(candidate.target_rate, Some(Decimal::new(855, 1)));
        assert_eq!(candidate.document_count, 3);
    }
}
