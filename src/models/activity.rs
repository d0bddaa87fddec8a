use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    #[default]
    Applied,
    Submitted,
    InterviewScheduled,
    InterviewCompleted,
    FeedbackReceived,
    Rejected,
    OnHold,
}

impl ActivityType {
    pub const ALL: [ActivityType; 7] = [
        ActivityType::Applied,
        ActivityType::Submitted,
        ActivityType::InterviewScheduled,
        ActivityType::InterviewCompleted,
        ActivityType::FeedbackReceived,
        ActivityType::Rejected,
        ActivityType::OnHold,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Applied => "APPLIED",
            ActivityType::Submitted => "SUBMITTED",
            ActivityType::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ActivityType::InterviewCompleted => "INTERVIEW_COMPLETED",
            ActivityType::FeedbackReceived => "FEEDBACK_RECEIVED",
            ActivityType::Rejected => "REJECTED",
            ActivityType::OnHold => "ON_HOLD",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ActivityType::Applied => "Applied",
            ActivityType::Submitted => "Submitted",
            ActivityType::InterviewScheduled => "Interview Scheduled",
            ActivityType::InterviewCompleted => "Interview Completed",
            ActivityType::FeedbackReceived => "Feedback Received",
            ActivityType::Rejected => "Rejected",
            ActivityType::OnHold => "On Hold",
        }
    }

    pub fn is_interview(&self) -> bool {
        matches!(
            self,
            ActivityType::InterviewScheduled | ActivityType::InterviewCompleted
        )
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        ActivityType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Unknown activity type: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i64,
    pub candidate_id: Option<i64>,
    pub activity_type: ActivityType,
    pub client_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub submitted_rate: Option<Decimal>,
    pub notes: Option<String>,
    pub activity_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
}

/// Counters shown next to a candidate's activity timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTally {
    pub total: usize,
    pub submissions: usize,
    pub interviews: usize,
    pub rejections: usize,
}

impl ActivityTally {
    pub fn from_activities(activities: &[Activity]) -> Self {
        activities.iter().fold(Self::default(), |mut tally, a| {
            tally.total += 1;
            match a.activity_type {
                ActivityType::Submitted => tally.submissions += 1,
                ActivityType::Rejected => tally.rejections += 1,
                t if t.is_interview() => tally.interviews += 1,
                _ => {}
            }
            tally
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn activity(kind: ActivityType) -> Activity {
        Activity {
            id: 1,
            candidate_id: Some(7),
            activity_type: kind,
            client_name: Some("Acme".into()),
            contact_person: None,
            contact_phone: None,
            contact_email: None,
            submitted_rate: None,
            notes: None,
            activity_date: None,
            created_at: None,
        }
    }

    #[test]
    fn tally_counts_both_interview_stages() {
        let items = vec![
            activity(ActivityType::Applied),
            activity(ActivityType::Submitted),
            activity(ActivityType::InterviewScheduled),
            activity(ActivityType::InterviewCompleted),
            activity(ActivityType::Rejected),
        ];
        let tally = ActivityTally::from_activities(&items);
        assert_eq!(
            tally,
            ActivityTally {
                total: 5,
                submissions: 1,
                interviews: 2,
                rejections: 1
            }
        );
    }

    #[test]
    fn activity_type_wire_format() {
        assert_eq!(
            serde_json::to_value(ActivityType::InterviewScheduled).unwrap(),
            json!("INTERVIEW_SCHEDULED")
        );
        assert_eq!("on hold".parse::<ActivityType>().unwrap(), ActivityType::OnHold);
    }
}
