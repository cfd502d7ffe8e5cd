use crate::components::hours::models::ScheduleDoc;
use chrono::{DateTime, Utc};
use rust_i18n::t;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Review state of a correction proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ProposalStatus {
    /// Localized badge text for admin listings
    pub fn label(&self) -> String {
        match self {
            ProposalStatus::Pending => t!("proposal_pending"),
            ProposalStatus::Approved => t!("proposal_approved"),
            ProposalStatus::Rejected => t!("proposal_rejected"),
        }
        .to_string()
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Approved => "approved",
            ProposalStatus::Rejected => "rejected",
        };
        write!(f, "{name}")
    }
}

/// Listing filter for the admin console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl ListFilter {
    /// Whether a proposal with the given status belongs in this listing
    pub fn matches(&self, status: ProposalStatus) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Pending => status == ProposalStatus::Pending,
            ListFilter::Approved => status == ProposalStatus::Approved,
            ListFilter::Rejected => status == ProposalStatus::Rejected,
        }
    }
}

/// A user-submitted correction to a facility's operating hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoursCorrectionProposal {
    pub id: String,
    pub hospital_id: String,
    pub hospital_name: Option<String>,
    /// Copy of the live schedule at submission time, for audit and diffing
    pub current_snapshot: Option<ScheduleDoc>,
    pub proposed_schedule: ScheduleDoc,
    pub justification: String,
    pub submitter_id: String,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewer_note: Option<String>,
    pub reviewed_by: Option<String>,
}

impl HoursCorrectionProposal {
    /// Create a fresh pending proposal with a random id
    pub fn new(
        hospital_id: String,
        hospital_name: Option<String>,
        current_snapshot: Option<ScheduleDoc>,
        proposed_schedule: ScheduleDoc,
        justification: String,
        submitter_id: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            hospital_id,
            hospital_name,
            current_snapshot,
            proposed_schedule,
            justification,
            submitter_id,
            status: ProposalStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_at: None,
            reviewer_note: None,
            reviewed_by: None,
        }
    }
}

/// Submission payload for a new correction, as posted by the directory app
///
/// Schedule fields arrive at the top level of the JSON body, not nested,
/// so the document is flattened into the payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestion {
    pub hospital_id: String,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(flatten)]
    pub proposed_schedule: ScheduleDoc,
    #[serde(default)]
    pub justification: String,
    pub submitter_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::hours::models::TimeField;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ProposalStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        let status: ProposalStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(status, ProposalStatus::Rejected);
    }

    #[test]
    fn test_list_filter() {
        assert!(ListFilter::All.matches(ProposalStatus::Approved));
        assert!(ListFilter::Pending.matches(ProposalStatus::Pending));
        assert!(!ListFilter::Pending.matches(ProposalStatus::Approved));
        assert!(!ListFilter::Rejected.matches(ProposalStatus::Pending));
    }

    #[test]
    fn test_new_proposal_starts_pending() {
        let proposal = HoursCorrectionProposal::new(
            "h-1".to_string(),
            Some("Central Clinic".to_string()),
            None,
            ScheduleDoc::default(),
            "Hours changed last month".to_string(),
            "user-7".to_string(),
        );
        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert!(proposal.reviewed_at.is_none());
        assert!(proposal.reviewer_note.is_none());
        assert!(!proposal.id.is_empty());
    }

    #[test]
    fn test_proposal_round_trips_through_json() {
        let proposal = HoursCorrectionProposal::new(
            "h-2".to_string(),
            None,
            None,
            ScheduleDoc::default(),
            "Open later on Fridays".to_string(),
            "user-3".to_string(),
        );
        let json = serde_json::to_string(&proposal).unwrap();
        let back: HoursCorrectionProposal = serde_json::from_str(&json).unwrap();
        assert_eq!(proposal, back);
    }

    #[test]
    fn test_submission_payload_carries_schedule_at_top_level() {
        let body = r#"{
            "hospitalId": "h-9",
            "hospitalName": "동네의원",
            "monStart": 900,
            "monEnd": "1800",
            "lunch": "1230~1330",
            "justification": "Monday opens at nine now",
            "submitterId": "user-12"
        }"#;
        let payload: NewSuggestion = serde_json::from_str(body).unwrap();
        assert_eq!(payload.hospital_id, "h-9");
        assert_eq!(payload.hospital_name.as_deref(), Some("동네의원"));
        assert_eq!(
            payload.proposed_schedule.mon_start,
            Some(TimeField::Num(900))
        );
        assert_eq!(
            payload.proposed_schedule.mon_end,
            Some(TimeField::Text("1800".to_string()))
        );
        assert_eq!(payload.proposed_schedule.lunch.as_deref(), Some("1230~1330"));
        assert_eq!(payload.submitter_id, "user-12");
    }
}
