use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ticket status. The UI only ever moves a ticket forward; the backend is the
/// source of truth for the stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpStatus {
    Pending,
    InProgress,
    Resolved,
}

impl HelpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelpStatus::Pending => "pending",
            HelpStatus::InProgress => "in_progress",
            HelpStatus::Resolved => "resolved",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HelpStatus::Pending => "PENDING",
            HelpStatus::InProgress => "IN PROGRESS",
            HelpStatus::Resolved => "RESOLVED",
        }
    }

    /// Next step in the forward-only pipeline; None once resolved.
    pub fn next(&self) -> Option<HelpStatus> {
        match self {
            HelpStatus::Pending => Some(HelpStatus::InProgress),
            HelpStatus::InProgress => Some(HelpStatus::Resolved),
            HelpStatus::Resolved => None,
        }
    }

    /// Deletion is only offered for resolved tickets.
    pub fn can_delete(&self) -> bool {
        matches!(self, HelpStatus::Resolved)
    }

    pub const ALL: [HelpStatus; 3] = [
        HelpStatus::Pending,
        HelpStatus::InProgress,
        HelpStatus::Resolved,
    ];
}

/// Help ticket as the backend serializes it. The tracking/issue fields come
/// over the wire in camelCase (backend serializer quirk).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HelpRequest {
    pub id: u64,
    #[serde(rename = "trackingId", default)]
    pub tracking_id: Option<String>,
    #[serde(rename = "issueType", default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub status: HelpStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HelpRequest {
    pub fn display_tracking(&self) -> &str {
        match self.tracking_id.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => self.tracking_id.as_deref().unwrap_or_default(),
            _ => "No ID available",
        }
    }

    /// Prefer the free-text message; fall back to the issue category.
    pub fn display_issue(&self) -> &str {
        if let Some(m) = self.message.as_deref() {
            if !m.trim().is_empty() {
                return m;
            }
        }
        if let Some(t) = self.issue_type.as_deref() {
            if !t.trim().is_empty() {
                return t;
            }
        }
        "No issue provided"
    }

    /// Creation time parsed from the wire timestamp; None when the backend
    /// omitted it or sent something unparseable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    }
}

/// Payload for `POST /support/create/`.
#[derive(Clone, Debug, Serialize)]
pub struct NewHelpRequest {
    pub email: String,
    #[serde(rename = "trackingId")]
    pub tracking_id: String,
    #[serde(rename = "issueType")]
    pub issue_type: String,
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct HelpStatusUpdate {
    pub status: HelpStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_pipeline_is_forward_only() {
        assert_eq!(HelpStatus::Pending.next(), Some(HelpStatus::InProgress));
        assert_eq!(HelpStatus::InProgress.next(), Some(HelpStatus::Resolved));
        assert_eq!(HelpStatus::Resolved.next(), None);
    }

    #[test]
    fn delete_only_when_resolved() {
        assert!(!HelpStatus::Pending.can_delete());
        assert!(!HelpStatus::InProgress.can_delete());
        assert!(HelpStatus::Resolved.can_delete());
    }

    #[test]
    fn wire_fields_are_camel_case() {
        let json = r#"{
            "id": 4,
            "trackingId": "HPM-4",
            "issueType": "Damaged parcel",
            "message": null,
            "status": "in_progress",
            "created_at": "2025-03-01T10:00:00Z"
        }"#;
        let req: HelpRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.tracking_id.as_deref(), Some("HPM-4"));
        assert_eq!(req.status, HelpStatus::InProgress);
        assert_eq!(req.display_issue(), "Damaged parcel");
        assert!(req.created_at_utc().is_some());
    }

    #[test]
    fn unparseable_creation_time_is_dropped() {
        let req = HelpRequest {
            id: 2,
            tracking_id: None,
            issue_type: None,
            message: None,
            status: HelpStatus::Pending,
            created_at: Some("yesterday-ish".to_string()),
        };
        assert_eq!(req.created_at_utc(), None);
    }

    #[test]
    fn display_fallbacks() {
        let req = HelpRequest {
            id: 1,
            tracking_id: Some("  ".to_string()),
            issue_type: None,
            message: None,
            status: HelpStatus::Pending,
            created_at: None,
        };
        assert_eq!(req.display_tracking(), "No ID available");
        assert_eq!(req.display_issue(), "No issue provided");
    }
}
