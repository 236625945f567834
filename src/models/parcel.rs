use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::location::{ParcelLocation, UNKNOWN_FIELD};
use crate::models::student::Student;

pub const UNKNOWN_COURIER: &str = "Unknown Service";

/// Parcel status as the backend stores it. Transitions only ever go
/// PENDING -> PICKED_UP; the backend is authoritative for the transition and
/// for setting the pickup timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParcelStatus {
    #[serde(rename = "PENDING")]
    Pending,
    #[serde(rename = "PICKED_UP")]
    PickedUp,
}

impl ParcelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "PENDING",
            ParcelStatus::PickedUp => "PICKED_UP",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "🟡 PENDING",
            ParcelStatus::PickedUp => "🟢 PICKED UP",
        }
    }

    /// Only a pending parcel may be released to a student.
    pub fn can_mark_picked_up(&self) -> bool {
        matches!(self, ParcelStatus::Pending)
    }
}

/// Wire representation of `student` on a parcel record: either an embedded
/// object or a bare name string, depending on backend revision.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentRef {
    Embedded(Student),
    Name(String),
}

impl StudentRef {
    pub fn display_name(&self) -> String {
        match self {
            StudentRef::Embedded(s) => s.name.clone(),
            StudentRef::Name(n) => n.clone(),
        }
    }
}

/// Parcel record as returned by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiParcel {
    pub id: u64,
    #[serde(default)]
    pub student: Option<StudentRef>,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    pub status: ParcelStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub picked_up_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Client-side view of a parcel: wire record mapped into the structured model
/// the views work with.
#[derive(Clone, Debug, PartialEq)]
pub struct Parcel {
    pub id: u64,
    pub student_name: String,
    pub location: ParcelLocation,
    pub tracking_id: String,
    pub courier: String,
    pub status: ParcelStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub picked_up_time: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

impl Parcel {
    pub fn from_api(api: ApiParcel) -> Self {
        let location = api
            .description
            .as_deref()
            .map(ParcelLocation::from_description)
            .unwrap_or_default();

        let student_name = api
            .student
            .as_ref()
            .map(StudentRef::display_name)
            .unwrap_or_else(|| "Unknown Student".to_string());

        // tracking_id is the backend-supplied source of truth; the description
        // is never consulted for it.
        let tracking_id = api
            .tracking_id
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

        let courier = api
            .service
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_COURIER.to_string());

        Self {
            id: api.id,
            student_name,
            location,
            tracking_id,
            courier,
            status: api.status,
            created_at: api.created_at.as_deref().and_then(parse_timestamp),
            picked_up_time: api.picked_up_time.as_deref().and_then(parse_timestamp),
            image_url: api.image,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Payload for `POST /parcels/create/`. The tracking id is server-generated.
#[derive(Clone, Debug, Serialize)]
pub struct NewParcel {
    pub student_id: u64,
    pub service: String,
    pub description: String,
    pub status: ParcelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CreateParcelResponse {
    #[serde(default)]
    pub parcel: Option<ApiParcel>,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl CreateParcelResponse {
    /// Server-generated tracking id of the parcel that was just created.
    pub fn tracking_id(&self) -> Option<&str> {
        self.parcel.as_ref().and_then(|p| p.tracking_id.as_deref())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct MarkPickedUpResponse {
    #[serde(default)]
    pub parcel: Option<ApiParcel>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Inline QR image for a pending parcel.
#[derive(Clone, Debug, Deserialize)]
pub struct QrImageResponse {
    pub image_base64: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_parcel(description: Option<&str>) -> ApiParcel {
        ApiParcel {
            id: 7,
            student: Some(StudentRef::Name("Asha Rao".to_string())),
            tracking_id: Some("HPM-2024-0007".to_string()),
            description: description.map(String::from),
            service: Some("BlueDart".to_string()),
            status: ParcelStatus::Pending,
            created_at: Some("2025-03-02T10:15:00+00:00".to_string()),
            picked_up_time: None,
            image: None,
        }
    }

    #[test]
    fn maps_wire_record_to_view_model() {
        let parcel = Parcel::from_api(api_parcel(Some("Room No: 204-B | Block: A Block")));
        assert_eq!(parcel.student_name, "Asha Rao");
        assert_eq!(parcel.location.room, "204-B");
        assert_eq!(parcel.location.block, "A Block");
        assert_eq!(parcel.tracking_id, "HPM-2024-0007");
        assert_eq!(parcel.courier, "BlueDart");
        assert!(parcel.created_at.is_some());
    }

    #[test]
    fn tolerates_description_without_markers() {
        let parcel = Parcel::from_api(api_parcel(Some("left at reception")));
        assert_eq!(parcel.location.room, UNKNOWN_FIELD);
        assert_eq!(parcel.location.block, UNKNOWN_FIELD);
    }

    #[test]
    fn embedded_student_object_deserializes() {
        let json = r#"{
            "id": 3,
            "student": {"id": 1, "clerk_id": "user_1", "name": "Dev Patel",
                        "email": "dev@example.com", "phone": "999",
                        "hostel_block": "B Block", "room_number": "101"},
            "tracking_id": "HPM-3",
            "description": "Room No: 101 | Block: B Block",
            "service": "Amazon",
            "status": "PICKED_UP",
            "created_at": "2025-03-01T08:00:00Z",
            "picked_up_time": "2025-03-02T09:30:00Z"
        }"#;
        let api: ApiParcel = serde_json::from_str(json).unwrap();
        let parcel = Parcel::from_api(api);
        assert_eq!(parcel.student_name, "Dev Patel");
        assert_eq!(parcel.status, ParcelStatus::PickedUp);
        assert!(parcel.picked_up_time.is_some());
    }

    #[test]
    fn pickup_transition_is_one_way() {
        assert!(ParcelStatus::Pending.can_mark_picked_up());
        assert!(!ParcelStatus::PickedUp.can_mark_picked_up());
    }

    #[test]
    fn create_response_tracking_id_comes_from_embedded_parcel() {
        let json = r#"{"parcel": {"id": 7, "tracking_id": "HPM-2024-0007",
                                  "status": "PENDING"},
                       "created": true}"#;
        let response: CreateParcelResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.tracking_id(), Some("HPM-2024-0007"));

        let bare: CreateParcelResponse = serde_json::from_str(r#"{"created": false}"#).unwrap();
        assert_eq!(bare.tracking_id(), None);
    }

    #[test]
    fn new_parcel_serializes_image_only_when_present() {
        let mut parcel = NewParcel {
            student_id: 3,
            service: "Delhivery".to_string(),
            description: "Room No: 204 | Block: A Block".to_string(),
            status: ParcelStatus::Pending,
            image: None,
        };
        let json = serde_json::to_value(&parcel).unwrap();
        assert!(json.get("image").is_none());

        parcel.image = Some("https://cdn.example.com/p7.jpg".to_string());
        let json = serde_json::to_value(&parcel).unwrap();
        assert_eq!(
            json.get("image").and_then(|v| v.as_str()),
            Some("https://cdn.example.com/p7.jpg")
        );
    }

    #[test]
    fn missing_optional_fields_fall_back() {
        let api = ApiParcel {
            tracking_id: None,
            service: Some("  ".to_string()),
            student: None,
            ..api_parcel(None)
        };
        let parcel = Parcel::from_api(api);
        assert_eq!(parcel.tracking_id, UNKNOWN_FIELD);
        assert_eq!(parcel.courier, UNKNOWN_COURIER);
        assert_eq!(parcel.student_name, "Unknown Student");
    }
}
