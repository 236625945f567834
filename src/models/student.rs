use serde::{Deserialize, Serialize};

/// Student record as the backend stores it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    #[serde(default)]
    pub clerk_id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub hostel_block: String,
    #[serde(default)]
    pub room_number: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl Student {
    /// Dropdown label shown when a guard picks the recipient.
    pub fn option_label(&self) -> String {
        format!("{} - {} Room {}", self.name, self.hostel_block, self.room_number)
    }
}

/// Identity attributes handed over by the external auth provider. The crate
/// performs no validation; empty name parts are concatenated and trimmed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncIdentity {
    pub clerk_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    /// "guard" or "student"; anything else falls back to student
    #[serde(default)]
    pub role: Option<String>,
}

impl SyncIdentity {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("");
        let last = self.last_name.as_deref().unwrap_or("");
        format!("{} {}", first, last).trim().to_string()
    }
}

/// Payload for `POST /students/sync-clerk/`.
#[derive(Clone, Debug, Serialize)]
pub struct SyncClerkRequest {
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
}

impl SyncClerkRequest {
    pub fn from_identity(identity: &SyncIdentity) -> Self {
        Self {
            clerk_id: identity.clerk_id.clone(),
            name: identity.full_name(),
            email: identity.email.clone().unwrap_or_default(),
            profile_image: identity.profile_image.clone(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SyncClerkResponse {
    #[serde(default)]
    pub student: Option<Student>,
    #[serde(default)]
    pub created: bool,
}

/// Payload for profile create/update; the five domain fields are required
/// client-side before either call is made.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProfilePayload {
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub hostel_block: String,
    pub room_number: String,
}

impl ProfilePayload {
    /// Presence check for the five required fields. Returns the first
    /// missing-field message, mirroring the one-at-a-time prompts of the form.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            (self.name.trim(), "Name is required"),
            (self.email.trim(), "Email is required"),
            (self.phone.trim(), "Phone number is required"),
            (self.hostel_block.trim(), "Hostel block is required"),
            (self.room_number.trim(), "Room number is required"),
        ];
        for (value, message) in required {
            if value.is_empty() {
                return Err(message.to_string());
            }
        }
        Ok(())
    }

    pub fn trimmed(&self) -> Self {
        Self {
            clerk_id: self.clerk_id.trim().to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            hostel_block: self.hostel_block.trim().to_string(),
            room_number: self.room_number.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_trims_empty_parts() {
        let identity = SyncIdentity {
            clerk_id: "user_1".to_string(),
            first_name: Some("Asha".to_string()),
            last_name: None,
            email: None,
            profile_image: None,
            role: None,
        };
        assert_eq!(identity.full_name(), "Asha");

        let empty = SyncIdentity {
            clerk_id: "user_2".to_string(),
            first_name: None,
            last_name: None,
            email: None,
            profile_image: None,
            role: None,
        };
        assert_eq!(empty.full_name(), "");
    }

    #[test]
    fn profile_validation_reports_first_missing_field() {
        let mut payload = ProfilePayload {
            clerk_id: "user_1".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "".to_string(),
            hostel_block: "A Block".to_string(),
            room_number: "204-B".to_string(),
        };
        assert_eq!(payload.validate().unwrap_err(), "Phone number is required");

        payload.phone = "9990001111".to_string();
        assert!(payload.validate().is_ok());
    }
}
