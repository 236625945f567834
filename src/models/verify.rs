// ============================================================================
// QR VERIFICATION - Wire types and outcome mapping for pickup verification
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::models::parcel::ApiParcel;

/// Structured failure reason returned alongside `valid: false`. Unrecognized
/// codes collapse into `Unknown` so the UI can fall back to the backend's
/// message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyReason {
    Expired,
    AlreadyPicked,
    Tampered,
    #[serde(other)]
    Unknown,
}

/// Body of `POST /parcels/verify-qr/`. A semantic rejection still arrives as
/// a 2xx with `valid: false`; it must never be conflated with an HTTP error.
#[derive(Clone, Debug, Deserialize)]
pub struct VerifyQrResponse {
    pub valid: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub reason: Option<VerifyReason>,
    #[serde(default)]
    pub parcel: Option<ApiParcel>,
}

/// What the guard sees after a decode has been forwarded to the backend.
#[derive(Clone, Debug, PartialEq)]
pub enum VerifyOutcome {
    /// Parcel released; backend state changed authoritatively.
    Released { tracking_id: Option<String> },
    Expired,
    AlreadyPicked,
    Tampered,
    /// `valid: false` with no recognized reason code.
    Invalid { message: String },
    /// Transport or non-2xx failure; verification never happened.
    TransportError { message: String },
}

impl VerifyOutcome {
    pub fn from_response(response: VerifyQrResponse) -> Self {
        if response.valid {
            return VerifyOutcome::Released {
                tracking_id: response
                    .parcel
                    .and_then(|p| p.tracking_id),
            };
        }

        match response.reason {
            Some(VerifyReason::Expired) => VerifyOutcome::Expired,
            Some(VerifyReason::AlreadyPicked) => VerifyOutcome::AlreadyPicked,
            Some(VerifyReason::Tampered) => VerifyOutcome::Tampered,
            _ => VerifyOutcome::Invalid {
                message: response
                    .message
                    .unwrap_or_else(|| "QR code could not be verified".to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, VerifyOutcome::Released { .. })
    }

    pub fn user_message(&self) -> String {
        match self {
            VerifyOutcome::Released { tracking_id } => match tracking_id {
                Some(t) => format!("✅ Parcel {} verified. Release to the student.", t),
                None => "✅ Parcel verified. Release to the student.".to_string(),
            },
            VerifyOutcome::Expired => {
                "⏰ This QR code has expired. Ask the student to regenerate it.".to_string()
            }
            VerifyOutcome::AlreadyPicked => {
                "📦 This parcel was already picked up.".to_string()
            }
            VerifyOutcome::Tampered => {
                "🚫 QR code signature check failed. Do not release the parcel.".to_string()
            }
            VerifyOutcome::Invalid { message } => format!("❌ {}", message),
            VerifyOutcome::TransportError { message } => {
                format!("⚠️ Verification unavailable: {}", message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(valid: bool, reason: Option<VerifyReason>) -> VerifyQrResponse {
        VerifyQrResponse {
            valid,
            message: Some("backend says no".to_string()),
            reason,
            parcel: None,
        }
    }

    #[test]
    fn each_reason_yields_a_distinct_message() {
        let expired = VerifyOutcome::from_response(response(false, Some(VerifyReason::Expired)));
        let picked =
            VerifyOutcome::from_response(response(false, Some(VerifyReason::AlreadyPicked)));
        let tampered =
            VerifyOutcome::from_response(response(false, Some(VerifyReason::Tampered)));

        assert_eq!(expired, VerifyOutcome::Expired);
        assert_eq!(picked, VerifyOutcome::AlreadyPicked);
        assert_eq!(tampered, VerifyOutcome::Tampered);

        let messages = [
            expired.user_message(),
            picked.user_message(),
            tampered.user_message(),
        ];
        assert_ne!(messages[0], messages[1]);
        assert_ne!(messages[1], messages[2]);
        assert_ne!(messages[0], messages[2]);
    }

    #[test]
    fn unknown_reason_falls_back_to_backend_message() {
        let json = r#"{"valid": false, "message": "token replayed", "reason": "replayed"}"#;
        let parsed: VerifyQrResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.reason, Some(VerifyReason::Unknown));

        let outcome = VerifyOutcome::from_response(parsed);
        assert_eq!(
            outcome,
            VerifyOutcome::Invalid {
                message: "token replayed".to_string()
            }
        );
    }

    #[test]
    fn valid_response_is_released() {
        let json = r#"{"valid": true, "parcel": {"id": 9, "status": "PICKED_UP",
                        "tracking_id": "HPM-9"}}"#;
        let parsed: VerifyQrResponse = serde_json::from_str(json).unwrap();
        let outcome = VerifyOutcome::from_response(parsed);
        assert!(outcome.is_success());
        assert_eq!(
            outcome,
            VerifyOutcome::Released {
                tracking_id: Some("HPM-9".to_string())
            }
        );
    }

    #[test]
    fn transport_error_is_not_a_semantic_rejection() {
        let outcome = VerifyOutcome::TransportError {
            message: "HTTP 502".to_string(),
        };
        assert!(!outcome.is_success());
        assert_ne!(
            outcome.user_message(),
            VerifyOutcome::Invalid {
                message: "HTTP 502".to_string()
            }
            .user_message()
        );
    }
}
