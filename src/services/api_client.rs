// ============================================================================
// API CLIENT - HTTP COMMUNICATION ONLY (Stateless)
// ============================================================================
// No business logic here, only HTTP requests against the parcel backend
// ============================================================================

use gloo_net::http::Request;

use crate::config::CONFIG;
use crate::models::{
    ApiParcel, CreateParcelResponse, HelpRequest, HelpStatusUpdate, MarkPickedUpResponse,
    NewHelpRequest, NewParcel, ProfilePayload, QrImageResponse, Student, SyncClerkRequest,
    SyncClerkResponse, VerifyQrResponse,
};

/// Pull the backend's own error message out of a non-2xx body, falling back
/// to the bare HTTP status.
fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message", "detail"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    format!("HTTP {}", status)
}

/// API client, HTTP communication only (stateless)
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: CONFIG.backend_url.clone(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    async fn fail_with_body(response: gloo_net::http::Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        extract_error_message(status, &body)
    }

    // ------------------------------------------------------------------
    // Parcels
    // ------------------------------------------------------------------

    /// Every parcel the backend knows about (guard dashboard)
    pub async fn fetch_all_parcels(&self) -> Result<Vec<ApiParcel>, String> {
        let url = format!("{}/parcels/all/", self.base_url);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<Vec<ApiParcel>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Parcels addressed to one student
    pub async fn fetch_my_parcels(&self, clerk_id: &str) -> Result<Vec<ApiParcel>, String> {
        let url = format!("{}/parcels/my/?clerk_id={}", self.base_url, clerk_id);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<Vec<ApiParcel>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn create_parcel(&self, parcel: &NewParcel) -> Result<CreateParcelResponse, String> {
        let url = format!("{}/parcels/create/", self.base_url);

        log::info!("📦 Registering parcel for student id: {}", parcel.student_id);

        let response = Request::post(&url)
            .json(parcel)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<CreateParcelResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn mark_picked_up(&self, parcel_id: u64) -> Result<MarkPickedUpResponse, String> {
        let url = format!("{}/parcels/{}/picked-up/", self.base_url, parcel_id);

        log::info!("✅ Marking parcel {} as picked up", parcel_id);

        let response = Request::patch(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<MarkPickedUpResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// QR token verification. A transport or HTTP failure is an `Err`; any
    /// response carrying a verification payload, 2xx or not, is an `Ok` so
    /// the caller can branch on the semantic result.
    pub async fn verify_qr(&self, token: &str) -> Result<VerifyQrResponse, String> {
        let url = format!("{}/parcels/verify-qr/", self.base_url);
        let body = serde_json::json!({ "token": token });

        log::info!("🔎 Verifying pickup QR token");

        let response = Request::post(&url)
            .json(&body)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        match serde_json::from_str::<VerifyQrResponse>(&text) {
            Ok(verify) => Ok(verify),
            Err(_) if status >= 200 && status < 300 => Err("Parse error: verification response".to_string()),
            Err(_) => Err(extract_error_message(status, &text)),
        }
    }

    /// Inline QR image for a parcel, base64-encoded PNG
    pub async fn fetch_qr_base64(&self, parcel_id: u64) -> Result<QrImageResponse, String> {
        let url = format!("{}/parcels/qr/{}/base64/", self.base_url, parcel_id);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<QrImageResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// Direct link to the downloadable QR asset
    pub fn qr_download_url(&self, parcel_id: u64) -> String {
        format!("{}/parcels/qr/{}/", self.base_url, parcel_id)
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    pub async fn fetch_students(&self) -> Result<Vec<Student>, String> {
        let url = format!("{}/students/all/", self.base_url);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<Vec<Student>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    /// 404 means the student record does not exist yet, which is a normal
    /// state for a first sign-in, not an error.
    pub async fn fetch_student_by_clerk(&self, clerk_id: &str) -> Result<Option<Student>, String> {
        let url = format!("{}/students/by-clerk/?clerk_id={}", self.base_url, clerk_id);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if response.status() == 404 {
            log::info!("ℹ️ No student record yet for this identity");
            return Ok(None);
        }
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        let student = response
            .json::<Student>()
            .await
            .map_err(|e| format!("Parse error: {}", e))?;
        Ok(Some(student))
    }

    pub async fn sync_clerk(&self, request: &SyncClerkRequest) -> Result<SyncClerkResponse, String> {
        let url = format!("{}/students/sync-clerk/", self.base_url);

        log::info!("🔐 Syncing identity: {}", request.clerk_id);

        let response = Request::post(&url)
            .json(request)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<SyncClerkResponse>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn update_student(
        &self,
        student_id: u64,
        payload: &ProfilePayload,
    ) -> Result<Student, String> {
        let url = format!("{}/students/{}/update/", self.base_url, student_id);

        log::info!("📝 Updating student profile: {}", student_id);

        let response = Request::patch(&url)
            .json(payload)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<Student>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    // ------------------------------------------------------------------
    // Help requests
    // ------------------------------------------------------------------

    pub async fn fetch_my_help_requests(&self, email: &str) -> Result<Vec<HelpRequest>, String> {
        let url = format!("{}/support/my/?email={}", self.base_url, email);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<Vec<HelpRequest>>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn create_help_request(&self, request: &NewHelpRequest) -> Result<HelpRequest, String> {
        let url = format!("{}/support/create/", self.base_url);

        log::info!("🎫 Creating help request: {}", request.issue_type);

        let response = Request::post(&url)
            .json(request)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<HelpRequest>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn update_help_request(
        &self,
        request_id: u64,
        update: &HelpStatusUpdate,
    ) -> Result<HelpRequest, String> {
        let url = format!("{}/support/update/{}/", self.base_url, request_id);

        let response = Request::patch(&url)
            .json(update)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        response
            .json::<HelpRequest>()
            .await
            .map_err(|e| format!("Parse error: {}", e))
    }

    pub async fn delete_help_request(&self, request_id: u64) -> Result<(), String> {
        let url = format!("{}/support/delete/{}/", self.base_url, request_id);

        log::info!("🗑️ Deleting resolved help request: {}", request_id);

        let response = Request::delete(&url)
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        if !response.ok() {
            return Err(Self::fail_with_body(response).await);
        }
        Ok(())
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_backend_payload() {
        assert_eq!(
            extract_error_message(400, r#"{"error": "Student not found"}"#),
            "Student not found"
        );
        assert_eq!(
            extract_error_message(403, r#"{"message": "Forbidden"}"#),
            "Forbidden"
        );
        assert_eq!(extract_error_message(500, "<html>boom</html>"), "HTTP 500");
        assert_eq!(extract_error_message(502, ""), "HTTP 502");
    }

    #[test]
    fn qr_download_url_shape() {
        let client = ApiClient::with_base_url("http://localhost:8000");
        assert_eq!(
            client.qr_download_url(42),
            "http://localhost:8000/parcels/qr/42/"
        );
    }
}
