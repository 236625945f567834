// ============================================================================
// MAIL SERVICE - Parcel arrival notifications through EmailJS
// ============================================================================
// Fire-and-report: a failed email never affects the parcel that was created
// ============================================================================

use gloo_net::http::Request;
use serde::Serialize;

use crate::config::CONFIG;
use crate::models::Student;

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Serialize)]
struct EmailJsRequest {
    service_id: String,
    template_id: String,
    user_id: String,
    template_params: TemplateParams,
}

#[derive(Serialize)]
struct TemplateParams {
    to_name: String,
    to_email: String,
    tracking_id: String,
    courier: String,
    hostel_block: String,
    room_number: String,
}

#[derive(Clone)]
pub struct MailService;

impl MailService {
    pub fn new() -> Self {
        Self
    }

    /// Tell the student their parcel arrived. Requires the EmailJS keys to
    /// be configured; without them the notification is skipped, not failed.
    pub async fn send_arrival_notification(
        &self,
        student: &Student,
        tracking_id: &str,
        courier: &str,
    ) -> Result<(), String> {
        if !CONFIG.mail.is_configured() {
            log::warn!("📧 EmailJS keys not configured, skipping notification");
            return Ok(());
        }
        if student.email.trim().is_empty() {
            log::warn!("📧 Student {} has no email on file, skipping notification", student.name);
            return Ok(());
        }

        let request = EmailJsRequest {
            service_id: CONFIG.mail.service_id.clone(),
            template_id: CONFIG.mail.template_id.clone(),
            user_id: CONFIG.mail.public_key.clone(),
            template_params: TemplateParams {
                to_name: student.name.clone(),
                to_email: student.email.clone(),
                tracking_id: tracking_id.to_string(),
                courier: courier.to_string(),
                hostel_block: student.hostel_block.clone(),
                room_number: student.room_number.clone(),
            },
        };

        log::info!("📧 Sending arrival notification to {}", student.email);

        let response = Request::post(EMAILJS_ENDPOINT)
            .json(&request)
            .map_err(|e| format!("Serialization error: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;

        if response.ok() {
            log::info!("✅ Notification email accepted for delivery");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(format!("EmailJS error {}: {}", status, body))
        }
    }
}

impl Default for MailService {
    fn default() -> Self {
        Self::new()
    }
}
