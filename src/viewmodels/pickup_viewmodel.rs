// ============================================================================
// PICKUP VIEWMODEL - QR verification business logic
// ============================================================================

use crate::models::VerifyOutcome;
use crate::services::ApiClient;

pub struct PickupViewModel {
    api_client: ApiClient,
}

impl PickupViewModel {
    pub fn new() -> Self {
        Self {
            api_client: ApiClient::new(),
        }
    }

    /// Verify a decoded QR token. Transport and HTTP failures map to
    /// `TransportError`, never to a semantic "invalid" outcome.
    pub async fn verify(&self, token: &str) -> VerifyOutcome {
        match self.api_client.verify_qr(token).await {
            Ok(response) => {
                let outcome = VerifyOutcome::from_response(response);
                log::info!("🔎 Verification outcome: {}", outcome.user_message());
                outcome
            }
            Err(e) => {
                log::error!("❌ Verification request failed: {}", e);
                VerifyOutcome::TransportError { message: e }
            }
        }
    }
}

impl Default for PickupViewModel {
    fn default() -> Self {
        Self::new()
    }
}
