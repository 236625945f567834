// ============================================================================
// SUPPORT VIEWMODEL - Help request business logic
// ============================================================================
// Mutations go straight to the backend and are followed by a refetch; the
// local list is never patched optimistically
// ============================================================================

use crate::models::{HelpRequest, HelpStatus, HelpStatusUpdate, NewHelpRequest};
use crate::services::ApiClient;
use crate::state::{AppState, HelpForm};

pub fn validate_help_form(form: &HelpForm) -> Result<(), String> {
    if form.tracking_id.trim().is_empty() {
        return Err("Tracking id is required".to_string());
    }
    if form.issue_type.trim().is_empty() {
        return Err("Pick an issue type".to_string());
    }
    Ok(())
}

pub struct SupportViewModel {
    api_client: ApiClient,
}

impl SupportViewModel {
    pub fn new() -> Self {
        Self {
            api_client: ApiClient::new(),
        }
    }

    pub async fn load(&self, state: &AppState, email: &str) -> Result<(), String> {
        let requests = self.api_client.fetch_my_help_requests(email).await?;
        log::info!("🎫 Loaded {} help requests", requests.len());
        *state.help_requests.borrow_mut() = requests;
        Ok(())
    }

    pub async fn create(&self, state: &AppState, email: &str) -> Result<(), String> {
        let form = state.help_form.borrow().clone();
        validate_help_form(&form)?;
        let request = NewHelpRequest {
            tracking_id: form.tracking_id.trim().to_string(),
            issue_type: form.issue_type.trim().to_string(),
            message: {
                let message = form.message.trim();
                if message.is_empty() {
                    None
                } else {
                    Some(message.to_string())
                }
            },
            email: email.to_string(),
        };
        self.api_client.create_help_request(&request).await?;
        state.help_form.borrow_mut().reset();
        self.load(state, email).await
    }

    /// Move a ticket one step forward. Resolved tickets have no next step.
    pub async fn advance(
        &self,
        state: &AppState,
        request: &HelpRequest,
        email: &str,
    ) -> Result<(), String> {
        let next = request
            .status
            .next()
            .ok_or_else(|| "Request is already resolved".to_string())?;
        let update = HelpStatusUpdate { status: next };
        self.api_client.update_help_request(request.id, &update).await?;
        self.load(state, email).await
    }

    /// Delete is only legal once a ticket is resolved
    pub async fn delete(
        &self,
        state: &AppState,
        request: &HelpRequest,
        email: &str,
    ) -> Result<(), String> {
        if !request.status.can_delete() {
            return Err("Only resolved requests can be deleted".to_string());
        }
        self.api_client.delete_help_request(request.id).await?;
        self.load(state, email).await
    }

    /// Tickets for one status tab
    pub fn for_tab(requests: &[HelpRequest], tab: HelpStatus) -> Vec<HelpRequest> {
        requests
            .iter()
            .filter(|r| r.status == tab)
            .cloned()
            .collect()
    }
}

impl Default for SupportViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_form_requires_tracking_and_issue() {
        let mut form = HelpForm {
            tracking_id: "".to_string(),
            issue_type: "".to_string(),
            ..Default::default()
        };
        assert_eq!(
            validate_help_form(&form).unwrap_err(),
            "Tracking id is required"
        );
        form.tracking_id = "TRK-9".to_string();
        assert_eq!(validate_help_form(&form).unwrap_err(), "Pick an issue type");
        form.issue_type = "damaged".to_string();
        assert!(validate_help_form(&form).is_ok());
    }

    #[test]
    fn tab_grouping_filters_by_status() {
        let make = |id: u64, status: HelpStatus| HelpRequest {
            id,
            tracking_id: Some(format!("TRK-{}", id)),
            issue_type: Some("lost".to_string()),
            message: None,
            status,
            created_at: None,
        };
        let requests = vec![
            make(1, HelpStatus::Pending),
            make(2, HelpStatus::Resolved),
            make(3, HelpStatus::Pending),
        ];
        let pending = SupportViewModel::for_tab(&requests, HelpStatus::Pending);
        assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(
            SupportViewModel::for_tab(&requests, HelpStatus::InProgress).len(),
            0
        );
    }
}
