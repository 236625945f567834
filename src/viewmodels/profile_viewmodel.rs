// ============================================================================
// PROFILE VIEWMODEL - Student profile business logic
// ============================================================================

use crate::models::{ProfilePayload, Student, SyncClerkRequest};
use crate::services::ApiClient;
use crate::state::{AppState, ProfileForm};

/// Prefill form fields: existing record wins, identity attributes fill the
/// gaps for a first-time profile.
pub fn prefill_form(state: &AppState) -> ProfileForm {
    if let Some(student) = state.auth.get_student() {
        return ProfileForm {
            name: student.name,
            email: student.email,
            phone: student.phone,
            hostel_block: student.hostel_block,
            room_number: student.room_number,
            ..Default::default()
        };
    }
    let mut form = ProfileForm::default();
    if let Some(identity) = state.auth.get_identity() {
        form.name = identity.full_name();
        form.email = identity.email.unwrap_or_default();
    }
    form
}

pub struct ProfileViewModel {
    api_client: ApiClient,
}

impl ProfileViewModel {
    pub fn new() -> Self {
        Self {
            api_client: ApiClient::new(),
        }
    }

    /// Fetch-or-absent: `None` means no record exists yet and the form
    /// switches to creation mode.
    pub async fn load(&self, state: &AppState) -> Result<Option<Student>, String> {
        let Some(clerk_id) = state.auth.clerk_id() else {
            return Err("Not signed in".to_string());
        };
        let student = self.api_client.fetch_student_by_clerk(&clerk_id).await?;
        state.auth.set_student(student.clone());
        Ok(student)
    }

    /// Save the profile form. An existing record is patched in place; a
    /// first-time profile is created through sync-clerk, then patched with
    /// the domain fields the sync endpoint does not accept.
    pub async fn save(&self, state: &AppState) -> Result<Student, String> {
        let Some(clerk_id) = state.auth.clerk_id() else {
            return Err("Not signed in".to_string());
        };
        let form = state.profile_form.borrow().clone();
        let payload = ProfilePayload {
            clerk_id: clerk_id.clone(),
            name: form.name,
            email: form.email,
            phone: form.phone,
            hostel_block: form.hostel_block,
            room_number: form.room_number,
        }
        .trimmed();
        payload.validate()?;

        let student_id = match state.auth.get_student() {
            Some(student) => student.id,
            None => {
                let identity = state
                    .auth
                    .get_identity()
                    .ok_or_else(|| "Not signed in".to_string())?;
                let response = self
                    .api_client
                    .sync_clerk(&SyncClerkRequest::from_identity(&identity))
                    .await?;
                state.sync.mark_synced();
                response
                    .student
                    .map(|s| s.id)
                    .ok_or_else(|| "Backend did not return the created record".to_string())?
            }
        };

        let saved = self.api_client.update_student(student_id, &payload).await?;
        log::info!("✅ Profile saved for {}", saved.name);
        state.auth.set_student(Some(saved.clone()));
        Ok(saved)
    }
}

impl Default for ProfileViewModel {
    fn default() -> Self {
        Self::new()
    }
}
