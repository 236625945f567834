// ============================================================================
// PARCEL VIEWMODEL - Parcel list and registration business logic
// ============================================================================

use chrono::{DateTime, TimeZone};

use crate::config::CONFIG;
use crate::models::{NewParcel, Parcel, ParcelLocation, ParcelStatus, Student};
use crate::services::{ApiClient, MailService};
use crate::state::{AppState, RegistrationForm, Role};

/// Counters shown at the top of the guard dashboard
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub picked_up_today: usize,
}

pub fn compute_stats<Tz: TimeZone>(parcels: &[Parcel], now: DateTime<Tz>) -> DashboardStats {
    let mut stats = DashboardStats {
        total: parcels.len(),
        ..Default::default()
    };
    for parcel in parcels {
        match parcel.status {
            ParcelStatus::Pending => stats.pending += 1,
            ParcelStatus::PickedUp => {
                // "Today" is the calendar day of `now` in its own timezone
                let today = parcel
                    .picked_up_time
                    .map(|t| t.with_timezone(&now.timezone()).date_naive() == now.date_naive())
                    .unwrap_or(false);
                if today {
                    stats.picked_up_today += 1;
                }
            }
        }
    }
    stats
}

/// Advisory rate limit between list refetches. Forced refreshes (after a
/// mutation) bypass it.
pub fn cooldown_elapsed(last_fetch_ms: f64, now_ms: f64, cooldown_ms: f64) -> bool {
    last_fetch_ms == 0.0 || now_ms - last_fetch_ms >= cooldown_ms
}

/// Presence checks before any network call is made
pub fn validate_registration(form: &RegistrationForm) -> Result<(), String> {
    if form.student_id.is_none() {
        return Err("Select a student first".to_string());
    }
    if form.block.trim().is_empty() {
        return Err("Hostel block is required".to_string());
    }
    if form.room.trim().is_empty() {
        return Err("Room number is required".to_string());
    }
    if form.courier.trim().is_empty() {
        return Err("Courier service is required".to_string());
    }
    Ok(())
}

/// Parcel ViewModel - business logic only
pub struct ParcelViewModel {
    api_client: ApiClient,
    mail_service: MailService,
}

impl ParcelViewModel {
    pub fn new() -> Self {
        Self {
            api_client: ApiClient::new(),
            mail_service: MailService::new(),
        }
    }

    /// Refresh the parcel cache for the current role. Responses that lose
    /// the race against a newer request are discarded.
    pub async fn load_parcels(&self, state: &AppState, force: bool) -> Result<(), String> {
        let now_ms = js_sys::Date::now();
        if !force && !cooldown_elapsed(state.last_fetch_ms.get(), now_ms, CONFIG.fetch_cooldown_ms())
        {
            log::info!("⏳ Fetch cooldown active, keeping cached parcels");
            return Ok(());
        }

        let seq = state.next_fetch_seq();
        *state.loading_parcels.borrow_mut() = true;

        let result = match state.auth.get_role() {
            Role::Guard => self.api_client.fetch_all_parcels().await,
            Role::Student => {
                let Some(clerk_id) = state.auth.clerk_id() else {
                    *state.loading_parcels.borrow_mut() = false;
                    return Err("Not signed in".to_string());
                };
                self.api_client.fetch_my_parcels(&clerk_id).await
            }
        };

        if !state.is_current_fetch(seq) {
            log::info!("🔄 Discarding stale parcel response (seq {})", seq);
            return Ok(());
        }
        *state.loading_parcels.borrow_mut() = false;

        match result {
            Ok(api_parcels) => {
                let parcels: Vec<Parcel> = api_parcels.into_iter().map(Parcel::from_api).collect();
                log::info!("📦 Loaded {} parcels", parcels.len());
                state.last_fetch_ms.set(js_sys::Date::now());
                state.parcels.set(parcels);
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Failed to load parcels: {}", e);
                Err(e)
            }
        }
    }

    /// Students for the registration dropdown
    pub async fn load_students(&self, state: &AppState) -> Result<(), String> {
        let students = self.api_client.fetch_students().await?;
        log::info!("🎓 Loaded {} students", students.len());
        *state.students.borrow_mut() = students;
        Ok(())
    }

    /// Register a parcel, then dispatch the arrival email. The email is
    /// independent: its failure is reported but never undoes the parcel.
    pub async fn register(&self, state: &AppState, form: &RegistrationForm) -> Result<(), String> {
        validate_registration(form)?;
        let student_id = form
            .student_id
            .ok_or_else(|| "Select a student first".to_string())?;

        let location = ParcelLocation {
            room: form.room.trim().to_string(),
            block: form.block.trim().to_string(),
            notes: {
                let notes = form.notes.trim();
                if notes.is_empty() {
                    None
                } else {
                    Some(notes.to_string())
                }
            },
        };

        let new_parcel = NewParcel {
            student_id,
            service: form.courier.trim().to_string(),
            description: location.to_description(),
            status: ParcelStatus::Pending,
            image: {
                let image = form.image_url.trim();
                if image.is_empty() {
                    None
                } else {
                    Some(image.to_string())
                }
            },
        };

        let created = self.api_client.create_parcel(&new_parcel).await?;
        let tracking_id = created.tracking_id().unwrap_or_default().to_string();
        log::info!("✅ Parcel registered, tracking id: {}", tracking_id);

        let student = state
            .students
            .borrow()
            .iter()
            .find(|s| s.id == student_id)
            .cloned();
        let notice = match student {
            Some(student) => self.notify_student(&student, &tracking_id, &new_parcel.service).await,
            None => Some("Parcel registered, email skipped (student not in cache)".to_string()),
        };
        state.registration_form.borrow_mut().mail_notice = notice;

        Ok(())
    }

    async fn notify_student(
        &self,
        student: &Student,
        tracking_id: &str,
        courier: &str,
    ) -> Option<String> {
        match self
            .mail_service
            .send_arrival_notification(student, tracking_id, courier)
            .await
        {
            Ok(()) => Some(format!("Notification email sent to {}", student.name)),
            Err(e) => {
                log::error!("❌ Notification email failed: {}", e);
                Some(format!("Parcel registered, but the email failed: {}", e))
            }
        }
    }

    /// Hand-over without QR: mark picked up, then force-refresh the list
    pub async fn mark_picked_up(&self, state: &AppState, parcel_id: u64) -> Result<(), String> {
        self.api_client.mark_picked_up(parcel_id).await?;
        self.load_parcels(state, true).await
    }

    /// Inline QR image for a pending parcel card, cached per parcel id
    pub async fn load_qr_image(&self, state: &AppState, parcel_id: u64) -> Result<(), String> {
        if state.qr_images.borrow().contains_key(&parcel_id) {
            return Ok(());
        }
        let image = self.api_client.fetch_qr_base64(parcel_id).await?;
        state
            .qr_images
            .borrow_mut()
            .insert(parcel_id, image.image_base64);
        Ok(())
    }

    pub fn qr_download_url(&self, parcel_id: u64) -> String {
        self.api_client.qr_download_url(parcel_id)
    }
}

impl Default for ParcelViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn parcel(status: ParcelStatus, picked_up: Option<DateTime<Utc>>) -> Parcel {
        Parcel {
            id: 1,
            student_name: "Asha Rao".to_string(),
            location: ParcelLocation::default(),
            tracking_id: "TRK-1".to_string(),
            courier: "BlueDart".to_string(),
            status,
            created_at: None,
            picked_up_time: picked_up,
            image_url: None,
        }
    }

    #[test]
    fn stats_count_pickups_today_only() {
        let now = Utc.with_ymd_and_hms(2025, 3, 7, 18, 0, 0).unwrap();
        let today = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        let yesterday = Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap();
        let parcels = vec![
            parcel(ParcelStatus::Pending, None),
            parcel(ParcelStatus::PickedUp, Some(today)),
            parcel(ParcelStatus::PickedUp, Some(yesterday)),
            parcel(ParcelStatus::PickedUp, None),
        ];
        let stats = compute_stats(&parcels, now);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.picked_up_today, 1);
    }

    #[test]
    fn pickups_counted_against_the_local_day() {
        // 20:00 on 7 Mar in UTC-7; in UTC the clock already reads 8 Mar
        let tz = FixedOffset::west_opt(7 * 3600).unwrap();
        let now_local = tz.with_ymd_and_hms(2025, 3, 7, 20, 0, 0).unwrap();
        let parcels = vec![
            // 19:00 local on 7 Mar, counted even though its UTC date is 8 Mar
            parcel(
                ParcelStatus::PickedUp,
                Some(Utc.with_ymd_and_hms(2025, 3, 8, 2, 0, 0).unwrap()),
            ),
            // 19:00 local on 6 Mar, previous local day
            parcel(
                ParcelStatus::PickedUp,
                Some(Utc.with_ymd_and_hms(2025, 3, 7, 2, 0, 0).unwrap()),
            ),
        ];
        let stats = compute_stats(&parcels, now_local);
        assert_eq!(stats.picked_up_today, 1);
    }

    #[test]
    fn cooldown_blocks_within_window() {
        assert!(cooldown_elapsed(0.0, 1_000.0, 5_000.0));
        assert!(!cooldown_elapsed(10_000.0, 12_000.0, 5_000.0));
        assert!(cooldown_elapsed(10_000.0, 15_000.0, 5_000.0));
    }

    #[test]
    fn registration_rejected_locally_when_incomplete() {
        let mut form = RegistrationForm::default();
        assert_eq!(
            validate_registration(&form).unwrap_err(),
            "Select a student first"
        );

        form.student_id = Some(3);
        form.block = "A Block".to_string();
        assert_eq!(
            validate_registration(&form).unwrap_err(),
            "Room number is required"
        );

        form.room = "204".to_string();
        form.courier = "Delhivery".to_string();
        assert!(validate_registration(&form).is_ok());
    }
}
