// ============================================================================
// APP STATE - Global application state
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::{HelpRequest, HelpStatus, Parcel, Student, ViewQuery};
use crate::state::{AuthState, ReactiveState, ScanState, SyncState};

/// Student dashboard tabs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentTab {
    Profile,
    Pending,
    PickedUp,
    Requests,
}

/// Registration form inputs, held in state so they survive re-renders
#[derive(Clone, Debug, Default)]
pub struct RegistrationForm {
    pub student_id: Option<u64>,
    pub block: String,
    pub room: String,
    pub courier: String,
    pub notes: String,
    pub image_url: String,
    pub submitting: bool,
    pub error: Option<String>,
    /// Outcome of the follow-up email dispatch, independent of creation
    pub mail_notice: Option<String>,
}

impl RegistrationForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Profile form inputs and edit toggle
#[derive(Clone, Debug, Default)]
pub struct ProfileForm {
    pub editing: bool,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub hostel_block: String,
    pub room_number: String,
    pub error: Option<String>,
    pub saving: bool,
}

/// Help request creation form
#[derive(Clone, Debug, Default)]
pub struct HelpForm {
    pub tracking_id: String,
    pub issue_type: String,
    pub message: String,
    pub submitting: bool,
    pub error: Option<String>,
}

impl HelpForm {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub sync: SyncState,
    pub scan: ScanState,

    // Server-derived caches, rebuilt from fresh fetches. The parcel cache is
    // behind one shared Rc so clones of AppState notify the same subscribers.
    pub parcels: Rc<ReactiveState<Vec<Parcel>>>,
    pub students: Rc<RefCell<Vec<Student>>>,
    pub help_requests: Rc<RefCell<Vec<HelpRequest>>>,
    /// Inline QR images per pending parcel, keyed by parcel id
    pub qr_images: Rc<RefCell<HashMap<u64, String>>>,

    // View state
    pub view_query: Rc<RefCell<ViewQuery>>,
    pub student_tab: Rc<RefCell<StudentTab>>,
    pub help_tab: Rc<RefCell<HelpStatus>>,
    pub registration_form: Rc<RefCell<RegistrationForm>>,
    pub profile_form: Rc<RefCell<ProfileForm>>,
    pub help_form: Rc<RefCell<HelpForm>>,
    pub loading_parcels: Rc<RefCell<bool>>,
    pub banner: Rc<RefCell<Option<String>>>,

    // Fetch sequencing: responses tagged with an older sequence number than
    // the latest issued request are discarded
    pub fetch_seq: Rc<Cell<u64>>,
    /// Wall-clock ms of the last completed parcel fetch, for the cooldown
    pub last_fetch_ms: Rc<Cell<f64>>,

    pub change_subscribers: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            auth: AuthState::new(),
            sync: SyncState::new(),
            scan: ScanState::new(),

            parcels: Rc::new(ReactiveState::new(Vec::new())),
            students: Rc::new(RefCell::new(Vec::new())),
            help_requests: Rc::new(RefCell::new(Vec::new())),
            qr_images: Rc::new(RefCell::new(HashMap::new())),

            view_query: Rc::new(RefCell::new(ViewQuery::default())),
            student_tab: Rc::new(RefCell::new(StudentTab::Pending)),
            help_tab: Rc::new(RefCell::new(HelpStatus::Pending)),
            registration_form: Rc::new(RefCell::new(RegistrationForm::default())),
            profile_form: Rc::new(RefCell::new(ProfileForm::default())),
            help_form: Rc::new(RefCell::new(HelpForm::default())),
            loading_parcels: Rc::new(RefCell::new(false)),
            banner: Rc::new(RefCell::new(None)),

            fetch_seq: Rc::new(Cell::new(0)),
            last_fetch_ms: Rc::new(Cell::new(0.0)),

            change_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Hand out the next request sequence number
    pub fn next_fetch_seq(&self) -> u64 {
        let seq = self.fetch_seq.get() + 1;
        self.fetch_seq.set(seq);
        seq
    }

    /// A response is current only if no newer request was issued meanwhile
    pub fn is_current_fetch(&self, seq: u64) -> bool {
        self.fetch_seq.get() == seq
    }

    pub fn set_banner(&self, message: Option<String>) {
        *self.banner.borrow_mut() = message;
    }

    pub fn subscribe_to_changes<F>(&self, callback: F)
    where
        F: Fn() + 'static,
    {
        self.change_subscribers.borrow_mut().push(Rc::new(callback));
    }

    pub fn notify_subscribers(&self) {
        for callback in self.change_subscribers.borrow().iter() {
            callback();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_fetch_sequence_is_detected() {
        let state = AppState::new();
        let first = state.next_fetch_seq();
        let second = state.next_fetch_seq();
        assert!(!state.is_current_fetch(first));
        assert!(state.is_current_fetch(second));
    }
}
