pub mod app_state;
pub mod auth_state;
pub mod reactivity;
pub mod scan_state;
pub mod sync_state;

pub use app_state::{AppState, HelpForm, ProfileForm, RegistrationForm, StudentTab};
pub use auth_state::{AuthState, Role};
pub use reactivity::ReactiveState;
pub use scan_state::{ScanFlow, ScanState};
pub use sync_state::{SyncPhase, SyncState};
