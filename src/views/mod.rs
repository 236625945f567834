pub mod app;
pub mod guard_dashboard;
pub mod help_requests;
pub mod parcel_card;
pub mod profile;
pub mod registration_form;
pub mod scanner;
pub mod student_dashboard;
pub mod sync_indicator;

pub use app::render_app;
