pub mod help_request;
pub mod location;
pub mod parcel;
pub mod student;
pub mod verify;
pub mod view_query;

pub use help_request::{HelpRequest, HelpStatus, HelpStatusUpdate, NewHelpRequest};
pub use location::ParcelLocation;
pub use parcel::{
    ApiParcel, CreateParcelResponse, MarkPickedUpResponse, NewParcel, Parcel, ParcelStatus,
    QrImageResponse,
};
pub use student::{ProfilePayload, Student, SyncClerkRequest, SyncClerkResponse, SyncIdentity};
pub use verify::{VerifyOutcome, VerifyQrResponse};
pub use view_query::{
    apply_view, filter_choices, DateRange, SortKey, SortOrder, StatusFilter, ViewQuery,
};
