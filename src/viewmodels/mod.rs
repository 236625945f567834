pub mod parcel_viewmodel;
pub mod pickup_viewmodel;
pub mod profile_viewmodel;
pub mod support_viewmodel;
pub mod sync_viewmodel;

pub use parcel_viewmodel::ParcelViewModel;
pub use pickup_viewmodel::PickupViewModel;
pub use profile_viewmodel::ProfileViewModel;
pub use support_viewmodel::SupportViewModel;
pub use sync_viewmodel::SyncViewModel;
