use serde::{de::DeserializeOwned, Serialize};
use web_sys::{window, Storage};

pub fn get_local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

pub fn save_to_storage<T: Serialize>(key: &str, value: &T) -> Result<(), String> {
    let storage = get_local_storage().ok_or("localStorage is not available")?;
    let json =
        serde_json::to_string(value).map_err(|e| format!("Failed to serialize data: {}", e))?;
    storage
        .set_item(key, &json)
        .map_err(|_| "Failed to write to localStorage".to_string())?;
    Ok(())
}

pub fn load_from_storage<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = get_local_storage()?;
    let json = storage.get_item(key).ok()??;
    serde_json::from_str(&json).ok()
}

pub fn remove_from_storage(key: &str) -> Result<(), String> {
    let storage = get_local_storage().ok_or("localStorage is not available")?;
    storage
        .remove_item(key)
        .map_err(|_| "Failed to remove from localStorage".to_string())?;
    Ok(())
}

/// Key under which the per-user sync marker lives. Scoped by clerk id so that
/// switching accounts on the same browser never reuses another user's marker.
pub fn sync_marker_key(clerk_id: &str) -> String {
    format!("parcel_sync_{}", clerk_id)
}

pub const IDENTITY_KEY: &str = "parcel_identity";
