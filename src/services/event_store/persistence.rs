use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::services::storage::{KeyValueStore, StoreError};

/// Key of the ordered event list.
pub const EVENTS_KEY: &str = "savedEvents";
/// Key of the event id to display settings mapping.
pub const DISPLAY_SETTINGS_KEY: &str = "savedDisplaySettings";

/// Reads and decodes the JSON value stored under `key`.
///
/// A missing key is `Ok(None)`; an undecodable value is an error.
pub fn load_value<S, T>(store: &S, key: &str) -> Result<Option<T>, StoreError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(data) = store.get(key)? else {
        return Ok(None);
    };

    let value = serde_json::from_str(&data).map_err(|source| StoreError::Decode {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

pub fn save_value<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let data = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &data)
}
