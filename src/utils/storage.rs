//! Snapshot persistence in localStorage.

use super::{dom, log};
use crate::config::STORAGE_KEY;
use crate::core::Snapshot;
use crate::core::error::StorageError;

/// Read the stored snapshot.
///
/// `Ok(None)` when nothing has been stored yet.
pub fn load() -> Result<Option<Snapshot>, StorageError> {
    let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
    let Some(json) = storage.get_item(STORAGE_KEY).ok().flatten() else {
        return Ok(None);
    };
    Snapshot::from_json(&json).map(Some)
}

/// Stored snapshot, or `None` after logging why it could not be used.
pub fn load_or_warn() -> Option<Snapshot> {
    match load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            log::warn(&format!("Discarding saved workspace: {}", e));
            None
        }
    }
}

pub fn save(snapshot: &Snapshot) -> Result<(), StorageError> {
    let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
    let json = snapshot.to_json()?;
    storage
        .set_item(STORAGE_KEY, &json)
        .map_err(|_| StorageError::WriteFailed)
}

/// Drop the stored snapshot.
pub fn clear() -> Result<(), StorageError> {
    let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
    storage
        .remove_item(STORAGE_KEY)
        .map_err(|_| StorageError::WriteFailed)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod web_tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_round_trip() {
        let snapshot = Snapshot::initial(&mut StdRng::seed_from_u64(3));
        save(&snapshot).expect("save");
        assert_eq!(load().expect("load"), Some(snapshot));
        clear().expect("clear");
        assert_eq!(load().expect("load"), None);
    }

    #[wasm_bindgen_test]
    fn test_malformed_is_discarded() {
        let storage = dom::local_storage().expect("localStorage");
        storage.set_item(STORAGE_KEY, "{not json").expect("write");
        assert!(matches!(load(), Err(StorageError::Malformed(_))));
        assert_eq!(load_or_warn(), None);
        clear().expect("clear");
    }
}
