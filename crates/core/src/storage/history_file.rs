use crate::domain::history::HistoryStore;
use crate::error::HistoryError;
use crate::storage::write_atomic;
use std::path::Path;

/// How [`load`] arrived at the store it returned.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded { symbols: usize },
    Missing,
    /// The file existed but could not be used; an empty store was substituted.
    Defaulted(HistoryError),
}

/// Reads the persisted store. Never fails: a missing or corrupt file yields
/// an empty store, and the reason is reported through [`LoadStatus`].
pub fn load(path: &Path) -> (HistoryStore, LoadStatus) {
    match try_load(path) {
        Ok(Some(store)) => {
            let symbols = store.len();
            (store, LoadStatus::Loaded { symbols })
        }
        Ok(None) => (HistoryStore::new(), LoadStatus::Missing),
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                kind = err.kind(),
                error = %err,
                "history unreadable; starting from empty history"
            );
            (HistoryStore::new(), LoadStatus::Defaulted(err))
        }
    }
}

pub fn try_load(path: &Path) -> Result<Option<HistoryStore>, HistoryError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(HistoryError::io(path, err)),
    };
    let store = serde_json::from_str::<HistoryStore>(&raw)?;
    Ok(Some(store))
}

/// Replaces the persisted store wholesale. An empty store is refused so a run
/// that captured nothing cannot wipe out prior history.
pub fn save(path: &Path, store: &HistoryStore) -> Result<(), HistoryError> {
    if store.is_empty() {
        return Err(HistoryError::EmptyBatch);
    }

    let payload = serde_json::to_vec_pretty(store)?;
    write_atomic(path, &payload)?;

    tracing::debug!(path = %path.display(), symbols = store.len(), "history saved");
    Ok(())
}
