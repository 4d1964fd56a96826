pub mod archive;
pub mod history_file;
pub mod lock;

use crate::error::HistoryError;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `payload` next to `target` and renames it into place, so readers
/// only ever see the old file or the complete new one.
pub fn write_atomic(target: &Path, payload: &[u8]) -> Result<(), HistoryError> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
    }

    let tmp = tmp_path(target);
    {
        let mut file = File::create(&tmp).map_err(|e| HistoryError::io(&tmp, e))?;
        file.write_all(payload)
            .map_err(|e| HistoryError::io(&tmp, e))?;
        file.sync_all().map_err(|e| HistoryError::io(&tmp, e))?;
    }

    if let Err(err) = fs::rename(&tmp, target) {
        if target.exists() {
            let _ = fs::remove_file(target);
            fs::rename(&tmp, target).map_err(|e| HistoryError::io(target, e))?;
        } else {
            let _ = fs::remove_file(&tmp);
            return Err(HistoryError::io(target, err));
        }
    }
    Ok(())
}

fn tmp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_file_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("state.json");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
        assert!(!tmp_path(&target).exists());
    }
}
