use anyhow::Context;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

// Best-effort guard against two runs interleaving their read-modify-write of
// the same history file. The OS lock dies with the process, so a lock file
// left behind by a killed run never blocks the next one.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
    _file: File,
}

impl RunLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn lock_path_for(history_path: &Path) -> PathBuf {
    let mut name = history_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    history_path.with_file_name(name)
}

/// Returns `None` when another live run holds the lock.
pub fn try_acquire_history_lock(history_path: &Path) -> anyhow::Result<Option<RunLock>> {
    let path = lock_path_for(history_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create lock dir {}", parent.display()))?;
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to open lock {}", path.display()))?;

    if let Err(err) = file.try_lock_exclusive() {
        if err.raw_os_error() == fs4::lock_contended_error().raw_os_error() {
            return Ok(None);
        }
        return Err(err).with_context(|| format!("failed to lock {}", path.display()));
    }

    file.set_len(0)
        .and_then(|()| writeln!(file, "{}", std::process::id()))
        .with_context(|| format!("failed to write lock {}", path.display()))?;

    Ok(Some(RunLock { path, _file: file }))
}
