use std::path::PathBuf;

/// Failure kinds of a scoring run. Only [`HistoryError::EmptyBatch`] is meant
/// to stop a run; the others are downgraded to logged defaults by callers
/// that can tolerate them.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("I/O failed on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse failed: {0}")]
    Parse(String),

    #[error("empty batch: refusing to replace existing history")]
    EmptyBatch,
}

impl HistoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Parse(_) => "parse",
            Self::EmptyBatch => "empty_batch",
        }
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
