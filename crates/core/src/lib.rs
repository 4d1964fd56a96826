pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod storage;
pub mod time;

pub mod config {
    use crate::engine::movers::{DEFAULT_MOVER_THRESHOLD, DEFAULT_TOP_MOVERS};
    use crate::engine::EngineOptions;
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_HISTORY_PATH: &str = "history.json";
    const DEFAULT_ARCHIVE_DIR: &str = "archive";
    const DEFAULT_OUTPUT_PATH: &str = "dashboard.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub history_path: PathBuf,
        pub archive_dir: PathBuf,
        pub output_path: PathBuf,
        pub mover_threshold: f64,
        pub top_movers: usize,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Self::from_lookup(|key| std::env::var(key).ok())
        }

        pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
            let var = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

            let mover_threshold = match var("SCOREBOARD_MOVER_THRESHOLD") {
                Some(s) => s
                    .trim()
                    .parse::<f64>()
                    .with_context(|| format!("SCOREBOARD_MOVER_THRESHOLD is not a number: {s}"))?,
                None => DEFAULT_MOVER_THRESHOLD,
            };
            anyhow::ensure!(
                mover_threshold.is_finite() && mover_threshold >= 0.0,
                "SCOREBOARD_MOVER_THRESHOLD must be >= 0 (got {mover_threshold})"
            );

            let top_movers = match var("SCOREBOARD_TOP_MOVERS") {
                Some(s) => s
                    .trim()
                    .parse::<usize>()
                    .with_context(|| format!("SCOREBOARD_TOP_MOVERS is not a count: {s}"))?,
                None => DEFAULT_TOP_MOVERS,
            };

            Ok(Self {
                history_path: var("SCOREBOARD_HISTORY_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH)),
                archive_dir: var("SCOREBOARD_ARCHIVE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE_DIR)),
                output_path: var("SCOREBOARD_OUTPUT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
                mover_threshold,
                top_movers,
                sentry_dsn: var("SENTRY_DSN"),
            })
        }

        pub fn engine_options(&self) -> EngineOptions {
            EngineOptions {
                mover_threshold: self.mover_threshold,
                top_movers: self.top_movers,
            }
        }
    }

}
