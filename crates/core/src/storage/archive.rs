use crate::domain::report::DashboardReport;
use crate::domain::scores::{ScoreBatch, ScoreTriple, Symbol};
use crate::error::HistoryError;
use crate::storage::write_atomic;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePaths {
    pub dashboard: PathBuf,
    pub data: PathBuf,
}

impl ArchivePaths {
    pub fn for_date(dir: &Path, date: NaiveDate) -> Self {
        let day = date.format("%Y-%m-%d");
        Self {
            dashboard: dir.join(format!("dashboard_{day}.json")),
            data: dir.join(format!("data_{day}.json")),
        }
    }
}

/// A day's archived state, read back for audit or replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSnapshot {
    pub date: NaiveDate,
    pub raw_scores: BTreeMap<Symbol, ScoreTriple>,
    pub rendered_order: Vec<Symbol>,
}

/// Writes the day's dashboard and raw scores. A rerun on the same date
/// overwrites both files; identical input produces identical bytes.
pub fn archive(
    dir: &Path,
    date: NaiveDate,
    raw_scores: &ScoreBatch,
    report: &DashboardReport,
) -> Result<ArchivePaths, HistoryError> {
    let paths = ArchivePaths::for_date(dir, date);

    let raw: BTreeMap<&str, &ScoreTriple> =
        raw_scores.iter().map(|(s, t)| (s.as_str(), t)).collect();

    write_atomic(&paths.dashboard, &serde_json::to_vec_pretty(report)?)?;
    write_atomic(&paths.data, &serde_json::to_vec_pretty(&raw)?)?;

    tracing::info!(
        %date,
        dashboard = %paths.dashboard.display(),
        symbols = raw.len(),
        "archived daily snapshot"
    );
    Ok(paths)
}

pub fn load_snapshot(dir: &Path, date: NaiveDate) -> Result<ArchiveSnapshot, HistoryError> {
    let paths = ArchivePaths::for_date(dir, date);

    let dashboard = std::fs::read_to_string(&paths.dashboard)
        .map_err(|e| HistoryError::io(&paths.dashboard, e))?;
    let report: DashboardReport = serde_json::from_str(&dashboard)?;
    if report.as_of_date != date {
        return Err(HistoryError::Parse(format!(
            "archived dashboard date mismatch: expected {date}, got {}",
            report.as_of_date
        )));
    }

    let data =
        std::fs::read_to_string(&paths.data).map_err(|e| HistoryError::io(&paths.data, e))?;
    let raw_scores: BTreeMap<Symbol, ScoreTriple> = serde_json::from_str(&data)?;

    Ok(ArchiveSnapshot {
        date,
        raw_scores,
        rendered_order: report.rendered_order().into_iter().map(String::from).collect(),
    })
}
