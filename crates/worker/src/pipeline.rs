use anyhow::Context;
use chrono::NaiveDate;
use scoreboard_core::config::Settings;
use scoreboard_core::domain::report::DashboardReport;
use scoreboard_core::engine;
use scoreboard_core::ingest::scores_file::parse_score_batch;
use scoreboard_core::storage::{self, archive, history_file, lock};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub as_of_date: NaiveDate,
    pub scores_path: PathBuf,
    pub output_path: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    Completed {
        ranked: usize,
        movers: usize,
        history_symbols: usize,
    },
    DryRun {
        ranked: usize,
        movers: usize,
    },
    Locked,
}

pub fn run_daily(settings: &Settings, req: &RunRequest) -> anyhow::Result<RunSummary> {
    let batch = read_scores(&req.scores_path)?;
    tracing::info!(as_of_date = %req.as_of_date, symbols = batch.len(), "loaded current scores");

    let Some(_lock) = lock::try_acquire_history_lock(&settings.history_path)? else {
        tracing::warn!(
            history = %settings.history_path.display(),
            "history lock held; another run in progress"
        );
        return Ok(RunSummary::Locked);
    };

    let (history, status) = history_file::load(&settings.history_path);
    tracing::info!(?status, "history loaded");

    let out = engine::run(&batch, history, &settings.engine_options())
        .context("scoring run failed")?;
    let report = DashboardReport::from_run(req.as_of_date, &out);

    if req.dry_run {
        tracing::info!(
            as_of_date = %req.as_of_date,
            dry_run = true,
            ranked = report.rows.len(),
            movers = report.movers.len(),
            "scoring run (dry-run); nothing written"
        );
        return Ok(RunSummary::DryRun {
            ranked: report.rows.len(),
            movers: report.movers.len(),
        });
    }

    let payload = serde_json::to_vec_pretty(&report).context("serialize dashboard report")?;
    storage::write_atomic(&req.output_path, &payload)
        .with_context(|| format!("write dashboard {}", req.output_path.display()))?;

    archive::archive(&settings.archive_dir, req.as_of_date, &batch, &report)
        .context("archive daily snapshot failed")?;

    history_file::save(&settings.history_path, &out.history).context("save history failed")?;

    tracing::info!(
        as_of_date = %req.as_of_date,
        ranked = report.rows.len(),
        movers = report.movers.len(),
        history_symbols = out.history.len(),
        "scoring run complete"
    );

    Ok(RunSummary::Completed {
        ranked: report.rows.len(),
        movers: report.movers.len(),
        history_symbols: out.history.len(),
    })
}

fn read_scores(path: &Path) -> anyhow::Result<scoreboard_core::domain::scores::ScoreBatch> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read scores file {}", path.display()))?;
    parse_score_batch(&text).with_context(|| format!("parse scores file {}", path.display()))
}
