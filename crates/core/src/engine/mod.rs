//! History-tracking and tiering engine.
//!
//! One call to [`run`] takes the current batch and the previous history store,
//! and returns the ranked dashboard rows, the top movers, and the merged store.
//! Every symbol is diffed against its history before the history is extended,
//! so badges and movers always compare with the previous run.

pub mod diff;
pub mod movers;
pub mod rank;
pub mod tier;

use crate::domain::history::HistoryStore;
use crate::domain::scores::{ScoreBatch, ScoreTriple, Symbol};
use crate::error::HistoryError;
use diff::Badge;
use movers::MoverEvent;
use serde::{Deserialize, Serialize};
use tier::{ScoreBand, Tier};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub mover_threshold: f64,
    pub top_movers: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mover_threshold: movers::DEFAULT_MOVER_THRESHOLD,
            top_movers: movers::DEFAULT_TOP_MOVERS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges {
    pub quality: Badge,
    pub valuation: Badge,
    pub technicals: Badge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bands {
    pub quality: ScoreBand,
    pub valuation: ScoreBand,
    pub technicals: ScoreBand,
}

/// Valuation is not tracked for streaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streaks {
    pub quality: bool,
    pub technicals: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRow {
    pub symbol: Symbol,
    pub tier: Tier,
    pub total_score: f64,
    pub scores: ScoreTriple,
    pub badges: Badges,
    pub bands: Bands,
    pub streaks: Streaks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Ranked best first.
    pub rows: Vec<DashboardRow>,
    pub movers: Vec<MoverEvent>,
    pub history: HistoryStore,
}

pub fn run(
    batch: &ScoreBatch,
    mut history: HistoryStore,
    opts: &EngineOptions,
) -> Result<RunOutput, HistoryError> {
    if batch.is_empty() {
        return Err(HistoryError::EmptyBatch);
    }

    let mut rows = Vec::with_capacity(batch.len());
    let mut mover_events = Vec::new();
    let mut skipped: usize = 0;

    for (symbol, scores) in batch.iter() {
        let symbol = symbol.trim();
        if symbol.is_empty() || !scores.is_finite() {
            skipped += 1;
            tracing::warn!(symbol, ?scores, "skipping malformed score record");
            continue;
        }

        let previous = history.get(symbol).cloned().unwrap_or_default();

        let badges = Badges {
            quality: diff::diff(scores.quality, &previous.quality_history),
            valuation: diff::diff(scores.valuation, &previous.valuation_history),
            technicals: diff::diff(scores.technicals, &previous.technicals_history),
        };
        let streaks = Streaks {
            quality: diff::streak(&previous.quality_history, scores.quality),
            technicals: diff::streak(&previous.technicals_history, scores.technicals),
        };

        if let Some(event) = movers::detect(symbol, scores, &previous, opts.mover_threshold) {
            mover_events.push(event);
        }

        rows.push(DashboardRow {
            symbol: symbol.to_string(),
            tier: tier::classify_triple(scores),
            total_score: scores.total(),
            scores: *scores,
            badges,
            bands: Bands {
                quality: tier::band(scores.quality),
                valuation: tier::band(scores.valuation),
                technicals: tier::band(scores.technicals),
            },
            streaks,
        });

        history.insert(symbol, previous.with_observation(scores));
    }

    // Nothing usable survived the per-symbol checks; treat it like an empty scrape.
    if rows.is_empty() {
        tracing::warn!(skipped, "every score record was malformed");
        return Err(HistoryError::EmptyBatch);
    }

    rank::sort_ranked(&mut rows, |row| (row.tier, row.total_score));
    let movers = movers::top_movers(mover_events, opts.top_movers);

    tracing::debug!(
        ranked = rows.len(),
        skipped,
        movers = movers.len(),
        history_symbols = history.len(),
        "scoring run complete"
    );

    Ok(RunOutput {
        rows,
        movers,
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::history::HistoryRecord;

    fn triple(q: f64, v: f64, t: f64) -> ScoreTriple {
        ScoreTriple::new(q, v, t)
    }

    fn symbols(out: &RunOutput) -> Vec<&str> {
        out.rows.iter().map(|r| r.symbol.as_str()).collect()
    }

    #[test]
    fn empty_batch_is_rejected() {
        let err = run(&ScoreBatch::new(), HistoryStore::new(), &EngineOptions::default())
            .unwrap_err();
        assert!(matches!(err, HistoryError::EmptyBatch));
    }

    #[test]
    fn first_run_ranks_without_badges_or_movers() {
        let batch: ScoreBatch = [
            ("WEAK", triple(10.0, 10.0, 10.0)),
            ("VALUE", triple(10.0, 60.0, 60.0)),
            ("STAR", triple(60.0, 60.0, 60.0)),
            ("QT", triple(60.0, 10.0, 60.0)),
            ("FAIR", triple(35.0, 35.0, 35.0)),
        ]
        .into_iter()
        .collect();

        let out = run(&batch, HistoryStore::new(), &EngineOptions::default()).unwrap();
        assert_eq!(symbols(&out), vec!["STAR", "QT", "VALUE", "FAIR", "WEAK"]);
        assert!(out.movers.is_empty());
        assert!(out.rows.iter().all(|r| r.badges.quality.is_none()));
        assert_eq!(out.history.len(), 5);
        assert_eq!(out.history.get("STAR").unwrap().quality_history, vec![60.0]);
    }

    #[test]
    fn diffs_against_previous_run_then_extends_history() {
        let mut store = HistoryStore::new();
        store.insert(
            "TCS",
            HistoryRecord {
                quality_history: vec![40.0, 45.0],
                valuation_history: vec![30.0],
                technicals_history: vec![70.0, 60.0],
            },
        );
        let batch: ScoreBatch = [("TCS", triple(50.0, 30.0, 52.0))].into_iter().collect();

        let out = run(&batch, store, &EngineOptions::default()).unwrap();
        let row = &out.rows[0];
        assert_eq!(row.badges.quality, Badge::Up(5));
        assert_eq!(row.badges.valuation, Badge::None);
        assert_eq!(row.badges.technicals, Badge::Down(8));
        assert!(row.streaks.quality);
        assert!(!row.streaks.technicals);
        assert_eq!(row.total_score, 102.0);

        assert_eq!(out.movers.len(), 1);
        assert_eq!(out.movers[0].quality_delta, 5);
        assert_eq!(out.movers[0].technicals_delta, -8);

        let tcs = out.history.get("TCS").unwrap();
        assert_eq!(tcs.quality_history, vec![40.0, 45.0, 50.0]);
        assert_eq!(tcs.technicals_history, vec![70.0, 60.0, 52.0]);
    }

    #[test]
    fn absent_symbols_keep_stale_history() {
        let mut store = HistoryStore::new();
        let stale = HistoryRecord {
            quality_history: vec![1.0],
            valuation_history: vec![2.0],
            technicals_history: vec![3.0],
        };
        store.insert("OLD", stale.clone());
        let batch: ScoreBatch = [("NEW", triple(50.0, 50.0, 50.0))].into_iter().collect();

        let out = run(&batch, store, &EngineOptions::default()).unwrap();
        assert_eq!(out.history.get("OLD"), Some(&stale));
        assert!(out.history.get("NEW").is_some());
    }

    #[test]
    fn malformed_records_are_skipped() {
        let batch: ScoreBatch = [
            ("GOOD", triple(50.0, 50.0, 50.0)),
            ("  ", triple(50.0, 50.0, 50.0)),
            ("NAN", triple(f64::NAN, 50.0, 50.0)),
        ]
        .into_iter()
        .collect();

        let out = run(&batch, HistoryStore::new(), &EngineOptions::default()).unwrap();
        assert_eq!(symbols(&out), vec!["GOOD"]);
        assert!(out.history.get("NAN").is_none());
    }

    #[test]
    fn batch_with_only_malformed_records_is_empty() {
        let batch: ScoreBatch = [
            ("  ", triple(50.0, 50.0, 50.0)),
            ("X", triple(f64::NAN, 50.0, 50.0)),
        ]
        .into_iter()
        .collect();

        let err = run(&batch, HistoryStore::new(), &EngineOptions::default()).unwrap_err();
        assert!(matches!(err, HistoryError::EmptyBatch));
    }

    #[test]
    fn padded_duplicate_symbol_is_one_row_without_self_diff() {
        let batch: ScoreBatch = [
            ("TCS", triple(50.0, 50.0, 50.0)),
            (" TCS ", triple(60.0, 60.0, 60.0)),
        ]
        .into_iter()
        .collect();

        let out = run(&batch, HistoryStore::new(), &EngineOptions::default()).unwrap();
        assert_eq!(symbols(&out), vec!["TCS"]);
        assert_eq!(out.rows[0].badges.quality, Badge::None);
        assert!(out.movers.is_empty());
        assert_eq!(out.history.get("TCS").unwrap().quality_history, vec![60.0]);
    }

    #[test]
    fn history_stays_bounded_over_many_runs() {
        let mut store = HistoryStore::new();
        for day in 1..=7 {
            let x = day as f64 * 10.0;
            let batch: ScoreBatch = [("SYM", triple(x, x, x))].into_iter().collect();
            store = run(&batch, store, &EngineOptions::default()).unwrap().history;
        }
        let record = store.get("SYM").unwrap();
        assert_eq!(record.quality_history, vec![50.0, 60.0, 70.0]);
        assert_eq!(record.valuation_history.len(), 3);
    }

    #[test]
    fn movers_are_capped_and_ordered() {
        let mut store = HistoryStore::new();
        let mut batch = ScoreBatch::new();
        for i in 0..15 {
            let symbol = format!("S{i:02}");
            store.insert(
                symbol.as_str(),
                HistoryRecord {
                    quality_history: vec![20.0],
                    valuation_history: vec![20.0],
                    technicals_history: vec![20.0],
                },
            );
            batch.insert(symbol, triple(20.0 + 5.0 + i as f64, 20.0, 20.0));
        }

        let opts = EngineOptions::default();
        let out = run(&batch, store, &opts).unwrap();
        assert_eq!(out.movers.len(), 10);
        assert_eq!(out.movers[0].symbol, "S14");
        assert_eq!(out.movers[0].quality_delta, 19);
        assert_eq!(out.movers[9].symbol, "S05");
    }
}
