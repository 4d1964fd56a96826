use crate::domain::history::HistoryRecord;
use crate::domain::scores::{ScoreTriple, Symbol};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MOVER_THRESHOLD: f64 = 5.0;
pub const DEFAULT_TOP_MOVERS: usize = 10;

/// A symbol whose quality or technicals moved by at least the threshold since
/// its last observation. Deltas are whole points, truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverEvent {
    pub symbol: Symbol,
    pub quality_delta: i64,
    pub technicals_delta: i64,
}

impl MoverEvent {
    pub fn magnitude(&self) -> i64 {
        self.quality_delta.abs().max(self.technicals_delta.abs())
    }
}

pub fn detect(
    symbol: &str,
    current: &ScoreTriple,
    history: &HistoryRecord,
    threshold: f64,
) -> Option<MoverEvent> {
    let quality_delta = delta_since_last(current.quality, &history.quality_history);
    let technicals_delta = delta_since_last(current.technicals, &history.technicals_history);

    if quality_delta.abs() < threshold && technicals_delta.abs() < threshold {
        return None;
    }

    Some(MoverEvent {
        symbol: symbol.to_string(),
        quality_delta: quality_delta.trunc() as i64,
        technicals_delta: technicals_delta.trunc() as i64,
    })
}

// Without a prior observation the delta is zero, so new symbols never move.
fn delta_since_last(current: f64, history: &[f64]) -> f64 {
    let previous = history.last().copied().unwrap_or(current);
    current - previous
}

/// Largest moves first; equal magnitudes keep detection order.
pub fn top_movers(mut events: Vec<MoverEvent>, limit: usize) -> Vec<MoverEvent> {
    events.sort_by_key(|e| std::cmp::Reverse(e.magnitude()));
    events.truncate(limit);
    events
}
