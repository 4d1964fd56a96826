//! Parsing of the scrape collaborator's hand-off file.
//!
//! The file is a JSON object keyed by symbol, in the order the cards appeared
//! on the page. Each record is either `{"q": .., "v": .., "t": ..}` (long
//! names accepted) or the raw widget readings `[q, v, t]`. Readings are only
//! split into three dimensions when all three gauges rendered; with fewer,
//! the first reading is quality and the rest score 0. Values may be numbers
//! or strings such as `"55/100"` or `"55 / 100"`. Anything missing or
//! unreadable scores 0, and a record that is neither shape is dropped.

use crate::domain::scores::{ScoreBatch, ScoreTriple};
use crate::error::HistoryError;
use serde_json::{Map, Value};

const MIN_SCORE: f64 = 0.0;
const MAX_SCORE: f64 = 100.0;

pub fn parse_score_batch(text: &str) -> Result<ScoreBatch, HistoryError> {
    let doc: Value = serde_json::from_str(text)?;
    let Value::Object(records) = doc else {
        return Err(HistoryError::Parse(
            "scores file must be a JSON object keyed by symbol".to_string(),
        ));
    };

    let mut batch = ScoreBatch::new();
    for (key, record) in records {
        let symbol = key.trim();
        if symbol.is_empty() {
            tracing::warn!("skipping score record with empty symbol");
            continue;
        }

        let scores = match &record {
            Value::Object(fields) => from_fields(symbol, fields),
            Value::Array(readings) => from_readings(symbol, readings),
            other => {
                tracing::warn!(symbol, record = %other, "skipping malformed score record");
                continue;
            }
        };
        batch.insert(symbol, scores);
    }

    Ok(batch)
}

fn from_fields(symbol: &str, fields: &Map<String, Value>) -> ScoreTriple {
    let pick = |short: &str, long: &str| {
        let value = fields.get(short).or_else(|| fields.get(long));
        score_or_zero(symbol, long, value)
    };
    ScoreTriple::new(
        pick("q", "quality"),
        pick("v", "valuation"),
        pick("t", "technicals"),
    )
}

// With fewer than three gauges only the first one is known to be quality.
fn from_readings(symbol: &str, readings: &[Value]) -> ScoreTriple {
    let quality = score_or_zero(symbol, "quality", readings.first());
    if readings.len() < 3 {
        return ScoreTriple::new(quality, 0.0, 0.0);
    }
    ScoreTriple::new(
        quality,
        score_or_zero(symbol, "valuation", readings.get(1)),
        score_or_zero(symbol, "technicals", readings.get(2)),
    )
}

fn score_or_zero(symbol: &str, dimension: &str, value: Option<&Value>) -> f64 {
    match value.and_then(parse_score_value) {
        Some(score) => score,
        None => {
            tracing::debug!(symbol, dimension, raw = ?value, "score unreadable; using 0");
            0.0
        }
    }
}

/// Reads one widget value. Out-of-range or non-finite readings are `None`.
pub fn parse_score_value(value: &Value) -> Option<f64> {
    let score = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = match s.split_once('/') {
                Some((num, denom)) if denom.trim() == "100" => num,
                Some(_) => return None,
                None => s,
            };
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (score.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(&score)).then_some(score)
}
