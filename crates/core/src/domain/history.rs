use crate::domain::scores::{ScoreTriple, Symbol};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Number of prior observations kept per score dimension.
pub const HISTORY_DEPTH: usize = 3;

/// Bounded per-dimension score history for one symbol, oldest first.
///
/// The last element is always the previous run's value: a run diffs against
/// the record first and pushes the current scores afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "q", default, deserialize_with = "scalar_or_series")]
    pub quality_history: Vec<f64>,
    #[serde(rename = "v", default, deserialize_with = "scalar_or_series")]
    pub valuation_history: Vec<f64>,
    #[serde(rename = "t", default, deserialize_with = "scalar_or_series")]
    pub technicals_history: Vec<f64>,
}

impl HistoryRecord {
    pub fn push(&mut self, scores: &ScoreTriple) {
        push_bounded(&mut self.quality_history, scores.quality);
        push_bounded(&mut self.valuation_history, scores.valuation);
        push_bounded(&mut self.technicals_history, scores.technicals);
    }

    /// Returns a copy with `scores` appended, leaving `self` untouched.
    pub fn with_observation(&self, scores: &ScoreTriple) -> Self {
        let mut next = self.clone();
        next.push(scores);
        next
    }

    pub fn is_empty(&self) -> bool {
        self.quality_history.is_empty()
            && self.valuation_history.is_empty()
            && self.technicals_history.is_empty()
    }
}

fn push_bounded(series: &mut Vec<f64>, value: f64) {
    series.push(value);
    keep_recent(series);
}

fn keep_recent(series: &mut Vec<f64>) {
    if series.len() > HISTORY_DEPTH {
        series.drain(..series.len() - HISTORY_DEPTH);
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredValues {
    Scalar(f64),
    Series(Vec<f64>),
}

// Older history files stored a single number per dimension.
fn scalar_or_series<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut values = match Option::<StoredValues>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StoredValues::Scalar(v)) => vec![v],
        Some(StoredValues::Series(v)) => v,
    };
    keep_recent(&mut values);
    Ok(values)
}

/// Symbol -> history. The only state that survives between runs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryStore {
    records: BTreeMap<Symbol, HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: &str) -> Option<&HistoryRecord> {
        self.records.get(symbol)
    }

    pub fn insert(&mut self, symbol: impl Into<Symbol>, record: HistoryRecord) {
        self.records.insert(symbol.into(), record);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &HistoryRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn push_keeps_three_most_recent_in_arrival_order() {
        let mut record = HistoryRecord::default();
        for i in 1..=6 {
            let x = i as f64;
            record.push(&ScoreTriple::new(x, x * 10.0, x * 100.0));
            assert!(record.quality_history.len() <= HISTORY_DEPTH);
        }
        assert_eq!(record.quality_history, vec![4.0, 5.0, 6.0]);
        assert_eq!(record.valuation_history, vec![40.0, 50.0, 60.0]);
        assert_eq!(record.technicals_history, vec![400.0, 500.0, 600.0]);
    }

    #[test]
    fn legacy_scalar_values_are_promoted() {
        let store: HistoryStore = serde_json::from_value(json!({
            "TCS": {"q": 55.0, "v": 40, "t": [30.0, 35.0]},
            "INFY": {"q": null}
        }))
        .unwrap();

        let tcs = store.get("TCS").unwrap();
        assert_eq!(tcs.quality_history, vec![55.0]);
        assert_eq!(tcs.valuation_history, vec![40.0]);
        assert_eq!(tcs.technicals_history, vec![30.0, 35.0]);

        let infy = store.get("INFY").unwrap();
        assert!(infy.is_empty());
    }

    #[test]
    fn overlong_stored_series_are_truncated_on_load() {
        let record: HistoryRecord =
            serde_json::from_value(json!({"q": [1, 2, 3, 4, 5], "v": [], "t": []})).unwrap();
        assert_eq!(record.quality_history, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn serializes_with_short_keys() {
        let mut store = HistoryStore::new();
        let mut record = HistoryRecord::default();
        record.push(&ScoreTriple::new(1.0, 2.0, 3.0));
        store.insert("ABC", record);

        assert_eq!(
            serde_json::to_value(&store).unwrap(),
            json!({"ABC": {"q": [1.0], "v": [2.0], "t": [3.0]}})
        );
    }

    #[test]
    fn with_observation_does_not_mutate_source() {
        let record = HistoryRecord::default();
        let next = record.with_observation(&ScoreTriple::new(1.0, 2.0, 3.0));
        assert!(record.is_empty());
        assert_eq!(next.quality_history, vec![1.0]);
    }
}
