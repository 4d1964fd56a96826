use serde::{Deserialize, Serialize};

pub type Symbol = String;

/// Three 0-100 health scores for one symbol, as captured by a single run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreTriple {
    #[serde(rename = "q", alias = "quality")]
    pub quality: f64,
    #[serde(rename = "v", alias = "valuation")]
    pub valuation: f64,
    #[serde(rename = "t", alias = "technicals")]
    pub technicals: f64,
}

impl ScoreTriple {
    pub fn new(quality: f64, valuation: f64, technicals: f64) -> Self {
        Self {
            quality,
            valuation,
            technicals,
        }
    }

    /// Composite used for ordering within a tier. Valuation only gates tier 3.
    pub fn total(&self) -> f64 {
        self.quality + self.technicals
    }

    pub fn average(&self) -> f64 {
        (self.quality + self.valuation + self.technicals) / 3.0
    }

    pub fn is_finite(&self) -> bool {
        self.quality.is_finite() && self.valuation.is_finite() && self.technicals.is_finite()
    }
}

/// One run's input, in the order the upstream collaborator listed the symbols.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBatch {
    entries: Vec<(Symbol, ScoreTriple)>,
}

impl ScoreBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symbols are trimmed. Re-inserting a symbol replaces its scores but
    /// keeps its first position.
    pub fn insert(&mut self, symbol: impl Into<Symbol>, scores: ScoreTriple) {
        let mut symbol = symbol.into();
        if symbol.trim().len() != symbol.len() {
            symbol = symbol.trim().to_string();
        }
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some(entry) => entry.1 = scores,
            None => self.entries.push((symbol, scores)),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&ScoreTriple> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol.trim())
            .map(|(_, scores)| scores)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &ScoreTriple)> {
        self.entries.iter().map(|(s, scores)| (s, scores))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<Symbol>> FromIterator<(S, ScoreTriple)> for ScoreBatch {
    fn from_iter<I: IntoIterator<Item = (S, ScoreTriple)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (symbol, scores) in iter {
            out.insert(symbol, scores);
        }
        out
    }
}
