use crate::domain::scores::ScoreTriple;
use serde::{Deserialize, Serialize};

/// A score at or above this is "strong" for tiering and colored good.
pub const STRONG_SCORE: f64 = 50.0;
/// A score (or the tier-4 average) at or above this is middling.
pub const FAIR_SCORE: f64 = 30.0;

/// Priority class, 1 (best) to 5 (worst). Tiers reward combinations of
/// strength, so a lone high valuation can still land in tier 4 or 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    AllStrong = 1,
    QualityAndMomentum = 2,
    ValueBacked = 3,
    Fair = 4,
    Weak = 5,
}

impl Tier {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::AllStrong => "All strong",
            Tier::QualityAndMomentum => "Quality + Technicals",
            Tier::ValueBacked => "Value backed",
            Tier::Fair => "Fair",
            Tier::Weak => "Weak",
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.rank()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::AllStrong),
            2 => Ok(Tier::QualityAndMomentum),
            3 => Ok(Tier::ValueBacked),
            4 => Ok(Tier::Fair),
            5 => Ok(Tier::Weak),
            other => Err(format!("tier out of range: {other}")),
        }
    }
}

pub fn classify(quality: f64, valuation: f64, technicals: f64) -> Tier {
    let q = band(quality) == ScoreBand::Good;
    let v = band(valuation) == ScoreBand::Good;
    let t = band(technicals) == ScoreBand::Good;

    if q && v && t {
        Tier::AllStrong
    } else if q && t {
        Tier::QualityAndMomentum
    } else if v && (q || t) {
        Tier::ValueBacked
    } else if ScoreTriple::new(quality, valuation, technicals).average() >= FAIR_SCORE {
        Tier::Fair
    } else {
        Tier::Weak
    }
}

pub fn classify_triple(scores: &ScoreTriple) -> Tier {
    classify(scores.quality, scores.valuation, scores.technicals)
}

/// Three-band display signal per score. Shares thresholds with [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Good,
    Caution,
    Poor,
}

impl ScoreBand {
    pub fn css_color(self) -> &'static str {
        match self {
            ScoreBand::Good => "#009933",
            ScoreBand::Caution => "#ff9900",
            ScoreBand::Poor => "#cc3300",
        }
    }
}

pub fn band(score: f64) -> ScoreBand {
    if score >= STRONG_SCORE {
        ScoreBand::Good
    } else if score >= FAIR_SCORE {
        ScoreBand::Caution
    } else {
        ScoreBand::Poor
    }
}
