use crate::engine::movers::MoverEvent;
use crate::engine::{DashboardRow, RunOutput};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured dashboard state handed to the templating collaborator and
/// archived once per day. Carries no wall-clock timestamp so same-day reruns
/// serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub as_of_date: NaiveDate,
    pub rows: Vec<DashboardRow>,
    pub movers: Vec<MoverEvent>,
}

impl DashboardReport {
    pub fn from_run(as_of_date: NaiveDate, out: &RunOutput) -> Self {
        Self {
            as_of_date,
            rows: out.rows.clone(),
            movers: out.movers.clone(),
        }
    }

    pub fn rendered_order(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.symbol.as_str()).collect()
    }
}
