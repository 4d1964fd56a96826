use serde::{Deserialize, Serialize};

/// Change indicator for one score dimension since the previous run.
///
/// Amounts are whole points, truncated toward zero for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", content = "amount", rename_all = "snake_case")]
pub enum Badge {
    Up(i64),
    Down(i64),
    None,
}

impl Badge {
    pub fn is_none(&self) -> bool {
        matches!(self, Badge::None)
    }
}

pub fn diff(current: f64, history: &[f64]) -> Badge {
    let Some(&previous) = history.last() else {
        return Badge::None;
    };
    // Zero means the upstream parse failed; don't report a crash as a move.
    if current == 0.0 {
        return Badge::None;
    }

    let delta = current - previous;
    if delta > 0.0 {
        Badge::Up(delta.trunc() as i64)
    } else if delta < 0.0 {
        Badge::Down(delta.abs().trunc() as i64)
    } else {
        Badge::None
    }
}

/// Three strictly rising observations ending at `current`.
pub fn streak(history: &[f64], current: f64) -> bool {
    match history {
        [.., older, previous] => older < previous && *previous < current,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_reports_direction_and_magnitude() {
        assert_eq!(diff(55.0, &[50.0]), Badge::Up(5));
        assert_eq!(diff(45.0, &[50.0]), Badge::Down(5));
        assert_eq!(diff(50.0, &[]), Badge::None);
        assert_eq!(diff(50.0, &[50.0]), Badge::None);
    }

    #[test]
    fn diff_compares_against_most_recent_value() {
        assert_eq!(diff(60.0, &[10.0, 20.0, 58.0]), Badge::Up(2));
    }

    #[test]
    fn diff_truncates_fractional_amounts() {
        assert_eq!(diff(57.9, &[50.0]), Badge::Up(7));
        assert_eq!(diff(42.1, &[50.0]), Badge::Down(7));
        assert_eq!(diff(50.4, &[50.0]), Badge::Up(0));
    }

    #[test]
    fn diff_ignores_zero_current() {
        assert_eq!(diff(0.0, &[50.0]), Badge::None);
    }

    #[test]
    fn streak_requires_two_prior_rising_values() {
        assert!(streak(&[40.0, 45.0], 50.0));
        assert!(streak(&[90.0, 40.0, 45.0], 50.0));
        assert!(!streak(&[45.0, 40.0], 50.0));
        assert!(!streak(&[40.0], 50.0));
        assert!(!streak(&[], 50.0));
    }

    #[test]
    fn streak_rejects_flat_steps() {
        assert!(!streak(&[40.0, 45.0], 45.0));
        assert!(!streak(&[45.0, 45.0], 50.0));
    }

    #[test]
    fn badge_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(Badge::Up(3)).unwrap(),
            serde_json::json!({"direction": "up", "amount": 3})
        );
        assert_eq!(
            serde_json::to_value(Badge::None).unwrap(),
            serde_json::json!({"direction": "none"})
        );
    }
}
