use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

// NSE runs on IST (UTC+05:30).
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// The calendar day a run is filed under. An explicit `YYYY-MM-DD` wins;
/// otherwise today's IST date. No trading-day rollback: a weekend rerun is
/// archived under the weekend date.
pub fn resolve_as_of_date(
    as_of_date_arg: Option<&str>,
    now_utc: DateTime<Utc>,
) -> anyhow::Result<NaiveDate> {
    if let Some(s) = as_of_date_arg {
        return NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("invalid as-of date {s:?}, expected YYYY-MM-DD"));
    }

    let ist = chrono::FixedOffset::east_opt(IST_OFFSET_SECS).context("invalid IST offset")?;
    Ok(now_utc.with_timezone(&ist).date_naive())
}
