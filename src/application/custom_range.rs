// Custom range resolution from settings expressions
use crate::application::data_context::{AttributeLookup, DataContext};
use crate::application::settings::SelectorSettings;
use crate::domain::calendar::{local_instant, start_of_day};
use crate::domain::timewindow::TimeRange;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

const NAIVE_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Resolve the configured custom bounds. A bound that is unset or cannot be
/// resolved falls back independently: start to local midnight today, end to
/// `now`.
pub fn calculate_custom_range<Tz: TimeZone>(
    settings: &SelectorSettings,
    context: &DataContext,
    now: &DateTime<Tz>,
) -> TimeRange {
    let tz = now.timezone();

    let start = settings
        .custom_start_time
        .as_deref()
        .and_then(|expr| resolve_bound(expr, context, &tz))
        .unwrap_or_else(|| start_of_day(&tz, now.date_naive()).timestamp_millis());

    let end = settings
        .custom_end_time
        .as_deref()
        .and_then(|expr| resolve_bound(expr, context, &tz))
        .unwrap_or_else(|| now.timestamp_millis());

    TimeRange::new(start, end)
}

/// Resolve one bound expression to epoch milliseconds.
pub fn resolve_bound<Tz: TimeZone>(expr: &str, context: &DataContext, tz: &Tz) -> Option<i64> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    if let Some(name) = variable_name(expr) {
        return match context.lookup_numeric(name) {
            AttributeLookup::Found { value, source } => {
                tracing::debug!("Resolved ${{{}}} = {} from {:?}", name, value, source);
                Some(value as i64)
            }
            AttributeLookup::NotAvailable => {
                tracing::debug!("Attribute reference ${{{}}} could not be resolved", name);
                None
            }
        };
    }

    if let Ok(ms) = expr.parse::<f64>() {
        if ms.is_finite() && ms > 0.0 {
            return Some(ms as i64);
        }
        tracing::debug!("Ignoring non-positive numeric bound '{}'", expr);
        return None;
    }

    let parsed = parse_date_literal(expr, tz);
    if parsed.is_none() {
        tracing::debug!("Could not parse custom bound '{}'", expr);
    }
    parsed
}

/// Extract `name` from a `${name}` reference.
pub fn variable_name(expr: &str) -> Option<&str> {
    let name = expr.strip_prefix("${")?.strip_suffix('}')?.trim();
    (!name.is_empty()).then_some(name)
}

/// Date/time literals: RFC 3339 / RFC 2822 carry their own offset; values
/// without an offset are read in the local timezone `tz`.
fn parse_date_literal<Tz: TimeZone>(expr: &str, tz: &Tz) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(expr) {
        return Some(dt.timestamp_millis());
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(expr, fmt).ok())
        .or_else(|| {
            NAIVE_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(expr, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    Some(local_instant(tz, naive).timestamp_millis())
}
