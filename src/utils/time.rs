use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use rust_i18n::t;

/// Today's date in the given timezone
pub fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Parse a backend timestamp; naive timestamps are taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// "Hace 3 días" style label for how long ago `then` was
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    match (days, hours, minutes) {
        (1, _, _) => t!("relative_day", count = days).to_string(),
        (d, _, _) if d > 1 => t!("relative_days", count = days).to_string(),
        (_, 1, _) => t!("relative_hour", count = hours).to_string(),
        (_, h, _) if h > 1 => t!("relative_hours", count = hours).to_string(),
        (_, _, 1) => t!("relative_minute", count = minutes).to_string(),
        (_, _, m) if m > 1 => t!("relative_minutes", count = minutes).to_string(),
        _ => t!("relative_just_now").to_string(),
    }
}
