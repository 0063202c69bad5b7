use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{Datelike, Duration, NaiveDate, Utc};

/// Formats a number of seconds as `"Xh Ym"`, rounding to the nearest minute.
///
/// Zero hours or zero minutes are left out, and anything at or below zero
/// seconds is `"0m"`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0m".to_string();
    }

    let mut hours = (seconds / 3600.0).floor() as u64;
    let mut minutes = ((seconds % 3600.0) / 60.0).round() as u64;
    // 59m 30s and up rounds into the next hour
    if minutes == 60 {
        hours += 1;
        minutes = 0;
    }

    match (hours, minutes) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Value of an HTTP Basic `Authorization` header for `user:password`.
pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn yesterday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(1)
}

/// The seven days ending with `date`, both ends inclusive.
pub fn last_seven_days(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    (date - Duration::days(6), date)
}

/// GraphQL `DateTime` bounds covering a whole calendar year.
pub fn year_bounds(year: i32) -> (String, String) {
    (
        format!("{year}-01-01T00:00:00Z"),
        format!("{year}-12-31T23:59:59Z"),
    )
}

pub fn current_year() -> i32 {
    today().year()
}
