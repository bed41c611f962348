// libs/scheduling-cell/src/services/time.rs
//
// Wall-clock date/time helpers for the scheduling UI. The editing form
// handles the date and the time as two separate strings, so recombination
// must be deterministic and free of timezone drift.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Default slot granularity used to seed new appointment start times.
pub const DEFAULT_SLOT_INTERVAL_MINUTES: u32 = 30;

/// Parse a date-time out of the formats the clinic API and the form fields
/// produce: ISO date-time (with optional fraction, offset or trailing `Z`),
/// a bare `yyyy-MM-dd` date, or an all-digit epoch-milliseconds value.
/// All-digit input is read as UTC, since an epoch value carries no zone;
/// everything else is kept as wall-clock. Returns `None` on anything else;
/// never panics.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let text = input.trim();
    if text.is_empty() {
        return None;
    }

    let digits_only = text
        .strip_prefix('-')
        .unwrap_or(text)
        .chars()
        .all(|c| c.is_ascii_digit());
    if digits_only {
        let millis: i64 = text.parse().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }

    let text = text.strip_suffix('Z').unwrap_or(text);
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Token-based formatting: `yyyy`/`yy`, `MM`/`M`, `dd`/`d`, `HH`/`H` (24h),
/// `hh`/`h` (12h), `mm`/`m`, `ss`/`s`, `tt` (AM/PM). Any other character
/// passes through unchanged.
pub fn format_datetime(value: NaiveDateTime, pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        match c {
            'y' => {
                if run >= 4 {
                    out.push_str(&format!("{:04}", value.year()));
                } else {
                    out.push_str(&format!("{:02}", value.year().rem_euclid(100)));
                }
            }
            'M' => push_padded(&mut out, value.month(), run),
            'd' => push_padded(&mut out, value.day(), run),
            'H' => push_padded(&mut out, value.hour(), run),
            'h' => {
                let hour = match value.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                push_padded(&mut out, hour, run);
            }
            'm' => push_padded(&mut out, value.minute(), run),
            's' => push_padded(&mut out, value.second(), run),
            't' => {
                let meridiem = if value.hour() < 12 { "AM" } else { "PM" };
                if run == 1 {
                    out.push_str(&meridiem[..1]);
                } else {
                    out.push_str(meridiem);
                }
            }
            other => {
                for _ in 0..run {
                    out.push(other);
                }
            }
        }

        i += run;
    }

    out
}

/// Parse-then-format; empty string when the input is unparseable.
pub fn format_value(input: &str, pattern: &str) -> String {
    parse_datetime(input)
        .map(|dt| format_datetime(dt, pattern))
        .unwrap_or_default()
}

/// Round up to the next interval boundary (9:07 -> 9:30 for a 30 minute
/// interval); a value already on a boundary is unchanged. Seconds are
/// dropped. Rounding past midnight rolls into the next day.
pub fn round_up_to_interval(value: NaiveDateTime, interval_minutes: u32) -> NaiveDateTime {
    if interval_minutes == 0 {
        return value;
    }

    let interval = i64::from(interval_minutes) * 60;
    let seconds_into_day = i64::from(value.num_seconds_from_midnight());
    let rounded = (seconds_into_day + interval - 1) / interval * interval;

    value.date().and_time(NaiveTime::MIN) + Duration::seconds(rounded)
}

/// Combine a `yyyy-MM-dd` date string and an `HH:mm[:ss]` time string into
/// one wall-clock timestamp. Deterministic: the same inputs always yield the
/// same output, with no hidden "now" dependency.
pub fn combine_date_and_time(date: &str, time: &str) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time_text = time.trim();
    let time = NaiveTime::parse_from_str(time_text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(time_text, "%H:%M"))
        .ok()?;

    Some(date.and_time(time))
}

fn push_padded(out: &mut String, value: u32, run: usize) {
    if run >= 2 {
        out.push_str(&format!("{:02}", value));
    } else {
        out.push_str(&value.to_string());
    }
}
