//! Timestamps on the command line
//!
//! RFC 3339 (`2024-05-01T20:00:00Z`), `now`, or `now` plus or minus an
//! offset with a unit: `now+90s`, `now+5m`, `now-1h`, `now+2d`.

use chrono::{DateTime, Duration, Utc};

/// Parse a command-line timestamp relative to `now`.
pub fn parse_time(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Some(rest) = raw.get(..3).filter(|p| p.eq_ignore_ascii_case("now")).map(|_| &raw[3..]) {
        let (negative, offset) = match rest.chars().next() {
            Some('+') => (false, &rest[1..]),
            Some('-') => (true, &rest[1..]),
            _ => return Err(format!("expected '+' or '-' after 'now' in '{raw}'")),
        };
        let offset = parse_offset(offset)?;
        let shifted = if negative {
            now.checked_sub_signed(offset)
        } else {
            now.checked_add_signed(offset)
        };
        return shifted.ok_or_else(|| format!("offset in '{raw}' is out of range"));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid timestamp '{raw}': {e} (use RFC 3339 or now+5m)"))
}

fn parse_offset(raw: &str) -> Result<Duration, String> {
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| format!("missing unit in offset '{raw}' (s, m, h or d)"))?;
    let (amount, unit) = raw.split_at(split);
    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("invalid offset '{raw}'"))?;
    let offset = match unit {
        "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        other => return Err(format!("unknown unit '{other}' (s, m, h or d)")),
    };
    offset.ok_or_else(|| format!("offset '{raw}' is out of range"))
}

/// `value_parser` for clap; resolves relative values against the wall clock.
pub fn time_value(raw: &str) -> Result<DateTime<Utc>, String> {
    parse_time(raw, Utc::now())
}
