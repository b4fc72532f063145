//! # Portal Date Helpers
//!
//! The portal exchanges timestamps as local wall time written in ISO-8601
//! with millisecond precision and a literal `Z` appended, e.g.
//! `2024-03-14T00:00:00.000Z`. The `Z` is only a label: no conversion to UTC
//! takes place, and any offset carried by an input is dropped while its wall
//! time is kept. The portal expects exactly this, so it is reproduced as is.

use std::fmt;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{Result, SicapError};

/// The on-wire layout.
pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Current local wall time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Midnight at the start of yesterday, in wire format.
pub fn yesterday() -> String {
    yesterday_from(now())
}

/// Midnight at the start of the day before `now`, in wire format.
pub fn yesterday_from(now: NaiveDateTime) -> String {
    let day = (now - Duration::days(1)).date();
    date_iso(day.and_time(NaiveTime::default()))
}

/// Formats a naive timestamp in wire format.
pub fn date_iso(ts: NaiveDateTime) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

/// Formats a zoned timestamp by discarding its offset and keeping its wall time.
pub fn date_iso_zoned<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
    date_iso(ts.naive_local())
}

/// Result of [`date_parsed`]: either the timestamp itself or its wire string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDate {
    Raw(NaiveDateTime),
    Iso(String),
}

impl ParsedDate {
    pub fn as_raw(&self) -> Option<NaiveDateTime> {
        match self {
            ParsedDate::Raw(ts) => Some(*ts),
            ParsedDate::Iso(_) => None,
        }
    }
}

impl fmt::Display for ParsedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedDate::Raw(ts) => write!(f, "{}", date_iso(*ts)),
            ParsedDate::Iso(s) => f.write_str(s),
        }
    }
}

/// Parses free-form date text; `raw` selects the timestamp over its wire string.
pub fn date_parsed(text: &str, raw: bool) -> Result<ParsedDate> {
    let ts = parse_date(text)?;
    Ok(if raw {
        ParsedDate::Raw(ts)
    } else {
        ParsedDate::Iso(date_iso(ts))
    })
}

/// Parses free-form date text into local wall time.
///
/// Time zone designators are ignored rather than applied. Date-only input
/// resolves to midnight.
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SicapError::InvalidDate(text.to_string()));
    }

    if let Some(ts) = parse_zoned(trimmed) {
        return Ok(ts);
    }
    if let Some(ts) = parse_naive(trimmed) {
        return Ok(ts);
    }
    if let Some(stripped) = strip_zone_suffix(trimmed) {
        if let Some(ts) = parse_naive(stripped) {
            return Ok(ts);
        }
    }

    Err(SicapError::InvalidDate(text.to_string()))
}

fn parse_zoned(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .map(|dt| dt.naive_local())
}

fn parse_naive(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(|d| d.and_time(NaiveTime::default()))
        })
}

/// Drops a trailing `Z`, numeric offset or zone abbreviation such as `EET`.
fn strip_zone_suffix(text: &str) -> Option<&str> {
    if let Some(rest) = text.strip_suffix(|c: char| c == 'Z' || c == 'z') {
        return Some(rest.trim_end());
    }

    let (head, last) = text.rsplit_once(' ')?;
    let is_abbrev = (1..=5).contains(&last.len()) && last.chars().all(|c| c.is_ascii_uppercase());
    let is_offset = last.starts_with(|c: char| c == '+' || c == '-')
        && last.len() > 1
        && last[1..].chars().all(|c| c.is_ascii_digit() || c == ':');
    if is_abbrev || is_offset {
        Some(head.trim_end())
    } else {
        // Offsets glued to the time part, e.g. `2024-03-15 10:30:00+02:00`.
        let cut = text.rfind(|c: char| c == '+' || c == '-')?;
        let (body, tail) = text.split_at(cut);
        let looks_like_offset = tail.len() > 1
            && tail[1..].chars().all(|c| c.is_ascii_digit() || c == ':')
            && body.contains(':');
        looks_like_offset.then_some(body)
    }
}
