//! Date keys and the calendar helpers the screens navigate with.
//!
//! A [`DateKey`] is a local calendar date rendered as `YYYY-MM-DD`.
//! Completion timestamps coming back from the API are matched against a
//! key by comparing the part of the timestamp before the first `T`. That
//! comparison is purely textual: a UTC timestamp such as
//! `2025-11-17T23:30:00-03:00` stored as `2025-11-18T02:30:00Z` matches
//! `2025-11-18`, not the local day it was recorded on.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

const KEY_FORMAT: &str = "%Y-%m-%d";

/// A calendar date in local time, always shown as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date key '{0}', expected YYYY-MM-DD")]
pub struct DateKeyError(pub String);

impl DateKey {
    pub fn min() -> Self {
        Self(NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN))
    }

    pub fn max() -> Self {
        Self(NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX))
    }

    /// Wraps a date, clamping it into the range that renders as ten characters.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date).clamp(Self::min(), Self::max())
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .filter(|key| (Self::min()..=Self::max()).contains(key))
    }

    pub fn parse(value: &str) -> Result<Self, DateKeyError> {
        let invalid = || DateKeyError(value.to_string());
        let bytes = value.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(value, KEY_FORMAT).map_err(|_| invalid())?;
        if date.year() < 1 {
            return Err(invalid());
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(KEY_FORMAT))
    }
}

impl FromStr for DateKey {
    type Err = DateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Display languages for [`format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Portuguese,
}

impl Locale {
    fn month_abbrev(self, month0: u32) -> &'static str {
        const EN: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        const PT: [&str; 12] = [
            "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
        ];
        let table = match self {
            Locale::English => &EN,
            Locale::Portuguese => &PT,
        };
        table[month0 as usize % 12]
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "pt" | "pt-br" | "portuguese" => Ok(Locale::Portuguese),
            other => Err(format!("unsupported locale '{other}' (use 'en' or 'pt')")),
        }
    }
}

pub fn today() -> DateKey {
    DateKey::from_date(Local::now().date_naive())
}

pub fn is_today(value: &str) -> bool {
    is_same_day(value, today())
}

/// Year/month/day comparison of `value` against `day`.
///
/// `value` may be a bare key or a timestamp. Timestamps with an offset are
/// converted to local time before their date is taken.
pub fn is_same_day(value: &str, day: DateKey) -> bool {
    local_date_of(value.trim()).is_some_and(|date| date == day.date())
}

fn local_date_of(value: &str) -> Option<NaiveDate> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(stamp.date());
        }
    }
    DateKey::parse(value).ok().map(|key| key.date())
}

/// Moves `day` by `delta_days` calendar days, saturating at the key range.
pub fn shift(day: DateKey, delta_days: i64) -> DateKey {
    let shifted = Duration::try_days(delta_days)
        .and_then(|delta| day.date().checked_add_signed(delta));
    match shifted {
        Some(date) => DateKey::from_date(date),
        None if delta_days < 0 => DateKey::min(),
        None => DateKey::max(),
    }
}

pub fn previous(day: DateKey) -> DateKey {
    shift(day, -1)
}

pub fn next(day: DateKey) -> DateKey {
    shift(day, 1)
}

/// Renders `day` as e.g. `17 Nov 2025`.
pub fn format(day: DateKey, locale: Locale) -> String {
    let date = day.date();
    format!(
        "{} {} {}",
        date.day(),
        locale.month_abbrev(date.month0()),
        date.year()
    )
}

/// Textual match of a completion timestamp's date part against `day`.
pub fn matches_date_key(timestamp: &str, day: DateKey) -> bool {
    let date_part = timestamp.split('T').next().unwrap_or(timestamp);
    date_part == day.to_string()
}
