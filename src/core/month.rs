use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("invalid month '{token}'. Accepted formats: jan, january, jan2024, feb-2026, \"mar 2030\"")]
pub struct InvalidMonth {
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// Parse a bare month name or abbreviation (already lowercased, no year).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "jan" | "january" => Some(Self::January),
            "feb" | "february" => Some(Self::February),
            "mar" | "march" => Some(Self::March),
            "apr" | "april" => Some(Self::April),
            "may" => Some(Self::May),
            "jun" | "june" => Some(Self::June),
            "jul" | "july" => Some(Self::July),
            "aug" | "august" => Some(Self::August),
            "sep" | "sept" | "september" => Some(Self::September),
            "oct" | "october" => Some(Self::October),
            "nov" | "november" => Some(Self::November),
            "dec" | "december" => Some(Self::December),
            _ => None,
        }
    }

    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(Self::January),
            2 => Some(Self::February),
            3 => Some(Self::March),
            4 => Some(Self::April),
            5 => Some(Self::May),
            6 => Some(Self::June),
            7 => Some(Self::July),
            8 => Some(Self::August),
            9 => Some(Self::September),
            10 => Some(Self::October),
            11 => Some(Self::November),
            12 => Some(Self::December),
            _ => None,
        }
    }

    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }
}

/// First and last calendar day of a single month. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn of(year: i32, month: Month) -> Self {
        let start = NaiveDate::from_ymd_opt(year, month.number(), 1).expect("valid date");
        let first_of_next = match month {
            Month::December => NaiveDate::from_ymd_opt(year + 1, 1, 1),
            _ => NaiveDate::from_ymd_opt(year, month.number() + 1, 1),
        }
        .expect("valid date");
        let end = first_of_next.pred_opt().expect("valid date");
        Self { start, end }
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let month = Month::from_number(date.month()).expect("chrono months are 1-12");
        Self::of(date.year(), month)
    }

    /// The calendar month immediately before this one, wrapping year boundaries.
    pub fn prev(&self) -> Self {
        Self::containing(self.start.pred_opt().expect("valid date"))
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// "January 2026"
    pub fn label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }

    /// Default report file stem, e.g. "cost-report-2026-01".
    pub fn file_stem(&self) -> String {
        format!("cost-report-{}-{:02}", self.year(), self.start.month())
    }
}

/// Resolve a user-supplied month token into a concrete month range.
///
/// The token may embed a four-digit year ("jan2024", "feb-2026", "mar 2030");
/// an embedded year wins over `explicit_year`. A bare token resolving to a
/// month after `today`'s month is taken to mean the previous year, since the
/// requested month has not happened yet. An embedded or explicit year is
/// honored literally, future or not.
pub fn resolve(
    token: &str,
    explicit_year: Option<i32>,
    today: NaiveDate,
) -> Result<MonthRange, InvalidMonth> {
    let (month, embedded_year) = split_token(token).ok_or_else(|| InvalidMonth {
        token: token.to_string(),
    })?;

    let year = match embedded_year.or(explicit_year) {
        Some(year) => year,
        None if month.number() > today.month() => today.year() - 1,
        None => today.year(),
    };

    Ok(MonthRange::of(year, month))
}

/// The anchor month and the `count - 1` months before it, oldest first.
pub fn trailing_window(anchor: MonthRange, count: usize) -> Vec<MonthRange> {
    let mut window = Vec::with_capacity(count);
    let mut current = anchor;
    for _ in 0..count {
        window.push(current);
        current = current.prev();
    }
    window.reverse();
    window
}

fn split_token(token: &str) -> Option<(Month, Option<i32>)> {
    let token = token.trim().to_lowercase();
    let name: String = token
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    let month = Month::from_token(&name)?;

    let rest = token[name.len()..].trim_start_matches([' ', '-']);
    if rest.is_empty() {
        return Some((month, None));
    }
    if rest.len() == 4 && rest.chars().all(|c| c.is_ascii_digit()) {
        return Some((month, rest.parse().ok()));
    }
    None
}
