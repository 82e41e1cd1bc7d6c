use std::fmt;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A per-guest stay date as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum StayDate {
    Missing,
    /// Submitted text that is not a calendar date; shown verbatim.
    Unparsed(String),
    Valid(Date),
}

impl StayDate {
    /// Parse ISO `YYYY-MM-DD` or US `MM/DD/YYYY`; blank input is `Missing`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return StayDate::Missing;
        }
        if let Ok(date) = raw.parse::<Date>() {
            return StayDate::Valid(date);
        }
        match Date::strptime("%m/%d/%Y", raw) {
            Ok(date) => StayDate::Valid(date),
            Err(_) => StayDate::Unparsed(raw.to_string()),
        }
    }

    pub fn date(&self) -> Option<Date> {
        match self {
            StayDate::Valid(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, StayDate::Missing)
    }
}

impl fmt::Display for StayDate {
    /// Missing dates render as nothing; callers substitute their marker.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StayDate::Missing => Ok(()),
            StayDate::Unparsed(raw) => f.write_str(raw),
            StayDate::Valid(date) => write!(f, "{date}"),
        }
    }
}

/// One guest of a multi-guest booking. Immutable once extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestEntry {
    first_name: Option<String>,
    last_name: Option<String>,
    check_in: StayDate,
    check_out: StayDate,
    nights_stayed: Option<u32>,
}

impl GuestEntry {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        check_in: StayDate,
        check_out: StayDate,
    ) -> Self {
        let nights_stayed = nights_between(&check_in, &check_out);
        Self {
            first_name,
            last_name,
            check_in,
            check_out,
            nights_stayed,
        }
    }

    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    pub fn check_in(&self) -> &StayDate {
        &self.check_in
    }

    pub fn check_out(&self) -> &StayDate {
        &self.check_out
    }

    /// Whole nights between check-in and check-out; `None` when unknown.
    pub fn nights_stayed(&self) -> Option<u32> {
        self.nights_stayed
    }
}

fn nights_between(check_in: &StayDate, check_out: &StayDate) -> Option<u32> {
    let (start, end) = (check_in.date()?, check_out.date()?);
    if end < start {
        return None;
    }
    let span = start.until((jiff::Unit::Day, end)).ok()?;
    u32::try_from(span.get_days()).ok()
}
