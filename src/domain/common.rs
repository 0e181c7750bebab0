use std::{fmt, str::FromStr};

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifies entities that expose a stable string identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for the shell or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Linear lookup by identifier over any identifiable collection.
pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

const MONTH_NAMES: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Calendar month reference, rendered as `MM/yyyy`.
///
/// Internally anchored on the first day of the month so arithmetic goes
/// through chrono and never produces an invalid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthRef(NaiveDate);

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Moves forward (positive) or backward (negative) by whole months.
    pub fn shift(&self, months: i32) -> Option<Self> {
        let delta = Months::new(months.unsigned_abs());
        let moved = if months >= 0 {
            self.0.checked_add_months(delta)
        } else {
            self.0.checked_sub_months(delta)
        };
        moved.map(Self)
    }

    pub fn next(&self) -> Option<Self> {
        self.shift(1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Returns the date at `day` inside this month, clamped to its last day.
    pub fn day_clamped(&self, day: u32) -> NaiveDate {
        let mut candidate = day.clamp(1, 31);
        loop {
            if let Some(date) = self.0.with_day(candidate) {
                return date;
            }
            candidate -= 1;
        }
    }

    /// Full Portuguese month name, e.g. `março`.
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.0.month0() as usize]
    }

    /// Capitalised month name used by the debt breakdown, e.g. `Março`.
    pub fn long_label(&self) -> String {
        let name = self.month_name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Three-letter chart label, e.g. `mar`.
    pub fn short_label(&self) -> String {
        self.month_name().chars().take(3).collect()
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month(), self.year())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRefParseError(String);

impl fmt::Display for MonthRefParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month reference `{}` (expected MM/yyyy)", self.0)
    }
}

impl std::error::Error for MonthRefParseError {}

impl FromStr for MonthRef {
    type Err = MonthRefParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || MonthRefParseError(raw.to_string());
        let (month, year) = raw.trim().split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        MonthRef::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for MonthRef {
    type Error = MonthRefParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthRef> for String {
    fn from(value: MonthRef) -> Self {
        value.to_string()
    }
}
