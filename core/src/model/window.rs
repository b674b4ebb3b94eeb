use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{TrackerError, TrackerResult};

/// Inclusive range of calendar dates.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> TrackerResult<Self> {
        if end < start {
            return Err(TrackerError::InvalidArgument(format!(
                "range end {} is before start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} .. {}", self.start, self.end)
        }
    }
}

/// A calendar window over which totals are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    Day(NaiveDate),
    /// Seven days ending at, and including, the reference date.
    RollingWeek(NaiveDate),
    /// Monday through Sunday containing the reference date.
    CalendarWeek(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Window {
    pub fn month_of(date: NaiveDate) -> Self {
        Window::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year_of(date: NaiveDate) -> Self {
        Window::Year(date.year())
    }

    pub fn bounds(&self) -> TrackerResult<DateRange> {
        match *self {
            Window::Day(date) => Ok(DateRange::single(date)),
            Window::RollingWeek(reference) => {
                let start = sub_days(reference, 6)?;
                Ok(DateRange { start, end: reference })
            }
            Window::CalendarWeek(reference) => {
                let start = start_of_week(reference)?;
                let end = add_days(start, 6)?;
                Ok(DateRange { start, end })
            }
            Window::Month { year, month } => {
                let last = days_in_month(year, month)?;
                let start = ymd(year, month, 1)?;
                let end = ymd(year, month, last)?;
                Ok(DateRange { start, end })
            }
            Window::Year(year) => {
                let start = ymd(year, 1, 1)?;
                let end = ymd(year, 12, 31)?;
                Ok(DateRange { start, end })
            }
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::Day(d) => write!(f, "day {}", d),
            Window::RollingWeek(d) => write!(f, "7 days ending {}", d),
            Window::CalendarWeek(d) => write!(f, "week of {}", d),
            Window::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Window::Year(y) => write!(f, "year {}", y),
        }
    }
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> TrackerResult<NaiveDate> {
    sub_days(date, date.weekday().num_days_from_monday() as u64)
}

/// Number of days in `month` of `year`, leap years included.
pub fn days_in_month(year: i32, month: u32) -> TrackerResult<u32> {
    if !(1..=12).contains(&month) {
        return Err(TrackerError::InvalidArgument(format!(
            "month must be in 1..=12, got {}",
            month
        )));
    }
    let first = ymd(year, month, 1)?;
    let next_first = if month == 12 {
        ymd(year + 1, 1, 1)?
    } else {
        ymd(year, month + 1, 1)?
    };
    Ok((next_first - first).num_days() as u32)
}

fn ymd(year: i32, month: u32, day: u32) -> TrackerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        TrackerError::InvalidArgument(format!("{:04}-{:02}-{:02} is not a valid date", year, month, day))
    })
}

pub(crate) fn add_days(date: NaiveDate, days: u64) -> TrackerResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| TrackerError::InvalidArgument(format!("{} + {} days is out of range", date, days)))
}

pub(crate) fn sub_days(date: NaiveDate, days: u64) -> TrackerResult<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| TrackerError::InvalidArgument(format!("{} - {} days is out of range", date, days)))
}
