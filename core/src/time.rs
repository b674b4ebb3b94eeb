use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Source of "now". Services take one so tests can pin the date.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Local wall-clock time of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Resolves a human date expression relative to `today`.
///
/// Accepted forms: `today`/`tod`, `yesterday`/`yest`, `-3d`, `-2w`,
/// a weekday name (the most recent such day, today included) and `YYYY-MM-DD`.
pub fn parse_reference_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    let lowered = input.to_lowercase();

    // 1. Reserved keywords
    match lowered.as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (-Nd, -Nw)
    if let Some(rest) = lowered.strip_prefix('-') {
        if rest.len() >= 2 {
            let (num_str, unit) = rest.split_at(rest.len() - 1);
            let count: i64 = num_str.parse().map_err(|_| anyhow!("Invalid relative format: {}", input))?;
            let days = match unit {
                "d" => count,
                "w" => count * 7,
                _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
            };
            return today
                .checked_sub_signed(Duration::days(days))
                .ok_or_else(|| anyhow!("Relative date out of range: {}", input));
        }
    }

    // 3. Weekday names look back, never forward
    if let Ok(target) = parse_weekday_str(&lowered) {
        let back = (today.weekday().num_days_from_monday() as i64
            - target.num_days_from_monday() as i64)
            .rem_euclid(7);
        return Ok(today - Duration::days(back));
    }

    // 4. Fallback to ISO date
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| anyhow!("Could not parse date: {}", input))
}

/// Parses `HH:MM` (24h).
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| anyhow!("Could not parse time: {}", input))
}

/// Parses `YYYY-MM` into (year, month).
pub fn parse_year_month(input: &str) -> Result<(i32, u32)> {
    let (y, m) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got {}", input))?;
    let year: i32 = y.parse().map_err(|_| anyhow!("Invalid year: {}", y))?;
    let month: u32 = m.parse().map_err(|_| anyhow!("Invalid month: {}", m))?;
    if !(1..=12).contains(&month) {
        return Err(anyhow!("Month must be in 1..=12, got {}", month));
    }
    Ok((year, month))
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
