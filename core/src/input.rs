use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::MealType;
use crate::service::log_service::{CardioDraft, FoodDraft, LogPatch};
use crate::time::{parse_reference_date, parse_time_of_day};

pub const FOOD_KEYS: &[&str] = &["meal", "calories", "description", "on", "at"];
pub const CARDIO_KEYS: &[&str] = &["minutes", "calories", "description", "on", "at"];
pub const PATCH_KEYS: &[&str] = &["name", "meal", "minutes", "calories", "description", "on", "at"];

/// Free words plus `key:value` pairs, e.g. `Oat milk latte meal:b cal:180`.
#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

/// Expands every metadata key against `candidates`.
fn normalize(metadata: &HashMap<String, String>, candidates: &[&str]) -> Result<HashMap<String, String>> {
    let mut normalized = HashMap::new();
    for (key, value) in metadata {
        let full = expand_key(key, candidates)?;
        if normalized.insert(full.clone(), value.clone()).is_some() {
            return Err(anyhow!("'{}' given more than once", full));
        }
    }
    Ok(normalized)
}

fn required<'a>(fields: &'a HashMap<String, String>, key: &str) -> Result<&'a str> {
    fields
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("'{}:' is required", key))
}

fn parse_number(value: &str, key: &str) -> Result<f64> {
    value.trim().parse().with_context(|| format!("'{}' is not a number for {}", value, key))
}

fn parse_minutes(value: &str) -> Result<u32> {
    value.trim().parse().with_context(|| format!("'{}' is not a whole number of minutes", value))
}

/// Combines `on:` and `at:` with the defaults for whatever is missing.
fn timestamp(fields: &HashMap<String, String>, default: NaiveDateTime, today: NaiveDate) -> Result<NaiveDateTime> {
    let date = match fields.get("on") {
        Some(expr) => parse_reference_date(expr, today)?,
        None => default.date(),
    };
    let time: NaiveTime = match fields.get("at") {
        Some(expr) => parse_time_of_day(expr)?,
        None => default.time(),
    };
    Ok(date.and_time(time))
}

fn name_of(parsed: &ParsedInput) -> Result<String> {
    if parsed.name.trim().is_empty() {
        return Err(anyhow!("A name is required"));
    }
    Ok(parsed.name.trim().to_string())
}

/// Builds a meal from `add food` arguments. `now` fills in a missing date or time.
pub fn food_draft(parsed: &ParsedInput, now: NaiveDateTime) -> Result<FoodDraft> {
    let fields = normalize(&parsed.metadata, FOOD_KEYS)?;
    let meal: MealType = required(&fields, "meal")?.parse()?;
    Ok(FoodDraft {
        timestamp: timestamp(&fields, now, now.date())?,
        name: name_of(parsed)?,
        description: fields.get("description").cloned(),
        meal,
        calories_in: parse_number(required(&fields, "calories")?, "calories")?,
    })
}

/// Builds a workout from `add cardio` arguments.
pub fn cardio_draft(parsed: &ParsedInput, now: NaiveDateTime) -> Result<CardioDraft> {
    let fields = normalize(&parsed.metadata, CARDIO_KEYS)?;
    Ok(CardioDraft {
        timestamp: timestamp(&fields, now, now.date())?,
        name: name_of(parsed)?,
        description: fields.get("description").cloned(),
        duration_minutes: parse_minutes(required(&fields, "minutes")?)?,
        calories_out: parse_number(required(&fields, "calories")?, "calories")?,
    })
}

/// Builds an edit from `edit` arguments. `current` is the log's timestamp,
/// so `on:` alone keeps the time of day and `at:` alone keeps the date.
pub fn patch(parsed: &ParsedInput, current: NaiveDateTime, today: NaiveDate) -> Result<LogPatch> {
    if !parsed.name.trim().is_empty() {
        return Err(anyhow!("Use name:<text> to rename; stray words '{}'", parsed.name));
    }
    let fields = normalize(&parsed.metadata, PATCH_KEYS)?;

    let timestamp = if fields.contains_key("on") || fields.contains_key("at") {
        Some(timestamp(&fields, current, today)?)
    } else {
        None
    };

    Ok(LogPatch {
        timestamp,
        name: fields.get("name").cloned(),
        description: fields
            .get("description")
            .map(|d| if d.is_empty() { None } else { Some(d.clone()) }),
        meal: fields.get("meal").map(|m| m.parse::<MealType>()).transpose()?,
        duration_minutes: fields.get("minutes").map(|m| parse_minutes(m)).transpose()?,
        calories: fields
            .get("calories")
            .map(|c| parse_number(c, "calories"))
            .transpose()?,
    })
}
