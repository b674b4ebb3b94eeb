use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::model::meal::MealType;
use crate::model::user::UserId;

const MAX_NAME_CHARS: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Food,
    Cardio,
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogKind::Food => f.write_str("food"),
            LogKind::Cardio => f.write_str("cardio"),
        }
    }
}

/// The summable numeric field of a log. Each field lives on exactly one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalorieField {
    CaloriesIn,
    CaloriesOut,
}

impl CalorieField {
    pub fn kind(&self) -> LogKind {
        match self {
            CalorieField::CaloriesIn => LogKind::Food,
            CalorieField::CaloriesOut => LogKind::Cardio,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FoodLog {
    pub id: Uuid,
    pub owner: UserId,
    pub timestamp: NaiveDateTime,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub meal: MealType,
    pub calories_in: f64,
}

impl FoodLog {
    pub fn new(
        owner: UserId,
        timestamp: NaiveDateTime,
        name: String,
        meal: MealType,
        calories_in: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            timestamp,
            name,
            description: None,
            meal,
            calories_in,
        }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        validate_name(&self.name)?;
        if !self.calories_in.is_finite() || self.calories_in < 1.0 {
            return Err(TrackerError::InvalidEntry(format!(
                "calories in must be at least 1, got {}",
                self.calories_in
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CardioLog {
    pub id: Uuid,
    pub owner: UserId,
    pub timestamp: NaiveDateTime,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub calories_out: f64,
}

impl CardioLog {
    pub fn new(
        owner: UserId,
        timestamp: NaiveDateTime,
        name: String,
        duration_minutes: u32,
        calories_out: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            timestamp,
            name,
            description: None,
            duration_minutes,
            calories_out,
        }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        validate_name(&self.name)?;
        if self.duration_minutes < 1 {
            return Err(TrackerError::InvalidEntry(
                "duration must be at least 1 minute".to_string(),
            ));
        }
        if !self.calories_out.is_finite() || self.calories_out < 0.0 {
            return Err(TrackerError::InvalidEntry(format!(
                "calories out must not be negative, got {}",
                self.calories_out
            )));
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> TrackerResult<()> {
    if name.trim().is_empty() {
        return Err(TrackerError::InvalidEntry("name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(TrackerError::InvalidEntry(format!(
            "name is longer than {} characters",
            MAX_NAME_CHARS
        )));
    }
    Ok(())
}

/// A stored record of either kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogEntry {
    Food(FoodLog),
    Cardio(CardioLog),
}

impl LogEntry {
    pub fn id(&self) -> Uuid {
        match self {
            LogEntry::Food(f) => f.id,
            LogEntry::Cardio(c) => c.id,
        }
    }

    pub fn owner(&self) -> &UserId {
        match self {
            LogEntry::Food(f) => &f.owner,
            LogEntry::Cardio(c) => &c.owner,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            LogEntry::Food(f) => f.timestamp,
            LogEntry::Cardio(c) => c.timestamp,
        }
    }

    /// The calendar date used for windowing.
    pub fn date(&self) -> NaiveDate {
        self.timestamp().date()
    }

    pub fn name(&self) -> &str {
        match self {
            LogEntry::Food(f) => &f.name,
            LogEntry::Cardio(c) => &c.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            LogEntry::Food(f) => f.description.as_deref(),
            LogEntry::Cardio(c) => c.description.as_deref(),
        }
    }

    pub fn kind(&self) -> LogKind {
        match self {
            LogEntry::Food(_) => LogKind::Food,
            LogEntry::Cardio(_) => LogKind::Cardio,
        }
    }

    /// Value of `field`, or `None` when the field belongs to the other kind.
    pub fn value(&self, field: CalorieField) -> Option<f64> {
        match (self, field) {
            (LogEntry::Food(f), CalorieField::CaloriesIn) => Some(f.calories_in),
            (LogEntry::Cardio(c), CalorieField::CaloriesOut) => Some(c.calories_out),
            _ => None,
        }
    }

    /// Calories in for food, calories out for cardio.
    pub fn calories(&self) -> f64 {
        match self {
            LogEntry::Food(f) => f.calories_in,
            LogEntry::Cardio(c) => c.calories_out,
        }
    }

    pub fn validate(&self) -> TrackerResult<()> {
        match self {
            LogEntry::Food(f) => f.validate(),
            LogEntry::Cardio(c) => c.validate(),
        }
    }
}

impl From<FoodLog> for LogEntry {
    fn from(log: FoodLog) -> Self {
        LogEntry::Food(log)
    }
}

impl From<CardioLog> for LogEntry {
    fn from(log: CardioLog) -> Self {
        LogEntry::Cardio(log)
    }
}
