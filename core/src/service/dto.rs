use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{CardioLog, FoodLog, MealType};

/// Food, cardio and net calories over one window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct CalorieTotals {
    pub food: f64,
    pub cardio: f64,
    pub net: f64,
}

impl CalorieTotals {
    pub fn new(food: f64, cardio: f64) -> Self {
        Self {
            food,
            cardio,
            net: food - cardio,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayOrder {
    #[default]
    Forward,
    /// Most recent day first.
    Reverse,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MealRow {
    pub meal: MealType,
    /// One value per day, aligned with `MultiDayTable::dates`.
    pub values: Vec<f64>,
    pub total: f64,
}

/// Per-day breakdown over consecutive days. Every series is index-aligned
/// with `dates`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MultiDayTable {
    pub dates: Vec<NaiveDate>,
    pub day_labels: Vec<String>,
    /// One row per meal type, in `MealType::ALL` order.
    pub meal_rows: Vec<MealRow>,
    pub food_totals: Vec<f64>,
    pub cardio_totals: Vec<f64>,
    pub net_totals: Vec<f64>,
}

impl MultiDayTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn meal_total(&self, meal: MealType) -> f64 {
        self.meal_rows
            .iter()
            .find(|r| r.meal == meal)
            .map(|r| r.total)
            .unwrap_or(0.0)
    }

    /// Reverses every series together so indices stay aligned.
    pub fn reverse(&mut self) {
        self.dates.reverse();
        self.day_labels.reverse();
        for row in &mut self.meal_rows {
            row.values.reverse();
        }
        self.food_totals.reverse();
        self.cardio_totals.reverse();
        self.net_totals.reverse();
    }

    /// Totals for the whole table.
    pub fn totals(&self) -> CalorieTotals {
        CalorieTotals {
            food: self.food_totals.iter().sum(),
            cardio: self.cardio_totals.iter().sum(),
            net: self.net_totals.iter().sum(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthRow {
    pub month: u32,
    pub label: String,
    pub totals: CalorieTotals,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct YearTable {
    pub year: i32,
    /// January through December.
    pub months: Vec<MonthRow>,
    /// Sum of the twelve monthly rows.
    pub totals: CalorieTotals,
}

/// Everything the home screen shows for one reference date.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub food_logs: Vec<FoodLog>,
    pub cardio_logs: Vec<CardioLog>,
    pub day: CalorieTotals,
    pub rolling_week: CalorieTotals,
    pub calendar_week: CalorieTotals,
    pub rolling_table: MultiDayTable,
}
