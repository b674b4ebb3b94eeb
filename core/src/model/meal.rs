use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Display order used by every summary table.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }

    /// Position in `ALL`.
    pub fn index(&self) -> usize {
        match self {
            MealType::Breakfast => 0,
            MealType::Lunch => 1,
            MealType::Dinner => 2,
            MealType::Snack => 3,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MealType {
    type Err = TrackerError;

    /// Accepts full names or any unambiguous prefix ("b", "lun", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return Err(TrackerError::InvalidEntry("meal type is required".to_string()));
        }
        let matches: Vec<MealType> = MealType::ALL
            .iter()
            .copied()
            .filter(|m| m.as_str().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [single] => Ok(*single),
            _ => Err(TrackerError::InvalidEntry(format!(
                "unknown meal type '{}', expected breakfast|lunch|dinner|snack",
                s
            ))),
        }
    }
}
