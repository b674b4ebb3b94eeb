use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::model::{CardioLog, DateRange, FoodLog, LogEntry, LogKind, MealType, UserId, Window};
use crate::repository::LogStore;

/// User-submitted fields of a meal; owner and id are assigned on save.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDraft {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub description: Option<String>,
    pub meal: MealType,
    pub calories_in: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardioDraft {
    pub timestamp: NaiveDateTime,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: u32,
    pub calories_out: f64,
}

/// Field changes for an existing log. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogPatch {
    pub timestamp: Option<NaiveDateTime>,
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub meal: Option<MealType>,
    pub duration_minutes: Option<u32>,
    /// Calories in for food, calories out for cardio.
    pub calories: Option<f64>,
}

impl LogPatch {
    pub fn is_empty(&self) -> bool {
        *self == LogPatch::default()
    }

    fn apply(self, entry: &mut LogEntry) -> TrackerResult<()> {
        match entry {
            LogEntry::Food(food) => {
                if self.duration_minutes.is_some() {
                    return Err(TrackerError::InvalidEntry("food logs have no duration".to_string()));
                }
                if let Some(ts) = self.timestamp {
                    food.timestamp = ts;
                }
                if let Some(name) = self.name {
                    food.name = name;
                }
                if let Some(desc) = self.description {
                    food.description = desc;
                }
                if let Some(meal) = self.meal {
                    food.meal = meal;
                }
                if let Some(cal) = self.calories {
                    food.calories_in = cal;
                }
            }
            LogEntry::Cardio(cardio) => {
                if self.meal.is_some() {
                    return Err(TrackerError::InvalidEntry("cardio logs have no meal type".to_string()));
                }
                if let Some(ts) = self.timestamp {
                    cardio.timestamp = ts;
                }
                if let Some(name) = self.name {
                    cardio.name = name;
                }
                if let Some(desc) = self.description {
                    cardio.description = desc;
                }
                if let Some(minutes) = self.duration_minutes {
                    cardio.duration_minutes = minutes;
                }
                if let Some(cal) = self.calories {
                    cardio.calories_out = cal;
                }
            }
        }
        Ok(())
    }
}

/// Create, read, update and delete for one user's logs.
///
/// Every operation is scoped to the caller: another user's id behaves as
/// if it did not exist.
pub struct LogService<S: LogStore> {
    store: S,
}

impl<S: LogStore> LogService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn add_food(&self, user: &UserId, draft: FoodDraft) -> TrackerResult<FoodLog> {
        let mut log = FoodLog::new(user.clone(), draft.timestamp, draft.name, draft.meal, draft.calories_in);
        log.description = normalize_description(draft.description);
        log.validate()?;
        self.store.insert(log.clone().into()).map_err(TrackerError::store)?;
        info!("event=log_created kind=food id={} user={}", log.id, user);
        Ok(log)
    }

    pub fn add_cardio(&self, user: &UserId, draft: CardioDraft) -> TrackerResult<CardioLog> {
        let mut log = CardioLog::new(
            user.clone(),
            draft.timestamp,
            draft.name,
            draft.duration_minutes,
            draft.calories_out,
        );
        log.description = normalize_description(draft.description);
        log.validate()?;
        self.store.insert(log.clone().into()).map_err(TrackerError::store)?;
        info!("event=log_created kind=cardio id={} user={}", log.id, user);
        Ok(log)
    }

    pub fn get(&self, user: &UserId, id: &Uuid) -> TrackerResult<LogEntry> {
        match self.store.get(id).map_err(TrackerError::store)? {
            Some(entry) if entry.owner() == user => Ok(entry),
            _ => Err(TrackerError::NotFound(*id)),
        }
    }

    /// Applies `patch`; id, owner and kind never change.
    pub fn update(&self, user: &UserId, id: &Uuid, patch: LogPatch) -> TrackerResult<LogEntry> {
        let mut entry = self.get(user, id)?;
        let mut patch = patch;
        if let Some(desc) = patch.description.take() {
            patch.description = Some(normalize_description(desc));
        }
        patch.apply(&mut entry)?;
        entry.validate()?;
        self.store.update(&entry).map_err(TrackerError::store)?;
        info!("event=log_updated kind={} id={} user={}", entry.kind(), id, user);
        Ok(entry)
    }

    pub fn delete(&self, user: &UserId, id: &Uuid) -> TrackerResult<()> {
        let entry = self.get(user, id)?;
        self.store.delete(id).map_err(TrackerError::store)?;
        info!("event=log_deleted kind={} id={} user={}", entry.kind(), id, user);
        Ok(())
    }

    /// Logs of `kind` in `window`, oldest first.
    pub fn list(&self, user: &UserId, kind: LogKind, window: Window) -> TrackerResult<Vec<LogEntry>> {
        let range = window.bounds()?;
        self.store.query(user, kind, range).map_err(TrackerError::store)
    }

    /// Every log of `kind` the user owns, oldest first.
    pub fn all(&self, user: &UserId, kind: LogKind) -> TrackerResult<Vec<LogEntry>> {
        let everything = DateRange {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        };
        self.store.query(user, kind, everything).map_err(TrackerError::store)
    }

    /// Resolves a full id or the leading characters of one.
    pub fn resolve_id(&self, user: &UserId, prefix: &str) -> TrackerResult<Uuid> {
        let prefix = prefix.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&prefix) {
            return Ok(id);
        }
        let mut matches = Vec::new();
        for kind in [LogKind::Food, LogKind::Cardio] {
            matches.extend(
                self.all(user, kind)?
                    .iter()
                    .map(|e| e.id())
                    .filter(|id| id.to_string().starts_with(&prefix)),
            );
        }
        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(TrackerError::InvalidArgument(format!("no log id starts with '{}'", prefix))),
            _ => Err(TrackerError::InvalidArgument(format!("id prefix '{}' is ambiguous", prefix))),
        }
    }
}

fn normalize_description(desc: Option<String>) -> Option<String> {
    desc.map(|d| d.trim().to_string()).filter(|d| !d.is_empty())
}
