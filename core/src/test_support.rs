use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::model::{CardioLog, DateRange, FoodLog, LogEntry, LogKind, MealType, UserId};
use crate::repository::LogStore;

pub struct MockLogStore {
    entries: Mutex<Vec<LogEntry>>,
}

impl MockLogStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn with(entries: Vec<LogEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl LogStore for MockLogStore {
    fn insert(&self, entry: LogEntry) -> Result<LogEntry> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<LogEntry>> {
        Ok(self.entries.lock().unwrap().iter().find(|e| e.id() == *id).cloned())
    }

    fn update(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let pos = entries
            .iter()
            .position(|e| e.id() == entry.id())
            .ok_or_else(|| anyhow!("missing {}", entry.id()))?;
        entries[pos] = entry.clone();
        Ok(())
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.id() != *id);
        if entries.len() == before {
            return Err(anyhow!("missing {}", id));
        }
        Ok(())
    }

    fn query(&self, user: &UserId, kind: LogKind, range: DateRange) -> Result<Vec<LogEntry>> {
        let mut found: Vec<LogEntry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind && e.owner() == user && range.contains(e.date()))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.timestamp());
        Ok(found)
    }
}

/// Wraps a mock store but ignores the date range in `query`.
pub struct UnfilteredStore(pub MockLogStore);

impl LogStore for UnfilteredStore {
    fn insert(&self, entry: LogEntry) -> Result<LogEntry> {
        self.0.insert(entry)
    }
    fn get(&self, id: &Uuid) -> Result<Option<LogEntry>> {
        self.0.get(id)
    }
    fn update(&self, entry: &LogEntry) -> Result<()> {
        self.0.update(entry)
    }
    fn delete(&self, id: &Uuid) -> Result<()> {
        self.0.delete(id)
    }
    fn query(&self, user: &UserId, kind: LogKind, _range: DateRange) -> Result<Vec<LogEntry>> {
        let mut found: Vec<LogEntry> = self
            .0
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == kind && e.owner() == user)
            .cloned()
            .collect();
        found.sort_by_key(|e| e.timestamp());
        Ok(found)
    }
}

/// A store whose every call fails.
pub struct BrokenStore;

impl LogStore for BrokenStore {
    fn insert(&self, _entry: LogEntry) -> Result<LogEntry> {
        Err(anyhow!("disk on fire"))
    }
    fn get(&self, _id: &Uuid) -> Result<Option<LogEntry>> {
        Err(anyhow!("disk on fire"))
    }
    fn update(&self, _entry: &LogEntry) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
    fn delete(&self, _id: &Uuid) -> Result<()> {
        Err(anyhow!("disk on fire"))
    }
    fn query(&self, _user: &UserId, _kind: LogKind, _range: DateRange) -> Result<Vec<LogEntry>> {
        Err(anyhow!("disk on fire"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn food(user: &str, ts: NaiveDateTime, meal: MealType, calories: f64) -> LogEntry {
    FoodLog::new(UserId::new(user), ts, format!("{} item", meal.as_str()), meal, calories).into()
}

pub fn cardio(user: &str, ts: NaiveDateTime, calories: f64) -> LogEntry {
    CardioLog::new(UserId::new(user), ts, "Run".to_string(), 30, calories).into()
}
