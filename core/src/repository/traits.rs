use anyhow::Result;
use uuid::Uuid;

use crate::model::{CalorieField, DateRange, LogEntry, LogKind, UserId};

/// Durable storage for food and cardio logs.
///
/// Implementations serialize their own writers; readers see either the
/// state before or after a write, never a partial one.
pub trait LogStore {
    fn insert(&self, entry: LogEntry) -> Result<LogEntry>;
    fn get(&self, id: &Uuid) -> Result<Option<LogEntry>>;
    fn update(&self, entry: &LogEntry) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;

    /// Logs of `kind` owned by `user` dated inside `range`, oldest first.
    fn query(&self, user: &UserId, kind: LogKind, range: DateRange) -> Result<Vec<LogEntry>>;

    /// Sum of `field` over the matching logs, `None` when nothing matched.
    fn sum_field(&self, user: &UserId, field: CalorieField, range: DateRange) -> Result<Option<f64>> {
        let entries = self.query(user, field.kind(), range)?;
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(entries.iter().filter_map(|e| e.value(field)).sum()))
    }
}

impl<S: LogStore + ?Sized> LogStore for &S {
    fn insert(&self, entry: LogEntry) -> Result<LogEntry> {
        (**self).insert(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<LogEntry>> {
        (**self).get(id)
    }

    fn update(&self, entry: &LogEntry) -> Result<()> {
        (**self).update(entry)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        (**self).delete(id)
    }

    fn query(&self, user: &UserId, kind: LogKind, range: DateRange) -> Result<Vec<LogEntry>> {
        (**self).query(user, kind, range)
    }

    fn sum_field(&self, user: &UserId, field: CalorieField, range: DateRange) -> Result<Option<f64>> {
        (**self).sum_field(user, field, range)
    }
}
