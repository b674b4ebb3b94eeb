use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::config::default_data_dir;
use crate::model::{CardioLog, DateRange, FoodLog, LogEntry, LogKind, UserId};
use crate::repository::traits::LogStore;

const FOOD_FILE_NAME: &str = "food_logs.json";
const CARDIO_FILE_NAME: &str = "cardio_logs.json";

/// JSON-file store, one file per log kind.
pub struct FileLogRepository {
    food_path: PathBuf,
    cardio_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileLogRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&dir).with_context(|| format!("creating data dir {}", dir.display()))?;

        let food_path = dir.join(FOOD_FILE_NAME);
        let cardio_path = dir.join(CARDIO_FILE_NAME);
        init_file::<FoodLog>(&food_path)?;
        init_file::<CardioLog>(&cardio_path)?;

        Ok(FileLogRepository {
            food_path,
            cardio_path,
            write_lock: Mutex::new(()),
        })
    }

    fn read_food(&self) -> Result<Vec<FoodLog>> {
        read_json(&self.food_path)
    }

    fn read_cardio(&self) -> Result<Vec<CardioLog>> {
        read_json(&self.cardio_path)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.write_lock.lock().map_err(|_| anyhow!("log store write lock poisoned"))
    }
}

fn init_file<T: Serialize>(path: &Path) -> Result<()> {
    if !path.exists() {
        write_json::<T>(path, &[])?;
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let items = serde_json::from_reader(reader).with_context(|| format!("parsing {}", path.display()))?;
    Ok(items)
}

// Writes to a sibling temp file then renames, so readers never see half a file.
fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    let written = write_tmp(&tmp, items)
        .and_then(|()| fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display())));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    debug!("event=store_write file={} count={}", path.display(), items.len());
    Ok(())
}

fn write_tmp<T: Serialize>(tmp: &Path, items: &[T]) -> Result<()> {
    let file = File::create(tmp).with_context(|| format!("creating {}", tmp.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, items).with_context(|| format!("serializing {}", tmp.display()))?;
    writer.flush().with_context(|| format!("writing {}", tmp.display()))?;
    Ok(())
}

fn in_range(owner: &UserId, user: &UserId, date: chrono::NaiveDate, range: &DateRange) -> bool {
    owner == user && range.contains(date)
}

impl LogStore for FileLogRepository {
    fn insert(&self, entry: LogEntry) -> Result<LogEntry> {
        let _guard = self.lock()?;
        match &entry {
            LogEntry::Food(food) => {
                let mut logs = self.read_food()?;
                logs.push(food.clone());
                write_json(&self.food_path, &logs)?;
            }
            LogEntry::Cardio(cardio) => {
                let mut logs = self.read_cardio()?;
                logs.push(cardio.clone());
                write_json(&self.cardio_path, &logs)?;
            }
        }
        Ok(entry)
    }

    fn get(&self, id: &Uuid) -> Result<Option<LogEntry>> {
        if let Some(food) = self.read_food()?.into_iter().find(|l| l.id == *id) {
            return Ok(Some(LogEntry::Food(food)));
        }
        Ok(self
            .read_cardio()?
            .into_iter()
            .find(|l| l.id == *id)
            .map(LogEntry::Cardio))
    }

    fn update(&self, entry: &LogEntry) -> Result<()> {
        let _guard = self.lock()?;
        match entry {
            LogEntry::Food(food) => {
                let mut logs = self.read_food()?;
                let pos = logs
                    .iter()
                    .position(|l| l.id == food.id)
                    .ok_or_else(|| anyhow!("Food log with ID {} not found", food.id))?;
                logs[pos] = food.clone();
                write_json(&self.food_path, &logs)
            }
            LogEntry::Cardio(cardio) => {
                let mut logs = self.read_cardio()?;
                let pos = logs
                    .iter()
                    .position(|l| l.id == cardio.id)
                    .ok_or_else(|| anyhow!("Cardio log with ID {} not found", cardio.id))?;
                logs[pos] = cardio.clone();
                write_json(&self.cardio_path, &logs)
            }
        }
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let _guard = self.lock()?;

        let mut food = self.read_food()?;
        let before = food.len();
        food.retain(|l| l.id != *id);
        if food.len() != before {
            return write_json(&self.food_path, &food);
        }

        let mut cardio = self.read_cardio()?;
        let before = cardio.len();
        cardio.retain(|l| l.id != *id);
        if cardio.len() != before {
            return write_json(&self.cardio_path, &cardio);
        }

        Err(anyhow!("Log with ID {} not found", id))
    }

    fn query(&self, user: &UserId, kind: LogKind, range: DateRange) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = match kind {
            LogKind::Food => self
                .read_food()?
                .into_iter()
                .filter(|l| in_range(&l.owner, user, l.timestamp.date(), &range))
                .map(LogEntry::Food)
                .collect(),
            LogKind::Cardio => self
                .read_cardio()?
                .into_iter()
                .filter(|l| in_range(&l.owner, user, l.timestamp.date(), &range))
                .map(LogEntry::Cardio)
                .collect(),
        };
        entries.sort_by_key(|e| e.timestamp());
        Ok(entries)
    }
}
