pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;
pub use error::{TrackerError, TrackerResult};
pub use input::{expand_key, parse_args, ParsedInput};
pub use model::{CalorieField, CardioLog, DateRange, FoodLog, LogEntry, LogKind, MealType, UserId, Window};
pub use repository::{FileLogRepository, LogStore};
pub use service::aggregator::Aggregator;
pub use service::dto::{CalorieTotals, Dashboard, DayOrder, MultiDayTable, YearTable};
pub use service::log_service::{CardioDraft, FoodDraft, LogPatch, LogService};
pub use service::net_calorie::NetCalorieService;
pub use service::summary::SummaryTableBuilder;
pub use time::{parse_reference_date, Clock, FixedClock, SystemClock};
pub use usecase::DashboardUseCase;
