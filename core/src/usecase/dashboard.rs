use chrono::NaiveDate;
use log::debug;

use crate::error::TrackerResult;
use crate::model::{LogEntry, LogKind, UserId, Window};
use crate::repository::LogStore;
use crate::service::aggregator::Aggregator;
use crate::service::dto::Dashboard;
use crate::service::net_calorie::NetCalorieService;
use crate::service::summary::SummaryTableBuilder;

/// Gathers everything the home screen needs for one reference date.
pub struct DashboardUseCase<'a, S: LogStore> {
    aggregator: &'a Aggregator<S>,
}

impl<'a, S: LogStore> DashboardUseCase<'a, S> {
    pub fn new(aggregator: &'a Aggregator<S>) -> Self {
        Self { aggregator }
    }

    pub fn snapshot(&self, user: &UserId, reference: Option<NaiveDate>) -> TrackerResult<Dashboard> {
        let date = self.aggregator.reference_or_today(reference);
        let net = NetCalorieService::new(self.aggregator);
        let tables = SummaryTableBuilder::new(self.aggregator);

        let food_logs = self
            .aggregator
            .logs(user, LogKind::Food, Window::Day(date))?
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::Food(f) => Some(f),
                LogEntry::Cardio(_) => None,
            })
            .collect();
        let cardio_logs = self
            .aggregator
            .logs(user, LogKind::Cardio, Window::Day(date))?
            .into_iter()
            .filter_map(|e| match e {
                LogEntry::Cardio(c) => Some(c),
                LogEntry::Food(_) => None,
            })
            .collect();

        let dashboard = Dashboard {
            date,
            food_logs,
            cardio_logs,
            day: net.totals(user, Window::Day(date))?,
            rolling_week: net.totals(user, Window::RollingWeek(date))?,
            calendar_week: net.totals(user, Window::CalendarWeek(date))?,
            rolling_table: tables.rolling_week_summary(user, Some(date))?,
        };
        debug!("event=dashboard user={} date={}", user, date);
        Ok(dashboard)
    }
}
