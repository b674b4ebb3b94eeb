use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::model::window::{add_days, start_of_week, sub_days};
use crate::model::{DateRange, LogEntry, LogKind, MealType, UserId, Window};
use crate::repository::LogStore;
use crate::service::aggregator::Aggregator;
use crate::service::dto::{CalorieTotals, DayOrder, MealRow, MonthRow, MultiDayTable, YearTable};
use crate::service::net_calorie::NetCalorieService;

pub const DEFAULT_DAYS: u32 = 7;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Builds the per-day and per-month tables shown by the front end.
pub struct SummaryTableBuilder<'a, S: LogStore> {
    aggregator: &'a Aggregator<S>,
}

impl<'a, S: LogStore> SummaryTableBuilder<'a, S> {
    pub fn new(aggregator: &'a Aggregator<S>) -> Self {
        Self { aggregator }
    }

    /// `days` consecutive days starting at `start`, one column per day.
    pub fn multi_day_table(
        &self,
        user: &UserId,
        start: NaiveDate,
        days: u32,
        order: DayOrder,
    ) -> TrackerResult<MultiDayTable> {
        if days == 0 {
            return Err(TrackerError::InvalidArgument("day count must be at least 1".to_string()));
        }
        let end = add_days(start, u64::from(days) - 1)?;
        let range = DateRange::new(start, end)?;
        let width = days as usize;

        let dates: Vec<NaiveDate> = range.days().collect();
        let day_labels = dates.iter().map(|d| d.format("%a").to_string()).collect();

        let mut meal_values = vec![vec![0.0; width]; MealType::ALL.len()];
        let mut food_totals = vec![0.0; width];
        let mut cardio_totals = vec![0.0; width];

        for entry in self.aggregator.logs_in_range(user, LogKind::Food, range)? {
            let (Some(idx), LogEntry::Food(food)) = (day_index(&range, &entry), &entry) else {
                continue;
            };
            meal_values[food.meal.index()][idx] += food.calories_in;
            food_totals[idx] += food.calories_in;
        }
        for entry in self.aggregator.logs_in_range(user, LogKind::Cardio, range)? {
            if let Some(idx) = day_index(&range, &entry) {
                cardio_totals[idx] += entry.calories();
            }
        }

        let net_totals = food_totals
            .iter()
            .zip(&cardio_totals)
            .map(|(food, cardio)| food - cardio)
            .collect();

        let meal_rows = MealType::ALL
            .iter()
            .zip(meal_values)
            .map(|(meal, values)| MealRow {
                meal: *meal,
                total: values.iter().sum(),
                values,
            })
            .collect();

        let mut table = MultiDayTable {
            dates,
            day_labels,
            meal_rows,
            food_totals,
            cardio_totals,
            net_totals,
        };
        if order == DayOrder::Reverse {
            table.reverse();
        }
        debug!("event=multi_day_table user={} range={} order={:?}", user, range, order);
        Ok(table)
    }

    /// Monday-to-Sunday week containing the reference date, in order.
    pub fn calendar_week_summary(&self, user: &UserId, reference: Option<NaiveDate>) -> TrackerResult<MultiDayTable> {
        let reference = self.aggregator.reference_or_today(reference);
        let start = start_of_week(reference)?;
        self.multi_day_table(user, start, DEFAULT_DAYS, DayOrder::Forward)
    }

    /// The seven days ending at the reference date, most recent first.
    pub fn rolling_week_summary(&self, user: &UserId, reference: Option<NaiveDate>) -> TrackerResult<MultiDayTable> {
        let reference = self.aggregator.reference_or_today(reference);
        let start = sub_days(reference, u64::from(DEFAULT_DAYS) - 1)?;
        self.multi_day_table(user, start, DEFAULT_DAYS, DayOrder::Reverse)
    }

    /// Twelve monthly rows for `year` (the current year when absent) plus
    /// grand totals.
    pub fn yearly_table(&self, user: &UserId, year: Option<i32>) -> TrackerResult<YearTable> {
        let year = year.unwrap_or_else(|| self.aggregator.today().year());
        let net = NetCalorieService::new(self.aggregator);

        let mut months = Vec::with_capacity(MONTH_LABELS.len());
        for (i, label) in MONTH_LABELS.iter().enumerate() {
            let month = i as u32 + 1;
            let totals = net.totals(user, Window::Month { year, month })?;
            months.push(MonthRow {
                month,
                label: label.to_string(),
                totals,
            });
        }

        let totals = CalorieTotals {
            food: months.iter().map(|m| m.totals.food).sum(),
            cardio: months.iter().map(|m| m.totals.cardio).sum(),
            net: months.iter().map(|m| m.totals.net).sum(),
        };
        Ok(YearTable { year, months, totals })
    }
}

// Column of the entry's day; records the store returned outside the range
// are dropped.
fn day_index(range: &DateRange, entry: &LogEntry) -> Option<usize> {
    if !range.contains(entry.date()) {
        warn!(
            "event=summary_skip_entry id={} date={} range={}",
            entry.id(),
            entry.date(),
            range
        );
        return None;
    }
    usize::try_from((entry.date() - range.start).num_days()).ok()
}
