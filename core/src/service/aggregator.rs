use chrono::NaiveDate;
use log::trace;

use crate::error::{TrackerError, TrackerResult};
use crate::model::{CalorieField, DateRange, LogEntry, LogKind, UserId, Window};
use crate::repository::LogStore;
use crate::time::{Clock, SystemClock};

/// Sums calorie fields over calendar windows.
///
/// One instance serves both log kinds: the field selector decides which
/// records are read. Holds no state between calls.
pub struct Aggregator<S: LogStore> {
    store: S,
    clock: Box<dyn Clock + Send + Sync>,
}

impl<S: LogStore> Aggregator<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + Send + Sync + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// `reference`, or today when absent.
    pub fn reference_or_today(&self, reference: Option<NaiveDate>) -> NaiveDate {
        reference.unwrap_or_else(|| self.today())
    }

    /// Sum of `field` over the user's logs dated inside `window`; 0 when none.
    pub fn total(&self, user: &UserId, field: CalorieField, window: Window) -> TrackerResult<f64> {
        let range = window.bounds()?;
        self.total_in_range(user, field, range)
    }

    pub fn total_in_range(&self, user: &UserId, field: CalorieField, range: DateRange) -> TrackerResult<f64> {
        let total = self
            .store
            .sum_field(user, field, range)
            .map_err(TrackerError::store)?
            .unwrap_or(0.0);
        trace!("event=total user={} field={:?} range={} total={}", user, field, range, total);
        Ok(total)
    }

    /// Logs of `kind` inside `window`, oldest first.
    pub fn logs(&self, user: &UserId, kind: LogKind, window: Window) -> TrackerResult<Vec<LogEntry>> {
        let range = window.bounds()?;
        self.logs_in_range(user, kind, range)
    }

    pub fn logs_in_range(&self, user: &UserId, kind: LogKind, range: DateRange) -> TrackerResult<Vec<LogEntry>> {
        self.store.query(user, kind, range).map_err(TrackerError::store)
    }

    // Convenience wrappers mirroring the per-kind screens.

    pub fn food_for_day(&self, user: &UserId, date: Option<NaiveDate>) -> TrackerResult<f64> {
        let date = self.reference_or_today(date);
        self.total(user, CalorieField::CaloriesIn, Window::Day(date))
    }

    pub fn burn_for_day(&self, user: &UserId, date: Option<NaiveDate>) -> TrackerResult<f64> {
        let date = self.reference_or_today(date);
        self.total(user, CalorieField::CaloriesOut, Window::Day(date))
    }

    pub fn food_for_month(&self, user: &UserId, year: i32, month: u32) -> TrackerResult<f64> {
        self.total(user, CalorieField::CaloriesIn, Window::Month { year, month })
    }

    pub fn burn_for_month(&self, user: &UserId, year: i32, month: u32) -> TrackerResult<f64> {
        self.total(user, CalorieField::CaloriesOut, Window::Month { year, month })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MealType;
    use crate::test_support::{at, cardio, date, food, BrokenStore, MockLogStore};
    use crate::time::FixedClock;

    fn alice() -> UserId {
        UserId::new("alice")
    }

    fn sample_store() -> MockLogStore {
        MockLogStore::with(vec![
            food("alice", at(2024, 3, 1, 8), MealType::Breakfast, 500.0),
            cardio("alice", at(2024, 3, 1, 18), 200.0),
            food("alice", at(2024, 2, 29, 12), MealType::Lunch, 700.0),
            food("alice", at(2024, 2, 24, 19), MealType::Dinner, 900.0),
            food("alice", at(2024, 1, 15, 19), MealType::Snack, 150.0),
            cardio("alice", at(2023, 12, 31, 7), 300.0),
            food("bob", at(2024, 3, 1, 8), MealType::Breakfast, 1000.0),
        ])
    }

    #[test]
    fn test_day_totals() {
        let agg = Aggregator::new(sample_store());
        let day = Window::Day(date(2024, 3, 1));
        assert_eq!(agg.total(&alice(), CalorieField::CaloriesIn, day).unwrap(), 500.0);
        assert_eq!(agg.total(&alice(), CalorieField::CaloriesOut, day).unwrap(), 200.0);
    }

    #[test]
    fn test_other_users_are_invisible() {
        let agg = Aggregator::new(sample_store());
        let bob = UserId::new("bob");
        let day = Window::Day(date(2024, 3, 1));
        assert_eq!(agg.total(&bob, CalorieField::CaloriesIn, day).unwrap(), 1000.0);
        assert_eq!(agg.total(&bob, CalorieField::CaloriesOut, day).unwrap(), 0.0);
    }

    #[test]
    fn test_rolling_and_calendar_weeks() {
        let agg = Aggregator::new(sample_store());
        // 2024-03-01 is a Friday: calendar week is Feb 26 - Mar 3,
        // rolling week is Feb 24 - Mar 1.
        let reference = date(2024, 3, 1);
        assert_eq!(
            agg.total(&alice(), CalorieField::CaloriesIn, Window::CalendarWeek(reference)).unwrap(),
            1200.0
        );
        assert_eq!(
            agg.total(&alice(), CalorieField::CaloriesIn, Window::RollingWeek(reference)).unwrap(),
            2100.0
        );
    }

    #[test]
    fn test_month_and_year() {
        let agg = Aggregator::new(sample_store());
        assert_eq!(agg.food_for_month(&alice(), 2024, 2).unwrap(), 1600.0);
        assert_eq!(agg.burn_for_month(&alice(), 2024, 2).unwrap(), 0.0);
        assert_eq!(
            agg.total(&alice(), CalorieField::CaloriesIn, Window::Year(2024)).unwrap(),
            2250.0
        );
        assert_eq!(
            agg.total(&alice(), CalorieField::CaloriesOut, Window::Year(2023)).unwrap(),
            300.0
        );
    }

    #[test]
    fn test_empty_user_is_zero_everywhere() {
        let agg = Aggregator::new(MockLogStore::new());
        let nobody = UserId::new("nobody");
        let reference = date(2024, 3, 1);
        for window in [
            Window::Day(reference),
            Window::RollingWeek(reference),
            Window::CalendarWeek(reference),
            Window::month_of(reference),
            Window::year_of(reference),
        ] {
            for field in [CalorieField::CaloriesIn, CalorieField::CaloriesOut] {
                assert_eq!(agg.total(&nobody, field, window).unwrap(), 0.0);
            }
        }
    }

    #[test]
    fn test_missing_date_uses_clock() {
        let agg = Aggregator::with_clock(sample_store(), FixedClock::at_date(date(2024, 3, 1)));
        assert_eq!(agg.food_for_day(&alice(), None).unwrap(), 500.0);
        assert_eq!(agg.burn_for_day(&alice(), None).unwrap(), 200.0);
        assert_eq!(agg.food_for_day(&alice(), Some(date(2024, 2, 29))).unwrap(), 700.0);
    }

    #[test]
    fn test_bad_month_is_invalid_argument() {
        let agg = Aggregator::new(sample_store());
        assert!(matches!(
            agg.food_for_month(&alice(), 2024, 13),
            Err(TrackerError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_store_failure_is_store_unavailable() {
        let agg = Aggregator::new(BrokenStore);
        let err = agg
            .total(&alice(), CalorieField::CaloriesIn, Window::Day(date(2024, 3, 1)))
            .unwrap_err();
        assert!(matches!(err, TrackerError::StoreUnavailable(_)));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_logs_are_ordered_by_timestamp() {
        let store = MockLogStore::with(vec![
            food("alice", at(2024, 3, 1, 19), MealType::Dinner, 800.0),
            food("alice", at(2024, 3, 1, 8), MealType::Breakfast, 300.0),
        ]);
        let agg = Aggregator::new(store);
        let logs = agg.logs(&alice(), LogKind::Food, Window::Day(date(2024, 3, 1))).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].calories(), 300.0);
        assert_eq!(logs[1].calories(), 800.0);
    }

    #[test]
    fn test_concurrent_reads() {
        let agg = Aggregator::new(sample_store());
        let day = Window::Day(date(2024, 3, 1));
        std::thread::scope(|s| {
            let a = s.spawn(|| agg.total(&alice(), CalorieField::CaloriesIn, day).unwrap());
            let b = s.spawn(|| agg.total(&alice(), CalorieField::CaloriesOut, day).unwrap());
            assert_eq!(a.join().unwrap(), 500.0);
            assert_eq!(b.join().unwrap(), 200.0);
        });
    }
}
