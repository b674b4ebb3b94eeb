use chrono::NaiveDate;

use crate::error::TrackerResult;
use crate::model::{CalorieField, UserId, Window};
use crate::repository::LogStore;
use crate::service::aggregator::Aggregator;
use crate::service::dto::CalorieTotals;

/// Calories eaten minus calories burned.
pub struct NetCalorieService<'a, S: LogStore> {
    aggregator: &'a Aggregator<S>,
}

impl<'a, S: LogStore> NetCalorieService<'a, S> {
    pub fn new(aggregator: &'a Aggregator<S>) -> Self {
        Self { aggregator }
    }

    /// Net calories over `window`; negative when more was burned than eaten.
    pub fn net(&self, user: &UserId, window: Window) -> TrackerResult<f64> {
        Ok(self.totals(user, window)?.net)
    }

    /// Food, cardio and net for `window`.
    pub fn totals(&self, user: &UserId, window: Window) -> TrackerResult<CalorieTotals> {
        let range = window.bounds()?;
        let food = self.aggregator.total_in_range(user, CalorieField::CaloriesIn, range)?;
        let cardio = self.aggregator.total_in_range(user, CalorieField::CaloriesOut, range)?;
        Ok(CalorieTotals::new(food, cardio))
    }

    pub fn net_day(&self, user: &UserId, date: Option<NaiveDate>) -> TrackerResult<f64> {
        let date = self.aggregator.reference_or_today(date);
        self.net(user, Window::Day(date))
    }

    pub fn net_rolling_week(&self, user: &UserId, date: Option<NaiveDate>) -> TrackerResult<f64> {
        let date = self.aggregator.reference_or_today(date);
        self.net(user, Window::RollingWeek(date))
    }

    pub fn net_calendar_week(&self, user: &UserId, date: Option<NaiveDate>) -> TrackerResult<f64> {
        let date = self.aggregator.reference_or_today(date);
        self.net(user, Window::CalendarWeek(date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MealType;
    use crate::test_support::{at, cardio, date, food, MockLogStore};
    use crate::time::FixedClock;

    #[test]
    fn test_breakfast_minus_run() {
        let store = MockLogStore::with(vec![
            food("u", at(2024, 3, 1, 8), MealType::Breakfast, 500.0),
            cardio("u", at(2024, 3, 1, 17), 200.0),
        ]);
        let agg = Aggregator::new(store);
        let service = NetCalorieService::new(&agg);
        let user = UserId::new("u");
        let day = Window::Day(date(2024, 3, 1));

        assert_eq!(service.net(&user, day).unwrap(), 300.0);
        let totals = service.totals(&user, day).unwrap();
        assert_eq!(totals, CalorieTotals { food: 500.0, cardio: 200.0, net: 300.0 });
    }

    #[test]
    fn test_net_matches_totals_for_every_window() {
        let store = MockLogStore::with(vec![
            food("u", at(2024, 2, 27, 8), MealType::Breakfast, 420.0),
            food("u", at(2024, 3, 2, 13), MealType::Lunch, 610.5),
            cardio("u", at(2024, 2, 26, 7), 330.0),
            cardio("u", at(2024, 3, 3, 7), 1200.0),
        ]);
        let agg = Aggregator::new(store);
        let service = NetCalorieService::new(&agg);
        let user = UserId::new("u");
        let reference = date(2024, 3, 1);

        for window in [
            Window::Day(reference),
            Window::RollingWeek(reference),
            Window::CalendarWeek(reference),
            Window::month_of(reference),
            Window::year_of(reference),
        ] {
            let food = agg.total(&user, CalorieField::CaloriesIn, window).unwrap();
            let burn = agg.total(&user, CalorieField::CaloriesOut, window).unwrap();
            assert_eq!(service.net(&user, window).unwrap(), food - burn, "{}", window);
        }
    }

    #[test]
    fn test_net_can_go_negative() {
        let store = MockLogStore::with(vec![
            food("u", at(2024, 3, 1, 8), MealType::Snack, 100.0),
            cardio("u", at(2024, 3, 1, 9), 650.0),
        ]);
        let agg = Aggregator::with_clock(store, FixedClock::at_date(date(2024, 3, 1)));
        let service = NetCalorieService::new(&agg);
        let user = UserId::new("u");

        assert_eq!(service.net_day(&user, None).unwrap(), -550.0);
        assert_eq!(service.net_rolling_week(&user, None).unwrap(), -550.0);
        assert_eq!(service.net_calendar_week(&user, None).unwrap(), -550.0);
    }

    #[test]
    fn test_no_logs_nets_zero() {
        let agg = Aggregator::new(MockLogStore::new());
        let service = NetCalorieService::new(&agg);
        let user = UserId::new("ghost");
        assert_eq!(service.net_day(&user, Some(date(2024, 1, 1))).unwrap(), 0.0);
        assert_eq!(service.net(&user, Window::Year(2024)).unwrap(), 0.0);
    }
}
