use calorie_core::{
    Aggregator, CalorieField, CardioDraft, DayOrder, FileLogRepository, FixedClock, FoodDraft, LogKind, LogPatch,
    LogService, LogStore, MealType, NetCalorieService, SummaryTableBuilder, TrackerError, UserId, Window,
};
use chrono::{NaiveDate, NaiveDateTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

fn meal(ts: NaiveDateTime, meal: MealType, calories: f64) -> FoodDraft {
    FoodDraft {
        timestamp: ts,
        name: format!("{} plate", meal.as_str()),
        description: None,
        meal,
        calories_in: calories,
    }
}

fn workout(ts: NaiveDateTime, calories: f64) -> CardioDraft {
    CardioDraft {
        timestamp: ts,
        name: "Cycling".to_string(),
        description: Some("commute".to_string()),
        duration_minutes: 35,
        calories_out: calories,
    }
}

#[test]
fn creates_empty_files_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let _repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    assert!(dir.path().join("food_logs.json").exists());
    assert!(dir.path().join("cardio_logs.json").exists());
}

#[test]
fn breakfast_and_ride_on_the_same_day() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let user = UserId::new("u");

    let logs = LogService::new(&repo);
    logs.add_food(&user, meal(at(2024, 3, 1, 7, 30), MealType::Breakfast, 500.0))
        .unwrap();
    logs.add_cardio(&user, workout(at(2024, 3, 1, 17, 45), 200.0)).unwrap();

    let agg = Aggregator::new(&repo);
    let day = Window::Day(date(2024, 3, 1));
    assert_eq!(agg.total(&user, CalorieField::CaloriesIn, day).unwrap(), 500.0);
    assert_eq!(agg.total(&user, CalorieField::CaloriesOut, day).unwrap(), 200.0);
    assert_eq!(NetCalorieService::new(&agg).net(&user, day).unwrap(), 300.0);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let user = UserId::new("u");
    let id = {
        let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
        LogService::new(&repo)
            .add_food(&user, meal(at(2024, 5, 2, 12, 0), MealType::Lunch, 640.0))
            .unwrap()
            .id
    };

    let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let entry = LogService::new(&repo).get(&user, &id).unwrap();
    assert_eq!(entry.calories(), 640.0);
    assert_eq!(entry.kind(), LogKind::Food);
}

#[test]
fn edit_and_delete_round_through_the_files() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let user = UserId::new("u");
    let logs = LogService::new(&repo);

    let ride = logs.add_cardio(&user, workout(at(2024, 5, 2, 8, 0), 300.0)).unwrap();
    let patch = LogPatch {
        timestamp: Some(at(2024, 5, 3, 8, 0)),
        calories: Some(320.0),
        ..LogPatch::default()
    };
    logs.update(&user, &ride.id, patch).unwrap();

    let agg = Aggregator::new(&repo);
    assert_eq!(
        agg.total(&user, CalorieField::CaloriesOut, Window::Day(date(2024, 5, 2))).unwrap(),
        0.0
    );
    assert_eq!(
        agg.total(&user, CalorieField::CaloriesOut, Window::Day(date(2024, 5, 3))).unwrap(),
        320.0
    );

    logs.delete(&user, &ride.id).unwrap();
    assert!(matches!(logs.get(&user, &ride.id), Err(TrackerError::NotFound(_))));
    assert!(repo.delete(&ride.id).is_err());
}

#[test]
fn weekly_and_yearly_tables_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let user = UserId::new("u");
    let logs = LogService::new(&repo);

    // 2024-01-01 is a Monday
    logs.add_food(&user, meal(at(2023, 12, 26, 9, 0), MealType::Breakfast, 300.0))
        .unwrap();
    logs.add_food(&user, meal(at(2024, 1, 1, 13, 0), MealType::Lunch, 700.0))
        .unwrap();
    logs.add_food(&user, meal(at(2024, 1, 7, 20, 0), MealType::Dinner, 900.0))
        .unwrap();
    logs.add_cardio(&user, workout(at(2024, 1, 7, 10, 0), 450.0)).unwrap();

    let agg = Aggregator::with_clock(&repo, FixedClock::at_date(date(2024, 1, 1)));
    let tables = SummaryTableBuilder::new(&agg);

    let calendar = tables.calendar_week_summary(&user, None).unwrap();
    assert_eq!(calendar.dates[0], date(2024, 1, 1));
    assert_eq!(calendar.dates[6], date(2024, 1, 7));
    assert_eq!(calendar.food_totals[0], 700.0);
    assert_eq!(calendar.net_totals[6], 450.0);

    let rolling = tables.rolling_week_summary(&user, None).unwrap();
    assert_eq!(rolling.dates[0], date(2024, 1, 1));
    assert_eq!(rolling.dates[6], date(2023, 12, 26));
    assert_eq!(rolling.meal_total(MealType::Breakfast), 300.0);
    assert_eq!(rolling.totals().food, 1000.0);

    let custom = tables
        .multi_day_table(&user, date(2024, 1, 6), 3, DayOrder::Forward)
        .unwrap();
    assert_eq!(custom.food_totals, vec![0.0, 900.0, 0.0]);

    let year = tables.yearly_table(&user, Some(2024)).unwrap();
    assert_eq!(year.months[0].totals.food, 1600.0);
    assert_eq!(year.months[0].totals.cardio, 450.0);
    assert_eq!(year.totals.net, 1150.0);
}

#[test]
fn another_user_sees_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = FileLogRepository::new(Some(dir.path().to_path_buf())).unwrap();
    let logs = LogService::new(&repo);
    logs.add_food(&UserId::new("owner"), meal(at(2024, 2, 2, 8, 0), MealType::Snack, 210.0))
        .unwrap();

    let agg = Aggregator::new(&repo);
    let stranger = UserId::new("stranger");
    assert_eq!(
        agg.total(&stranger, CalorieField::CaloriesIn, Window::Year(2024)).unwrap(),
        0.0
    );
    assert!(LogService::new(&repo).all(&stranger, LogKind::Food).unwrap().is_empty());
}
