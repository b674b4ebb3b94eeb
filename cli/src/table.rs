use calorie_core::{CalorieField, CalorieTotals, LogEntry, MultiDayTable, YearTable};
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Detail")]
    detail: String,
    #[tabled(rename = "kcal")]
    calories: String,
}

#[derive(Tabled)]
struct MonthLine {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Food")]
    food: String,
    #[tabled(rename = "Cardio")]
    cardio: String,
    #[tabled(rename = "Net")]
    net: String,
}

fn kcal(value: f64) -> String {
    format!("{:.0}", value)
}

fn short_id(entry: &LogEntry) -> String {
    entry.id().to_string()[..8].to_string()
}

fn detail(entry: &LogEntry) -> String {
    match entry {
        LogEntry::Food(f) => f.meal.to_string(),
        LogEntry::Cardio(c) => format!("{} min", c.duration_minutes),
    }
}

fn styled(mut table: Table) -> Table {
    table
        .with(Style::modern())
        .modify(Rows::first(), Color::FG_CYAN);
    table
}

pub fn print_logs(entries: &[LogEntry]) {
    if entries.is_empty() {
        println!("No logs found.");
        return;
    }

    let rows: Vec<LogRow> = entries
        .iter()
        .map(|e| LogRow {
            id: short_id(e),
            when: e.timestamp().format("%Y-%m-%d %H:%M").to_string(),
            kind: e.kind().to_string(),
            name: e.name().to_string(),
            detail: detail(e),
            calories: kcal(e.calories()),
        })
        .collect();

    let food: f64 = entries.iter().filter_map(|e| e.value(CalorieField::CaloriesIn)).sum();
    let cardio: f64 = entries.iter().filter_map(|e| e.value(CalorieField::CaloriesOut)).sum();

    println!("{}", styled(Table::new(rows)));
    println!("In: {}  Out: {}  Net: {}", kcal(food), kcal(cardio), kcal(food - cardio));
}

pub fn print_entry(entry: &LogEntry) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["ID".to_string(), entry.id().to_string()]);
    builder.push_record(["Owner".to_string(), entry.owner().to_string()]);
    builder.push_record(["When".to_string(), entry.timestamp().format("%Y-%m-%d %H:%M").to_string()]);
    builder.push_record(["Name".to_string(), entry.name().to_string()]);
    builder.push_record([
        "Description".to_string(),
        entry.description().unwrap_or("-").to_string(),
    ]);
    match entry {
        LogEntry::Food(f) => {
            builder.push_record(["Meal".to_string(), f.meal.to_string()]);
            builder.push_record(["Calories in".to_string(), kcal(f.calories_in)]);
        }
        LogEntry::Cardio(c) => {
            builder.push_record(["Duration".to_string(), format!("{} min", c.duration_minutes)]);
            builder.push_record(["Calories out".to_string(), kcal(c.calories_out)]);
        }
    }
    println!("{}", styled(builder.build()));
}

pub fn print_totals(title: &str, range: &str, totals: &CalorieTotals) {
    let mut builder = Builder::default();
    builder.push_record(["", "kcal"]);
    builder.push_record(["Food".to_string(), kcal(totals.food)]);
    builder.push_record(["Cardio".to_string(), kcal(totals.cardio)]);
    builder.push_record(["Net".to_string(), kcal(totals.net)]);

    println!("\x1b[1;36m{}\x1b[0m ({})", title, range);
    let mut table = styled(builder.build());
    table.modify(Columns::new(1..), Alignment::right());
    println!("{}", table);
}

/// Meal rows, then food/cardio/net rows; one column per day plus a total.
pub fn print_multi_day(summary: &MultiDayTable) {
    let mut builder = Builder::default();

    let mut header = vec![String::new()];
    for (label, date) in summary.day_labels.iter().zip(&summary.dates) {
        header.push(format!("{}\n{}", label, date.format("%m-%d")));
    }
    header.push("Total".to_string());
    builder.push_record(header);

    for row in &summary.meal_rows {
        let mut record = vec![row.meal.to_string()];
        record.extend(row.values.iter().map(|v| kcal(*v)));
        record.push(kcal(row.total));
        builder.push_record(record);
    }

    let totals = summary.totals();
    for (label, series, total) in [
        ("Food", &summary.food_totals, totals.food),
        ("Cardio", &summary.cardio_totals, totals.cardio),
        ("Net", &summary.net_totals, totals.net),
    ] {
        let mut record = vec![label.to_string()];
        record.extend(series.iter().map(|v| kcal(*v)));
        record.push(kcal(total));
        builder.push_record(record);
    }

    if let (Some(first), Some(last)) = (summary.dates.first(), summary.dates.last()) {
        println!("\n\x1b[1;36m{} .. {}\x1b[0m", first, last);
    }
    let mut table = styled(builder.build());
    table.modify(Columns::new(1..), Alignment::right());
    println!("{}", table);
}

pub fn print_year(summary: &YearTable) {
    let mut rows: Vec<MonthLine> = summary
        .months
        .iter()
        .map(|m| MonthLine {
            month: m.label.clone(),
            food: kcal(m.totals.food),
            cardio: kcal(m.totals.cardio),
            net: kcal(m.totals.net),
        })
        .collect();
    rows.push(MonthLine {
        month: "Total".to_string(),
        food: kcal(summary.totals.food),
        cardio: kcal(summary.totals.cardio),
        net: kcal(summary.totals.net),
    });

    println!("\n\x1b[1;36m{}\x1b[0m", summary.year);
    let mut table = styled(Table::new(rows));
    table.modify(Columns::new(1..), Alignment::right());
    println!("{}", table);
}
