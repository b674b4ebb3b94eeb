mod dashboard;
mod table;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use calorie_core::config::default_data_dir;
use calorie_core::input::{cardio_draft, food_draft, patch};
use calorie_core::logging::{flush_logging, init_logging};
use calorie_core::service::summary::DEFAULT_DAYS;
use calorie_core::{
    parse_args, parse_reference_date, Aggregator, AppConfig, Clock, DayOrder, FileLogRepository, LogKind,
    LogService, NetCalorieService, SummaryTableBuilder, SystemClock, UserId, Window,
};
use chrono::{Datelike, Duration, NaiveDate};
use clap::{Parser, ValueEnum};
use log::{error, info};

#[derive(Parser)]
#[command(name = "calorie")]
#[command(about = "Log meals and cardio, and see calories in versus out", long_about = None)]
struct Cli {
    /// Owner of the logs (defaults to config, then $USER)
    #[arg(long, global = true)]
    user: Option<String>,
    /// Where logs, config and log files live (default ~/.calorie_tracker)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error|off
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a meal or a workout
    Add {
        #[command(subcommand)]
        kind: AddKind,
    },
    /// List logs in a window
    List {
        #[arg(value_enum)]
        kind: Option<KindArg>,
        #[arg(long, value_enum, default_value_t = WindowArg::Day)]
        window: WindowArg,
        /// Reference date: today, yest, -3d, mon, 2024-03-01 ...
        #[arg(long)]
        date: Option<String>,
    },
    /// Show one log by id or id prefix
    Show { id: String },
    /// Change fields of a log (usage: edit 1a2b cal:450 at:19:30)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a log by id or id prefix
    Delete { id: String },
    /// Calories in, out and net for a window
    Total {
        #[arg(long, value_enum, default_value_t = WindowArg::Day)]
        window: WindowArg,
        #[arg(long)]
        date: Option<String>,
    },
    /// Per-day table by meal type
    Week {
        /// Seven days ending at the date, newest first, instead of Monday-Sunday
        #[arg(long)]
        rolling: bool,
        #[arg(long)]
        date: Option<String>,
        /// Number of days (defaults to config days_in_table)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Month-by-month table for a year
    Year {
        #[arg(long)]
        year: Option<i32>,
    },
    /// Open the interactive dashboard
    Dashboard {
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum AddKind {
    /// add food Oatmeal meal:breakfast cal:350 [desc:..] [on:yest] [at:07:30]
    Food {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// add cardio Run min:30 cal:280 [desc:..] [on:yest] [at:18:00]
    Cardio {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Food,
    Cardio,
}

#[derive(Clone, Copy, PartialEq, ValueEnum)]
enum WindowArg {
    Day,
    Rolling,
    Week,
    Month,
    Year,
}

impl WindowArg {
    fn at(self, date: NaiveDate) -> Window {
        match self {
            WindowArg::Day => Window::Day(date),
            WindowArg::Rolling => Window::RollingWeek(date),
            WindowArg::Week => Window::CalendarWeek(date),
            WindowArg::Month => Window::month_of(date),
            WindowArg::Year => Window::year_of(date),
        }
    }
}

fn resolve_date(expr: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match expr {
        Some(e) => parse_reference_date(e, today),
        None => Ok(today),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let result = run(cli);
    if let Err(e) = &result {
        error!("event=cli_failed error={:#}", e);
    }
    flush_logging();
    result
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = match cli.data_dir.clone() {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let config = AppConfig::load(&data_dir)?;
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    if let Err(e) = init_logging(&level, &data_dir.join("logs")) {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let user = config.resolve_user(cli.user.as_deref())?;
    let repo = FileLogRepository::new(Some(data_dir.clone()))?;
    let clock = SystemClock;
    info!("event=cli_start user={} data_dir={}", user, data_dir.display());

    match cli.command {
        Some(Commands::Add { kind }) => add(&repo, &user, kind, &clock)?,
        Some(Commands::List { kind, window, date }) => {
            let reference = resolve_date(date.as_deref(), clock.today())?;
            let window = window.at(reference);
            let service = LogService::new(&repo);
            let kinds = match kind {
                Some(KindArg::Food) => vec![LogKind::Food],
                Some(KindArg::Cardio) => vec![LogKind::Cardio],
                None => vec![LogKind::Food, LogKind::Cardio],
            };
            let mut entries = Vec::new();
            for k in kinds {
                entries.extend(service.list(&user, k, window)?);
            }
            entries.sort_by_key(|e| e.timestamp());
            println!("{} ({})", window, window.bounds()?);
            table::print_logs(&entries);
        }
        Some(Commands::Show { id }) => {
            let service = LogService::new(&repo);
            let id = service.resolve_id(&user, &id)?;
            table::print_entry(&service.get(&user, &id)?);
        }
        Some(Commands::Edit { id, args }) => {
            let service = LogService::new(&repo);
            let id = service.resolve_id(&user, &id)?;
            let current = service.get(&user, &id)?;
            let changes = patch(&parse_args(&args), current.timestamp(), clock.today())?;
            if changes.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let updated = service.update(&user, &id, changes)?;
            println!("Log updated.");
            table::print_entry(&updated);
        }
        Some(Commands::Delete { id }) => {
            let service = LogService::new(&repo);
            let id = service.resolve_id(&user, &id)?;
            service.delete(&user, &id)?;
            println!("Log {} deleted.", id);
        }
        Some(Commands::Total { window, date }) => {
            let reference = resolve_date(date.as_deref(), clock.today())?;
            let window = window.at(reference);
            let aggregator = Aggregator::new(&repo);
            let totals = NetCalorieService::new(&aggregator).totals(&user, window)?;
            table::print_totals(&window.to_string(), &window.bounds()?.to_string(), &totals);
        }
        Some(Commands::Week { rolling, date, days }) => {
            let reference = resolve_date(date.as_deref(), clock.today())?;
            let days = days.unwrap_or(config.days_in_table);
            let aggregator = Aggregator::new(&repo);
            let builder = SummaryTableBuilder::new(&aggregator);
            let summary = match (rolling, days == DEFAULT_DAYS) {
                (true, true) => builder.rolling_week_summary(&user, Some(reference))?,
                (false, true) => builder.calendar_week_summary(&user, Some(reference))?,
                (true, false) => {
                    let back = i64::from(days.max(1)) - 1;
                    let start = reference
                        .checked_sub_signed(Duration::days(back))
                        .ok_or_else(|| anyhow!("date out of range"))?;
                    builder.multi_day_table(&user, start, days, DayOrder::Reverse)?
                }
                (false, false) => {
                    let monday = Window::CalendarWeek(reference).bounds()?.start;
                    builder.multi_day_table(&user, monday, days, DayOrder::Forward)?
                }
            };
            table::print_multi_day(&summary);
        }
        Some(Commands::Year { year }) => {
            let aggregator = Aggregator::new(&repo);
            let year = year.unwrap_or_else(|| clock.today().year());
            let summary = SummaryTableBuilder::new(&aggregator).yearly_table(&user, Some(year))?;
            table::print_year(&summary);
        }
        Some(Commands::Dashboard { date }) => {
            let reference = resolve_date(date.as_deref(), clock.today())?;
            dashboard::run(&repo, &user, reference)?;
        }
        None => {
            dashboard::run(&repo, &user, clock.today())?;
        }
    }
    Ok(())
}

fn add(repo: &FileLogRepository, user: &UserId, kind: AddKind, clock: &impl Clock) -> Result<()> {
    let service = LogService::new(repo);
    match kind {
        AddKind::Food { args } => {
            let draft = food_draft(&parse_args(&args), clock.now())?;
            let log = service.add_food(user, draft)?;
            println!("Food log added: {} (ID: {})", log.name, log.id);
            println!("  {} on {}", log.meal, log.timestamp.format("%Y-%m-%d %H:%M"));
            println!("  {:.0} kcal in", log.calories_in);
        }
        AddKind::Cardio { args } => {
            let draft = cardio_draft(&parse_args(&args), clock.now())?;
            let log = service.add_cardio(user, draft)?;
            println!("Cardio log added: {} (ID: {})", log.name, log.id);
            println!("  {} min on {}", log.duration_minutes, log.timestamp.format("%Y-%m-%d %H:%M"));
            println!("  {:.0} kcal out", log.calories_out);
        }
    }
    Ok(())
}
