use std::{io, time::Duration};

use anyhow::Result;
use calorie_core::{Aggregator, Dashboard, DashboardUseCase, FileLogRepository, UserId};
use chrono::{Duration as ChronoDuration, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Padding, Paragraph},
};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    food: Color,
    cardio: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    food: Color::Yellow,
    cardio: Color::Green,
};

pub struct DashboardApp {
    pub today: NaiveDate,
    pub reference: NaiveDate,
    pub data: Dashboard,
}

impl DashboardApp {
    pub fn new(today: NaiveDate, reference: NaiveDate, data: Dashboard) -> Self {
        Self { today, reference, data }
    }

    pub fn can_go_forward(&self) -> bool {
        self.reference < self.today
    }
}

pub fn run(repo: &FileLogRepository, user: &UserId, reference: NaiveDate) -> Result<()> {
    let aggregator = Aggregator::new(repo);
    let usecase = DashboardUseCase::new(&aggregator);
    let today = aggregator.today();
    let mut app = DashboardApp::new(today, reference, usecase.snapshot(user, Some(reference))?);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = (|| -> Result<()> {
        loop {
            terminal.draw(|f| ui(f, &app))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    let next = match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => Some(app.reference - ChronoDuration::days(7)),
                        KeyCode::Right | KeyCode::Char('l') if app.can_go_forward() => {
                            Some((app.reference + ChronoDuration::days(7)).min(app.today))
                        }
                        KeyCode::Char('t') => Some(app.today),
                        _ => None,
                    };
                    if let Some(reference) = next {
                        app.data = usecase.snapshot(user, Some(reference))?;
                        app.reference = reference;
                    }
                }
            }
        }
        Ok(())
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn ui(frame: &mut Frame, app: &DashboardApp) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + side panel
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    // --- Header ---
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(1), Constraint::Length(34)])
        .split(main_layout[0]);

    let app_title = Paragraph::new(Span::styled(
        "CALORIE TRACKER",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(app_title, header_layout[0]);

    let title = format!(" 7 days to {} ", app.reference.format("%a %Y-%m-%d"));
    let nav_text = Line::from(vec![
        Span::styled(" < ", Style::default().fg(THEME.text)),
        Span::styled(title, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(
            " > ",
            Style::default().fg(if app.can_go_forward() { THEME.text } else { THEME.muted }),
        ),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[2]);
    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    // --- Content ---
    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Length(1), Constraint::Percentage(35)])
        .split(main_layout[1]);

    draw_chart(frame, &app.data, content[0]);
    draw_side_panel(frame, &app.data, content[2]);

    // --- Footer ---
    let help = Line::from(vec![
        Span::styled("WEEK: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::styled(" TODAY: ", Style::default().fg(THEME.muted)),
        Span::styled("t ", Style::default().fg(THEME.text)),
        Span::styled(" QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    frame.render_widget(Paragraph::new(help).alignment(Alignment::Center), main_layout[2]);
}

fn draw_chart(frame: &mut Frame, data: &Dashboard, area: Rect) {
    let table = &data.rolling_table;
    let mut bar_data = Vec::new();

    // The table is newest first; the chart reads left to right.
    for i in (0..table.len()).rev() {
        bar_data.push((String::new(), table.food_totals[i].max(0.0).round() as u64, THEME.food));
        bar_data.push((table.day_labels[i].clone(), table.cardio_totals[i].max(0.0).round() as u64, THEME.cardio));
        bar_data.push((String::new(), 0, Color::Reset));
    }

    let bar_items: Vec<Bar> = bar_data
        .iter()
        .map(|(label, value, color)| {
            Bar::default()
                .label(label.as_str())
                .value(*value)
                .style(Style::default().fg(*color))
                .text_value(if *value > 0 { value.to_string() } else { String::new() })
        })
        .collect();

    let max = bar_data.iter().map(|(_, v, _)| *v).max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Calories in / out "),
        )
        .bar_width(5)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bar_items))
        .max(max);

    frame.render_widget(chart, area);
}

fn totals_line<'a>(label: &'a str, food: f64, cardio: f64, net: f64) -> Line<'a> {
    Line::from(vec![
        Span::styled(label, Style::default().fg(THEME.muted)),
        Span::styled(format!("{:>6.0}", food), Style::default().fg(THEME.food)),
        Span::raw(" - "),
        Span::styled(format!("{:>6.0}", cardio), Style::default().fg(THEME.cardio)),
        Span::raw(" = "),
        Span::styled(format!("{:>6.0}", net), Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
    ])
}

fn draw_side_panel(frame: &mut Frame, data: &Dashboard, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(1)])
        .split(area);

    let summary = vec![
        Line::from(Span::styled("Net calories", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        totals_line("Day      ", data.day.food, data.day.cardio, data.day.net),
        totals_line("Rolling  ", data.rolling_week.food, data.rolling_week.cardio, data.rolling_week.net),
        totals_line("Week     ", data.calendar_week.food, data.calendar_week.cardio, data.calendar_week.net),
    ];
    frame.render_widget(
        Paragraph::new(summary).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(" Summary "),
        ),
        chunks[0],
    );

    let mut lines = Vec::new();
    for food in &data.food_logs {
        lines.push(Line::from(vec![
            Span::styled(food.timestamp.format("%H:%M ").to_string(), Style::default().fg(THEME.muted)),
            Span::styled(format!("{:<10}", food.meal.label()), Style::default().fg(THEME.food)),
            Span::raw(format!("{} ({:.0})", food.name, food.calories_in)),
        ]));
    }
    for cardio in &data.cardio_logs {
        lines.push(Line::from(vec![
            Span::styled(cardio.timestamp.format("%H:%M ").to_string(), Style::default().fg(THEME.muted)),
            Span::styled(format!("{:<10}", format!("{}m", cardio.duration_minutes)), Style::default().fg(THEME.cardio)),
            Span::raw(format!("{} ({:.0})", cardio.name, cardio.calories_out)),
        ]));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled("Nothing logged", Style::default().fg(THEME.muted))));
    }
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted))
                .title(format!(" {} ", data.date.format("%a %d %b"))),
        ),
        chunks[1],
    );
}
