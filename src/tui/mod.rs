//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs},
};
use std::io::{stdout, Stdout};

use crate::db::Database;
use crate::plan::DayPlan;
use crate::state::AppState;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App {
    db: Database,
    state: AppState,
    selected_day: usize,
    should_quit: bool,
}

impl App {
    pub fn new(db: Database) -> Result<Self> {
        let state = db.load_state()?.unwrap_or_default();
        Ok(Self {
            db,
            state,
            selected_day: 0,
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn day_count(&self) -> usize {
        self.state.program.as_ref().map_or(0, |p| p.days.len())
    }

    fn next_day(&mut self) {
        let count = self.day_count();
        if count > 0 {
            self.selected_day = (self.selected_day + 1) % count;
        }
    }

    fn prev_day(&mut self) {
        let count = self.day_count();
        if count > 0 {
            self.selected_day = (self.selected_day + count - 1) % count;
        }
    }

    fn reload(&mut self) -> Result<()> {
        self.state = self.db.load_state()?.unwrap_or_default();
        if self.selected_day >= self.day_count() {
            self.selected_day = 0;
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let s = &self.state.scoring;
        let readiness = s.readiness();
        let tier = s.tier();
        let header = Paragraph::new(vec![
            Line::from(format!(
                "liftplan | {} {} {}/100 | fatigue {:.0}  recovery {:.0}  performance {:.0} | week {}",
                tier.emoji(),
                tier.name(),
                readiness,
                s.fatigue,
                s.recovery,
                s.performance,
                s.week
            ))
            .style(Style::default().fg(Color::Cyan).bold()),
            Line::from(tier.advice()),
        ])
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, chunks[0]);

        let Some(program) = &self.state.program else {
            let empty = Paragraph::new("No program yet. Run `liftplan generate` to create one.")
                .block(Block::default().borders(Borders::ALL).title("Program"));
            frame.render_widget(empty, chunks[2]);
            self.render_footer(frame, chunks[3]);
            return;
        };

        // Day tabs
        let titles: Vec<Line> = program
            .days
            .iter()
            .map(|d| Line::from(format!("{}. {}", d.index + 1, d.label)))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.selected_day)
            .highlight_style(Style::default().fg(Color::Yellow).bold())
            .block(Block::default().borders(Borders::ALL).title("Days"));
        frame.render_widget(tabs, chunks[1]);

        if let Some(day) = program.day(self.selected_day) {
            frame.render_widget(day_table(day), chunks[2]);
        }

        self.render_footer(frame, chunks[3]);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut text = String::from("q: quit | ←/→: day | r: reload");
        let remaining = self.state.timer.remaining_secs(Utc::now());
        if let Some(name) = &self.state.timer.exercise
            && remaining > 0
        {
            text.push_str(&format!(" | rest {}: {}s", name, remaining));
        }
        let footer = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('r') => self.reload()?,
                        KeyCode::Right | KeyCode::Tab => self.next_day(),
                        KeyCode::Left | KeyCode::BackTab => self.prev_day(),
                        _ => {}
                    }
                }
        Ok(())
    }
}

fn day_table(day: &DayPlan) -> Table<'static> {
    let rows: Vec<Row> = day.exercises.iter().map(|e| {
        let p = &e.prescription;
        let done_style = if e.completed_sets >= p.sets {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(format!("{} {}", e.category.emoji(), e.name)),
            Cell::from(format!("{}x{}", p.sets, p.reps)),
            Cell::from(format!("{}s", p.rest_secs)),
            Cell::from(p.tempo.clone()),
            Cell::from(p.hint.clone()),
            Cell::from(format!("{}/{}", e.completed_sets, p.sets)).style(done_style),
            Cell::from(e.working_weight.map(|w| format!("{:.1}", w)).unwrap_or_default()),
            Cell::from(e.note.clone()),
        ])
    }).collect();

    Table::new(
        rows,
        [
            Constraint::Length(28),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(20),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["Exercise", "Sets", "Rest", "Tempo", "Hint", "Done", "Kg", "Note"])
        .style(Style::default().bold()))
    .block(Block::default().borders(Borders::ALL).title(format!(
        "{} [{}]  {}/{} sets",
        day.label,
        day.focus,
        day.completed_sets(),
        day.total_sets()
    )))
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
