//! liftplan - Offline workout program generator with adaptive readiness
//!
//! План тренировок + шкала готовности

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use liftplan::db::Database;
use liftplan::plan::{DayPlan, Program, RngSource};
use liftplan::profile::{Environment, Goal, Level, Profile, Split, Tone};
use liftplan::scoring::advice::format_advice;
use liftplan::scoring::{Intensity, SessionInput};
use liftplan::state::{AppState, LogOutcome};
use liftplan::tui::App;

#[derive(Parser)]
#[command(name = "liftplan")]
#[command(author, version, about = "Offline workout program generator with adaptive readiness")]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "LIFTPLAN_DB", default_value = "liftplan.db")]
    db: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open TUI dashboard
    Tui,

    /// Save a profile and generate a new program from it
    Generate {
        /// gym | home
        #[arg(long, default_value = "gym")]
        mode: Environment,

        /// strength | hypertrophy | fatloss | recomp
        #[arg(short, long, default_value = "hypertrophy")]
        goal: Goal,

        /// beginner | intermediate | advanced
        #[arg(short, long, default_value = "intermediate")]
        level: Level,

        /// Training days per week
        #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
        days: u32,

        /// Session length in minutes
        #[arg(short, long, default_value_t = 45)]
        minutes: u32,

        /// Free-text limitations (e.g. "bad knee")
        #[arg(long, default_value = "")]
        limitations: String,

        /// auto | fullbody | upperlower | ppl | bro
        #[arg(short, long, default_value = "auto")]
        split: String,

        /// balanced | highvolume | minimal | athletic
        #[arg(short, long, default_value = "balanced")]
        tone: Tone,

        #[arg(long)]
        no_auto_progression: bool,

        #[arg(long)]
        no_smart_adapt: bool,

        #[arg(long)]
        no_auto_deload: bool,
    },

    /// Rebuild the program from the saved profile
    Regenerate,

    /// Show the current program
    Show {
        /// Only this day (1-based)
        #[arg(short, long)]
        day: Option<usize>,
    },

    /// Mark one set as done
    Done { day: usize, exercise: usize },

    /// Set working weight (omit to clear)
    Weight {
        day: usize,
        exercise: usize,
        weight: Option<f64>,
    },

    /// Set exercise note (empty clears)
    Note {
        day: usize,
        exercise: usize,
        text: String,
    },

    /// Swap an exercise; lists candidates when no replacement is given
    Swap {
        day: usize,
        exercise: usize,
        replacement: Option<String>,
    },

    /// Start the rest timer for an exercise
    Rest { day: usize, exercise: usize },

    /// Log a finished session
    Log {
        day: usize,

        /// Session rating, 1-5
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,

        /// easy | normal | hard
        #[arg(short, long, default_value = "normal")]
        intensity: Intensity,

        /// Completion fraction 0-1 (default: from completed sets)
        #[arg(short, long)]
        completion: Option<f64>,
    },

    /// Show readiness and advice
    Status,

    /// List session history
    History {
        /// Number of records to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Export full state as JSON
    Export { path: PathBuf },

    /// Import state from JSON (replaces everything)
    Import { path: PathBuf },

    /// Wipe profile, program, history and scoring
    Reset,
}

/// 1-based CLI index to 0-based
fn index(n: usize) -> Result<usize> {
    n.checked_sub(1).context("indices start at 1")
}

fn require_program(state: &AppState) -> Result<&Program> {
    state
        .program
        .as_ref()
        .context("No program yet, run `liftplan generate` first")
}

fn format_day(day: &DayPlan) -> String {
    let mut out = format!(
        "Day {} - {} [{}]  {}/{} sets\n",
        day.index + 1,
        day.label,
        day.focus,
        day.completed_sets(),
        day.total_sets()
    );
    for (i, e) in day.exercises.iter().enumerate() {
        let p = &e.prescription;
        out.push_str(&format!(
            "  {}. {} {:24} {}x{:<3} rest {:>3}s  tempo {}  {}",
            i + 1,
            e.category.emoji(),
            e.name,
            p.sets,
            p.reps,
            p.rest_secs,
            p.tempo,
            p.hint
        ));
        out.push_str(&format!("  [{}/{}]", e.completed_sets, p.sets));
        if let Some(w) = e.working_weight {
            out.push_str(&format!("  {:.1} kg", w));
        }
        if !e.note.is_empty() {
            out.push_str(&format!("  \"{}\"", e.note));
        }
        out.push('\n');
    }
    out
}

fn print_program(program: &Program) {
    println!(
        "Program {} | {} | {} days | {} | {}",
        program.id,
        program.split,
        program.days.len(),
        program.profile.goal,
        program.profile.mode
    );
    println!("{:-<60}", "");
    for day in &program.days {
        println!("{}", format_day(day));
    }
}

fn print_outcome(outcome: &LogOutcome) {
    println!("Logged: {}", outcome.entry.summary);
    println!(
        "Readiness: {} -> {}",
        outcome.entry.readiness, outcome.readiness_after
    );
    if !outcome.suggestions.is_empty() {
        println!("Next time:");
        for (name, progression) in &outcome.suggestions {
            println!("  {:24} {}", name, progression.message());
        }
    }
    if let Some(deload) = &outcome.deload {
        println!();
        println!("⚠️  {}", deload.title);
        println!("{}", deload.message);
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;

    // Reset must work even when the stored state is unreadable
    if matches!(cli.command, Some(Commands::Reset)) {
        let mut state = AppState::new();
        state.reset();
        db.clear()?;
        db.save_state(&state)?;
        println!("State reset.");
        return Ok(());
    }

    let mut state = db.load_state()?.unwrap_or_default();
    let recovered = state.resume(Utc::now());
    if recovered > 0 {
        info!(days = recovered, "applied recovery since last run");
        db.save_state(&state)?;
    }

    match cli.command {
        Some(Commands::Generate {
            mode,
            goal,
            level,
            days,
            minutes,
            limitations,
            split,
            tone,
            no_auto_progression,
            no_smart_adapt,
            no_auto_deload,
        }) => {
            let profile = Profile {
                mode,
                goal,
                level,
                days,
                minutes,
                limitations,
                preferred_split: Split::parse_preference(&split),
                tone,
                auto_progression: !no_auto_progression,
                smart_adapt: !no_smart_adapt,
                auto_deload: !no_auto_deload,
            };
            let program = state.generate(profile, &mut RngSource::thread(), Utc::now());
            print_program(program);
            db.save_state(&state)?;
        }

        Some(Commands::Regenerate) => {
            let program = state.regenerate(&mut RngSource::thread(), Utc::now());
            print_program(program);
            db.save_state(&state)?;
        }

        Some(Commands::Show { day }) => {
            let program = require_program(&state)?;
            match day {
                Some(n) => {
                    let plan = program.day(index(n)?).context("No such day")?;
                    println!("{}", format_day(plan));
                }
                None => print_program(program),
            }
        }

        Some(Commands::Done { day, exercise }) => {
            require_program(&state)?;
            let (d, e) = (index(day)?, index(exercise)?);
            let done = state.complete_set(d, e).context("No such exercise")?;
            if let Some(plan) = state.program.as_ref().and_then(|p| p.exercise(d, e)) {
                println!("{}: {}/{} sets", plan.name, done, plan.prescription.sets);
            }
            db.save_state(&state)?;
        }

        Some(Commands::Weight { day, exercise, weight }) => {
            require_program(&state)?;
            if let Some(w) = weight {
                ensure!(w.is_finite() && w >= 0.0, "weight must be a non-negative number");
            }
            if !state.set_weight(index(day)?, index(exercise)?, weight) {
                bail!("No such exercise");
            }
            db.save_state(&state)?;
            match weight {
                Some(w) => println!("Weight set: {:.1} kg", w),
                None => println!("Weight cleared"),
            }
        }

        Some(Commands::Note { day, exercise, text }) => {
            require_program(&state)?;
            if !state.set_note(index(day)?, index(exercise)?, &text) {
                bail!("No such exercise");
            }
            db.save_state(&state)?;
            println!("Note saved");
        }

        Some(Commands::Swap { day, exercise, replacement }) => {
            require_program(&state)?;
            let (d, e) = (index(day)?, index(exercise)?);
            match replacement {
                None => {
                    let candidates = state.swap_candidates(d, e);
                    if candidates.is_empty() {
                        println!("No replacements available.");
                    }
                    for (i, name) in candidates.iter().enumerate() {
                        println!("{:>3}. {}", i + 1, name);
                    }
                }
                Some(name) => {
                    if !state.swap_exercise(d, e, &name) {
                        bail!("{} is not a valid replacement here", name);
                    }
                    db.save_state(&state)?;
                    println!("Swapped in {}", name);
                }
            }
        }

        Some(Commands::Rest { day, exercise }) => {
            require_program(&state)?;
            let rest = state
                .start_rest(index(day)?, index(exercise)?, Utc::now())
                .context("No such exercise")?;
            db.save_state(&state)?;
            println!("Rest {}s started", rest);
        }

        Some(Commands::Log { day, rating, intensity, completion }) => {
            let d = index(day)?;
            let plan = require_program(&state)?.day(d).context("No such day")?;
            let completion = completion.unwrap_or_else(|| plan.completion());
            ensure!(
                (0.0..=1.0).contains(&completion),
                "completion must be between 0 and 1"
            );

            let session = SessionInput { rating, completion, intensity };
            let outcome = state
                .log_session(d, session, Utc::now())
                .context("No such day")?;
            db.record_session(&state, &outcome.entry)?;
            print_outcome(&outcome);
        }

        Some(Commands::Status) => {
            let s = &state.scoring;
            println!("{}", format_advice(state.readiness()));
            println!("{:-<40}", "");
            println!(
                "Fatigue {:.0} | Recovery {:.0} | Performance {:.0} | Week {}",
                s.fatigue, s.recovery, s.performance, s.week
            );
            println!("Sessions logged: {}", state.history.len());
            let remaining = state.timer.remaining_secs(Utc::now());
            if let Some(name) = &state.timer.exercise
                && remaining > 0
            {
                println!("Resting after {}: {}s left", name, remaining);
            }
        }

        Some(Commands::History { limit }) => {
            println!("Recent sessions:");
            println!("{:-<60}", "");
            for h in state.history.iter().rev().take(limit) {
                println!(
                    "{} | {:14} | {:>3.0}% | {:6} | {}/5 | readiness {}",
                    h.date.format("%Y-%m-%d %H:%M"),
                    h.day_label,
                    h.completion * 100.0,
                    h.intensity,
                    h.rating,
                    h.readiness
                );
            }
        }

        Some(Commands::Export { path }) => {
            fs::write(&path, state.to_json()?)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {}", path.display());
        }

        Some(Commands::Import { path }) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            match state.restore_from_json(&json) {
                Ok(()) => {
                    db.replace_state(&state)?;
                    println!("Imported {} sessions", state.history.len());
                }
                Err(e) => println!("{}. Nothing was changed.", e),
            }
        }

        // handled before loading
        Some(Commands::Reset) => {}

        Some(Commands::Tui) | None => {
            let mut app = App::new(db)?;
            app.run()?;
        }
    }

    Ok(())
}
