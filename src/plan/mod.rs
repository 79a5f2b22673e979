//! Program generation engine
//!
//! Profile → split/template → per-day exercise selection → per-exercise
//! prescription, with an optional readiness-driven delta folded in.

pub mod prescription;
pub mod selector;
pub mod split;

pub use prescription::{prescribe, Prescription, PrescriptionContext};
pub use selector::{FixedSequence, RandomSource, RngSource};
pub use split::Focus;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::exercises::{filter_eligible, find_exercise_by_name, get_catalog, Category, Exercise};
use crate::profile::{Environment, Profile, Split};
use crate::scoring::ScoringState;
use prescription::{is_compound, REPS_RANGE, SETS_RANGE};
use selector::SelectionContext;

/// Bumped whenever the persisted plan layout changes
pub const PROGRAM_VERSION: &str = "2";

/// One prescribed exercise inside a day. Catalog fields are copied so
/// later catalog edits never reach an existing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePlan {
    pub name: String,
    pub category: Category,
    pub muscle: String,
    pub environment: Environment,
    pub alternatives: Vec<String>,
    pub prescription: Prescription,
    pub working_weight: Option<f64>,
    /// 0..=prescription.sets, reset after every logged session
    pub completed_sets: i32,
    pub note: String,
}

impl ExercisePlan {
    pub fn from_catalog(exercise: &Exercise, prescription: Prescription) -> Self {
        Self {
            name: exercise.name.to_string(),
            category: exercise.category,
            muscle: exercise.muscle.to_string(),
            environment: exercise.environment,
            alternatives: exercise.alternatives.iter().map(|a| a.to_string()).collect(),
            prescription,
            working_weight: None,
            completed_sets: 0,
            note: String::new(),
        }
    }

    pub fn is_compound(&self) -> bool {
        is_compound(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub index: usize,
    pub label: String,
    pub focus: Focus,
    pub exercises: Vec<ExercisePlan>,
}

impl DayPlan {
    pub fn total_sets(&self) -> i32 {
        self.exercises.iter().map(|e| e.prescription.sets).sum()
    }

    pub fn completed_sets(&self) -> i32 {
        self.exercises.iter().map(|e| e.completed_sets).sum()
    }

    /// Fraction of prescribed sets done, 0 for an empty day
    pub fn completion(&self) -> f64 {
        let total = self.total_sets();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.completed_sets()) / f64::from(total)
    }
}

/// One generated training week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub profile: Profile,
    pub split: Split,
    pub days: Vec<DayPlan>,
    pub version: String,
}

/// Global volume adjustment derived from readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdaptiveDelta {
    pub sets: i32,
    pub reps: i32,
}

impl AdaptiveDelta {
    pub fn from_readiness(readiness: u8) -> Self {
        match readiness {
            r if r < 42 => Self { sets: -1, reps: -1 },
            r if r > 70 => Self { sets: 0, reps: 1 },
            _ => Self::default(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.sets == 0 && self.reps == 0
    }

    /// Compounds keep their sets; reps move for everything.
    pub fn apply(&self, exercise: &mut ExercisePlan) {
        let compound = exercise.is_compound();
        let p = &mut exercise.prescription;
        if !compound {
            p.sets = (p.sets + self.sets).clamp(SETS_RANGE.0, SETS_RANGE.1);
        }
        p.reps = (p.reps + self.reps).clamp(REPS_RANGE.0, REPS_RANGE.1);
    }
}

/// Build a fresh program for the profile.
///
/// With smart-adapt on, readiness from `scoring` shifts volume for the
/// whole week; otherwise the scoring state is not consulted.
pub fn generate_program(
    profile: &Profile,
    scoring: &ScoringState,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> Program {
    let split = split::choose_split(profile.days, profile.preferred_split);
    let labels = split::build_week_template(split, profile.days);
    let eligible = filter_eligible(get_catalog(), profile.mode, &profile.limitations);

    let delta = if profile.smart_adapt {
        let readiness = scoring.readiness();
        let delta = AdaptiveDelta::from_readiness(readiness);
        debug!(readiness, sets = delta.sets, reps = delta.reps, "adaptive delta");
        delta
    } else {
        AdaptiveDelta::default()
    };

    let selection = SelectionContext {
        goal: profile.goal,
        level: profile.level,
        minutes: profile.minutes,
    };
    let rx = PrescriptionContext {
        goal: profile.goal,
        level: profile.level,
        minutes: profile.minutes,
        tone: profile.tone,
        mode: profile.mode,
    };

    let days: Vec<DayPlan> = labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            let exercises = selector::select_exercises(&label, &eligible, &selection, &mut *rng)
                .into_iter()
                .map(|exercise| {
                    let mut plan = ExercisePlan::from_catalog(exercise, prescribe(&rx, exercise.name));
                    delta.apply(&mut plan);
                    plan
                })
                .collect();

            DayPlan {
                index,
                focus: split::day_focus(&label),
                label,
                exercises,
            }
        })
        .collect();

    info!(
        split = split.as_str(),
        days = days.len(),
        exercises = days.iter().map(|d| d.exercises.len()).sum::<usize>(),
        adapted = !delta.is_zero(),
        "program generated"
    );

    Program {
        id: format!("{}-{}", split.as_str(), now.timestamp_millis()),
        created_at: now,
        profile: profile.clone(),
        split,
        days,
        version: PROGRAM_VERSION.to_string(),
    }
}

/// Carry working weight and notes from `old` into `new` for exercises
/// whose name is unchanged. Matching is by exact name only.
pub fn carry_over(old: &Program, new: &mut Program) -> usize {
    let mut carried = 0;
    for exercise in new.days.iter_mut().flat_map(|d| d.exercises.iter_mut()) {
        let previous = old
            .days
            .iter()
            .flat_map(|d| d.exercises.iter())
            .find(|e| e.name == exercise.name);

        if let Some(previous) = previous {
            exercise.working_weight = previous.working_weight;
            exercise.note = previous.note.clone();
            carried += 1;
        }
    }
    carried
}

impl Program {
    pub fn day(&self, day: usize) -> Option<&DayPlan> {
        self.days.get(day)
    }

    pub fn exercise(&self, day: usize, exercise: usize) -> Option<&ExercisePlan> {
        self.days.get(day)?.exercises.get(exercise)
    }

    pub fn exercise_mut(&mut self, day: usize, exercise: usize) -> Option<&mut ExercisePlan> {
        self.days.get_mut(day)?.exercises.get_mut(exercise)
    }

    /// Valid replacement names for a slot: resolvable alternatives first,
    /// then same-category eligible entries. Nothing already in the day.
    pub fn swap_candidates(&self, day: usize, exercise: usize) -> Vec<String> {
        let Some(plan) = self.days.get(day) else {
            return Vec::new();
        };
        let Some(current) = plan.exercises.get(exercise) else {
            return Vec::new();
        };

        let eligible = filter_eligible(get_catalog(), self.profile.mode, &self.profile.limitations);
        let in_day = |name: &str| plan.exercises.iter().any(|e| e.name == name);

        let alternatives = current
            .alternatives
            .iter()
            .filter_map(|name| eligible.iter().find(|e| e.name == name.as_str()));
        let same_category = eligible.iter().filter(|e| e.category == current.category);

        let mut candidates: Vec<String> = Vec::new();
        for candidate in alternatives.chain(same_category) {
            if in_day(candidate.name) || candidates.iter().any(|c| c == candidate.name) {
                continue;
            }
            candidates.push(candidate.name.to_string());
        }
        candidates
    }

    /// Replace one exercise. Unknown slots or names outside the candidate
    /// list are a no-op. The slot keeps its prescription; weight, note and
    /// progress start over for the new movement.
    pub fn swap_exercise(&mut self, day: usize, exercise: usize, replacement: &str) -> bool {
        if !self.swap_candidates(day, exercise).iter().any(|c| c == replacement) {
            return false;
        }
        let Some(entry) = find_exercise_by_name(replacement) else {
            return false;
        };
        let Some(slot) = self.exercise_mut(day, exercise) else {
            return false;
        };

        debug!(from = %slot.name, to = replacement, "exercise swapped");
        let prescription = slot.prescription.clone();
        *slot = ExercisePlan::from_catalog(entry, prescription);
        true
    }

    pub fn set_note(&mut self, day: usize, exercise: usize, text: &str) -> bool {
        match self.exercise_mut(day, exercise) {
            Some(slot) => {
                slot.note = text.trim().to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_weight(&mut self, day: usize, exercise: usize, weight: Option<f64>) -> bool {
        match self.exercise_mut(day, exercise) {
            Some(slot) => {
                slot.working_weight = weight;
                true
            }
            None => false,
        }
    }

    /// Mark one more set done; stops at the prescribed count
    pub fn complete_set(&mut self, day: usize, exercise: usize) -> Option<i32> {
        let slot = self.exercise_mut(day, exercise)?;
        slot.completed_sets = (slot.completed_sets + 1).min(slot.prescription.sets);
        Some(slot.completed_sets)
    }

    pub fn reset_progress(&mut self, day: usize) {
        if let Some(plan) = self.days.get_mut(day) {
            for exercise in &mut plan.exercises {
                exercise.completed_sets = 0;
            }
        }
    }
}
