//! Set/rep/rest prescription rules

use serde::{Deserialize, Serialize};

use crate::profile::{Environment, Goal, Level, Tone};

pub const SETS_RANGE: (i32, i32) = (2, 6);
pub const REPS_RANGE: (i32, i32) = (4, 20);
pub const REST_RANGE: (i32, i32) = (25, 180);

/// Multi-joint movements, matched by name fragment
const COMPOUND_KEYWORDS: &[&str] = &[
    "bench", "squat", "deadlift", "row", "pull-up", "press", "leg press", "lunge",
];

/// Bodyweight movements that get the home-mode override
const BODYWEIGHT_KEYWORDS: &[&str] = &["push-up", "plank", "squat", "bridge"];

/// Minimum rest once the home override kicks in
const HOME_REST_FLOOR: i32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub sets: i32,
    pub reps: i32,
    pub rest_secs: i32,
    pub tempo: String,
    pub hint: String,
}

impl Prescription {
    /// Re-apply the numeric bounds
    pub fn clamp(&mut self) {
        self.sets = self.sets.clamp(SETS_RANGE.0, SETS_RANGE.1);
        self.reps = self.reps.clamp(REPS_RANGE.0, REPS_RANGE.1);
        self.rest_secs = self.rest_secs.clamp(REST_RANGE.0, REST_RANGE.1);
    }

    pub fn is_within_bounds(&self) -> bool {
        (SETS_RANGE.0..=SETS_RANGE.1).contains(&self.sets)
            && (REPS_RANGE.0..=REPS_RANGE.1).contains(&self.reps)
            && (REST_RANGE.0..=REST_RANGE.1).contains(&self.rest_secs)
    }
}

pub fn is_compound(name: &str) -> bool {
    let name = name.to_lowercase();
    COMPOUND_KEYWORDS.iter().any(|k| name.contains(k))
}

fn is_bodyweight(name: &str) -> bool {
    let name = name.to_lowercase();
    BODYWEIGHT_KEYWORDS.iter().any(|k| name.contains(k))
}

/// Row of the per-goal table
struct GoalRule {
    reps: (i32, i32),
    rest: (i32, i32),
    tempo: &'static str,
    hint: &'static str,
}

impl GoalRule {
    fn for_goal(goal: Goal) -> Self {
        match goal {
            Goal::Strength => GoalRule {
                reps: (5, 8),
                rest: (150, 90),
                tempo: "2-0-1",
                hint: "heavy, RPE 7-8",
            },
            Goal::Hypertrophy => GoalRule {
                reps: (8, 12),
                rest: (105, 75),
                tempo: "2-0-2",
                hint: "control negative, RPE 7-9",
            },
            Goal::Fatloss => GoalRule {
                reps: (10, 14),
                rest: (75, 45),
                tempo: "2-0-2",
                hint: "intent, tight rest",
            },
            Goal::Recomp => GoalRule {
                reps: (8, 12),
                rest: (90, 60),
                tempo: "2-0-2",
                hint: "progress slowly",
            },
            Goal::General => GoalRule {
                reps: (10, 10),
                rest: (75, 75),
                tempo: "2-0-2",
                hint: "smooth reps, RPE 7",
            },
        }
    }
}

/// Inputs that shape a single prescription
#[derive(Debug, Clone, Copy)]
pub struct PrescriptionContext {
    pub goal: Goal,
    pub level: Level,
    pub minutes: u32,
    pub tone: Tone,
    pub mode: Environment,
}

/// Compute sets/reps/rest/tempo/hint for one exercise
pub fn prescribe(ctx: &PrescriptionContext, name: &str) -> Prescription {
    let compound = is_compound(name);

    let mut sets = if ctx.minutes <= 20 { 2 } else { 3 };
    match ctx.tone {
        Tone::HighVolume => sets += 1,
        Tone::Minimal => sets = (sets - 1).max(2),
        _ => {}
    }
    match ctx.level {
        Level::Beginner => sets = (sets - 1).max(2),
        Level::Advanced if compound => sets += 1,
        _ => {}
    }

    let rule = GoalRule::for_goal(ctx.goal);
    let pick = |(c, i): (i32, i32)| if compound { c } else { i };

    let mut reps = pick(rule.reps);
    let mut rest_secs = pick(rule.rest);
    let mut tempo = rule.tempo;

    if ctx.mode == Environment::Home {
        if is_bodyweight(name) {
            reps += 4;
            tempo = if ctx.goal == Goal::Strength { "3-1-1" } else { "3-0-2" };
            rest_secs = (rest_secs - 15).max(HOME_REST_FLOOR);
        }
        if ctx.tone == Tone::Athletic {
            rest_secs = (rest_secs - 10).max(HOME_REST_FLOOR);
        }
    }

    let mut prescription = Prescription {
        sets,
        reps,
        rest_secs,
        tempo: tempo.to_string(),
        hint: rule.hint.to_string(),
    };
    prescription.clamp();
    prescription
}
