//! Weighted exercise selection for a single day
//!
//! Categories are cycled in the order the day label dictates, and within a
//! category a single weighted-random draw picks the exercise.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::prescription::is_compound;
use crate::exercises::{Category, Exercise};
use crate::profile::{Goal, Level};

/// Uniform random values in `[0, 1)`
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Adapter over any `rand` generator
pub struct RngSource<R: Rng>(R);

impl RngSource<ThreadRng> {
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

/// Replays a fixed list of values, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f64>,
    pos: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, pos: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}

const COMPOUND_BONUS: f64 = 1.2;
const STRENGTH_BONUS: f64 = 1.1;
const FATLOSS_CORE_BONUS: f64 = 0.3;
const FATLOSS_CONDITIONING_BONUS: f64 = 0.25;
const HYPERTROPHY_ISOLATION_BONUS: f64 = 0.35;
const BEGINNER_PENALTY: f64 = 0.2;

const ISOLATION_KEYWORDS: &[&str] = &[
    "cable", "machine", "dumbbell", "curl", "raise", "fly", "extension", "pushdown",
];

/// Movements we steer beginners away from
const BEGINNER_CAUTION: &[&str] = &["Barbell Deadlift", "Pull-Up"];

/// Category order for a day, from the label text
pub fn category_targets(label: &str) -> &'static [Category] {
    use Category::*;

    let label = label.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| label.contains(w));

    if has(&["full body"]) {
        &[Legs, Push, Pull, Core]
    } else if has(&["upper"]) {
        &[Push, Pull, Core]
    } else if has(&["lower"]) {
        &[Legs, Core]
    } else if has(&["push", "chest", "shoulders", "arms"]) {
        &[Push, Core]
    } else if has(&["pull", "back"]) {
        &[Pull, Core]
    } else if has(&["legs"]) {
        &[Legs, Core]
    } else {
        &[Push, Pull, Legs, Core]
    }
}

/// Session size by minutes
pub fn base_count(minutes: u32) -> usize {
    match minutes {
        0..=20 => 4,
        21..=30 => 5,
        31..=45 => 6,
        _ => 7,
    }
}

fn is_category_compound(category: Category, name: &str) -> bool {
    let keywords: &[&str] = match category {
        Category::Push => &["bench", "press", "dips"],
        Category::Pull => &["row", "pull"],
        Category::Legs => &["squat", "press", "deadlift", "lunge"],
        Category::Core => &[],
    };
    keywords.iter().any(|k| name.contains(k))
}

/// Selection weight of one candidate
pub fn selection_weight(exercise: &Exercise, goal: Goal, level: Level) -> f64 {
    let name = exercise.name.to_lowercase();
    let mut weight = 1.0;

    if is_category_compound(exercise.category, &name) {
        weight += COMPOUND_BONUS;
    }

    match goal {
        Goal::Strength => {
            if name.contains("barbell") || is_compound(&name) {
                weight += STRENGTH_BONUS;
            }
        }
        Goal::Fatloss => {
            if exercise.category == Category::Core {
                weight += FATLOSS_CORE_BONUS;
            }
            if name.contains("lunge") || name.contains("walking") {
                weight += FATLOSS_CONDITIONING_BONUS;
            }
        }
        Goal::Hypertrophy => {
            if ISOLATION_KEYWORDS.iter().any(|k| name.contains(k)) {
                weight += HYPERTROPHY_ISOLATION_BONUS;
            }
        }
        Goal::Recomp | Goal::General => {}
    }

    if level == Level::Beginner && BEGINNER_CAUTION.contains(&exercise.name) {
        weight -= BEGINNER_PENALTY;
    }

    weight
}

/// Single weighted-random draw. Walks the list subtracting weights until
/// the running value goes non-positive; the last candidate catches any
/// floating-point leftovers.
pub fn weighted_pick<'a, T>(
    candidates: &[(&'a T, f64)],
    rng: &mut dyn RandomSource,
) -> Option<&'a T> {
    let (last, _) = candidates.last()?;
    let total: f64 = candidates.iter().map(|(_, w)| w).sum();

    let mut roll = rng.next_f64() * total;
    for (candidate, weight) in candidates {
        roll -= weight;
        if roll <= 0.0 {
            return Some(*candidate);
        }
    }
    Some(*last)
}

/// Goal/level knobs for a selection pass
#[derive(Debug, Clone, Copy)]
pub struct SelectionContext {
    pub goal: Goal,
    pub level: Level,
    pub minutes: u32,
}

fn pick_from_category<'a>(
    eligible: &[&'a Exercise],
    picked: &[&'a Exercise],
    category: Category,
    ctx: &SelectionContext,
    rng: &mut dyn RandomSource,
) -> Option<&'a Exercise> {
    let pool: Vec<(&'a Exercise, f64)> = eligible
        .iter()
        .filter(|e| e.category == category)
        .filter(|e| !picked.iter().any(|p| p.name == e.name))
        .map(|e| (*e, selection_weight(e, ctx.goal, ctx.level)))
        .collect();

    weighted_pick(&pool, rng)
}

/// Pick the exercises for one day.
///
/// Cycles the label's category targets until the session size is reached
/// or a category has nothing left. Sessions of 30+ minutes without a core
/// movement get one appended, but the result is cut back to the session
/// size afterwards, so a full session silently loses that top-up.
pub fn select_exercises<'a>(
    label: &str,
    eligible: &[&'a Exercise],
    ctx: &SelectionContext,
    rng: &mut dyn RandomSource,
) -> Vec<&'a Exercise> {
    let targets = category_targets(label);
    let count = base_count(ctx.minutes);
    let mut picked: Vec<&'a Exercise> = Vec::with_capacity(count + 1);

    for category in targets.iter().cycle() {
        if picked.len() >= count {
            break;
        }
        match pick_from_category(eligible, &picked, *category, ctx, rng) {
            Some(exercise) => picked.push(exercise),
            None => {
                debug!(label, category = category.as_str(), "category exhausted");
                break;
            }
        }
    }

    let has_core = picked.iter().any(|e| e.category == Category::Core);
    if !has_core
        && ctx.minutes >= 30
        && let Some(core) = pick_from_category(eligible, &picked, Category::Core, ctx, rng)
    {
        picked.push(core);
    }

    picked.truncate(count);
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::{filter_eligible, find_exercise_by_name, CATALOG};
    use crate::profile::Environment;

    fn ctx(goal: Goal, minutes: u32) -> SelectionContext {
        SelectionContext { goal, level: Level::Intermediate, minutes }
    }

    fn get(name: &str) -> &'static Exercise {
        find_exercise_by_name(name).unwrap()
    }

    #[test]
    fn test_base_count_table() {
        assert_eq!(base_count(0), 4);
        assert_eq!(base_count(20), 4);
        assert_eq!(base_count(21), 5);
        assert_eq!(base_count(30), 5);
        assert_eq!(base_count(45), 6);
        assert_eq!(base_count(46), 7);
        assert_eq!(base_count(120), 7);
    }

    #[test]
    fn test_base_count_monotonic() {
        let mut prev = base_count(0);
        for m in 1..=180 {
            let current = base_count(m);
            assert!(current >= prev, "base_count dropped at {} minutes", m);
            assert!((4..=7).contains(&current));
            prev = current;
        }
    }

    #[test]
    fn test_category_targets() {
        use Category::*;
        assert_eq!(category_targets("Full Body A"), &[Legs, Push, Pull, Core]);
        assert_eq!(category_targets("Upper B"), &[Push, Pull, Core]);
        assert_eq!(category_targets("Lower A"), &[Legs, Core]);
        assert_eq!(category_targets("Chest"), &[Push, Core]);
        assert_eq!(category_targets("Back"), &[Pull, Core]);
        assert_eq!(category_targets("Legs B"), &[Legs, Core]);
        assert_eq!(category_targets("Core"), &[Push, Pull, Legs, Core]);
    }

    #[test]
    fn test_selection_weights() {
        let w = selection_weight(get("Barbell Bench Press"), Goal::Strength, Level::Intermediate);
        assert!((w - 3.3).abs() < 1e-9, "weight {}", w);

        let w = selection_weight(get("Cable Fly"), Goal::Hypertrophy, Level::Intermediate);
        assert!((w - 1.35).abs() < 1e-9, "weight {}", w);

        let w = selection_weight(get("Walking Lunge"), Goal::Fatloss, Level::Intermediate);
        assert!((w - 2.45).abs() < 1e-9, "weight {}", w);

        let w = selection_weight(get("Plank"), Goal::Fatloss, Level::Intermediate);
        assert!((w - 1.3).abs() < 1e-9, "weight {}", w);

        let w = selection_weight(get("Pull-Up"), Goal::Recomp, Level::Beginner);
        assert!((w - 2.0).abs() < 1e-9, "weight {}", w);
    }

    #[test]
    fn test_weighted_pick_walks_in_order() {
        let a = get("Plank");
        let b = get("Dead Bug");
        let c = get("Side Plank");
        let candidates = vec![(a, 1.0), (b, 2.0), (c, 1.0)];

        // total 4.0: roll 0.0 -> first, 0.5 -> 2.0 lands on b, 0.9 -> 3.6 lands on c
        assert_eq!(weighted_pick(&candidates, &mut FixedSequence::new(vec![0.0])).unwrap().name, "Plank");
        assert_eq!(weighted_pick(&candidates, &mut FixedSequence::new(vec![0.5])).unwrap().name, "Dead Bug");
        assert_eq!(weighted_pick(&candidates, &mut FixedSequence::new(vec![0.9])).unwrap().name, "Side Plank");
    }

    #[test]
    fn test_weighted_pick_empty() {
        let candidates: Vec<(&Exercise, f64)> = vec![];
        assert!(weighted_pick(&candidates, &mut FixedSequence::new(vec![0.3])).is_none());
    }

    #[test]
    fn test_select_fills_base_count_without_duplicates() {
        let eligible = filter_eligible(CATALOG, Environment::Gym, "");
        let mut rng = RngSource::seeded(7);
        for minutes in [15, 30, 45, 60] {
            let picked = select_exercises("Full Body A", &eligible, &ctx(Goal::Hypertrophy, minutes), &mut rng);
            assert_eq!(picked.len(), base_count(minutes));

            let mut names: Vec<_> = picked.iter().map(|e| e.name).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), picked.len(), "duplicate exercise picked");
        }
    }

    #[test]
    fn test_select_follows_category_cycle() {
        let eligible = filter_eligible(CATALOG, Environment::Gym, "");
        let mut rng = RngSource::seeded(42);
        let picked = select_exercises("Upper A", &eligible, &ctx(Goal::Strength, 45), &mut rng);
        let cats: Vec<_> = picked.iter().map(|e| e.category).collect();
        use Category::*;
        assert_eq!(cats, vec![Push, Pull, Core, Push, Pull, Core]);
    }

    #[test]
    fn test_select_stops_when_category_runs_out() {
        // Two legs exercises and nothing else: Legs, Core(empty) -> stop
        let pool = [get("Glute Bridge"), get("Step-Ups")];
        let mut rng = FixedSequence::new(vec![0.1]);
        let picked = select_exercises("Legs", &pool, &ctx(Goal::Recomp, 45), &mut rng);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_core_top_up_survives_short_selection() {
        // Push runs out right after Legs; core's turn never comes, so the
        // top-up appends one and it fits under the session size.
        let pool = [get("Glute Bridge"), get("Plank")];
        let mut rng = FixedSequence::new(vec![0.1]);
        let picked = select_exercises("Full Body A", &pool, &ctx(Goal::Recomp, 45), &mut rng);
        let names: Vec<_> = picked.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Glute Bridge", "Plank"]);
    }

    #[test]
    fn test_no_core_top_up_under_thirty_minutes() {
        let pool = [get("Glute Bridge"), get("Plank")];
        let mut rng = FixedSequence::new(vec![0.1]);
        let picked = select_exercises("Full Body A", &pool, &ctx(Goal::Recomp, 20), &mut rng);
        let names: Vec<_> = picked.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Glute Bridge"]);
    }

    #[test]
    fn test_exhausted_core_ends_cycle() {
        // Chest cycles Push, Core; the second Core turn finds nothing
        let pool = [
            get("Barbell Bench Press"),
            get("Dumbbell Bench Press"),
            get("Cable Fly"),
            get("Plank"),
        ];
        let mut rng = FixedSequence::new(vec![0.0]);
        let picked = select_exercises("Chest", &pool, &ctx(Goal::Recomp, 20), &mut rng);
        let names: Vec<_> = picked.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Barbell Bench Press", "Plank", "Dumbbell Bench Press"]);
    }

    #[test]
    fn test_full_session_never_exceeds_base_count() {
        let eligible = filter_eligible(CATALOG, Environment::Home, "");
        for seed in 0..20 {
            let mut rng = RngSource::seeded(seed);
            let picked = select_exercises("Full Body B", &eligible, &ctx(Goal::Fatloss, 45), &mut rng);
            assert_eq!(picked.len(), 6);
            assert!(picked.iter().any(|e| e.category == Category::Core));
        }
    }
}
