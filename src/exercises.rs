//! Exercise definitions - база упражнений
//!
//! Static catalog plus the eligibility filter that narrows it by
//! environment and the user's free-text limitation notes.

use serde::{Deserialize, Serialize};

use crate::profile::Environment;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Push,  // Жимы, отжимания
    Pull,  // Тяги, подтягивания
    Legs,  // Ноги
    Core,  // Пресс, планка
}

impl Category {
    pub fn emoji(&self) -> &'static str {
        match self {
            Category::Push => "💪",
            Category::Pull => "🏋️",
            Category::Legs => "🦵",
            Category::Core => "🎯",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Push => "push",
            Category::Pull => "pull",
            Category::Legs => "legs",
            Category::Core => "core",
        }
    }
}

/// Immutable catalog entry. `name` is the unique key; alternatives are
/// names too and get resolved at lookup time.
#[derive(Debug, Clone)]
pub struct Exercise {
    pub name: &'static str,
    pub category: Category,
    pub muscle: &'static str,
    pub environment: Environment,
    pub alternatives: &'static [&'static str],
}

const fn ex(
    name: &'static str,
    category: Category,
    muscle: &'static str,
    environment: Environment,
    alternatives: &'static [&'static str],
) -> Exercise {
    Exercise { name, category, muscle, environment, alternatives }
}

use Category::{Core, Legs, Pull, Push};
use Environment::{Gym, Home};

pub const CATALOG: &[Exercise] = &[
    // Push
    ex("Barbell Bench Press", Push, "chest", Gym, &["Dumbbell Bench Press", "Push-Ups"]),
    ex("Dumbbell Bench Press", Push, "chest", Gym, &["Barbell Bench Press", "Push-Ups"]),
    ex("Incline Dumbbell Press", Push, "upper chest", Gym, &["Dumbbell Bench Press", "Push-Ups"]),
    ex("Overhead Press", Push, "shoulders", Gym, &["Seated Dumbbell Shoulder Press", "Pike Push-Ups"]),
    ex("Seated Dumbbell Shoulder Press", Push, "shoulders", Gym, &["Overhead Press", "Pike Push-Ups"]),
    ex("Dips", Push, "triceps", Gym, &["Bench Dips", "Diamond Push-Ups"]),
    ex("Cable Fly", Push, "chest", Gym, &["Dumbbell Bench Press"]),
    ex("Lateral Raise", Push, "side delts", Gym, &["Cable Lateral Raise"]),
    ex("Cable Lateral Raise", Push, "side delts", Gym, &["Lateral Raise"]),
    ex("Triceps Rope Pushdown", Push, "triceps", Gym, &["Dips", "Diamond Push-Ups"]),
    ex("Push-Ups", Push, "chest", Home, &["Diamond Push-Ups", "Dumbbell Bench Press"]),
    ex("Pike Push-Ups", Push, "shoulders", Home, &["Seated Dumbbell Shoulder Press"]),
    ex("Diamond Push-Ups", Push, "triceps", Home, &["Bench Dips", "Push-Ups"]),
    ex("Bench Dips", Push, "triceps", Home, &["Dips", "Diamond Push-Ups"]),
    // Pull
    ex("Barbell Row", Pull, "upper back", Gym, &["Seated Cable Row", "Inverted Row"]),
    ex("Pull-Up", Pull, "lats", Gym, &["Lat Pulldown", "Inverted Row"]),
    ex("Lat Pulldown", Pull, "lats", Gym, &["Pull-Up", "Band Pulldown"]),
    ex("Seated Cable Row", Pull, "mid back", Gym, &["Barbell Row", "Doorway Row"]),
    ex("Face Pull", Pull, "rear delts", Gym, &["Band Pull-Apart"]),
    ex("Dumbbell Curl", Pull, "biceps", Gym, &["Cable Curl", "Towel Curl"]),
    ex("Cable Curl", Pull, "biceps", Gym, &["Dumbbell Curl"]),
    ex("Inverted Row", Pull, "upper back", Home, &["Barbell Row", "Doorway Row"]),
    ex("Doorway Row", Pull, "mid back", Home, &["Inverted Row"]),
    ex("Band Pull-Apart", Pull, "rear delts", Home, &["Face Pull"]),
    ex("Band Pulldown", Pull, "lats", Home, &["Lat Pulldown"]),
    ex("Towel Curl", Pull, "biceps", Home, &["Dumbbell Curl"]),
    // Legs
    ex("Barbell Back Squat", Legs, "quads", Gym, &["Goblet Squat", "Leg Press"]),
    ex("Leg Press", Legs, "quads", Gym, &["Barbell Back Squat", "Goblet Squat"]),
    ex("Barbell Deadlift", Legs, "posterior chain", Gym, &["Romanian Deadlift", "Glute Bridge"]),
    ex("Romanian Deadlift", Legs, "hamstrings", Gym, &["Good Morning", "Single-Leg Hip Hinge"]),
    ex("Good Morning", Legs, "hamstrings", Gym, &["Romanian Deadlift"]),
    ex("Walking Lunge", Legs, "quads", Gym, &["Reverse Lunge", "Step-Ups"]),
    ex("Leg Curl Machine", Legs, "hamstrings", Gym, &["Glute Bridge"]),
    ex("Leg Extension Machine", Legs, "quads", Gym, &["Step-Ups"]),
    ex("Standing Calf Raise", Legs, "calves", Gym, &["Single-Leg Calf Raise"]),
    ex("Bodyweight Squat", Legs, "quads", Home, &["Goblet Squat", "Step-Ups"]),
    ex("Goblet Squat", Legs, "quads", Home, &["Bodyweight Squat", "Leg Press"]),
    ex("Reverse Lunge", Legs, "glutes", Home, &["Walking Lunge", "Step-Ups"]),
    ex("Step-Ups", Legs, "quads", Home, &["Reverse Lunge"]),
    ex("Glute Bridge", Legs, "glutes", Home, &["Romanian Deadlift"]),
    ex("Single-Leg Hip Hinge", Legs, "hamstrings", Home, &["Romanian Deadlift", "Glute Bridge"]),
    ex("Single-Leg Calf Raise", Legs, "calves", Home, &["Standing Calf Raise"]),
    // Core
    ex("Plank", Core, "abs", Home, &["Dead Bug", "Side Plank"]),
    ex("Side Plank", Core, "obliques", Home, &["Plank"]),
    ex("Dead Bug", Core, "abs", Home, &["Plank"]),
    ex("Ab Wheel Rollout", Core, "abs", Home, &["Plank", "Cable Crunch"]),
    ex("Hanging Leg Raise", Core, "lower abs", Gym, &["Dead Bug", "Cable Crunch"]),
    ex("Cable Crunch", Core, "abs", Gym, &["Ab Wheel Rollout"]),
    ex("Pallof Press", Core, "obliques", Gym, &["Side Plank"]),
];

pub fn get_catalog() -> &'static [Exercise] {
    CATALOG
}

/// Find exercise by name (weak links: alternatives, swaps, carry-over)
pub fn find_exercise_by_name(name: &str) -> Option<&'static Exercise> {
    CATALOG.iter().find(|e| e.name == name)
}

/// Limitation keywords → name fragments that get excluded.
///
/// Matching is plain substring on the lower-cased exercise name, so
/// "back" also knocks out every row. That is the accepted behaviour.
const LIMITATION_RULES: &[(&[&str], &[&str])] = &[
    (&["shoulder", "overhead"], &["overhead press", "shoulder press"]),
    (&["knee"], &["squat", "lunge", "leg press"]),
    (&["back"], &["deadlift", "row", "good morning", "back squat"]),
];

/// Name fragments excluded by the given free-text limitation notes
pub fn excluded_fragments(limitations: &str) -> Vec<&'static str> {
    let notes = limitations.to_lowercase();
    LIMITATION_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| notes.contains(k)))
        .flat_map(|(_, fragments)| fragments.iter().copied())
        .collect()
}

/// Narrow the catalog by limitation notes.
///
/// Both environment modes admit both labels; home-friendly entries are
/// tagged in the catalog instead of filtered out.
pub fn filter_eligible<'a>(
    catalog: &'a [Exercise],
    _mode: Environment,
    limitations: &str,
) -> Vec<&'a Exercise> {
    let excluded = excluded_fragments(limitations);

    catalog
        .iter()
        .filter(|e| {
            let name = e.name.to_lowercase();
            !excluded.iter().any(|frag| name.contains(frag))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let mut seen = HashSet::new();
        for e in CATALOG {
            assert!(seen.insert(e.name), "Duplicate exercise: {}", e.name);
        }
    }

    #[test]
    fn test_every_category_has_both_environments() {
        for cat in [Category::Push, Category::Pull, Category::Legs, Category::Core] {
            for env in [Gym, Home] {
                assert!(
                    CATALOG.iter().any(|e| e.category == cat && e.environment == env),
                    "No {:?} exercise for {:?}", cat, env
                );
            }
        }
    }

    #[test]
    fn test_both_modes_admit_every_label() {
        let gym = filter_eligible(CATALOG, Gym, "");
        let home = filter_eligible(CATALOG, Home, "");
        assert_eq!(gym.len(), CATALOG.len());
        assert_eq!(home.len(), CATALOG.len());
        assert!(home.iter().any(|e| e.environment == Gym), "home mode dropped gym entries");
    }

    #[test]
    fn test_alternatives_resolve() {
        for e in CATALOG {
            for alt in e.alternatives {
                assert!(find_exercise_by_name(alt).is_some(), "{} -> missing alt {}", e.name, alt);
            }
        }
    }

    #[test]
    fn test_no_limitations_keeps_everything() {
        assert_eq!(filter_eligible(CATALOG, Gym, "").len(), CATALOG.len());
        assert_eq!(filter_eligible(CATALOG, Home, "").len(), CATALOG.len());
    }

    #[test]
    fn test_knee_limitation() {
        let eligible = filter_eligible(CATALOG, Gym, "bad knee");
        assert!(!eligible.is_empty());
        for e in eligible {
            let name = e.name.to_lowercase();
            assert!(
                !name.contains("squat") && !name.contains("lunge") && !name.contains("leg press"),
                "{} should be excluded", e.name
            );
        }
    }

    #[test]
    fn test_shoulder_limitation_case_insensitive() {
        let eligible = filter_eligible(CATALOG, Gym, "Old SHOULDER injury");
        assert!(!eligible.iter().any(|e| e.name == "Overhead Press"));
        assert!(!eligible.iter().any(|e| e.name == "Seated Dumbbell Shoulder Press"));
        // Pike push-ups don't contain either fragment
        assert!(eligible.iter().any(|e| e.name == "Pike Push-Ups"));
    }

    #[test]
    fn test_back_limitation_matches_by_name_only() {
        let eligible = filter_eligible(CATALOG, Home, "lower back pain");
        let names: Vec<_> = eligible.iter().map(|e| e.name).collect();
        assert!(!names.contains(&"Inverted Row"));
        assert!(!names.contains(&"Barbell Deadlift"));
        assert!(!names.contains(&"Barbell Back Squat"));
        assert!(!names.contains(&"Good Morning"));
        // Single-leg hinge is a deadlift pattern but not by name
        assert!(names.contains(&"Single-Leg Hip Hinge"));
    }

    #[test]
    fn test_multiple_limitations_combine() {
        let fragments = excluded_fragments("knee and back");
        assert!(fragments.contains(&"squat"));
        assert!(fragments.contains(&"row"));
        assert!(!fragments.contains(&"overhead press"));
    }
}
