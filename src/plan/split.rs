//! Split & week template selection
//!
//! Day labels are the single source of truth downstream: focus tags and
//! category targets are both derived from the label text.

use serde::{Deserialize, Serialize};

use crate::profile::Split;

/// Focus tag of a training day, derived from its label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Focus {
    Push,
    Pull,
    Legs,
    Core,
    Upper,
    #[serde(rename = "Full Body")]
    FullBody,
    Workout,
}

impl Focus {
    pub fn label(&self) -> &'static str {
        match self {
            Focus::Push => "Push",
            Focus::Pull => "Pull",
            Focus::Legs => "Legs",
            Focus::Core => "Core",
            Focus::Upper => "Upper",
            Focus::FullBody => "Full Body",
            Focus::Workout => "Workout",
        }
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the weekly split. A stated preference always wins.
pub fn choose_split(days: u32, preferred: Option<Split>) -> Split {
    if let Some(split) = preferred {
        return split;
    }

    match days {
        0..=3 => Split::FullBody,
        4 => Split::UpperLower,
        _ => Split::Ppl,
    }
}

const UPPER_LOWER_3: &[&str] = &["Upper A", "Lower A", "Upper B"];
const UPPER_LOWER_4: &[&str] = &["Upper A", "Lower A", "Upper B", "Lower B"];
const UPPER_LOWER_5: &[&str] = &["Upper A", "Lower A", "Upper B", "Lower B", "Full Body"];

const PPL_3: &[&str] = &["Push", "Pull", "Legs"];
const PPL_4: &[&str] = &["Push", "Pull", "Legs", "Upper"];
const PPL_5: &[&str] = &["Push", "Pull", "Legs", "Upper", "Lower"];
const PPL_6: &[&str] = &["Push A", "Pull A", "Legs A", "Push B", "Pull B", "Legs B"];

const BRO: &[&str] = &["Chest", "Back", "Legs", "Shoulders", "Arms", "Core"];

/// Ordered day labels for a split. The result never holds more days
/// than were requested; it may hold fewer when the template tops out.
pub fn build_week_template(split: Split, days: u32) -> Vec<String> {
    let labels: Vec<String> = match split {
        Split::FullBody => (0..days)
            .map(|i| match u8::try_from(i).ok().filter(|i| *i < 26) {
                Some(i) => format!("Full Body {}", (b'A' + i) as char),
                None => format!("Full Body {}", i + 1),
            })
            .collect(),
        Split::UpperLower => {
            let template = match days {
                3 => UPPER_LOWER_3,
                5 => UPPER_LOWER_5,
                _ => UPPER_LOWER_4,
            };
            to_owned(template)
        }
        Split::Ppl => {
            let template = match days {
                0..=3 => PPL_3,
                4 => PPL_4,
                5 => PPL_5,
                _ => PPL_6,
            };
            to_owned(template)
        }
        Split::Bro => to_owned(BRO),
        Split::Unknown => to_owned(PPL_3),
    };

    labels.into_iter().take(days as usize).collect()
}

fn to_owned(template: &[&str]) -> Vec<String> {
    template.iter().map(|s| s.to_string()).collect()
}

/// Derive the focus tag from a day label
pub fn day_focus(label: &str) -> Focus {
    let label = label.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| label.contains(w));

    if has(&["full"]) {
        Focus::FullBody
    } else if has(&["upper"]) {
        Focus::Upper
    } else if has(&["lower"]) {
        Focus::Legs
    } else if has(&["push", "chest", "shoulder", "arms"]) {
        Focus::Push
    } else if has(&["pull", "back"]) {
        Focus::Pull
    } else if has(&["legs"]) {
        Focus::Legs
    } else if has(&["core"]) {
        Focus::Core
    } else {
        Focus::Workout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_split_auto_table() {
        assert_eq!(choose_split(1, None), Split::FullBody);
        assert_eq!(choose_split(3, None), Split::FullBody);
        assert_eq!(choose_split(4, None), Split::UpperLower);
        assert_eq!(choose_split(5, None), Split::Ppl);
        assert_eq!(choose_split(6, None), Split::Ppl);
        assert_eq!(choose_split(7, None), Split::Ppl);
    }

    #[test]
    fn test_choose_split_preference_verbatim() {
        assert_eq!(choose_split(2, Some(Split::Bro)), Split::Bro);
        assert_eq!(choose_split(6, Some(Split::UpperLower)), Split::UpperLower);
    }

    #[test]
    fn test_fullbody_scales_suffixes() {
        assert_eq!(
            build_week_template(Split::FullBody, 3),
            vec!["Full Body A", "Full Body B", "Full Body C"]
        );
    }

    #[test]
    fn test_upperlower_templates() {
        assert_eq!(build_week_template(Split::UpperLower, 3).len(), 3);
        assert_eq!(build_week_template(Split::UpperLower, 4).len(), 4);
        assert_eq!(build_week_template(Split::UpperLower, 5)[4], "Full Body");
        // Anything else uses the 4-day template
        assert_eq!(build_week_template(Split::UpperLower, 7), to_owned(UPPER_LOWER_4));
        assert_eq!(build_week_template(Split::UpperLower, 2), vec!["Upper A", "Lower A"]);
    }

    #[test]
    fn test_ppl_templates() {
        assert_eq!(build_week_template(Split::Ppl, 3), to_owned(PPL_3));
        assert_eq!(build_week_template(Split::Ppl, 5), to_owned(PPL_5));
        assert_eq!(build_week_template(Split::Ppl, 6), to_owned(PPL_6));
        assert_eq!(build_week_template(Split::Ppl, 7).len(), 6);
    }

    #[test]
    fn test_bro_slices() {
        assert_eq!(build_week_template(Split::Bro, 2), vec!["Chest", "Back"]);
        assert_eq!(build_week_template(Split::Bro, 9).len(), 6);
    }

    #[test]
    fn test_unknown_split_is_three_day_ppl() {
        assert_eq!(build_week_template(Split::Unknown, 5), to_owned(PPL_3));
    }

    #[test]
    fn test_day_focus() {
        assert_eq!(day_focus("Full Body B"), Focus::FullBody);
        assert_eq!(day_focus("Upper A"), Focus::Upper);
        assert_eq!(day_focus("Lower B"), Focus::Legs);
        assert_eq!(day_focus("Shoulders"), Focus::Push);
        assert_eq!(day_focus("Arms"), Focus::Push);
        assert_eq!(day_focus("Back"), Focus::Pull);
        assert_eq!(day_focus("Legs A"), Focus::Legs);
        assert_eq!(day_focus("Core"), Focus::Core);
        assert_eq!(day_focus("Mobility"), Focus::Workout);
    }
}
