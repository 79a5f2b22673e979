//! Per-exercise next-session suggestion

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Progression {
    /// Every set done
    Increase,
    /// 75% or more
    Maintain,
    Reduce,
}

impl Progression {
    /// Suggestion from target vs. completed sets
    pub fn from_sets(target_sets: i32, completed_sets: i32) -> Self {
        let completion = if target_sets > 0 {
            f64::from(completed_sets) / f64::from(target_sets)
        } else {
            0.0
        };

        if completion >= 1.0 {
            Progression::Increase
        } else if completion >= 0.75 {
            Progression::Maintain
        } else {
            Progression::Reduce
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Progression::Increase => "Add a rep or a small amount of weight next time.",
            Progression::Maintain => "Keep the load, aim to finish all sets next time.",
            Progression::Reduce => "Reduce the target or take longer rests next time.",
        }
    }
}
