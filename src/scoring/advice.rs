//! Readiness advice ladder and deload notices

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessTier {
    Primed,    // >= 75
    Ready,     // >= 58
    Moderate,  // >= 42
    Depleted,
}

impl ReadinessTier {
    pub fn from_readiness(readiness: u8) -> Self {
        match readiness {
            75.. => ReadinessTier::Primed,
            58..=74 => ReadinessTier::Ready,
            42..=57 => ReadinessTier::Moderate,
            _ => ReadinessTier::Depleted,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ReadinessTier::Primed => "🟢",
            ReadinessTier::Ready => "🔵",
            ReadinessTier::Moderate => "🟡",
            ReadinessTier::Depleted => "🔴",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReadinessTier::Primed => "Primed",
            ReadinessTier::Ready => "Ready",
            ReadinessTier::Moderate => "Moderate",
            ReadinessTier::Depleted => "Depleted",
        }
    }

    pub fn advice(&self) -> &'static str {
        match self {
            ReadinessTier::Primed => {
                "Green light. Push the main lifts and go for a small rep or load PR."
            }
            ReadinessTier::Ready => "Train as planned and keep every rep crisp.",
            ReadinessTier::Moderate => {
                "Keep quality high, cap effort around RPE 7 and skip junk volume."
            }
            ReadinessTier::Depleted => {
                "Recovery first. Go lighter, prioritise technique, sleep and food."
            }
        }
    }
}

/// Format readiness line for display
pub fn format_advice(readiness: u8) -> String {
    let tier = ReadinessTier::from_readiness(readiness);
    format!("{} {} ({}/100)\n{}", tier.emoji(), tier.name(), readiness, tier.advice())
}

/// Raised at most once per week counter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeloadSuggestion {
    pub week: u32,
    pub title: String,
    pub message: String,
}

impl DeloadSuggestion {
    pub fn new(week: u32, readiness: u8) -> Self {
        Self {
            week,
            title: "Deload suggested".to_string(),
            message: format!(
                "Week {}: readiness is {} and fatigue is piling up. \
                 Cut sets by a third and keep loads light for the next few sessions.",
                week, readiness
            ),
        }
    }
}
