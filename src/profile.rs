//! User profile - параметры генерации программы

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Training environment the user has access to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Gym,
    Home,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Gym => "gym",
            Environment::Home => "home",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Strength,
    #[default]
    Hypertrophy,
    Fatloss,
    Recomp,
    /// Anything we don't recognise; gets the generic prescription row
    #[serde(other)]
    General,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Strength => "strength",
            Goal::Hypertrophy => "hypertrophy",
            Goal::Fatloss => "fatloss",
            Goal::Recomp => "recomp",
            Goal::General => "general",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }
}

/// Training style modifier: nudges set counts and rest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Balanced,
    HighVolume,
    Minimal,
    Athletic,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Balanced => "balanced",
            Tone::HighVolume => "highvolume",
            Tone::Minimal => "minimal",
            Tone::Athletic => "athletic",
        }
    }
}

/// Weekly organisation of training days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    FullBody,
    UpperLower,
    Ppl,
    Bro,
    /// Unrecognised split name, falls back to the 3-day PPL template
    #[serde(other)]
    Unknown,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::FullBody => "fullbody",
            Split::UpperLower => "upperlower",
            Split::Ppl => "ppl",
            Split::Bro => "bro",
            Split::Unknown => "unknown",
        }
    }

    /// Parse a split preference; `auto` (or empty) means "let the engine choose"
    pub fn parse_preference(s: &str) -> Option<Split> {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => None,
            other => other.parse().ok(),
        }
    }
}

macro_rules! display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_via_as_str!(Environment, Goal, Level, Tone, Split);

impl FromStr for Environment {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gym" => Ok(Self::Gym),
            "home" => Ok(Self::Home),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

impl FromStr for Goal {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "strength" => Self::Strength,
            "hypertrophy" => Self::Hypertrophy,
            "fatloss" => Self::Fatloss,
            "recomp" => Self::Recomp,
            _ => Self::General,
        })
    }
}

impl FromStr for Level {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!("Unknown level: {}", s)),
        }
    }
}

impl FromStr for Tone {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "highvolume" => Ok(Self::HighVolume),
            "minimal" => Ok(Self::Minimal),
            "athletic" => Ok(Self::Athletic),
            _ => Err(format!("Unknown tone: {}", s)),
        }
    }
}

impl FromStr for Split {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "fullbody" => Self::FullBody,
            "upperlower" => Self::UpperLower,
            "ppl" => Self::Ppl,
            "bro" => Self::Bro,
            _ => Self::Unknown,
        })
    }
}

/// Generation parameters submitted by the user.
///
/// The engine only reads it; a copy is stored inside every generated
/// program so the plan can be traced back to its inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub mode: Environment,
    pub goal: Goal,
    pub level: Level,
    pub days: u32,
    pub minutes: u32,
    /// Free-text limitation notes ("bad knee", "shoulder impingement")
    pub limitations: String,
    /// `None` = auto
    pub preferred_split: Option<Split>,
    pub tone: Tone,
    pub auto_progression: bool,
    pub smart_adapt: bool,
    pub auto_deload: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            mode: Environment::Gym,
            goal: Goal::Hypertrophy,
            level: Level::Intermediate,
            days: 3,
            minutes: 45,
            limitations: String::new(),
            preferred_split: None,
            tone: Tone::Balanced,
            auto_progression: true,
            smart_adapt: true,
            auto_deload: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_goal_is_general() {
        assert_eq!("powerlifting".parse::<Goal>().unwrap(), Goal::General);
        assert_eq!("Strength".parse::<Goal>().unwrap(), Goal::Strength);
    }

    #[test]
    fn test_split_preference_auto() {
        assert_eq!(Split::parse_preference("auto"), None);
        assert_eq!(Split::parse_preference(""), None);
        assert_eq!(Split::parse_preference("ppl"), Some(Split::Ppl));
        assert_eq!(Split::parse_preference("crossfit"), Some(Split::Unknown));
    }

    #[test]
    fn test_profile_serde_lowercase() {
        let profile = Profile {
            tone: Tone::HighVolume,
            preferred_split: Some(Split::UpperLower),
            ..Profile::default()
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("\"highvolume\""), "JSON: {}", json);
        assert!(json.contains("\"upperlower\""), "JSON: {}", json);

        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_unknown_split_deserializes() {
        let split: Split = serde_json::from_str("\"crossfit\"").unwrap();
        assert_eq!(split, Split::Unknown);
    }

    #[test]
    fn test_display_matches_parse() {
        for tone in [Tone::Balanced, Tone::HighVolume, Tone::Minimal, Tone::Athletic] {
            assert_eq!(tone.to_string().parse::<Tone>().unwrap(), tone);
        }
    }
}
