//! Difficulty tiers and the rubber-band skill level

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::Side;

/// Skill tier for the vs-AI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
    Impossible,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty '{0}' (expected easy, medium, hard or impossible)")]
pub struct UnknownDifficulty(pub String);

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Impossible,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Impossible => "impossible",
        }
    }

    pub fn profile(self) -> AiProfile {
        let (ai_level, max_level, min_level) = match self {
            Difficulty::Easy => (120.0, 120.0, 180.0),
            Difficulty::Medium => (100.0, 80.0, 140.0),
            Difficulty::Hard => (50.0, 40.0, 70.0),
            Difficulty::Impossible => (0.0, 0.0, 0.0),
        };
        AiProfile {
            ai_level,
            max_level,
            min_level,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "impossible" => Ok(Difficulty::Impossible),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

/// Prediction error scale. Higher `ai_level` means a sloppier opponent.
///
/// `max_level` is the hardest the AI may get (numerically smallest) and
/// `min_level` the easiest (numerically largest).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiProfile {
    pub ai_level: f32,
    pub max_level: f32,
    pub min_level: f32,
}

impl AiProfile {
    /// Rubber-band after a point: the AI eases off when it concedes and
    /// tightens up when it scores, never leaving `[max_level, min_level]`.
    pub fn on_point_scored(&mut self, ai_side: Side, scorer: Side) {
        let before = self.ai_level;
        if scorer == ai_side {
            self.ai_level = (self.ai_level - 10.0).max(self.max_level);
        } else {
            self.ai_level = (self.ai_level + 10.0).min(self.min_level);
        }
        if self.ai_level != before {
            log::debug!("AI level {} -> {}", before, self.ai_level);
        }
    }

    pub fn in_bounds(&self) -> bool {
        self.max_level <= self.ai_level && self.ai_level <= self.min_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" impossible ".parse::<Difficulty>(), Ok(Difficulty::Impossible));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let back: Difficulty = serde_json::from_str("\"impossible\"").unwrap();
        assert_eq!(back, Difficulty::Impossible);
    }

    #[test]
    fn test_profiles_start_in_bounds() {
        for d in Difficulty::ALL {
            assert!(d.profile().in_bounds(), "{d} profile out of bounds");
        }
        assert_eq!(Difficulty::Easy.profile().ai_level, 120.0);
        assert_eq!(Difficulty::Hard.profile().min_level, 70.0);
    }

    #[test]
    fn test_impossible_never_rubber_bands() {
        let mut p = Difficulty::Impossible.profile();
        for scorer in [Side::Left, Side::Left, Side::Right, Side::Left] {
            p.on_point_scored(Side::Right, scorer);
            assert_eq!(p.ai_level, 0.0);
        }
    }

    #[test]
    fn test_conceding_eases_off_to_min_level() {
        let mut p = Difficulty::Medium.profile();
        for _ in 0..10 {
            p.on_point_scored(Side::Right, Side::Left);
            assert!(p.in_bounds());
        }
        assert_eq!(p.ai_level, 140.0);
    }

    #[test]
    fn test_scoring_tightens_to_max_level() {
        let mut p = Difficulty::Medium.profile();
        p.on_point_scored(Side::Right, Side::Right);
        assert_eq!(p.ai_level, 90.0);
        p.on_point_scored(Side::Right, Side::Right);
        p.on_point_scored(Side::Right, Side::Right);
        assert_eq!(p.ai_level, 80.0);
    }

    #[test]
    fn test_easy_cannot_tighten() {
        let mut p = Difficulty::Easy.profile();
        p.on_point_scored(Side::Right, Side::Right);
        assert_eq!(p.ai_level, 120.0);
    }
}
