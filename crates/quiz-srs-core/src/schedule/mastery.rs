//! Mastery tiers derived from the consecutive-correct streak.

use serde::{Deserialize, Serialize};

/// Coarse mastery classification of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryLevel {
    /// Streak 0 - new or just lapsed
    Learning,
    /// Streak 1-2
    Reviewing,
    /// Streak 3-5
    Familiar,
    /// Streak 6+
    Mastered,
}

impl MasteryLevel {
    /// All tiers, lowest first
    pub const ALL: [MasteryLevel; 4] = [
        MasteryLevel::Learning,
        MasteryLevel::Reviewing,
        MasteryLevel::Familiar,
        MasteryLevel::Mastered,
    ];

    pub fn from_streak(consecutive_correct: u32) -> Self {
        match consecutive_correct {
            0 => MasteryLevel::Learning,
            1..=2 => MasteryLevel::Reviewing,
            3..=5 => MasteryLevel::Familiar,
            _ => MasteryLevel::Mastered,
        }
    }

    /// Weight used by the composite mastery score
    pub fn weight(&self) -> f64 {
        match self {
            MasteryLevel::Learning => 0.0,
            MasteryLevel::Reviewing => 33.0,
            MasteryLevel::Familiar => 66.0,
            MasteryLevel::Mastered => 100.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryLevel::Learning => "learning",
            MasteryLevel::Reviewing => "reviewing",
            MasteryLevel::Familiar => "familiar",
            MasteryLevel::Mastered => "mastered",
        }
    }

    /// Human-readable label for dashboards
    pub fn label(&self) -> &'static str {
        match self {
            MasteryLevel::Learning => "Learning",
            MasteryLevel::Reviewing => "Reviewing",
            MasteryLevel::Familiar => "Familiar",
            MasteryLevel::Mastered => "Mastered",
        }
    }

    /// Display colour name for dashboards
    pub fn color(&self) -> &'static str {
        match self {
            MasteryLevel::Learning => "red",
            MasteryLevel::Reviewing => "orange",
            MasteryLevel::Familiar => "blue",
            MasteryLevel::Mastered => "green",
        }
    }
}

impl std::fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MasteryLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "learning" => Ok(MasteryLevel::Learning),
            "reviewing" => Ok(MasteryLevel::Reviewing),
            "familiar" => Ok(MasteryLevel::Familiar),
            "mastered" => Ok(MasteryLevel::Mastered),
            _ => Err(format!("Unknown mastery level: {}", s)),
        }
    }
}

/// Histogram of schedules per mastery tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryLevelCounts {
    pub learning: usize,
    pub reviewing: usize,
    pub familiar: usize,
    pub mastered: usize,
}

impl MasteryLevelCounts {
    pub fn get(&self, level: MasteryLevel) -> usize {
        match level {
            MasteryLevel::Learning => self.learning,
            MasteryLevel::Reviewing => self.reviewing,
            MasteryLevel::Familiar => self.familiar,
            MasteryLevel::Mastered => self.mastered,
        }
    }

    pub fn increment(&mut self, level: MasteryLevel) {
        match level {
            MasteryLevel::Learning => self.learning += 1,
            MasteryLevel::Reviewing => self.reviewing += 1,
            MasteryLevel::Familiar => self.familiar += 1,
            MasteryLevel::Mastered => self.mastered += 1,
        }
    }

    /// Number of classified schedules
    pub fn total(&self) -> usize {
        self.learning + self.reviewing + self.familiar + self.mastered
    }

    /// Weighted average of tier weights, 0 when empty
    pub fn weighted_score(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let weighted: f64 = MasteryLevel::ALL
            .iter()
            .map(|level| level.weight() * self.get(*level) as f64)
            .sum();
        weighted / total as f64
    }
}
