//! Per-group quiz progress.

use serde::{Deserialize, Serialize};

use crate::scheduler::ReviewStats;

/// Where a group stands in the quiz flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// Answer progress of one group, with its review stats when scheduling is on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupProgress {
    pub group_id: String,
    pub answered_count: usize,
    pub total_count: usize,
    pub correct_count: usize,
    #[serde(default)]
    pub review_stats: Option<ReviewStats>,
}

impl GroupProgress {
    pub fn new(
        group_id: impl Into<String>,
        answered_count: usize,
        total_count: usize,
        correct_count: usize,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            answered_count,
            total_count,
            correct_count,
            review_stats: None,
        }
    }

    pub fn with_review_stats(mut self, stats: ReviewStats) -> Self {
        self.review_stats = Some(stats);
        self
    }

    /// Answered / total in [0, 1], 0 when the group has no questions
    pub fn progress_rate(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        self.answered_count as f64 / self.total_count as f64
    }

    pub fn progress_percentage(&self) -> f64 {
        self.progress_rate() * 100.0
    }

    /// Correct / answered as a percentage, 0 when nothing was answered
    pub fn accuracy_percentage(&self) -> f64 {
        if self.answered_count == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.answered_count as f64 * 100.0
    }

    pub fn status(&self) -> ProgressStatus {
        if self.answered_count == 0 {
            ProgressStatus::NotStarted
        } else if self.answered_count >= self.total_count {
            ProgressStatus::Completed
        } else {
            ProgressStatus::InProgress
        }
    }

    /// Mastery score from the attached stats
    pub fn mastery_score(&self) -> Option<f64> {
        self.review_stats.as_ref().map(ReviewStats::mastery_score)
    }

    pub fn has_overdue_reviews(&self) -> bool {
        self.review_stats
            .as_ref()
            .is_some_and(|stats| stats.overdue_count > 0)
    }

    pub fn has_due_today_reviews(&self) -> bool {
        self.review_stats
            .as_ref()
            .is_some_and(|stats| stats.due_today_count > 0)
    }
}
