//! Consumer-facing contract for quiz front ends.
//!
//! - `ReviewRecorder` - report answers, load a group's queue and stats, reset a group
//! - `GroupProgress` - answer progress with optional review stats

mod progress;
mod recorder;

pub use progress::{GroupProgress, ProgressStatus};
pub use recorder::{GroupReviewState, RecordedAnswer, ReviewRecorder, order_reviews_first};
