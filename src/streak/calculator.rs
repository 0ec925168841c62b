use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{DirectoryEntry, PlayDateSequence, StreakResult, UserDirectory, UserId};
use crate::shared::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakCounts {
    pub current: u32,
    pub longest: u32,
}

/// Reduces a newest-first play history to current and longest streaks.
///
/// The current streak is the run that starts at `reference_today`; the
/// first gap closes it for good. Every run, active or not, feeds the
/// longest count.
pub fn count_streaks(reference_today: NaiveDate, play_dates: &PlayDateSequence) -> StreakCounts {
    let dates = play_dates.as_slice();
    let Some((&first, rest)) = dates.split_first() else {
        return StreakCounts {
            current: 0,
            longest: 0,
        };
    };

    let mut previous = first;
    let mut active = first == reference_today;
    let mut current = u32::from(active);
    let mut run = 1;
    let mut longest = 1;

    for &date in rest {
        if previous.pred_opt() == Some(date) {
            run += 1;
            if active {
                current = run;
            }
            longest = longest.max(run);
        } else {
            active = false;
            run = 1;
        }
        previous = date;
    }

    StreakCounts { current, longest }
}

pub struct StreakCalculator {
    directory: Arc<dyn UserDirectory>,
}

impl StreakCalculator {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Looks the user up in the directory.
    pub async fn resolve(&self, user_id: UserId) -> Result<Option<DirectoryEntry>, AppError> {
        let entry = self.directory.resolve(user_id).await?;
        if entry.is_none() {
            debug!(user_id, "User not found in directory");
        }
        Ok(entry)
    }

    /// Builds the streak summary for an already resolved user.
    pub fn summarize(
        &self,
        user_id: UserId,
        entry: DirectoryEntry,
        reference_today: NaiveDate,
        play_dates: &PlayDateSequence,
    ) -> StreakResult {
        let counts = count_streaks(reference_today, play_dates);
        debug!(
            user_id,
            current_streak = counts.current,
            longest_streak = counts.longest,
            "Streak computed"
        );

        StreakResult {
            user_id,
            username: entry.display_name,
            current_streak: counts.current,
            longest_streak: counts.longest,
            last_play_date: play_dates.most_recent(),
        }
    }

    /// Computes the streak summary for a user.
    ///
    /// Returns `Ok(None)` when the directory does not know the user. Lookup
    /// failures propagate unchanged.
    #[instrument(skip(self, play_dates), fields(play_days = play_dates.len()))]
    pub async fn compute_streak(
        &self,
        user_id: UserId,
        reference_today: NaiveDate,
        play_dates: &PlayDateSequence,
    ) -> Result<Option<StreakResult>, AppError> {
        Ok(self
            .resolve(user_id)
            .await?
            .map(|entry| self.summarize(user_id, entry, reference_today, play_dates)))
    }
}
