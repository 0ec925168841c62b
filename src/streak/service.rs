use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    Clock, PlayDateSequence, PlayHistoryStore, StreakCalculator, StreakResult, UserDirectory,
    UserId,
};
use crate::shared::AppError;

/// Wires the streak calculator to its collaborators and the clock.
pub struct StreakService {
    calculator: StreakCalculator,
    history: Arc<dyn PlayHistoryStore>,
    clock: Arc<dyn Clock>,
}

impl StreakService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        history: Arc<dyn PlayHistoryStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            calculator: StreakCalculator::new(directory),
            history,
            clock,
        }
    }

    /// Resolves the user, then fetches the play history and computes the
    /// streak as of today. Unknown users yield `None` without touching the
    /// history store.
    #[instrument(skip(self))]
    pub async fn listening_streak(&self, user_id: UserId) -> Result<Option<StreakResult>, AppError> {
        let Some(entry) = self.calculator.resolve(user_id).await? else {
            return Ok(None);
        };

        let dates = self.history.distinct_play_dates(user_id).await?;
        let play_dates = PlayDateSequence::new(dates).map_err(|e| {
            warn!(user_id, error = %e, "Play history store returned malformed dates");
            e
        })?;

        let today = self.clock.today();
        let streak = self
            .calculator
            .summarize(user_id, entry, today, &play_dates);

        info!(
            user_id,
            %today,
            current_streak = streak.current_streak,
            longest_streak = streak.longest_streak,
            "Listening streak computed"
        );

        Ok(Some(streak))
    }
}
