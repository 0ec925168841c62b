pub mod calculator;
pub mod clock;
mod errors;
pub mod service;
pub mod types;

pub use calculator::{count_streaks, StreakCalculator, StreakCounts};
pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::StreakError;
pub use service::StreakService;
pub use types::{PlayDateSequence, StreakResult, UserId};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::shared::AppError;

/// A user as seen by the streak calculator: existence plus the name echoed
/// back in the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub display_name: String,
}

/// Resolves a user identifier to a known user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn resolve(&self, user_id: UserId) -> Result<Option<DirectoryEntry>, AppError>;
}

/// Source of the calendar days on which a user played anything.
#[async_trait]
pub trait PlayHistoryStore: Send + Sync {
    /// Distinct play dates, newest first.
    async fn distinct_play_dates(&self, user_id: UserId) -> Result<Vec<NaiveDate>, AppError>;
}
