use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::StreakError;

pub type UserId = i32;

/// Calendar days with at least one play, strictly newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayDateSequence {
    dates: Vec<NaiveDate>,
}

impl PlayDateSequence {
    /// Builds a sequence, rejecting unsorted or duplicated dates.
    pub fn new(dates: Vec<NaiveDate>) -> Result<Self, StreakError> {
        if let Some((index, pair)) = dates
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[1] >= pair[0])
        {
            return Err(StreakError::InvalidInput {
                index: index + 1,
                previous: pair[0],
                found: pair[1],
            });
        }

        Ok(Self { dates })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn most_recent(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Streak summary returned for a known user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub user_id: UserId,
    pub username: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_play_date: Option<NaiveDate>,
}
