use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreakError {
    #[error("Invalid input: play date {found} at position {index} does not precede {previous}")]
    InvalidInput {
        index: usize,
        previous: NaiveDate,
        found: NaiveDate,
    },
}
