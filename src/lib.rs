// Library crate for the Mango Music user service
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod shared;
pub mod streak;
pub mod user;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::AppConfig;
pub use shared::{AppError, AppState};
pub use streak::{
    count_streaks, Clock, FixedClock, PlayDateSequence, StreakCalculator, StreakResult,
    SystemClock,
};
pub use user::repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
