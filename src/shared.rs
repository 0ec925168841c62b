use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::streak::{Clock, StreakError};
use crate::user::repository::UserRepository;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub user_repository: Arc<dyn UserRepository + Send + Sync>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        user_repository: Arc<dyn UserRepository + Send + Sync>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            clock,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidPlayHistory(#[from] StreakError),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidPlayHistory(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::streak::{FixedClock, UserId};
    use crate::user::models::{NewUser, UserModel};
    use crate::user::types::SubscriptionType;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Dummy user repository that knows nobody - for tests that don't care about users
    pub struct DummyUserRepository;

    #[async_trait]
    impl UserRepository for DummyUserRepository {
        async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
            Ok(Vec::new())
        }
        async fn get_user(&self, _user_id: UserId) -> Result<Option<UserModel>, AppError> {
            Ok(None)
        }
        async fn search_users(&self, _term: &str) -> Result<Vec<UserModel>, AppError> {
            Ok(Vec::new())
        }
        async fn list_users_by_country(&self, _country: &str) -> Result<Vec<UserModel>, AppError> {
            Ok(Vec::new())
        }
        async fn list_users_by_subscription(
            &self,
            _subscription_type: SubscriptionType,
        ) -> Result<Vec<UserModel>, AppError> {
            Ok(Vec::new())
        }
        async fn create_user(
            &self,
            user: &NewUser,
            signup_date: NaiveDate,
        ) -> Result<UserModel, AppError> {
            Ok(UserModel::from_new(1, user, signup_date))
        }
        async fn update_user(
            &self,
            _user_id: UserId,
            _user: &NewUser,
        ) -> Result<Option<UserModel>, AppError> {
            Ok(None)
        }
        async fn delete_user(&self, _user_id: UserId) -> Result<bool, AppError> {
            Ok(false)
        }
        async fn get_play_dates(&self, _user_id: UserId) -> Result<Vec<NaiveDate>, AppError> {
            Ok(Vec::new())
        }
    }

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        user_repository: Option<Arc<dyn UserRepository + Send + Sync>>,
        clock: Option<Arc<dyn Clock>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                user_repository: None,
                clock: None,
            }
        }

        pub fn with_user_repository(mut self, repo: Arc<dyn UserRepository + Send + Sync>) -> Self {
            self.user_repository = Some(repo);
            self
        }

        pub fn with_today(mut self, today: NaiveDate) -> Self {
            self.clock = Some(Arc::new(FixedClock::new(today)));
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                user_repository: self
                    .user_repository
                    .unwrap_or_else(|| Arc::new(DummyUserRepository)),
                clock: self.clock.unwrap_or_else(|| {
                    Arc::new(FixedClock::new(
                        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                    ))
                }),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
