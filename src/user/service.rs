use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    directory::RepositoryDirectory,
    models::UserModel,
    repository::UserRepository,
    types::UserRequest,
    validation::{parse_subscription_type, validate_user},
};
use crate::{
    shared::AppError,
    streak::{Clock, StreakResult, StreakService, UserId},
};

/// Service for handling user business logic
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
    clock: Arc<dyn Clock>,
    streaks: StreakService,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>, clock: Arc<dyn Clock>) -> Self {
        let directory = Arc::new(RepositoryDirectory::new(Arc::clone(&repository)));
        let streaks = StreakService::new(directory.clone(), directory, Arc::clone(&clock));

        Self {
            repository,
            clock,
            streaks,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> Result<Vec<UserModel>, AppError> {
        self.repository.list_users().await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, user_id: UserId) -> Result<Option<UserModel>, AppError> {
        self.repository.get_user(user_id).await
    }

    /// Searches users by username or email; a blank term lists everyone
    #[instrument(skip(self))]
    pub async fn search_users(&self, term: Option<&str>) -> Result<Vec<UserModel>, AppError> {
        match term.map(str::trim) {
            Some(term) if !term.is_empty() => self.repository.search_users(term).await,
            _ => self.get_all_users().await,
        }
    }

    #[instrument(skip(self))]
    pub async fn get_users_by_country(&self, country: &str) -> Result<Vec<UserModel>, AppError> {
        self.repository.list_users_by_country(country).await
    }

    #[instrument(skip(self))]
    pub async fn get_users_by_subscription_type(
        &self,
        subscription_type: &str,
    ) -> Result<Vec<UserModel>, AppError> {
        let subscription_type = parse_subscription_type(subscription_type)?;
        self.repository
            .list_users_by_subscription(subscription_type)
            .await
    }

    /// Validates and stores a new user; the signup date defaults to today
    #[instrument(skip(self, request))]
    pub async fn create_user(&self, request: UserRequest) -> Result<UserModel, AppError> {
        let user = validate_user(request).map_err(|e| {
            warn!(error = %e, "Rejected user creation");
            e
        })?;
        let signup_date = user.signup_date.unwrap_or_else(|| self.clock.today());

        let created = self.repository.create_user(&user, signup_date).await?;
        info!(
            user_id = created.user_id,
            username = %created.username,
            "User created successfully"
        );
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update_user(
        &self,
        user_id: UserId,
        request: UserRequest,
    ) -> Result<Option<UserModel>, AppError> {
        let user = validate_user(request).map_err(|e| {
            warn!(user_id, error = %e, "Rejected user update");
            e
        })?;

        let updated = self.repository.update_user(user_id, &user).await?;
        if updated.is_some() {
            info!(user_id, "User updated successfully");
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: UserId) -> Result<bool, AppError> {
        let deleted = self.repository.delete_user(user_id).await?;
        if deleted {
            info!(user_id, "User deleted successfully");
        }
        Ok(deleted)
    }

    /// Current and longest daily listening streaks, `None` for an unknown user
    #[instrument(skip(self))]
    pub async fn get_listening_streak(
        &self,
        user_id: UserId,
    ) -> Result<Option<StreakResult>, AppError> {
        self.streaks.listening_streak(user_id).await
    }
}
