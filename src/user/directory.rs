use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::repository::UserRepository;
use crate::{
    shared::AppError,
    streak::{DirectoryEntry, PlayHistoryStore, UserDirectory, UserId},
};

/// Exposes a user repository to the streak calculator
#[derive(Clone)]
pub struct RepositoryDirectory {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl RepositoryDirectory {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserDirectory for RepositoryDirectory {
    async fn resolve(&self, user_id: UserId) -> Result<Option<DirectoryEntry>, AppError> {
        Ok(self
            .repository
            .get_user(user_id)
            .await?
            .map(|user| DirectoryEntry {
                display_name: user.username,
            }))
    }
}

#[async_trait]
impl PlayHistoryStore for RepositoryDirectory {
    async fn distinct_play_dates(&self, user_id: UserId) -> Result<Vec<NaiveDate>, AppError> {
        self.repository.get_play_dates(user_id).await
    }
}
