use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{NewUser, PlayEventModel, UserModel},
    types::SubscriptionType,
};
use crate::{shared::AppError, streak::UserId};

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
    async fn get_user(&self, user_id: UserId) -> Result<Option<UserModel>, AppError>;
    /// Case-insensitive substring match on username or email.
    /// `%` and `_` in the term match literally.
    async fn search_users(&self, term: &str) -> Result<Vec<UserModel>, AppError>;
    async fn list_users_by_country(&self, country: &str) -> Result<Vec<UserModel>, AppError>;
    async fn list_users_by_subscription(
        &self,
        subscription_type: SubscriptionType,
    ) -> Result<Vec<UserModel>, AppError>;
    async fn create_user(
        &self,
        user: &NewUser,
        signup_date: NaiveDate,
    ) -> Result<UserModel, AppError>;
    async fn update_user(
        &self,
        user_id: UserId,
        user: &NewUser,
    ) -> Result<Option<UserModel>, AppError>;
    async fn delete_user(&self, user_id: UserId) -> Result<bool, AppError>;
    /// Distinct calendar days with at least one play, newest first
    async fn get_play_dates(&self, user_id: UserId) -> Result<Vec<NaiveDate>, AppError>;
}

#[derive(Debug, Default)]
struct InMemoryState {
    users: BTreeMap<UserId, UserModel>,
    plays: HashMap<UserId, Vec<PlayEventModel>>,
    next_id: UserId,
}

/// In-memory implementation of UserRepository for development and testing
///
/// Users and listening history live in memory and are lost when the
/// application restarts. Ids are assigned sequentially starting at 1.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    state: RwLock<InMemoryState>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self::with_data(Vec::new(), Vec::new())
    }

    /// Creates an in-memory repository with pre-populated users and play events
    pub fn with_data(users: Vec<UserModel>, plays: Vec<PlayEventModel>) -> Self {
        let mut state = InMemoryState::default();
        for user in users {
            state.users.insert(user.user_id, user);
        }
        for play in plays {
            state.plays.entry(play.user_id).or_default().push(play);
        }
        state.next_id = state.users.keys().max().copied().unwrap_or(0) + 1;

        Self {
            state: RwLock::new(state),
        }
    }

    /// Appends a play event to a user's listening history
    pub async fn record_play(&self, play: PlayEventModel) {
        let mut state = self.state.write().await;
        state.plays.entry(play.user_id).or_default().push(play);
    }

    /// Returns the current number of users in the repository
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    async fn filter_users<F>(&self, predicate: F) -> Vec<UserModel>
    where
        F: Fn(&UserModel) -> bool,
    {
        let state = self.state.read().await;
        state
            .users
            .values()
            .filter(|user| predicate(user))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        Ok(self.filter_users(|_| true).await)
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<Option<UserModel>, AppError> {
        let state = self.state.read().await;
        let user = state.users.get(&user_id).cloned();

        match &user {
            Some(u) => debug!(user_id, username = %u.username, "User found in memory"),
            None => debug!(user_id, "User not found in memory"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn search_users(&self, term: &str) -> Result<Vec<UserModel>, AppError> {
        let needle = term.to_lowercase();
        Ok(self
            .filter_users(|user| {
                user.username.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            })
            .await)
    }

    #[instrument(skip(self))]
    async fn list_users_by_country(&self, country: &str) -> Result<Vec<UserModel>, AppError> {
        Ok(self
            .filter_users(|user| user.country.eq_ignore_ascii_case(country))
            .await)
    }

    #[instrument(skip(self))]
    async fn list_users_by_subscription(
        &self,
        subscription_type: SubscriptionType,
    ) -> Result<Vec<UserModel>, AppError> {
        Ok(self
            .filter_users(|user| user.subscription_type == Some(subscription_type))
            .await)
    }

    #[instrument(skip(self, user))]
    async fn create_user(
        &self,
        user: &NewUser,
        signup_date: NaiveDate,
    ) -> Result<UserModel, AppError> {
        let mut state = self.state.write().await;
        let user_id = state.next_id;
        state.next_id += 1;

        let model = UserModel::from_new(user_id, user, signup_date);
        state.users.insert(user_id, model.clone());

        debug!(user_id, username = %model.username, "User created in memory");
        Ok(model)
    }

    #[instrument(skip(self, user))]
    async fn update_user(
        &self,
        user_id: UserId,
        user: &NewUser,
    ) -> Result<Option<UserModel>, AppError> {
        let mut state = self.state.write().await;
        let Some(existing) = state.users.get_mut(&user_id) else {
            warn!(user_id, "User not found for update in memory");
            return Ok(None);
        };

        existing.apply(user);
        debug!(user_id, "User updated in memory");
        Ok(Some(existing.clone()))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        let removed = state.users.remove(&user_id).is_some();
        if removed {
            state.plays.remove(&user_id);
            debug!(user_id, "User deleted from memory");
        } else {
            warn!(user_id, "User not found for deletion in memory");
        }
        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn get_play_dates(&self, user_id: UserId) -> Result<Vec<NaiveDate>, AppError> {
        let state = self.state.read().await;
        let days: BTreeSet<NaiveDate> = state
            .plays
            .get(&user_id)
            .map(|plays| plays.iter().map(PlayEventModel::play_date).collect())
            .unwrap_or_default();

        debug!(user_id, play_days = days.len(), "Play dates loaded from memory");
        Ok(days.into_iter().rev().collect())
    }
}

/// PostgreSQL implementation of user repository
///
/// Expects a `users` table (`user_id SERIAL`, `username`, `email`,
/// `subscription_type`, `country`, `signup_date DATE`) and a
/// `listening_history` table with `user_id` and `played_at TIMESTAMP`.
pub struct PostgresUserRepository {
    pool: PgPool,
}

/// Escapes `ILIKE` wildcards so the term matches literally (default escape is `\`)
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Parses a stored subscription type, logging values no variant matches
fn stored_subscription_type(user_id: UserId, value: Option<String>) -> Option<SubscriptionType> {
    let value = value?;
    match value.parse() {
        Ok(subscription_type) => Some(subscription_type),
        Err(_) => {
            warn!(user_id, value = %value, "Unrecognised subscription type in database row");
            None
        }
    }
}

const USER_COLUMNS: &str = "user_id, username, email, subscription_type, country, signup_date";

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn user_from_row(row: &PgRow) -> UserModel {
        let user_id: UserId = row.get("user_id");
        UserModel {
            user_id,
            username: row.get("username"),
            email: row.get("email"),
            subscription_type: stored_subscription_type(user_id, row.get("subscription_type")),
            country: row.get("country"),
            signup_date: row.get("signup_date"),
        }
    }

    async fn fetch_users(
        &self,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<UserModel>, AppError> {
        let rows = query.fetch_all(&self.pool).await.map_err(|e| {
            warn!(error = %e, "Failed to fetch users from database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(rows.iter().map(Self::user_from_row).collect())
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id");
        self.fetch_users(sqlx::query(&sql)).await
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<Option<UserModel>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Failed to fetch user from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let user = row.as_ref().map(Self::user_from_row);
        match &user {
            Some(u) => debug!(user_id, username = %u.username, "User found in database"),
            None => debug!(user_id, "User not found in database"),
        }

        Ok(user)
    }

    #[instrument(skip(self))]
    async fn search_users(&self, term: &str) -> Result<Vec<UserModel>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username ILIKE $1 OR email ILIKE $1 ORDER BY user_id"
        );
        self.fetch_users(sqlx::query(&sql).bind(like_pattern(term)))
            .await
    }

    #[instrument(skip(self))]
    async fn list_users_by_country(&self, country: &str) -> Result<Vec<UserModel>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(country) = LOWER($1) ORDER BY user_id"
        );
        self.fetch_users(sqlx::query(&sql).bind(country)).await
    }

    #[instrument(skip(self))]
    async fn list_users_by_subscription(
        &self,
        subscription_type: SubscriptionType,
    ) -> Result<Vec<UserModel>, AppError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(subscription_type) = $1 ORDER BY user_id"
        );
        self.fetch_users(sqlx::query(&sql).bind(subscription_type.to_string()))
            .await
    }

    #[instrument(skip(self, user))]
    async fn create_user(
        &self,
        user: &NewUser,
        signup_date: NaiveDate,
    ) -> Result<UserModel, AppError> {
        debug!(username = %user.username, "Creating user in database");

        let sql = format!(
            "INSERT INTO users (username, email, subscription_type, country, signup_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.subscription_type.map(|s| s.to_string()))
            .bind(&user.country)
            .bind(signup_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to create user in database");
                AppError::DatabaseError(e.to_string())
            })?;

        let created = Self::user_from_row(&row);
        debug!(user_id = created.user_id, "User created in database");
        Ok(created)
    }

    #[instrument(skip(self, user))]
    async fn update_user(
        &self,
        user_id: UserId,
        user: &NewUser,
    ) -> Result<Option<UserModel>, AppError> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, subscription_type = $4, country = $5, \
             signup_date = COALESCE($6, signup_date) WHERE user_id = $1 RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.subscription_type.map(|s| s.to_string()))
            .bind(&user.country)
            .bind(user.signup_date)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Failed to update user in database");
                AppError::DatabaseError(e.to_string())
            })?;

        if row.is_none() {
            warn!(user_id, "User not found for update");
        }
        Ok(row.as_ref().map(Self::user_from_row))
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, user_id, "Failed to delete user from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let deleted = result.rows_affected() > 0;
        if !deleted {
            warn!(user_id, "User not found for deletion");
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn get_play_dates(&self, user_id: UserId) -> Result<Vec<NaiveDate>, AppError> {
        let rows = sqlx::query(
            "SELECT DISTINCT DATE(played_at) AS play_date FROM listening_history \
             WHERE user_id = $1 ORDER BY play_date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, user_id, "Failed to fetch play dates from database");
            AppError::DatabaseError(e.to_string())
        })?;

        let dates: Vec<NaiveDate> = rows.iter().map(|row| row.get("play_date")).collect();
        debug!(user_id, play_days = dates.len(), "Play dates loaded from database");
        Ok(dates)
    }
}
