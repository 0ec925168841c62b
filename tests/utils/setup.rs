use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use tower::ServiceExt;

use mango_music::{
    build_router,
    user::{
        models::{PlayEventModel, UserModel},
        types::SubscriptionType,
    },
    AppState, FixedClock, InMemoryUserRepository,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub router: Router,
    pub repository: Arc<InMemoryUserRepository>,
}

pub struct TestSetupBuilder {
    today: NaiveDate,
    users: Vec<UserModel>,
    plays: Vec<PlayEventModel>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            today: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            users: Vec::new(),
            plays: Vec::new(),
        }
    }

    pub fn today(mut self, today: &str) -> Self {
        self.today = NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap();
        self
    }

    pub fn with_user(mut self, user_id: i32, username: &str) -> Self {
        self.users.push(UserModel {
            user_id,
            username: username.to_string(),
            email: format!("{}@mango.fm", username),
            subscription_type: Some(SubscriptionType::Free),
            country: "NO".to_string(),
            signup_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        });
        self
    }

    /// Adds one play at noon on each given day
    pub fn with_plays_on(mut self, user_id: i32, days: &[&str]) -> Self {
        for day in days {
            let played_at =
                NaiveDateTime::parse_from_str(&format!("{} 12:00", day), "%Y-%m-%d %H:%M")
                    .unwrap();
            self.plays.push(PlayEventModel::new(user_id, played_at));
        }
        self
    }

    pub fn build(self) -> TestSetup {
        let repository = Arc::new(InMemoryUserRepository::with_data(self.users, self.plays));
        let app_state = AppState::new(repository.clone(), Arc::new(FixedClock::new(self.today)));

        TestSetup {
            router: build_router(app_state),
            repository,
        }
    }
}

// ============================================================================
// Request Helpers
// ============================================================================

impl TestSetup {
    /// Sends a request and returns the status with the raw body text
    pub async fn send_raw(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    /// Sends a request and returns the status with the parsed JSON body (Null when empty)
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.send_raw(request).await;
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&body).unwrap()
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> StatusCode {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await.0
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
