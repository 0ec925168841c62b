use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{shared::AppState, user};

/// Builds the HTTP router with every user and streak route
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route("/api/users/search", get(user::search_users))
        .route(
            "/api/users/country/:country",
            get(user::list_users_by_country),
        )
        .route(
            "/api/users/subscription/:subscription_type",
            get(user::list_users_by_subscription),
        )
        .route(
            "/api/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/api/users/:id/streak", get(user::get_listening_streak))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
