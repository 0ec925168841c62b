// Public API - what other modules can use
pub use handlers::{
    create_user, delete_user, get_listening_streak, get_user, list_users, list_users_by_country,
    list_users_by_subscription, search_users, update_user,
};
pub use service::UserService;

pub mod directory;
mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
mod validation;
