use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Subscription tier of a user account
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SubscriptionType {
    Free,
    Premium,
}

/// Request payload for creating or updating a user.
/// Every field is optional on the wire so validation can report
/// which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub subscription_type: Option<String>,
    pub country: Option<String>,
    pub signup_date: Option<NaiveDate>,
}

/// Query string for `GET /api/users/search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}
