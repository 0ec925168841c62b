use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::types::SubscriptionType;
use crate::streak::UserId;

/// Stored user record (`users` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub subscription_type: Option<SubscriptionType>,
    pub country: String,
    pub signup_date: NaiveDate,
}

/// Validated user fields ready to be written to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub subscription_type: Option<SubscriptionType>,
    pub country: String,
    pub signup_date: Option<NaiveDate>,
}

impl UserModel {
    /// Builds a stored record from validated fields and the resolved signup date
    pub fn from_new(user_id: UserId, user: &NewUser, signup_date: NaiveDate) -> Self {
        Self {
            user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            subscription_type: user.subscription_type,
            country: user.country.clone(),
            signup_date,
        }
    }

    /// Overwrites the editable fields, keeping the signup date when none is given
    pub fn apply(&mut self, user: &NewUser) {
        self.username = user.username.clone();
        self.email = user.email.clone();
        self.subscription_type = user.subscription_type;
        self.country = user.country.clone();
        if let Some(signup_date) = user.signup_date {
            self.signup_date = signup_date;
        }
    }
}

/// One row of the `listening_history` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEventModel {
    pub user_id: UserId,
    pub played_at: NaiveDateTime,
}

impl PlayEventModel {
    pub fn new(user_id: UserId, played_at: NaiveDateTime) -> Self {
        Self { user_id, played_at }
    }

    pub fn play_date(&self) -> NaiveDate {
        self.played_at.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(signup_date: Option<NaiveDate>) -> NewUser {
        NewUser {
            username: "mango-fan".to_string(),
            email: "fan@mango.fm".to_string(),
            subscription_type: Some(SubscriptionType::Free),
            country: "NO".to_string(),
            signup_date,
        }
    }

    #[test]
    fn apply_keeps_signup_date_when_absent() {
        let original = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let mut user = UserModel::from_new(4, &new_user(None), original);

        let mut update = new_user(None);
        update.username = "renamed".to_string();
        user.apply(&update);

        assert_eq!(user.user_id, 4);
        assert_eq!(user.username, "renamed");
        assert_eq!(user.signup_date, original);
    }

    #[test]
    fn apply_replaces_signup_date_when_given() {
        let mut user = UserModel::from_new(
            4,
            &new_user(None),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
        );
        let replacement = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        user.apply(&new_user(Some(replacement)));

        assert_eq!(user.signup_date, replacement);
    }

    #[test]
    fn play_event_date_drops_time_of_day() {
        let played_at = NaiveDate::from_ymd_opt(2024, 6, 10)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();

        let event = PlayEventModel::new(1, played_at);
        assert_eq!(event.play_date(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn user_model_serializes_with_camel_case_fields() {
        let user = UserModel::from_new(
            3,
            &new_user(None),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        );

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["subscriptionType"], "free");
        assert_eq!(json["signupDate"], "2024-02-29");
    }
}
