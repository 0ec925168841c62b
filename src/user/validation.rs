use super::{models::NewUser, types::SubscriptionType, types::UserRequest};
use crate::shared::AppError;

fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

/// Parses a subscription type, accepting any letter case
pub fn parse_subscription_type(value: &str) -> Result<SubscriptionType, AppError> {
    value.parse().map_err(|_| {
        AppError::Validation("Subscription type must be 'free' or 'premium'".to_string())
    })
}

/// Checks a user request and converts it into storable fields.
/// Rules run in a fixed order and the first failure is returned.
pub fn validate_user(request: UserRequest) -> Result<NewUser, AppError> {
    let username = required(request.username, "Username is required")?;
    let email = required(request.email, "Email is required")?;
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    let subscription_type = request
        .subscription_type
        .as_deref()
        .map(parse_subscription_type)
        .transpose()?;

    let country = required(request.country, "Country is required")?;

    Ok(NewUser {
        username,
        email,
        subscription_type,
        country,
        signup_date: request.signup_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_request() -> UserRequest {
        UserRequest {
            username: Some("mango-fan".to_string()),
            email: Some("fan@mango.fm".to_string()),
            subscription_type: Some("Premium".to_string()),
            country: Some("NO".to_string()),
            signup_date: None,
        }
    }

    fn validation_message(result: Result<NewUser, AppError>) -> String {
        match result {
            Err(AppError::Validation(message)) => message,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn accepts_valid_request() {
        let user = validate_user(valid_request()).unwrap();

        assert_eq!(user.username, "mango-fan");
        assert_eq!(user.subscription_type, Some(SubscriptionType::Premium));
        assert_eq!(user.signup_date, None);
    }

    #[test]
    fn subscription_type_is_optional() {
        let mut request = valid_request();
        request.subscription_type = None;

        let user = validate_user(request).unwrap();
        assert_eq!(user.subscription_type, None);
    }

    #[rstest]
    #[case(|r: &mut UserRequest| r.username = None, "Username is required")]
    #[case(|r: &mut UserRequest| r.username = Some("   ".into()), "Username is required")]
    #[case(|r: &mut UserRequest| r.email = None, "Email is required")]
    #[case(|r: &mut UserRequest| r.email = Some("".into()), "Email is required")]
    #[case(|r: &mut UserRequest| r.email = Some("fan.mango.fm".into()), "Invalid email format")]
    #[case(|r: &mut UserRequest| r.subscription_type = Some("family".into()), "Subscription type must be 'free' or 'premium'")]
    #[case(|r: &mut UserRequest| r.country = None, "Country is required")]
    #[case(|r: &mut UserRequest| r.country = Some("\t".into()), "Country is required")]
    fn rejects_invalid_request(#[case] mutate: fn(&mut UserRequest), #[case] expected: &str) {
        let mut request = valid_request();
        mutate(&mut request);

        assert_eq!(validation_message(validate_user(request)), expected);
    }

    #[test]
    fn reports_first_failing_rule() {
        let request = UserRequest {
            username: None,
            email: Some("no-at-sign".to_string()),
            ..UserRequest::default()
        };

        assert_eq!(validation_message(validate_user(request)), "Username is required");
    }
}
