use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::repo_types::User;

/// Request body for registration. Fields are optional so presence can be
/// checked explicitly and reported per field.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response returned after register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response returned after a token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Response wrapper for the current-user endpoint.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_user(created_at: Option<OffsetDateTime>) -> User {
        User {
            id: 1,
            username: "alice@example.com".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
            created_at,
        }
    }

    #[test]
    fn public_user_never_exposes_password_hash() {
        let user = sample_user(Some(datetime!(2024-03-01 12:00:00 UTC)));
        let json = serde_json::to_value(PublicUser::from(&user)).expect("serialize");
        assert_eq!(json["id"], 1);
        assert_eq!(json["username"], "alice@example.com");
        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["created_at"], "2024-03-01T12:00:00Z");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn missing_created_at_serializes_as_null() {
        let user = sample_user(None);
        let json = serde_json::to_value(PublicUser::from(&user)).expect("serialize");
        assert!(json["created_at"].is_null());
    }
}
