use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MeResponse, PublicUser, RefreshResponse, RegisterRequest,
        },
        email::normalize_email,
        jwt::{AccessUser, JwtKeys, RefreshUser},
        password::{hash_password, verify_password},
        repo_types::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

/// One combined 400 listing every absent or empty field, before any other
/// validation runs.
fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ApiError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "Missing or empty fields: {}",
            missing.join(", ")
        )))
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    require_fields(&[
        ("email", payload.email.as_deref()),
        ("password", payload.password.as_deref()),
    ])?;
    let email = normalize_email(payload.email.as_deref().unwrap_or_default())?;
    let password = payload.password.unwrap_or_default();

    if password.chars().count() < 6 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 6 characters long".into(),
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&password)?;
    // username is unified with the normalized email; the unique constraint on
    // either column stops a concurrent duplicate.
    let user = User::create(&state.db, &email, &email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, &user.email)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".into(),
            user: PublicUser::from(&user),
            access_token,
            refresh_token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    require_fields(&[
        ("email", payload.email.as_deref()),
        ("password", payload.password.as_deref()),
    ])?;
    let email = normalize_email(payload.email.as_deref().unwrap_or_default())?;
    let password = payload.password.unwrap_or_default();

    // Unknown email and wrong password answer identically, so responses do
    // not reveal which accounts exist.
    let user = match User::find_by_email(&state.db, &email).await? {
        Some(user) => user,
        None => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &user.password_hash) {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, &user.email)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        user: PublicUser::from(&user),
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state))]
pub async fn refresh(
    State(state): State<AppState>,
    RefreshUser(user_id): RefreshUser,
) -> Result<Json<RefreshResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id, &user.email)?;

    info!(user_id = user.id, "access token refreshed");
    Ok(Json(RefreshResponse { access_token }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AccessUser(user_id): AccessUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_fields_accepts_present_values() {
        assert!(require_fields(&[
            ("email", Some("a@b.co")),
            ("password", Some("secret")),
        ])
        .is_ok());
    }

    #[test]
    fn require_fields_lists_all_missing_names() {
        let err = require_fields(&[("email", None), ("password", None)]).unwrap_err();
        assert_eq!(err.to_string(), "Missing or empty fields: email, password");
    }

    #[test]
    fn require_fields_treats_empty_as_missing() {
        let err = require_fields(&[("email", Some("")), ("password", Some("secret"))]).unwrap_err();
        assert_eq!(err.to_string(), "Missing or empty fields: email");
    }
}
