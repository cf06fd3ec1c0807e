use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, LoginResponse, MessageResponse, ProfileResponse, RefreshRequest,
            RefreshResponse, RegisterRequest, RegisterResponse, UserSummary,
        },
        extractors::AuthUser,
        jwt::{generate_refresh_token, JwtKeys},
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

// Field limits count characters, matching the column definitions.
fn over_char_limit(value: Option<&str>, max: usize) -> bool {
    value.map_or(false, |v| v.chars().count() > max)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();
    payload.username = payload.username.trim().to_string();

    if payload.username.is_empty() {
        return Err(AppError::Validation("Username is required.".into()));
    }
    if payload.username.chars().count() > 100 {
        return Err(AppError::Validation(
            "Username must be 100 characters or fewer.".into(),
        ));
    }
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::Validation("Invalid email address.".into()));
    }
    if payload.email.chars().count() > 255 {
        return Err(AppError::Validation(
            "Email must be 255 characters or fewer.".into(),
        ));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password is required.".into()));
    }
    if over_char_limit(payload.first_name.as_deref(), 100) {
        return Err(AppError::Validation(
            "First name must be 100 characters or fewer.".into(),
        ));
    }
    if over_char_limit(payload.last_name.as_deref(), 100) {
        return Err(AppError::Validation(
            "Last name must be 100 characters or fewer.".into(),
        ));
    }
    if over_char_limit(payload.phone_number.as_deref(), 20) {
        return Err(AppError::Validation(
            "Phone number must be 20 characters or fewer.".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::EmailTaken);
    }
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        warn!(username = %payload.username, "username already registered");
        return Err(AppError::UsernameTaken);
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| AppError::Internal(format!("argon2: {e}")))?;

    let user = User::create(
        &state.db,
        &NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone_number: payload.phone_number,
        },
    )
    .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse {
        message: "User registered successfully.".into(),
        user_id: user.id,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let identifier = payload.identifier.trim();

    let user = match User::find_by_identifier(&state.db, identifier).await? {
        Some(user) => user,
        None => {
            warn!(identifier = %identifier, "login with unknown identifier");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(AppError::AccountInactive);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = generate_refresh_token();
    User::record_login(&state.db, user.id, &refresh_token, keys.refresh_expiry()).await?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: UserSummary {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        },
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    let user = match User::find_by_refresh_token(&state.db, &payload.refresh_token).await? {
        Some(user) => user,
        None => {
            warn!("refresh with unknown token");
            return Err(AppError::RefreshTokenInvalid);
        }
    };

    // The stored token is single-use state, not a signed credential, so the
    // expiry lives next to it and is checked here.
    let now = OffsetDateTime::now_utc();
    match user.refresh_token_expires_at {
        Some(expires_at) if expires_at > now => {}
        _ => {
            warn!(user_id = %user.id, "refresh with expired token");
            return Err(AppError::RefreshTokenInvalid);
        }
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(&user)?;
    let refresh_token = generate_refresh_token();
    User::attach_refresh_token(&state.db, user.id, &refresh_token, keys.refresh_expiry()).await?;

    info!(user_id = %user.id, "token pair refreshed");
    Ok(Json(RefreshResponse {
        access_token,
        refresh_token,
    }))
}

#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    User::clear_refresh_token(&state.db, user_id).await?;

    info!(user_id = %user_id, "user logged out");
    Ok(Json(MessageResponse {
        message: "Logged out successfully.".into(),
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        phone_number: user.phone_number,
        role: user.role,
        created_at: user.created_at,
        last_login_at: user.last_login_at,
        email_confirmed: user.email_confirmed,
    }))
}
