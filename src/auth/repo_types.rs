use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
///
/// Carries the password hash and the current refresh token, so it is never
/// serialized to a response directly; handlers copy the public fields into
/// the DTOs in [`crate::auth::dto`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub email_confirmed: bool,
    pub created_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
    pub updated_at: Option<OffsetDateTime>,
    /// Opaque refresh token currently attached to this user, if any.
    pub refresh_token: Option<String>,
    pub refresh_token_expires_at: Option<OffsetDateTime>,
    // Reserved for email-confirmation and password-reset flows; no code
    // issues or consumes these yet.
    pub email_confirmation_token: Option<String>,
    pub password_reset_token: Option<String>,
    pub password_reset_expires_at: Option<OffsetDateTime>,
}

/// Insert payload for a new user row.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}
