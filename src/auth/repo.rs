use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::repo_types::{NewUser, User};

/// Column list shared by the queries below.
const COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
                       phone_number, role, is_active, email_confirmed, created_at, \
                       last_login_at, updated_at, refresh_token, refresh_token_expires_at, \
                       email_confirmation_token, password_reset_token, password_reset_expires_at";

impl User {
    /// Insert a new user. Role, flags and `created_at` come from the column
    /// defaults; the unique indexes on email and username are the final word
    /// on duplicates.
    pub async fn create(db: &PgPool, input: &NewUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, phone_number)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone_number)
            .fetch_one(db)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(db)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(db)
            .await
    }

    /// Find a user by login identifier, which may be an email or a username.
    ///
    /// Emails are stored lowercase so the email comparison lowercases the
    /// identifier; usernames stay case-sensitive. Uniqueness of both columns
    /// means at most one row can match.
    pub async fn find_by_identifier(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = LOWER($1) OR username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(db)
            .await
    }

    /// Exact-match lookup by the stored refresh-token value.
    pub async fn find_by_refresh_token(
        db: &PgPool,
        token: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE refresh_token = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(token)
            .fetch_optional(db)
            .await
    }

    /// Record a successful login: rotate the refresh token and stamp
    /// `last_login_at`, in one statement so no partial session state exists.
    pub async fn record_login(
        db: &PgPool,
        id: i64,
        refresh_token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET refresh_token = $2, refresh_token_expires_at = $3, last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Overwrite the stored refresh token and its expiry. The previous token
    /// stops matching lookups the moment this commits; the overwrite is the
    /// whole rotation mechanism.
    pub async fn attach_refresh_token(
        db: &PgPool,
        id: i64,
        refresh_token: &str,
        expires_at: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET refresh_token = $2, refresh_token_expires_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(refresh_token)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Drop the stored refresh token, ending the session. A user with no
    /// session (or no row at all) is a no-op, which makes logout idempotent.
    pub async fn clear_refresh_token(db: &PgPool, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users
             SET refresh_token = NULL, refresh_token_expires_at = NULL
             WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }
}
