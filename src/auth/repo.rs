use sqlx::PgPool;

use crate::auth::repo_types::User;
use crate::error::ApiError;

impl User {
    /// Find a user by normalized email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id (token subject).
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password. Uniqueness of email and
    /// username is enforced by the table constraints, so two concurrent
    /// registrations of the same email cannot both succeed; the loser
    /// surfaces as a conflict.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, ApiError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) => {
                if e.as_database_error()
                    .is_some_and(|db_err| db_err.is_unique_violation())
                {
                    return Err(ApiError::Conflict("Email already registered".into()));
                }
                Err(anyhow::Error::from(e).context("insert user").into())
            }
        }
    }
}
