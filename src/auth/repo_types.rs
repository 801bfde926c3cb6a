use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database. Serialization to clients goes through
/// `dto::PublicUser`, which never exposes the password hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: Option<OffsetDateTime>,
}
