use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// User record in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt digest, not exposed in JSON
    pub date_of_birth: Date,
    pub nationality: String,
    pub phone_number: String,
    pub gender: String,
    pub language_preferences: Vec<String>,
    pub created_at: OffsetDateTime,
}

/// Fields for a user that does not exist yet. The id is generated by the
/// caller and the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub date_of_birth: Date,
    pub nationality: String,
    pub phone_number: String,
    pub gender: String,
    pub language_preferences: Vec<String>,
}
