use serde::{Deserialize, Serialize};

use super::repo_types::User;

/// Public part of the user returned by `GET /profile`.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub language_preferences: Vec<String>,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            email: u.email,
            language_preferences: u.language_preferences,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct AddLanguageRequest {
    pub language: String,
}
