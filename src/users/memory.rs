use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{ConflictField, StoreError, StoreResult, UserStore};
use crate::users::repo_types::{NewUser, User};

/// In-process credential store. Every write holds the map's write lock for
/// its whole check-and-modify, which gives the same atomicity as the
/// Postgres constraints.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn create(&self, user: NewUser) -> StoreResult<Uuid> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(ConflictField::Username));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(ConflictField::Email));
        }
        if user.language_preferences.is_empty() {
            return Err(StoreError::LastLanguage);
        }

        let mut languages: Vec<String> = Vec::with_capacity(user.language_preferences.len());
        for lang in user.language_preferences {
            if !languages.contains(&lang) {
                languages.push(lang);
            }
        }

        let record = User {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            date_of_birth: user.date_of_birth,
            nationality: user.nationality,
            phone_number: user.phone_number,
            gender: user.gender,
            language_preferences: languages,
            created_at: OffsetDateTime::now_utc(),
        };
        let user_id = record.user_id;
        users.insert(user_id, record);
        Ok(user_id)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<User> {
        let users = self.users.read().await;
        users.get(&user_id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update_email(&self, user_id: Uuid, email: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.user_id != user_id && u.email == email)
        {
            return Err(StoreError::Conflict(ConflictField::Email));
        }
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.email = email.to_string();
        Ok(())
    }

    async fn update_password(&self, user_id: Uuid, password_hash: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn add_language(&self, user_id: Uuid, language: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        if !user.language_preferences.iter().any(|l| l == language) {
            user.language_preferences.push(language.to_string());
        }
        Ok(())
    }

    async fn remove_language(&self, user_id: Uuid, language: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        let remaining = user
            .language_preferences
            .iter()
            .filter(|l| *l != language)
            .count();
        if remaining == 0 {
            return Err(StoreError::LastLanguage);
        }
        user.language_preferences.retain(|l| l != language);
        Ok(())
    }
}
