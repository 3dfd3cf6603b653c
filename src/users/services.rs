use std::future::Future;

use tracing::info;
use uuid::Uuid;

use crate::{
    auth::validation::{validate_email, validate_language, validate_password},
    error::{ApiError, ApiResult},
    state::AppState,
    users::repo::{StoreError, StoreResult},
    users::repo_types::User,
};

/// Runs a store call under the configured timeout. The store itself never
/// retries; a timeout is reported as a transient failure.
pub(crate) async fn bounded<T>(
    state: &AppState,
    call: impl Future<Output = StoreResult<T>>,
) -> StoreResult<T> {
    tokio::time::timeout(state.store_timeout(), call)
        .await
        .map_err(|_| StoreError::Timeout)?
}

pub async fn load_profile(state: &AppState, user_id: Uuid) -> ApiResult<User> {
    Ok(bounded(state, state.store.find_by_id(user_id)).await?)
}

pub async fn change_email(state: &AppState, user_id: Uuid, email: &str) -> ApiResult<()> {
    let email = email.trim();
    validate_email(email)?;
    bounded(state, state.store.update_email(user_id, email)).await?;
    info!(%user_id, "email updated");
    Ok(())
}

pub async fn change_password(state: &AppState, user_id: Uuid, password: &str) -> ApiResult<()> {
    validate_password(password)?;
    let hash = state.hasher.hash(password)?;
    bounded(state, state.store.update_password(user_id, &hash)).await?;
    info!(%user_id, "password updated");
    Ok(())
}

pub async fn add_language(state: &AppState, user_id: Uuid, language: &str) -> ApiResult<()> {
    let language = language.trim();
    validate_language(language)?;
    bounded(state, state.store.add_language(user_id, language)).await?;
    info!(%user_id, %language, "language preference added");
    Ok(())
}

pub async fn remove_language(state: &AppState, user_id: Uuid, language: &str) -> ApiResult<()> {
    let language = language.trim();
    validate_language(language)?;
    match bounded(state, state.store.remove_language(user_id, language)).await {
        Ok(()) => {
            info!(%user_id, %language, "language preference removed");
            Ok(())
        }
        Err(StoreError::LastLanguage) => Err(ApiError::Validation(
            "Cannot remove the last language preference".into(),
        )),
        Err(e) => Err(e.into()),
    }
}
