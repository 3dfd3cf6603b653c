use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AddLanguageRequest, ProfileResponse, UpdateEmailRequest, UpdatePasswordRequest},
    services,
};
use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    error::ApiResult,
    state::AppState,
};

// Every handler here takes `AuthUser`, so the whole router is protected.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile/email", put(update_email))
        .route("/profile/password", put(update_password))
        .route("/profile/languages", post(add_language))
        .route("/profile/languages/:language", delete(remove_language))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = services::load_profile(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_email(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    services::change_email(&state, user_id, &payload.email).await?;
    Ok(Json(MessageResponse::new("Email updated successfully")))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdatePasswordRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    services::change_password(&state, user_id, &payload.password).await?;
    Ok(Json(MessageResponse::new("Password updated successfully")))
}

#[instrument(skip(state, payload))]
pub async fn add_language(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<AddLanguageRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(payload) = payload?;
    services::add_language(&state, user_id, &payload.language).await?;
    Ok(Json(MessageResponse::new(
        "Language preference added successfully",
    )))
}

#[instrument(skip(state))]
pub async fn remove_language(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(language): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    services::remove_language(&state, user_id, &language).await?;
    Ok(Json(MessageResponse::new(
        "Language preference removed successfully",
    )))
}
