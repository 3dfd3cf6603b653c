use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, SignupRequest},
        validation::{
            parse_date_of_birth, validate_email, validate_languages, validate_password,
            validate_phone, validate_required, validate_username,
        },
    },
    error::{ApiError, ApiResult},
    state::AppState,
    users::{
        repo::StoreError,
        repo_types::NewUser,
        services::bounded,
    },
};

pub async fn username_available(state: &AppState, username: &str) -> ApiResult<bool> {
    let taken = bounded(state, state.store.username_exists(username.trim())).await?;
    Ok(!taken)
}

/// Validates and stores a new account. Uniqueness is decided by the store's
/// insert, not by a prior lookup.
pub async fn register(state: &AppState, payload: SignupRequest) -> ApiResult<Uuid> {
    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_string();

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&payload.password)?;
    validate_phone(payload.phone_number.trim())?;
    validate_required("Nationality", &payload.nationality)?;
    validate_required("Gender", &payload.gender)?;
    validate_languages(&payload.language_preferences)?;
    let date_of_birth = parse_date_of_birth(&payload.date_of_birth)?;

    let mut languages: Vec<String> = Vec::with_capacity(payload.language_preferences.len());
    for lang in payload.language_preferences {
        let lang = lang.trim().to_string();
        if !languages.contains(&lang) {
            languages.push(lang);
        }
    }

    let password_hash = state.hasher.hash(&payload.password)?;
    let user = NewUser {
        user_id: Uuid::new_v4(),
        username,
        email,
        password_hash,
        date_of_birth,
        nationality: payload.nationality.trim().to_string(),
        phone_number: payload.phone_number.trim().to_string(),
        gender: payload.gender.trim().to_string(),
        language_preferences: languages,
    };

    match bounded(state, state.store.create(user)).await {
        Ok(user_id) => {
            info!(%user_id, "user registered");
            Ok(user_id)
        }
        Err(StoreError::Conflict(field)) => {
            warn!(?field, "signup conflict");
            Err(ApiError::Validation("Username or email already exists".into()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks credentials and issues a token. Unknown user and wrong password
/// are indistinguishable to the caller.
pub async fn login(state: &AppState, payload: LoginRequest) -> ApiResult<String> {
    let username = payload.username.trim();
    let user = match bounded(state, state.store.find_by_username(username)).await {
        Ok(u) => u,
        Err(StoreError::NotFound) => {
            // Same bcrypt work as a wrong password, so timing does not
            // reveal which usernames exist.
            state.hasher.verify_dummy(&payload.password)?;
            warn!(%username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => return Err(e.into()),
    };

    if !state.hasher.verify(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.user_id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.keys.sign(user.user_id)?;
    info!(user_id = %user.user_id, "user logged in");
    Ok(token)
}
