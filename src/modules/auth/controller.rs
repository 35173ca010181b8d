use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::modules::auth::{
    interface::StoreError,
    model::User,
    schema::{
        LoginRequest, LoginResponse, MessageResponse, RefreshTokenResponse, RegisterRequest,
        UserResponse,
    },
    session::{SessionError, LOGOUT_REASON},
};
use crate::services::{client_info::ClientInfo, security::bearer_token, validation::ValidatedJson};
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let result = register_user(&state, req).await;
    state.metrics.record_auth_event("register", result.is_ok());
    result?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User created successfully",
        }),
    ))
}

async fn register_user(state: &AppState, req: RegisterRequest) -> Result<(), ApiError> {
    let existing = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| ApiError::internal("Error creating user", e))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = state
        .hasher
        .hash(&req.password)
        .map_err(|e| ApiError::internal("Error hashing password", e))?;

    let now = state.clock.now();
    let date_of_birth = req.parsed_date_of_birth();
    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
        display_name: req.display_name,
        avatar_url: req.avatar_url,
        bio: req.bio,
        phone: req.phone,
        date_of_birth,
        gender: req.gender,
        country: req.country,
        timezone: req.timezone,
        preferred_language: req.preferred_language,
        created_at: now,
        updated_at: now,
    };

    match state.users.create(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "user registered");
            Ok(())
        }
        Err(StoreError::Duplicate(_)) => Err(ApiError::Conflict("Email already registered".into())),
        Err(e) => Err(ApiError::internal("Error creating user", e)),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let result = login_user(&state, &client, req).await;
    state.metrics.record_auth_event("login", result.is_ok());
    result.map(Json)
}

async fn login_user(
    state: &AppState,
    client: &ClientInfo,
    req: LoginRequest,
) -> Result<LoginResponse, ApiError> {
    // Unknown email and wrong password must be indistinguishable, in the
    // response and in the time it takes to produce it.
    let user = state
        .users
        .find_by_email(&req.email)
        .await
        .map_err(|e| ApiError::internal("Error logging in", e))?;
    let Some(user) = user else {
        state.hasher.verify_missing(&req.password);
        tracing::warn!("login rejected: unknown email");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    };

    let is_valid = state
        .hasher
        .verify(&user.password_hash, &req.password)
        .map_err(|e| ApiError::internal("Error logging in", e))?;
    if !is_valid {
        tracing::warn!(user_id = %user.id, "login rejected: wrong password");
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let access_token = state
        .tokens
        .issue_access_token(&user.id, &user.email)
        .map_err(|e| ApiError::internal("Error generating tokens", e))?;
    let refresh_token = state
        .tokens
        .issue_refresh_token()
        .map_err(|e| ApiError::internal("Error generating tokens", e))?;

    let session = state
        .sessions
        .create(&user.id, client, &refresh_token, &access_token)
        .await
        .map_err(|e| ApiError::internal("Error creating session", e))?;

    tracing::info!(
        user_id = %user.id,
        session_id = %session.id,
        device_type = %client.device_type,
        browser = %client.browser,
        "user logged in"
    );

    Ok(LoginResponse {
        access_token,
        refresh_token,
        user: UserResponse {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        },
    })
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = logout_session(&state, &headers).await;
    state.metrics.record_auth_event("logout", result.is_ok());
    result?;

    Ok(Json(MessageResponse {
        message: "Logged out successfully",
    }))
}

async fn logout_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::unauthorized("Missing or malformed bearer token"))?;

    let claims = state.tokens.validate_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "logout rejected");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let session = state
        .sessions
        .find_for_access_token(&claims.sub, token)
        .await
        .map_err(|e| match e {
            SessionError::NotFound => ApiError::unauthorized("Session not found"),
            other => ApiError::internal("Error getting session", other),
        })?;

    state
        .sessions
        .revoke(&session.id, LOGOUT_REASON)
        .await
        .map_err(|e| ApiError::internal("Error revoking session", e))?;

    tracing::info!(user_id = %claims.sub, session_id = %session.id, "user logged out");
    Ok(())
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    let result = refresh_access_token(&state, &headers).await;
    state.metrics.record_auth_event("refresh", result.is_ok());
    result.map(Json)
}

async fn refresh_access_token(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<RefreshTokenResponse, ApiError> {
    let refresh_token = bearer_token(headers)
        .ok_or_else(|| ApiError::unauthorized("Missing or malformed bearer token"))?;

    let session = state
        .sessions
        .find_by_refresh_token(refresh_token)
        .await
        .map_err(|e| match e {
            SessionError::NotFound => ApiError::unauthorized("Invalid refresh token"),
            other => ApiError::internal("Error getting session", other),
        })?;

    let user = state
        .users
        .find_by_id(&session.user_id)
        .await
        .map_err(|e| ApiError::internal("Error getting user", e))?
        .ok_or_else(|| {
            ApiError::internal("Error getting user", format!("session {} has no user", session.id))
        })?;

    let access_token = state
        .tokens
        .issue_access_token(&user.id, &user.email)
        .map_err(|e| ApiError::internal("Error generating access token", e))?;

    state
        .sessions
        .touch(&session.id, &access_token)
        .await
        .map_err(|e| ApiError::internal("Error updating session", e))?;

    tracing::debug!(user_id = %user.id, session_id = %session.id, "access token refreshed");

    Ok(RefreshTokenResponse { access_token })
}
