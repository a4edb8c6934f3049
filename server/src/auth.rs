use crate::app::AppState;
use crate::error::ApiError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, State};
use axum::http::{HeaderMap, StatusCode};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use showcase_core::Session;
use std::time::SystemTime;

/// Extractor that admits only requests bearing a valid operator token in
/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;

        state
            .core()
            .issuer()
            .session(token, SystemTime::now())
            .map(Self)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Token from `Authorization: Bearer <token>`. The scheme is matched
/// case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    token: String,
    admin: AdminView,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    username: String,
    timestamp: u64,
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::MissingFields);
    }

    let issued = state
        .core()
        .issuer()
        .issue(&request.username, &request.password, SystemTime::now())?;

    Ok(Json(LoginResponse {
        token: issued.token,
        admin: AdminView {
            username: issued.session.identity,
            timestamp: issued.session.issued_at_ms,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    valid: bool,
}

/// Always answers with `{ valid }`; unreadable bodies count as invalid.
pub async fn validate(
    State(state): State<AppState>,
    body: Result<Json<ValidateRequest>, JsonRejection>,
) -> (StatusCode, Json<ValidateResponse>) {
    let valid = body
        .ok()
        .and_then(|Json(request)| request.token)
        .is_some_and(|token| state.core().issuer().validate(&token, SystemTime::now()));

    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(ValidateResponse { valid }))
}
