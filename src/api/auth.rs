// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::{AuthError, IssuedToken};
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /auth/login
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed access token
    pub token: String,
    /// Always "Bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: issued.token_type.to_string(),
            expires_in: issued.expires_in_secs,
        }
    }
}

/// Login failure: either an unreadable request or rejected credentials.
pub enum LoginError {
    Request(ApiError),
    Auth(AuthError),
}

impl From<JsonRejection> for LoginError {
    fn from(rejection: JsonRejection) -> Self {
        LoginError::Request(rejection.into())
    }
}

impl From<AuthError> for LoginError {
    fn from(e: AuthError) -> Self {
        LoginError::Auth(e)
    }
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        match self {
            LoginError::Request(e) => e.into_response(),
            LoginError::Auth(e) => e.into_response(),
        }
    }
}

/// Exchange a username and password for a bearer token.
///
/// Unknown users and wrong passwords produce the same 401 response.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Request body is not a valid login request"),
        (status = 401, description = "Invalid username or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, LoginError> {
    let Json(request) = payload?;
    let username = request.username.clone();

    // Argon2 is CPU-bound; keep it off the async workers.
    let verifier = state.verifier.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        verifier.verify(&request.username, &request.password)
    })
    .await
    .map_err(|e| AuthError::InternalError(e.to_string()))?;

    let identity = outcome.map_err(|e| {
        warn!(username = %username, reason = %e, "Login rejected");
        AuthError::from(e)
    })?;

    let issued = state
        .tokens
        .issue(&identity.username, &identity.roles)
        .map_err(AuthError::from)?;

    info!(
        username = %identity.username,
        roles = identity.roles.len(),
        expires_in = issued.expires_in_secs,
        "Access token issued"
    );

    Ok(Json(issued.into()))
}
