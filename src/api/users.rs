// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::{Auth, AuthenticatedUser};

/// Response for GET /api/me
#[derive(Debug, Serialize, ToSchema)]
pub struct UserMeResponse {
    /// Username (token subject)
    pub username: String,
    /// Roles carried by the token
    pub roles: Vec<String>,
    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

impl From<AuthenticatedUser> for UserMeResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            username: user.username,
            roles: user.roles.into_iter().collect(),
            expires_at: user.expires_at,
        }
    }
}

/// Get the current authenticated user's information.
///
/// This endpoint returns the identity and roles of the bearer token.
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserMeResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_current_user(Auth(user): Auth) -> Json<UserMeResponse> {
    Json(user.into())
}
