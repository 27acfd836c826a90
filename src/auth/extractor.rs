// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require a valid bearer token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::roles::{ADMIN, USER};
use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Pull the raw token out of an `Authorization: Bearer <token>` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::InvalidAuthHeader)?;

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Verify the request's bearer token against the token service.
pub(crate) fn authenticate_headers(
    headers: &HeaderMap,
    state: &AppState,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = state.tokens.authenticate(token)?;
    Ok(AuthenticatedUser::from(claims))
}

/// Extractor for authenticated users.
///
/// Reuses the user placed in the request extensions by the auth middleware
/// when present; otherwise verifies the `Authorization` header itself.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authenticate_headers(&parts.headers, state)?;
        Ok(Auth(user))
    }
}

/// Extractor that requires the `ADMIN` role.
pub struct AdminOnly(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AdminOnly {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(AdminOnly(user))
    }
}

/// Extractor that requires the `USER` or `ADMIN` role.
pub struct Member(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Member {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Auth(user) = Auth::from_request_parts(parts, state).await?;

        if !user.has_any_role(&[USER, ADMIN]) {
            return Err(AuthError::InsufficientPermissions);
        }

        Ok(Member(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::RoleSet;
    use crate::state::test_support::{test_state, TEST_NOW};
    use axum::http::Request;

    fn parts_with(header: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn user_with(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            username: "someone".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            expires_at: TEST_NOW + 60,
        }
    }

    #[tokio::test]
    async fn auth_extractor_requires_auth_header() {
        let (state, _) = test_state();
        let mut parts = parts_with(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let (state, _) = test_state();
        for header in ["Basic dXNlcjp1c2VyMTIz", "Bearer ", "bearer abc"] {
            let mut parts = parts_with(Some(header.to_string()));
            let result = Auth::from_request_parts(&mut parts, &state).await;
            assert!(
                matches!(result, Err(AuthError::InvalidAuthHeader)),
                "header {header:?}"
            );
        }
    }

    #[tokio::test]
    async fn auth_extractor_succeeds_with_issued_token() {
        let (state, _) = test_state();
        let roles: RoleSet = [USER.to_string()].into_iter().collect();
        let issued = state.tokens.issue("user", &roles).unwrap();
        let mut parts = parts_with(Some(format!("Bearer {}", issued.token)));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.username, "user");
        assert_eq!(user.roles, roles);
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (state, clock) = test_state();
        let issued = state.tokens.issue("user", &RoleSet::new()).unwrap();
        clock.advance(state.tokens.lifetime_secs() as i64);
        let mut parts = parts_with(Some(format!("Bearer {}", issued.token)));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn auth_extractor_prefers_extensions() {
        let (state, _) = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(&[ADMIN]));

        let Auth(user) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(user.username, "someone");
    }

    #[tokio::test]
    async fn admin_only_rejects_non_admin() {
        let (state, _) = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(&[USER]));

        let result = AdminOnly::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn member_rejects_user_without_roles() {
        let (state, _) = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(&[]));

        let result = Member::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
    }

    #[tokio::test]
    async fn member_accepts_admin() {
        let (state, _) = test_state();
        let mut parts = parts_with(None);
        parts.extensions.insert(user_with(&[ADMIN]));

        assert!(Member::from_request_parts(&mut parts, &state).await.is_ok());
    }
}
