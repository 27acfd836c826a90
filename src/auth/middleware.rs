// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to the protected router subtree: every request must carry a valid
//! bearer token before it reaches a handler. The verified user is stored in
//! the request extensions, where the `Auth` extractor picks it up.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/hello", get(handler))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_bearer));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::authenticate_headers;
use crate::state::AppState;

/// Authentication middleware function.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate_headers(request.headers(), &state) {
        Ok(user) => {
            tracing::debug!(username = %user.username, "Bearer token accepted");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(error_code = e.error_code(), "Bearer token rejected");
            e.into_response()
        }
    }
}
