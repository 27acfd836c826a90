// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Greeting endpoints at the three access levels.

use crate::auth::{AdminOnly, Auth};

/// Greeting available without a token.
#[utoipa::path(
    get,
    path = "/api/public/hello",
    tag = "Hello",
    responses((status = 200, description = "Public greeting", body = String))
)]
pub async fn public_hello() -> &'static str {
    "Public Hello"
}

/// Greeting for any authenticated user.
#[utoipa::path(
    get,
    path = "/api/hello",
    tag = "Hello",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Secured greeting", body = String),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn secured_hello(Auth(_user): Auth) -> &'static str {
    "secured hello"
}

/// Greeting for administrators.
#[utoipa::path(
    get,
    path = "/api/admin/hello",
    tag = "Hello",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Admin greeting", body = String),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller is not an administrator"),
    )
)]
pub async fn admin_hello(AdminOnly(_user): AdminOnly) -> &'static str {
    "admin hello"
}
