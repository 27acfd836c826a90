// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order endpoints.
//!
//! Reading requires `USER` or `ADMIN`; creating requires `ADMIN`.

use tracing::info;

use crate::auth::{AdminOnly, Member};

#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Order listing", body = String),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller may not read orders"),
    )
)]
pub async fn list_orders(Member(_user): Member) -> &'static str {
    "Orders"
}

#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Order created", body = String),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Caller may not create orders"),
    )
)]
pub async fn create_order(AdminOnly(user): AdminOnly) -> &'static str {
    info!(username = %user.username, "Order created");
    "Order created"
}
