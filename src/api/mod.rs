// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{HeaderName, Request},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{require_bearer, AuthenticatedUser};
use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod hello;
pub mod orders;
pub mod users;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/api/public/hello", get(hello::public_hello))
        .route("/health/live", get(health::liveness));

    let protected_routes = Router::new()
        .route("/api/hello", get(hello::secured_hello))
        .route("/api/admin/hello", get(hello::admin_hello))
        .route("/api/me", get(users::get_current_user))
        .route("/orders", get(orders::list_orders).post(orders::create_order))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        hello::public_hello,
        hello::secured_hello,
        hello::admin_hello,
        orders::list_orders,
        orders::create_order,
        users::get_current_user,
        health::liveness
    ),
    components(
        schemas(
            auth::LoginRequest,
            auth::LoginResponse,
            users::UserMeResponse,
            health::HealthResponse,
            AuthenticatedUser
        )
    ),
    tags(
        (name = "Auth", description = "Password login and token issuance"),
        (name = "Hello", description = "Greetings at each access level"),
        (name = "Orders", description = "Role-gated order operations"),
        (name = "Users", description = "Current identity"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
