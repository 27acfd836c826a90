// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stateless Auth Server - password login with HS256 bearer tokens
//!
//! Verifies username/password pairs against a configured user list and
//! issues signed, time-bounded tokens that later requests present instead
//! of credentials. Token validation needs no server-side state.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance/validation and request authentication
//! - `config` - Environment configuration and the signing secret
//! - `credentials` - Password hashing and credential verification

pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod state;
