// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless HS256 bearer tokens for the API.
//!
//! ## Auth Flow
//!
//! 1. Client posts `{username, password}` to `/auth/login`
//! 2. Credentials are checked by the credential verifier
//! 3. The token service signs `{sub, roles, iat, exp}` with the process secret
//! 4. Client sends `Authorization: Bearer <token>` on later requests
//! 5. Server verifies signature and expiry, then attaches:
//!    - `sub` → username
//!    - `roles` → role set used by the route gates
//!
//! ## Security
//!
//! - Verification is pinned to HS256; the token header cannot select another algorithm
//! - Expiry is exclusive: a token is dead at the instant `exp` is reached
//! - No session state is kept; tokens end only by expiry

pub mod claims;
pub mod clock;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod roles;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthError;
pub use extractor::{AdminOnly, Auth, Member};
pub use middleware::require_bearer;
pub use roles::RoleSet;
pub use token::{IssuedToken, TokenError, TokenService, TOKEN_TYPE};
