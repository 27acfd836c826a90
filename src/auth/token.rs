// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 access token issuance and validation.
//!
//! Tokens are self-contained: validation needs only the token, the process
//! signing secret and the current time. Nothing is stored server-side, so
//! any number of request workers can share one [`TokenService`] without
//! synchronization.
//!
//! The algorithm is pinned to HS256. The HMAC over `header.payload` is
//! checked before either segment is decoded, so a forged or altered header
//! (including `alg: none`) is an invalid signature, never a parse error.

use std::sync::Arc;

use jsonwebtoken::{
    crypto, decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};

use super::claims::TokenClaims;
use super::clock::{Clock, SystemClock};
use super::roles::RoleSet;
use crate::config::TokenConfig;

/// Token type reported to clients alongside the token.
pub const TOKEN_TYPE: &str = "Bearer";

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Token validation and issuance failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token subject does not match the expected identity")]
    IdentityMismatch,

    #[error("cannot issue a token for an empty username")]
    EmptySubject,

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            // A header naming another algorithm is a forgery attempt, not a parse error.
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// A freshly minted token plus what the client needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in_secs: u64,
}

/// Mints and verifies stateless bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime_secs: u64,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Create a service reading the system clock.
    pub fn new(config: &TokenConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a service with an explicit time source.
    pub fn with_clock(config: &TokenConfig, clock: Arc<dyn Clock>) -> Self {
        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against `clock` so the boundary is exact and testable.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["sub", "exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            lifetime_secs: config.lifetime_secs,
            clock,
        }
    }

    /// Configured token lifetime in seconds.
    pub fn lifetime_secs(&self) -> u64 {
        self.lifetime_secs
    }

    /// Issue a signed token for a verified identity.
    pub fn issue(&self, username: &str, roles: &RoleSet) -> Result<IssuedToken, TokenError> {
        if username.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let now = self.clock.now();
        let lifetime = i64::try_from(self.lifetime_secs).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: username.to_string(),
            roles: roles.clone(),
            iat: now,
            exp: now.saturating_add(lifetime),
        };

        let token = encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE,
            expires_in_secs: self.lifetime_secs,
        })
    }

    /// Check that `token` is genuine, unexpired and belongs to `expected_username`.
    pub fn validate(&self, token: &str, expected_username: &str) -> Result<(), TokenError> {
        let claims = self.authenticate(token)?;
        if claims.sub != expected_username {
            return Err(TokenError::IdentityMismatch);
        }
        Ok(())
    }

    /// Return the subject of a genuine token.
    ///
    /// Expiry is not checked here; use [`TokenService::authenticate`] or
    /// [`TokenService::validate`] to admit a request.
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        Ok(self.verify_signature(token)?.sub)
    }

    /// Verify signature, structure and expiry, returning the claims.
    pub fn authenticate(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let claims = self.verify_signature(token)?;
        if claims.exp <= self.clock.now() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }

    fn verify_signature(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let Some((message, signature)) = token.rsplit_once('.') else {
            return Err(TokenError::Malformed);
        };
        if message.matches('.').count() != 1 {
            return Err(TokenError::Malformed);
        }

        // An undecodable signature segment cannot match either.
        let genuine = crypto::verify(signature, message.as_bytes(), &self.decoding_key, ALGORITHM)
            .unwrap_or(false);
        if !genuine {
            return Err(TokenError::InvalidSignature);
        }

        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
