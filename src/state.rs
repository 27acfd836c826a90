// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::credentials::CredentialVerifier;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub verifier: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(tokens: TokenService, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            verifier,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::{Arc, OnceLock};

    use super::AppState;
    use crate::auth::{ManualClock, TokenService};
    use crate::config::{SigningSecret, TokenConfig};
    use crate::credentials::{
        hash_password, InMemoryUserStore, StoreCredentialVerifier, UserRecord,
    };

    pub const TEST_NOW: i64 = 1_700_000_000;
    pub const TEST_LIFETIME: u64 = 3600;
    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    type TestVerifier = StoreCredentialVerifier<InMemoryUserStore>;

    /// Users `user`/`user123` (USER) and `admin`/`admin123` (USER, ADMIN).
    ///
    /// Hashed once per test binary.
    fn verifier() -> Arc<TestVerifier> {
        static VERIFIER: OnceLock<Arc<TestVerifier>> = OnceLock::new();
        VERIFIER
            .get_or_init(|| {
                let records = vec![
                    UserRecord {
                        username: "user".to_string(),
                        password: hash_password("user123").unwrap(),
                        roles: ["USER".to_string()].into_iter().collect(),
                    },
                    UserRecord {
                        username: "admin".to_string(),
                        password: hash_password("admin123").unwrap(),
                        roles: ["USER".to_string(), "ADMIN".to_string()]
                            .into_iter()
                            .collect(),
                    },
                ];
                let store = InMemoryUserStore::from_records(records).unwrap();
                Arc::new(StoreCredentialVerifier::new(store).unwrap())
            })
            .clone()
    }

    pub fn test_state() -> (AppState, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(TEST_NOW));
        let config =
            TokenConfig::new(SigningSecret::parse(TEST_SECRET).unwrap(), TEST_LIFETIME).unwrap();
        let tokens = TokenService::with_clock(&config, clock.clone());
        (AppState::new(tokens, verifier()), clock)
    }
}
