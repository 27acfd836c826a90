// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Username/password verification.

use serde::Serialize;

use super::password::{hash_password_with, verify_password, PasswordCredential, PasswordError};
use super::store::UserStore;
use crate::auth::roles::RoleSet;

/// Placeholder hashed at construction and checked for unknown usernames.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalizer-not-a-real-password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("unknown user")]
    UnknownUser,
    #[error("bad credentials")]
    BadCredentials,
}

/// A verified identity. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub username: String,
    pub roles: RoleSet,
}

/// Confirms a plaintext password for a username.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, CredentialError>;
}

/// Verifier backed by a [`UserStore`].
///
/// Unknown usernames still pay for one full hash verification, at the
/// store's own Argon2 parameters, so that the two failure cases take the
/// same time.
pub struct StoreCredentialVerifier<S> {
    store: S,
    dummy: PasswordCredential,
}

impl<S: UserStore> StoreCredentialVerifier<S> {
    pub fn new(store: S) -> Result<Self, PasswordError> {
        let params = store.hash_params().cloned().unwrap_or_default();
        let dummy = hash_password_with(TIMING_DUMMY_PASSWORD, params)?;
        Ok(Self { store, dummy })
    }
}

impl<S: UserStore> CredentialVerifier for StoreCredentialVerifier<S> {
    fn verify(&self, username: &str, password: &str) -> Result<Identity, CredentialError> {
        let Some(record) = self.store.find(username) else {
            let _ = verify_password(password, &self.dummy);
            return Err(CredentialError::UnknownUser);
        };

        verify_password(password, &record.password).map_err(|e| {
            if e == PasswordError::InvalidHashFormat {
                tracing::error!(username = %username, "Stored password hash is unreadable");
            }
            CredentialError::BadCredentials
        })?;

        Ok(Identity {
            username: record.username.clone(),
            roles: record.roles.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::password::hash_password;
    use crate::credentials::store::{InMemoryUserStore, UserRecord};
    use argon2::Params;

    fn verifier() -> StoreCredentialVerifier<InMemoryUserStore> {
        let records = vec![
            UserRecord {
                username: "user".to_string(),
                password: hash_password("user123").unwrap(),
                roles: ["USER".to_string()].into_iter().collect(),
            },
            UserRecord {
                username: "admin".to_string(),
                password: hash_password("admin123").unwrap(),
                roles: ["USER".to_string(), "ADMIN".to_string()].into_iter().collect(),
            },
        ];
        StoreCredentialVerifier::new(InMemoryUserStore::from_records(records).unwrap()).unwrap()
    }

    #[test]
    fn correct_password_yields_identity_with_roles() {
        let verifier = verifier();
        let identity = verifier.verify("admin", "admin123").unwrap();
        assert_eq!(identity.username, "admin");
        assert!(identity.roles.contains("ADMIN"));
        assert!(identity.roles.contains("USER"));
    }

    #[test]
    fn wrong_password_is_bad_credentials() {
        let verifier = verifier();
        assert_eq!(
            verifier.verify("admin", "wrong-password"),
            Err(CredentialError::BadCredentials)
        );
    }

    #[test]
    fn unknown_user_is_reported_as_such() {
        let verifier = verifier();
        assert_eq!(
            verifier.verify("ghost", "anything"),
            Err(CredentialError::UnknownUser)
        );
    }

    #[test]
    fn username_lookup_is_exact() {
        let verifier = verifier();
        assert_eq!(
            verifier.verify("Admin", "admin123"),
            Err(CredentialError::UnknownUser)
        );
    }

    #[test]
    fn dummy_hash_uses_the_stored_parameters() {
        let params = Params::new(2048, 3, 1, None).unwrap();
        let record = UserRecord {
            username: "user".to_string(),
            password: hash_password_with("user123", params).unwrap(),
            roles: ["USER".to_string()].into_iter().collect(),
        };
        let stored = record.password.params().unwrap();
        let verifier =
            StoreCredentialVerifier::new(InMemoryUserStore::from_records(vec![record]).unwrap())
                .unwrap();

        assert_eq!(verifier.dummy.params().unwrap(), stored);
        assert_eq!(
            verifier.verify("ghost", "user123"),
            Err(CredentialError::UnknownUser)
        );
        assert!(verifier.verify("user", "user123").is_ok());
    }

    #[test]
    fn empty_store_falls_back_to_default_parameters() {
        let verifier = StoreCredentialVerifier::new(InMemoryUserStore::new()).unwrap();
        let params = verifier.dummy.params().unwrap();
        assert_eq!(params.m_cost(), Params::DEFAULT_M_COST);
        assert_eq!(params.t_cost(), Params::DEFAULT_T_COST);
        assert_eq!(params.p_cost(), Params::DEFAULT_P_COST);
    }

    #[test]
    fn dummy_password_does_not_authenticate_anyone() {
        let verifier = verifier();
        assert_eq!(
            verifier.verify("ghost", TIMING_DUMMY_PASSWORD),
            Err(CredentialError::UnknownUser)
        );
    }
}
