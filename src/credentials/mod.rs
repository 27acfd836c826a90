// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Verification
//!
//! Confirms a username/password pair against the configured user list and
//! yields the identity's roles. Passwords are stored as Argon2id hashes
//! tagged with an explicit algorithm identifier.

pub mod password;
pub mod store;
pub mod verifier;

pub use password::{
    hash_password, hash_password_with, verify_password, HashAlgorithm, PasswordCredential,
    PasswordError,
};
pub use store::{InMemoryUserStore, UserRecord, UserStore};
pub use verifier::{CredentialError, CredentialVerifier, Identity, StoreCredentialVerifier};
