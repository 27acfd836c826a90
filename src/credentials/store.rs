// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! The user list is loaded once at startup (from `USERS_FILE`) and never
//! changes afterwards, so lookups need no locking.
//!
//! ## File Format
//!
//! ```json
//! [
//!   {
//!     "username": "user",
//!     "password": { "algorithm": "argon2id-v19", "hash": "$argon2id$v=19$..." },
//!     "roles": ["USER"]
//!   },
//!   { "username": "admin", "password": { ... }, "roles": "USER,ADMIN" }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use argon2::Params;
use serde::{Deserialize, Serialize};

use super::password::PasswordCredential;
use crate::auth::roles::{deserialize_roles, RoleSet};
use crate::config::ConfigError;

/// One configured user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: PasswordCredential,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: RoleSet,
}

/// Lookup collaborator used by the credential verifier.
pub trait UserStore: Send + Sync {
    fn find(&self, username: &str) -> Option<&UserRecord>;

    /// Argon2 parameters shared by every stored hash, `None` when empty.
    fn hash_params(&self) -> Option<&Params>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: HashMap<String, UserRecord>,
    params: Option<Params>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the store, rejecting blank or duplicate usernames, hashes that
    /// do not match their declared algorithm, and hashes whose Argon2 cost
    /// parameters differ from the rest.
    ///
    /// Uniform parameters keep a wrong password for a known user as slow as
    /// any password for an unknown one.
    pub fn from_records(records: Vec<UserRecord>) -> Result<Self, ConfigError> {
        let mut users = HashMap::with_capacity(records.len());
        let mut shared: Option<Params> = None;
        for record in records {
            if record.username.trim().is_empty() {
                return Err(ConfigError::UsersFormat("username must not be empty".to_string()));
            }
            let params = record.password.params().map_err(|e| {
                ConfigError::UsersFormat(format!("user {:?}: {e}", record.username))
            })?;
            match &shared {
                Some(expected) if *expected != params => {
                    return Err(ConfigError::UsersFormat(format!(
                        "user {:?}: Argon2 parameters differ from the other users",
                        record.username
                    )));
                }
                Some(_) => {}
                None => shared = Some(params),
            }
            if users.contains_key(&record.username) {
                return Err(ConfigError::DuplicateUser(record.username));
            }
            users.insert(record.username.clone(), record);
        }
        Ok(Self {
            users,
            params: shared,
        })
    }

    /// Load the store from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::UsersFile {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<UserRecord> =
            serde_json::from_str(&raw).map_err(|e| ConfigError::UsersFormat(e.to_string()))?;
        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserStore for InMemoryUserStore {
    fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    fn hash_params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
}
