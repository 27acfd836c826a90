// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Role names used by the route gates.
//!
//! Roles are plain strings carried in the token's `roles` claim. They are
//! kept as an ordered set so that the claim serializes deterministically.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};

/// Ordered set of role names.
pub type RoleSet = BTreeSet<String>;

/// Regular authenticated user.
pub const USER: &str = "USER";

/// Administrator.
pub const ADMIN: &str = "ADMIN";

/// Split a comma-separated role list (`"USER, ADMIN"`), dropping blanks.
pub fn parse_role_list(list: &str) -> RoleSet {
    list.split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accept roles either as a JSON array or as a comma-separated string.
pub fn deserialize_roles<'de, D>(deserializer: D) -> Result<RoleSet, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRoles {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match RawRoles::deserialize(deserializer)? {
        RawRoles::List(roles) => roles
            .iter()
            .map(|role| role.trim())
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect(),
        RawRoles::Joined(list) => parse_role_list(&list),
    })
}
