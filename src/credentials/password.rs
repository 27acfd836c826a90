// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! Every stored hash carries an explicit [`HashAlgorithm`] next to the PHC
//! string. A future scheme gets a new variant, so migrating users is a data
//! change rather than a guess based on the hash prefix.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize};

/// Argon2 version 0x13, the "v=19" of the PHC string.
const ARGON2_VERSION_19: u32 = 0x13;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    HashingFailed,
    #[error("password verification failed")]
    VerificationFailed,
    #[error("stored hash does not match its declared algorithm")]
    InvalidHashFormat,
}

/// Versioned password hashing scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// Argon2id, version 19, parameters taken from the PHC string.
    #[serde(rename = "argon2id-v19")]
    Argon2idV19,
}

/// A stored password hash and the scheme that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCredential {
    pub algorithm: HashAlgorithm,
    pub hash: String,
}

impl PasswordCredential {
    /// Check that `hash` really is what `algorithm` claims it is.
    pub fn check_format(&self) -> Result<(), PasswordError> {
        self.params().map(|_| ())
    }

    /// Cost parameters encoded in the hash.
    pub fn params(&self) -> Result<Params, PasswordError> {
        let parsed = self.parsed()?;
        Params::try_from(&parsed).map_err(|_| PasswordError::InvalidHashFormat)
    }

    fn parsed(&self) -> Result<PasswordHash<'_>, PasswordError> {
        let parsed = PasswordHash::new(&self.hash).map_err(|_| PasswordError::InvalidHashFormat)?;
        match self.algorithm {
            HashAlgorithm::Argon2idV19 => {
                if parsed.algorithm != Algorithm::Argon2id.ident()
                    || parsed.version != Some(ARGON2_VERSION_19)
                {
                    return Err(PasswordError::InvalidHashFormat);
                }
            }
        }
        Ok(parsed)
    }
}

/// Hash a plaintext password with a fresh random salt.
///
/// ```rust,ignore
/// let credential = hash_password("user123")?;
/// // credential.hash == "$argon2id$v=19$m=19456,t=2,p=1$..."
/// ```
pub fn hash_password(password: &str) -> Result<PasswordCredential, PasswordError> {
    hash_password_with(password, Params::default())
}

/// Hash a plaintext password with explicit Argon2id cost parameters.
pub fn hash_password_with(password: &str, params: Params) -> Result<PasswordCredential, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(PasswordCredential {
        algorithm: HashAlgorithm::Argon2idV19,
        hash: hash.to_string(),
    })
}

/// Verify a plaintext password against a stored credential.
///
/// The digest comparison inside argon2 is constant time.
pub fn verify_password(password: &str, credential: &PasswordCredential) -> Result<(), PasswordError> {
    let parsed = credential.parsed()?;
    match credential.algorithm {
        HashAlgorithm::Argon2idV19 => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| PasswordError::VerificationFailed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let credential = hash_password("user123").unwrap();
        assert_eq!(credential.algorithm, HashAlgorithm::Argon2idV19);
        assert!(credential.hash.starts_with("$argon2id$v=19$"));

        assert!(verify_password("user123", &credential).is_ok());
        assert_eq!(
            verify_password("admin123", &credential),
            Err(PasswordError::VerificationFailed)
        );
    }

    #[test]
    fn same_password_gets_different_salts() {
        let first = hash_password("user123").unwrap();
        let second = hash_password("user123").unwrap();
        assert_ne!(first.hash, second.hash);
        assert!(verify_password("user123", &second).is_ok());
    }

    #[test]
    fn custom_params_are_recorded_in_the_hash() {
        let params = Params::new(1024, 1, 1, None).unwrap();
        let credential = hash_password_with("user123", params).unwrap();
        assert!(credential.hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));

        let recorded = credential.params().unwrap();
        assert_eq!(recorded.m_cost(), 1024);
        assert_eq!(recorded.t_cost(), 1);
        assert_eq!(recorded.p_cost(), 1);
        assert!(verify_password("user123", &credential).is_ok());
    }

    #[test]
    fn garbage_hash_is_invalid_format() {
        let credential = PasswordCredential {
            algorithm: HashAlgorithm::Argon2idV19,
            hash: "not-a-valid-hash".to_string(),
        };
        assert_eq!(credential.check_format(), Err(PasswordError::InvalidHashFormat));
        assert_eq!(
            verify_password("anything", &credential),
            Err(PasswordError::InvalidHashFormat)
        );
    }

    #[test]
    fn hash_from_other_argon2_variant_is_rejected() {
        let credential = PasswordCredential {
            algorithm: HashAlgorithm::Argon2idV19,
            hash: "$argon2i$v=19$m=16,t=2,p=1$c29tZXNhbHQ$3ZkNBdBAYmVCh9vW4HZ6Sw".to_string(),
        };
        assert_eq!(credential.check_format(), Err(PasswordError::InvalidHashFormat));
    }

    #[test]
    fn credential_serializes_with_versioned_identifier() {
        let credential = PasswordCredential {
            algorithm: HashAlgorithm::Argon2idV19,
            hash: "$argon2id$v=19$...".to_string(),
        };
        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["algorithm"], "argon2id-v19");

        let unknown = r#"{"algorithm":"bcrypt","hash":"$2a$10$abc"}"#;
        assert!(serde_json::from_str::<PasswordCredential>(unknown).is_err());
    }
}
