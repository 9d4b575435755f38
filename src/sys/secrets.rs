// src/sys/secrets.rs

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// SecretValue is the plaintext payload returned by the secret store.
///
/// 1. It cannot be accidentally logged (`{:?}` prints `SecretValue([REDACTED])`).
/// 2. The backing allocation is zeroized when the value is dropped, which happens
///    as soon as the payload has been handed to the host.
pub struct SecretValue {
    payload: SecretString,
}

impl SecretValue {
    pub fn new(payload: String) -> Self {
        Self {
            payload: SecretString::new(payload),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.payload.expose_secret().is_empty()
    }

    /// Exposes the plaintext to the closure only, so the borrowed `&str` cannot
    /// outlive the call.
    pub fn use_secret<F, R>(&self, action: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        action(self.payload.expose_secret())
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

/// Long-term access key pair passed explicitly by the test case.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct StaticCredentials {
    access_key_id: String,
    secret_access_key: String,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// How the secret-store client authenticates. There is no provider chain here:
/// either both keys were supplied or the SDK resolves credentials on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAuth {
    Static(StaticCredentials),
    Ambient,
}

impl ClientAuth {
    /// Both keys must be non-empty for explicit authentication.
    pub fn from_keys(access_key: &str, secret_key: &str) -> Self {
        if !access_key.is_empty() && !secret_key.is_empty() {
            ClientAuth::Static(StaticCredentials::new(access_key, secret_key))
        } else {
            ClientAuth::Ambient
        }
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, ClientAuth::Ambient)
    }
}
