//! Credential exchange backed by the profile store.

use async_trait::async_trait;
use schola_core::account::{Account, AuthService, Credentials, ProfileRepository};
use schola_core::error::{Result, ScholaError};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Computes the hex-encoded SHA-256 digest stored for a password.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// [`AuthService`] implementation over the profile store.
///
/// The exchange is all-or-nothing: any failure (unknown email, digest
/// mismatch, role mismatch, unreachable store) produces
/// [`ScholaError::Auth`] and nothing else; no partially populated account
/// ever escapes.
pub struct StoreAuthService {
    profiles: Arc<dyn ProfileRepository>,
}

impl StoreAuthService {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl AuthService for StoreAuthService {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Account> {
        let profile = self
            .profiles
            .find_by_email(&credentials.email)
            .await
            .map_err(|e| ScholaError::auth(format!("auth backend unreachable: {e}")))?
            .ok_or_else(|| ScholaError::auth("invalid credentials"))?;

        if profile.password_digest != password_digest(&credentials.password) {
            return Err(ScholaError::auth("invalid credentials"));
        }

        if profile.role != credentials.intended_role {
            return Err(ScholaError::auth("account role does not match the selected role"));
        }

        tracing::info!("[Auth] Credential exchange succeeded for {}", profile.id);
        Ok(profile.to_account())
    }
}
