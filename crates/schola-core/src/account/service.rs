//! Authentication service trait.

use super::model::{Account, Credentials};
use crate::error::Result;
use async_trait::async_trait;

/// Credential exchange against the auth backend.
///
/// Implementations must be all-or-nothing: either the full [`Account`] is
/// returned, or [`crate::ScholaError::Auth`] is raised and the caller's
/// state stays untouched. Partial success is not a representable outcome.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScholaError::Auth`] on bad credentials, on a role
    /// mismatch with the stored profile, or when the auth backend is
    /// unreachable.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Account>;
}
