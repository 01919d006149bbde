//! Profile repository trait.
//!
//! Defines the interface for profile persistence operations.

use super::model::{Account, Profile};
use anyhow::Result;
use async_trait::async_trait;

/// An abstract repository for managing profile persistence.
///
/// This trait defines the contract for persisting and retrieving user
/// profiles, decoupling the application's core logic from the specific
/// storage mechanism (TOML files, database, remote API).
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by its sign-in email.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Profile))`: profile found
    /// - `Ok(None)`: no profile registered under that email
    /// - `Err(_)`: the store was unreachable
    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>>;

    /// Finds a profile by its id.
    async fn find_by_id(&self, profile_id: &str) -> Result<Option<Profile>>;

    /// Saves a profile, overwriting any previous version.
    async fn save(&self, profile: &Profile) -> Result<()>;

    /// Lists every student account, for the admin roster.
    async fn list_students(&self) -> Result<Vec<Account>>;

    /// Persists the agreement-acceptance flag for a profile.
    async fn set_agreement_accepted(&self, profile_id: &str, accepted: bool) -> Result<()>;
}
