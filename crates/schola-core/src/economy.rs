//! Coin economy: balances and the reward store catalog.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A user's coin balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyBalance {
    pub coins: u64,
}

/// A purchasable reward in the store catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: u64,
}

/// Repository for the coin economy.
///
/// Read paths degrade gracefully: an unreachable store yields a
/// zero-valued balance or an empty catalog rather than an error. Write
/// paths stay fallible so callers can surface a notice and leave local
/// state unchanged.
#[async_trait]
pub trait EconomyRepository: Send + Sync {
    /// Returns the user's balance, or the zero default when the store is
    /// unreachable.
    async fn balance(&self, user_id: &str) -> EconomyBalance;

    /// Credits coins to the user and returns the new balance.
    async fn credit(&self, user_id: &str, amount: u64) -> Result<u64>;

    /// Returns the store catalog, or an empty one when the store is
    /// unreachable.
    async fn catalog(&self) -> Vec<StoreItem>;
}
