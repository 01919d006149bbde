//! DirStorage-based EconomyRepository implementation.
//!
//! Read paths degrade to zero/empty defaults when the store misbehaves,
//! per the adapter contract; only `credit` is fallible.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::economy::{EconomyBalance, EconomyRepository, StoreItem};
use std::path::Path;

pub struct DirEconomyRepository {
    balances: DirStorage,
    catalog: DirStorage,
}

impl DirEconomyRepository {
    const BALANCE_ENTITY: &'static str = "balance";
    const ITEM_ENTITY: &'static str = "store_item";

    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        Ok(Self {
            balances: paths.open_storage(Collection::Economy).await?,
            catalog: paths.open_storage(Collection::StoreCatalog).await?,
        })
    }

    /// Adds an item to the store catalog.
    pub async fn add_store_item(&self, item: &StoreItem) -> Result<()> {
        self.catalog
            .save(Self::ITEM_ENTITY, &item.id, item)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl EconomyRepository for DirEconomyRepository {
    async fn balance(&self, user_id: &str) -> EconomyBalance {
        match self
            .balances
            .load::<EconomyBalance>(Self::BALANCE_ENTITY, user_id)
            .await
        {
            Ok(balance) => balance,
            Err(e) if e.is_not_found() => EconomyBalance::default(),
            Err(e) => {
                tracing::warn!("[Economy] Balance read failed for {user_id}, serving zero: {e}");
                EconomyBalance::default()
            }
        }
    }

    async fn credit(&self, user_id: &str, amount: u64) -> Result<u64> {
        let current = match self
            .balances
            .load::<EconomyBalance>(Self::BALANCE_ENTITY, user_id)
            .await
        {
            Ok(balance) => balance.coins,
            Err(e) if e.is_not_found() => 0,
            Err(e) => return Err(e.into()),
        };
        let updated = EconomyBalance {
            coins: current.saturating_add(amount),
        };
        self.balances
            .save(Self::BALANCE_ENTITY, user_id, &updated)
            .await?;
        Ok(updated.coins)
    }

    async fn catalog(&self) -> Vec<StoreItem> {
        match self.catalog.load_all::<StoreItem>(Self::ITEM_ENTITY).await {
            Ok(items) => {
                let mut items: Vec<StoreItem> =
                    items.into_iter().map(|(_, item)| item).collect();
                items.sort_by(|a, b| a.price.cmp(&b.price));
                items
            }
            Err(e) => {
                tracing::warn!("[Economy] Catalog read failed, serving empty: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_repository() -> (DirEconomyRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirEconomyRepository::new(Some(temp_dir.path())).await.unwrap();
        (repo, temp_dir)
    }

    #[tokio::test]
    async fn test_unknown_user_has_zero_balance() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert_eq!(repo.balance("u-1").await, EconomyBalance::default());
    }

    #[tokio::test]
    async fn test_credit_accumulates() {
        let (repo, _temp_dir) = create_test_repository().await;
        assert_eq!(repo.credit("u-1", 10).await.unwrap(), 10);
        assert_eq!(repo.credit("u-1", 5).await.unwrap(), 15);
        assert_eq!(repo.balance("u-1").await.coins, 15);
    }

    #[tokio::test]
    async fn test_catalog_sorted_by_price() {
        let (repo, _temp_dir) = create_test_repository().await;
        repo.add_store_item(&StoreItem {
            id: "item-2".to_string(),
            name: "Poster".to_string(),
            description: "A poster".to_string(),
            price: 50,
        })
        .await
        .unwrap();
        repo.add_store_item(&StoreItem {
            id: "item-1".to_string(),
            name: "Sticker".to_string(),
            description: "A sticker".to_string(),
            price: 5,
        })
        .await
        .unwrap();

        let catalog = repo.catalog().await;
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "item-1");
    }
}
