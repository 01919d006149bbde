//! DirStorage-based InfractionRepository implementation.

use crate::dir_storage::DirStorage;
use crate::paths::{Collection, ScholaPaths};
use anyhow::Result;
use async_trait::async_trait;
use schola_core::infraction::{Infraction, InfractionRepository};
use std::path::Path;

pub struct DirInfractionRepository {
    storage: DirStorage,
}

impl DirInfractionRepository {
    const ENTITY_NAME: &'static str = "infraction";

    pub async fn new(base_dir: Option<&Path>) -> Result<Self> {
        let paths = ScholaPaths::new(base_dir);
        let storage = paths.open_storage(Collection::Infractions).await?;
        Ok(Self { storage })
    }
}

#[async_trait]
impl InfractionRepository for DirInfractionRepository {
    async fn record(&self, infraction: &Infraction) -> Result<()> {
        self.storage
            .save(Self::ENTITY_NAME, &infraction.id, infraction)
            .await
            .map_err(Into::into)
    }

    async fn list_for(&self, student_id: &str) -> Result<Vec<Infraction>> {
        let all: Vec<(String, Infraction)> = self.storage.load_all(Self::ENTITY_NAME).await?;
        let mut infractions: Vec<Infraction> = all
            .into_iter()
            .map(|(_, infraction)| infraction)
            .filter(|infraction| infraction.student_id == student_id)
            .collect();
        infractions.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        Ok(infractions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schola_core::infraction::InfractionCategory;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let repo = DirInfractionRepository::new(Some(temp_dir.path()))
            .await
            .unwrap();

        repo.record(&Infraction::new(
            "u-1",
            InfractionCategory::Conduct,
            "Talking during the diagnostic",
        ))
        .await
        .unwrap();

        let listed = repo.list_for("u-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, InfractionCategory::Conduct);
        assert!(repo.list_for("u-2").await.unwrap().is_empty());
    }
}
